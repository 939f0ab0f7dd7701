//! Synthetic perturbation of one column and re-scoring.
//!
//! Both perturbations operate on a private clone of the model matrix; the
//! caller's scored table is never touched. Scoring the perturbed copy is
//! deterministic, so a scoring failure is fatal and never retried.

use glassbox_frame::{
    FrameError, ScoreError, Scorer, distinct_levels, indicator_name, label_mode,
};
use glassbox_stats::descriptive::DescriptiveStats;

use crate::{report::IncrementalValue, scored::ScoredFrame};

/// Failure while perturbing and re-scoring a column.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PerturbError {
    /// The column (or one of its indicator columns) is absent.
    Frame(FrameError),
    /// The model rejected the perturbed matrix.
    Score(ScoreError),
    /// The column has no values to perturb.
    #[display("cannot perturb empty column: {name}")]
    #[from(skip)]
    EmptyColumn {
        /// The empty column name.
        name: String,
    },
}

/// Outcome of one perturbation pass over a (column, group variable) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    /// Per-row prediction change (`new_prediction − prediction`).
    pub deltas: Vec<f64>,
    /// The perturbation applied: signed shift or forced modal level.
    pub incremental: IncrementalValue,
    /// Rows whose original value already equals the perturbation baseline
    /// (categorical mode only); excluded from later bucketing because the
    /// perturbation is a no-op for them.
    pub baseline_rows: Vec<bool>,
}

/// Shifts a continuous column by `std_num` standard deviations and
/// re-scores the whole table.
///
/// The shift is the column's sample standard deviation over the entire
/// model matrix times `std_num`, applied uniformly to every row.
///
/// # Errors
///
/// Returns [`PerturbError`] when the column is missing or empty, or when
/// the model rejects the perturbed matrix.
pub fn perturb_continuous(
    scored: &ScoredFrame,
    column: &str,
    std_num: i32,
    scorer: &dyn Scorer,
) -> Result<Perturbation, PerturbError> {
    let values = scored
        .matrix()
        .column(column)
        .ok_or_else(|| FrameError::ColumnMissing {
            name: column.to_string(),
        })?;
    let stats = DescriptiveStats::new(values).ok_or_else(|| PerturbError::EmptyColumn {
        name: column.to_string(),
    })?;
    let shift = stats.std_dev * f64::from(std_num);

    let mut perturbed = scored.matrix().clone();
    let shifted = perturbed
        .column_mut(column)
        .ok_or_else(|| FrameError::ColumnMissing {
            name: column.to_string(),
        })?;
    for value in shifted {
        *value += shift;
    }

    let new_predictions = scorer.score(&perturbed)?;
    Ok(Perturbation {
        deltas: deltas(&new_predictions, scored.predictions()),
        incremental: IncrementalValue::Shift(shift),
        baseline_rows: vec![false; scored.rows()],
    })
}

/// Forces every row of a categorical column to its modal level and
/// re-scores the whole table.
///
/// The mode is computed over the untouched categorical view; in the one-hot
/// encoded matrix the modal indicator is set to 1 and every sibling
/// indicator to 0 for all rows. Rows already at the mode are flagged as
/// baseline rows.
///
/// # Errors
///
/// Returns [`PerturbError`] when the column or an indicator column is
/// missing, the column is empty, or the model rejects the perturbed matrix.
pub fn perturb_categorical(
    scored: &ScoredFrame,
    column: &str,
    scorer: &dyn Scorer,
) -> Result<Perturbation, PerturbError> {
    let labels = scored.frame().label_column(column)?;
    let mode = label_mode(labels).ok_or_else(|| PerturbError::EmptyColumn {
        name: column.to_string(),
    })?;

    let mut perturbed = scored.matrix().clone();
    for level in distinct_levels(labels) {
        let name = indicator_name(column, &level);
        let indicator = perturbed
            .column_mut(&name)
            .ok_or(FrameError::ColumnMissing { name })?;
        let forced = if level == mode { 1.0 } else { 0.0 };
        for value in indicator {
            *value = forced;
        }
    }

    let new_predictions = scorer.score(&perturbed)?;
    let baseline_rows = labels.iter().map(|l| *l == mode).collect();
    Ok(Perturbation {
        deltas: deltas(&new_predictions, scored.predictions()),
        incremental: IncrementalValue::Level(mode),
        baseline_rows,
    })
}

fn deltas(new_predictions: &[f64], predictions: &[f64]) -> Vec<f64> {
    new_predictions
        .iter()
        .zip(predictions)
        .map(|(new, old)| new - old)
        .collect()
}

#[cfg(test)]
mod tests {
    use glassbox_frame::{ColumnData, Frame, ModelMatrix, one_hot_matrix};

    use super::*;

    /// Sums every matrix column, so prediction deltas track input changes
    /// exactly.
    struct SumScorer;

    impl Scorer for SumScorer {
        fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
            let names: Vec<&str> = matrix.names().collect();
            let mut sums = vec![0.0; matrix.rows()];
            for name in names {
                for (sum, value) in sums.iter_mut().zip(matrix.column(name).unwrap()) {
                    *sum += value;
                }
            }
            Ok(sums)
        }
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn scored_fixture(x: Vec<f64>, color: &[&str]) -> ScoredFrame {
        let rows = x.len();
        let frame = Frame::new(vec![
            ("x".to_string(), ColumnData::Float(x)),
            ("color".to_string(), ColumnData::Label(labels(color))),
            ("y".to_string(), ColumnData::Float(vec![0.0; rows])),
        ])
        .unwrap();
        let matrix = one_hot_matrix(&frame, &["y"]).unwrap();
        ScoredFrame::score(frame, matrix, "y", &SumScorer).unwrap()
    }

    #[test]
    fn test_continuous_shift_is_std_times_multiplier() {
        // Sample std of [2, 4, 6, 8] is sqrt(20/3).
        let scored = scored_fixture(vec![2.0, 4.0, 6.0, 8.0], &["a", "a", "a", "a"]);
        let result = perturb_continuous(&scored, "x", 2, &SumScorer).unwrap();

        let expected_shift = (20.0_f64 / 3.0).sqrt() * 2.0;
        let IncrementalValue::Shift(shift) = result.incremental else {
            panic!("continuous perturbation must produce a shift");
        };
        assert!((shift - expected_shift).abs() < 1e-12);

        // SumScorer makes every delta equal the shift itself.
        for delta in &result.deltas {
            assert!((delta - expected_shift).abs() < 1e-12);
        }
        assert!(result.baseline_rows.iter().all(|b| !b));
    }

    #[test]
    fn test_continuous_does_not_mutate_original() {
        let scored = scored_fixture(vec![1.0, 2.0, 3.0], &["a", "a", "a"]);
        let before = scored.matrix().clone();
        perturb_continuous(&scored, "x", 1, &SumScorer).unwrap();
        assert_eq!(*scored.matrix(), before);
    }

    #[test]
    fn test_categorical_forces_mode_and_flags_baseline() {
        let scored = scored_fixture(vec![0.0; 4], &["a", "a", "b", "c"]);
        let result = perturb_categorical(&scored, "color", &SumScorer).unwrap();

        assert_eq!(
            result.incremental,
            IncrementalValue::Level("a".to_string())
        );
        assert_eq!(result.baseline_rows, vec![true, true, false, false]);

        // Rows already at the mode see no change; the others swap one
        // indicator for another, so the sum is unchanged as well.
        for delta in &result.deltas {
            assert!((delta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_categorical_deltas_follow_forced_indicators() {
        /// Weights the `color_a` indicator only.
        struct ModeWeighted;
        impl Scorer for ModeWeighted {
            fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
                Ok(matrix
                    .column("color_a")
                    .unwrap()
                    .iter()
                    .map(|v| v * 10.0)
                    .collect())
            }
        }

        let frame = Frame::new(vec![
            (
                "color".to_string(),
                ColumnData::Label(labels(&["a", "b", "c"])),
            ),
            ("y".to_string(), ColumnData::Float(vec![0.0; 3])),
        ])
        .unwrap();
        let matrix = one_hot_matrix(&frame, &["y"]).unwrap();
        let scored = ScoredFrame::score(frame, matrix, "y", &ModeWeighted).unwrap();

        let result = perturb_categorical(&scored, "color", &ModeWeighted).unwrap();
        // Original predictions: [10, 0, 0]; forced-to-mode predictions are
        // all 10.
        assert_eq!(result.deltas, vec![0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_missing_indicator_column_fails() {
        let frame = Frame::new(vec![
            (
                "color".to_string(),
                ColumnData::Label(labels(&["a", "b"])),
            ),
            ("y".to_string(), ColumnData::Float(vec![0.0, 0.0])),
        ])
        .unwrap();
        // Matrix deliberately built without the color indicators.
        let matrix = ModelMatrix::new(vec![("z".to_string(), vec![0.0, 0.0])]).unwrap();
        let scored = ScoredFrame::score(frame, matrix, "y", &SumScorer).unwrap();

        let result = perturb_categorical(&scored, "color", &SumScorer);
        assert!(matches!(result, Err(PerturbError::Frame(_))));
    }
}
