//! Scored-table construction: one prediction pass over the input.

use glassbox_frame::{Frame, FrameError, ModelMatrix, ScoreError, Scorer};

/// Failure while building the scored table.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum BuildError {
    /// The target column is missing or not numeric.
    Frame(FrameError),
    /// The model rejected the input matrix.
    Score(ScoreError),
    /// The categorical view and the model matrix disagree on row count.
    #[display("frame has {frame_rows} rows but matrix has {matrix_rows}")]
    #[from(skip)]
    RowMismatch {
        /// Rows in the categorical view.
        frame_rows: usize,
        /// Rows in the model matrix.
        matrix_rows: usize,
    },
}

/// The input table with the model's predictions and signed residuals
/// attached.
///
/// Owned by the run orchestrator for the duration of one run and never
/// mutated by downstream components: perturbation operates on private
/// copies of the matrix, and deltas are threaded as values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFrame {
    frame: Frame,
    matrix: ModelMatrix,
    target: String,
    predictions: Vec<f64>,
    errors: Vec<f64>,
}

impl ScoredFrame {
    /// Scores `matrix` once with `scorer` and attaches predictions and
    /// residuals (`actual − prediction`) for the `target` column of
    /// `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the tables disagree on row count, the
    /// target column is missing or not numeric, or scoring fails.
    pub fn score(
        frame: Frame,
        matrix: ModelMatrix,
        target: &str,
        scorer: &dyn Scorer,
    ) -> Result<Self, BuildError> {
        if frame.rows() != matrix.rows() {
            return Err(BuildError::RowMismatch {
                frame_rows: frame.rows(),
                matrix_rows: matrix.rows(),
            });
        }

        let predictions = scorer.score(&matrix)?;
        if predictions.len() != matrix.rows() {
            return Err(BuildError::Score(ScoreError::ShapeMismatch {
                expected: matrix.rows(),
                actual: predictions.len(),
            }));
        }

        let actual = frame.float_column(target)?;
        let errors = actual
            .iter()
            .zip(&predictions)
            .map(|(a, p)| a - p)
            .collect();

        Ok(Self {
            frame,
            matrix,
            target: target.to_string(),
            predictions,
            errors,
        })
    }

    /// The categorical-typed view of the input table.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The numeric model-input matrix.
    #[must_use]
    pub fn matrix(&self) -> &ModelMatrix {
        &self.matrix
    }

    /// The dependent-variable column name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// One prediction per row.
    #[must_use]
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// One signed residual per row (`actual − prediction`).
    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.frame.rows()
    }
}

#[cfg(test)]
mod tests {
    use glassbox_frame::ColumnData;

    use super::*;

    struct ConstantScorer(f64);

    impl Scorer for ConstantScorer {
        fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
            Ok(vec![self.0; matrix.rows()])
        }
    }

    fn sample() -> (Frame, ModelMatrix) {
        let frame = Frame::new(vec![
            ("x".to_string(), ColumnData::Float(vec![1.0, 2.0, 3.0])),
            ("y".to_string(), ColumnData::Float(vec![2.0, 2.0, 5.0])),
        ])
        .unwrap();
        let matrix = ModelMatrix::new(vec![("x".to_string(), vec![1.0, 2.0, 3.0])]).unwrap();
        (frame, matrix)
    }

    #[test]
    fn test_residuals_are_actual_minus_prediction() {
        let (frame, matrix) = sample();
        let scored = ScoredFrame::score(frame, matrix, "y", &ConstantScorer(2.0)).unwrap();
        assert_eq!(scored.predictions(), &[2.0, 2.0, 2.0]);
        assert_eq!(scored.errors(), &[0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let (frame, matrix) = sample();
        let result = ScoredFrame::score(frame, matrix, "z", &ConstantScorer(0.0));
        assert!(matches!(result, Err(BuildError::Frame(_))));
    }

    #[test]
    fn test_row_mismatch_is_rejected() {
        let (frame, _) = sample();
        let matrix = ModelMatrix::new(vec![("x".to_string(), vec![1.0])]).unwrap();
        let result = ScoredFrame::score(frame, matrix, "y", &ConstantScorer(0.0));
        assert!(matches!(result, Err(BuildError::RowMismatch { .. })));
    }

    #[test]
    fn test_short_prediction_vector_is_rejected() {
        struct Short;
        impl Scorer for Short {
            fn score(&self, _matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
                Ok(vec![1.0])
            }
        }
        let (frame, matrix) = sample();
        let result = ScoredFrame::score(frame, matrix, "y", &Short);
        assert!(matches!(
            result,
            Err(BuildError::Score(ScoreError::ShapeMismatch { .. }))
        ));
    }
}
