//! Per-group aggregate error for the dependent variable.

use glassbox_frame::FrameError;

use crate::{config::AnalysisConfig, report::AccuracyRecord, scored::ScoredFrame};

/// Computes one aggregate error metric per group level of `group_var`.
///
/// The dependent variable is never bucketed here: each partition's
/// residuals reduce directly through the configured metric (RAW for
/// classification runs). Partitions appear in first-seen order; the record
/// also carries the partition's row count.
///
/// # Errors
///
/// Returns [`FrameError`] when `group_var` is missing or not categorical.
#[expect(clippy::cast_precision_loss)]
pub fn group_accuracy(
    scored: &ScoredFrame,
    group_var: &str,
    config: &AnalysisConfig,
) -> Result<Vec<AccuracyRecord>, FrameError> {
    let levels = scored.frame().label_column(group_var)?;
    let metric = config.error_metric();
    let group_var_label = config.label_for(group_var).to_string();

    let mut partitions: Vec<(String, Vec<f64>)> = Vec::new();
    for (i, level) in levels.iter().enumerate() {
        match partitions.iter_mut().find(|(l, _)| l == level) {
            Some((_, errors)) => errors.push(scored.errors()[i]),
            None => partitions.push((level.clone(), vec![scored.errors()[i]])),
        }
    }

    Ok(partitions
        .into_iter()
        .map(|(level, errors)| AccuracyRecord {
            group_var: group_var_label.clone(),
            group_value: level,
            value: metric.compute(&errors),
            total: errors.len() as f64,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use glassbox_frame::{
        ColumnData, Frame, ModelMatrix, ModelTask, ScoreError, Scorer,
    };
    use glassbox_stats::metrics::ErrorMetric;

    use crate::config::Mode;

    use super::*;

    struct ZeroScorer;

    impl Scorer for ZeroScorer {
        fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
            Ok(vec![0.0; matrix.rows()])
        }
    }

    fn scored_fixture() -> ScoredFrame {
        // Predictions are all zero, so residuals equal the target values.
        let frame = Frame::new(vec![
            (
                "g".to_string(),
                ColumnData::Label(
                    ["a", "a", "b", "b"].iter().map(ToString::to_string).collect(),
                ),
            ),
            ("y".to_string(), ColumnData::Float(vec![3.0, -4.0, 1.0, 1.0])),
        ])
        .unwrap();
        let matrix = ModelMatrix::new(vec![("z".to_string(), vec![0.0; 4])]).unwrap();
        ScoredFrame::score(frame, matrix, "y", &ZeroScorer).unwrap()
    }

    #[test]
    fn test_metric_per_partition() {
        let config = AnalysisConfig::new(Mode::Error, vec!["g".to_string()])
            .unwrap()
            .with_error_metric(ErrorMetric::Mse);
        let records = group_accuracy(&scored_fixture(), "g", &config).unwrap();

        assert_eq!(records.len(), 2);
        // Partition "a": errors [3, -4], MSE = 12.5.
        assert_eq!(records[0].group_value, "a");
        assert_eq!(records[0].value, Some(12.5));
        assert_eq!(records[0].total, 2.0);
        // Partition "b": errors [1, 1], MSE = 1.
        assert_eq!(records[1].value, Some(1.0));
    }

    #[test]
    fn test_classification_forces_raw() {
        let config = AnalysisConfig::new(Mode::Error, vec!["g".to_string()])
            .unwrap()
            .with_task(ModelTask::Classification)
            .with_error_metric(ErrorMetric::Mse);
        let records = group_accuracy(&scored_fixture(), "g", &config).unwrap();
        // RAW of [3, -4] is -0.5.
        assert_eq!(records[0].value, Some(-0.5));
    }

    #[test]
    fn test_missing_group_var_fails() {
        let config = AnalysisConfig::new(Mode::Error, vec!["g".to_string()]).unwrap();
        assert!(group_accuracy(&scored_fixture(), "missing", &config).is_err());
    }
}
