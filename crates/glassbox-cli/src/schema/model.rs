use std::collections::BTreeMap;

use glassbox_frame::{ModelMatrix, ModelTask, ScoreError, Scorer};
use serde::{Deserialize, Serialize};

/// A fitted linear model loaded from disk: the reference external
/// collaborator behind the [`Scorer`] boundary.
///
/// Coefficients are keyed by model-matrix column name, including one-hot
/// indicator columns like `type_red`. Classification models pass the linear
/// score through the logistic function, so predictions are positive-class
/// probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Intercept added to every prediction.
    pub intercept: f64,
    /// Weight per trained column.
    pub coefficients: BTreeMap<String, f64>,
    /// Regression or classification semantics.
    #[serde(default)]
    pub task: ModelTask,
}

impl Scorer for LinearModel {
    fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
        let mut predictions = vec![self.intercept; matrix.rows()];
        for (name, weight) in &self.coefficients {
            let column = matrix
                .column(name)
                .ok_or_else(|| ScoreError::MissingColumn { name: name.clone() })?;
            for (prediction, value) in predictions.iter_mut().zip(column) {
                *prediction += weight * value;
            }
        }
        if self.task == ModelTask::Classification {
            for prediction in &mut predictions {
                *prediction = logistic(*prediction);
            }
        }
        Ok(predictions)
    }
}

fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(task: ModelTask) -> LinearModel {
        let mut coefficients = BTreeMap::new();
        coefficients.insert("x".to_string(), 2.0);
        LinearModel {
            intercept: 1.0,
            coefficients,
            task,
        }
    }

    #[test]
    fn test_regression_scores_are_linear() {
        let matrix = ModelMatrix::new(vec![("x".to_string(), vec![0.0, 1.0, 2.0])]).unwrap();
        let predictions = model(ModelTask::Regression).score(&matrix).unwrap();
        assert_eq!(predictions, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_classification_scores_are_probabilities() {
        let matrix = ModelMatrix::new(vec![("x".to_string(), vec![-10.0, 9.5])]).unwrap();
        let predictions = model(ModelTask::Classification).score(&matrix).unwrap();
        assert!(predictions[0] < 0.001);
        assert!(predictions[1] > 0.999);
    }

    #[test]
    fn test_missing_trained_column_fails() {
        let matrix = ModelMatrix::new(vec![("z".to_string(), vec![1.0])]).unwrap();
        let result = model(ModelTask::Regression).score(&matrix);
        assert!(matches!(result, Err(ScoreError::MissingColumn { .. })));
    }

    #[test]
    fn test_task_defaults_to_regression() {
        let json = r#"{"intercept": 0.5, "coefficients": {"x": 1.5}}"#;
        let model: LinearModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.task, ModelTask::Regression);
    }
}
