//! The model-scoring capability boundary.

use serde::{Deserialize, Serialize};

use crate::frame::ModelMatrix;

/// Whether the fitted model is a regressor or a classifier.
///
/// Resolved once when the analysis is configured and carried as a flag;
/// classifier predictions are positive-class scores and force the RAW
/// accuracy metric downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTask {
    /// Numeric target; predictions are point estimates.
    #[default]
    Regression,
    /// Binary target; predictions are positive-class scores.
    Classification,
}

/// Scoring failure reported by a fitted model.
///
/// Scoring is deterministic, so a failure is fatal for the run: retrying an
/// identical call cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScoreError {
    /// The matrix is missing a column the model was trained on.
    #[display("model input is missing trained column: {name}")]
    MissingColumn {
        /// The trained column absent from the matrix.
        name: String,
    },
    /// The model produced a prediction vector of the wrong length.
    #[display("model returned {actual} predictions for {expected} rows")]
    ShapeMismatch {
        /// Row count of the scored matrix.
        expected: usize,
        /// Length of the returned prediction vector.
        actual: usize,
    },
}

/// A fitted model's single scoring operation.
///
/// Implementations must accept the same column set they were trained on,
/// including perturbed columns of identical shape, and must behave as a
/// pure function of the matrix.
pub trait Scorer {
    /// Scores every row of `matrix`, returning one prediction per row.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] when the matrix does not match the trained
    /// column set.
    fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError>;
}
