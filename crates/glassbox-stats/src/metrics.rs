//! Aggregate error metrics over model residuals.

use crate::aggregate::mean;

/// Aggregate error metric computed per group over the signed residuals.
///
/// # Examples
///
/// ```
/// use glassbox_stats::metrics::ErrorMetric;
///
/// let errors = [3.0, -4.0];
/// assert_eq!(ErrorMetric::Mse.compute(&errors), Some(12.5));
/// assert_eq!(ErrorMetric::Mae.compute(&errors), Some(3.5));
/// assert_eq!(ErrorMetric::Raw.compute(&errors), Some(-0.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMetric {
    /// Mean squared error.
    Mse,
    /// Root mean squared error.
    #[default]
    Rmse,
    /// Mean absolute error.
    Mae,
    /// Mean signed error.
    Raw,
}

impl ErrorMetric {
    /// Computes the metric over `errors`, skipping non-finite entries.
    ///
    /// Returns `None` when no finite error remains.
    #[must_use]
    pub fn compute(self, errors: &[f64]) -> Option<f64> {
        match self {
            ErrorMetric::Mse => squared_mean(errors),
            ErrorMetric::Rmse => squared_mean(errors).map(f64::sqrt),
            ErrorMetric::Mae => {
                let absolute: Vec<f64> = errors.iter().map(|e| e.abs()).collect();
                mean(&absolute)
            }
            ErrorMetric::Raw => mean(errors),
        }
    }

    /// The metric's display name as it appears in result output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ErrorMetric::Mse => "MSE",
            ErrorMetric::Rmse => "RMSE",
            ErrorMetric::Mae => "MAE",
            ErrorMetric::Raw => "RAW",
        }
    }
}

fn squared_mean(errors: &[f64]) -> Option<f64> {
    let squared: Vec<f64> = errors.iter().map(|e| e * e).collect();
    mean(&squared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse_is_sqrt_of_mse() {
        let errors = [1.0, 2.0, 2.0];
        let mse = ErrorMetric::Mse.compute(&errors).unwrap();
        let rmse = ErrorMetric::Rmse.compute(&errors).unwrap();
        assert_eq!(rmse, mse.sqrt());
    }

    #[test]
    fn test_mae_uses_absolute_errors() {
        assert_eq!(ErrorMetric::Mae.compute(&[-2.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_raw_keeps_sign() {
        assert_eq!(ErrorMetric::Raw.compute(&[-2.0, 2.0]), Some(0.0));
    }

    #[test]
    fn test_empty_errors() {
        assert_eq!(ErrorMetric::Rmse.compute(&[]), None);
        assert_eq!(ErrorMetric::Mse.compute(&[f64::NAN]), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ErrorMetric::Rmse.label(), "RMSE");
        assert_eq!(ErrorMetric::Raw.label(), "RAW");
    }
}
