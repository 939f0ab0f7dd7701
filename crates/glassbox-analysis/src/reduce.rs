//! Bucket reduction: one compact summary record per bucket.
//!
//! The reduction arms preserve the reference behavior exactly, including
//! its asymmetries:
//!
//! - Zero residuals belong to neither the positive nor the negative
//!   aggregate.
//! - Error-mode continuous buckets report the plain mean of predictions,
//!   while error-mode categorical cells apply the configured aggregate to
//!   every numeric field.
//! - Sensitivity records carry a single signed delta aggregate instead of
//!   the positive/negative split.

use glassbox_frame::label_mode;
use glassbox_stats::aggregate::{Aggregate, mean};

use crate::report::{ColumnValue, SummaryRecord};

/// Reduces an error-mode bucket of a continuous column.
///
/// `column_values`, `group_levels`, `predictions`, and `errors` are the
/// bucket's rows, in row order.
#[must_use]
pub fn reduce_error_continuous(
    column_values: &[f64],
    group_levels: &[String],
    predictions: &[f64],
    errors: &[f64],
    aggregate: Aggregate,
) -> SummaryRecord {
    let (err_pos, err_neg) = split_errors(errors, aggregate);
    SummaryRecord::Error {
        column_value: finite_max(column_values).map(ColumnValue::Num),
        group_value: label_mode(group_levels),
        predicted_mean: mean(predictions),
        err_pos,
        err_neg,
    }
}

/// Reduces an error-mode (group level, category level) cell.
#[must_use]
pub fn reduce_error_categorical(
    level: &str,
    group_level: &str,
    predictions: &[f64],
    errors: &[f64],
    aggregate: Aggregate,
) -> SummaryRecord {
    let (err_pos, err_neg) = split_errors(errors, aggregate);
    SummaryRecord::Error {
        column_value: Some(ColumnValue::Level(level.to_string())),
        group_value: Some(group_level.to_string()),
        predicted_mean: aggregate.apply(predictions),
        err_pos,
        err_neg,
    }
}

/// Reduces a sensitivity-mode bucket of a continuous column.
#[must_use]
pub fn reduce_sensitivity_continuous(
    column_values: &[f64],
    group_levels: &[String],
    deltas: &[f64],
    aggregate: Aggregate,
) -> SummaryRecord {
    SummaryRecord::Sensitivity {
        column_value: finite_max(column_values).map(ColumnValue::Num),
        group_value: label_mode(group_levels),
        predicted_mean: aggregate.apply(deltas),
    }
}

/// Reduces a sensitivity-mode (group level, category level) cell.
#[must_use]
pub fn reduce_sensitivity_categorical(
    level: &str,
    group_level: &str,
    deltas: &[f64],
    aggregate: Aggregate,
) -> SummaryRecord {
    SummaryRecord::Sensitivity {
        column_value: Some(ColumnValue::Level(level.to_string())),
        group_value: Some(group_level.to_string()),
        predicted_mean: aggregate.apply(deltas),
    }
}

/// Splits residuals into strictly positive and strictly negative
/// subsequences and aggregates each independently. Zero residuals (and
/// non-finite ones) contribute to neither side.
fn split_errors(errors: &[f64], aggregate: Aggregate) -> (Option<f64>, Option<f64>) {
    let positive: Vec<f64> = errors.iter().copied().filter(|e| *e > 0.0).collect();
    let negative: Vec<f64> = errors.iter().copied().filter(|e| *e < 0.0).collect();
    (aggregate.apply(&positive), aggregate.apply(&negative))
}

fn finite_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}
