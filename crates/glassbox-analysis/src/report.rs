//! Result records and the nested result tree.
//!
//! Every aggregate in these types is an `Option<f64>`: a missing aggregate
//! serializes as the literal JSON `null`, never as a NaN encoding, so the
//! tree round-trips through any JSON consumer.

use serde::Serialize;

use glassbox_frame::ColumnKind;

use crate::percentile_meta::PercentileMetadata;

/// A bucket's representative column value: the bucket maximum for
/// continuous columns, the category level for categorical ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// Numeric representative value.
    Num(f64),
    /// Categorical level.
    Level(String),
}

/// The perturbation applied to one (column, group variable) pair in
/// sensitivity mode: the uniform shift for continuous columns, the forced
/// modal level for categorical ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IncrementalValue {
    /// Signed standard-deviation shift added to every row.
    Shift(f64),
    /// Modal level every row was forced to.
    Level(String),
}

/// One reduced bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryRecord {
    /// Error-mode reduction: positive and negative residual aggregates.
    Error {
        /// Representative column value for the bucket.
        #[serde(rename = "colValue")]
        column_value: Option<ColumnValue>,
        /// Modal group-variable level within the bucket.
        #[serde(rename = "groupByValue")]
        group_value: Option<String>,
        /// Mean prediction within the bucket (error/continuous) or the
        /// configured aggregate of predictions (error/categorical).
        #[serde(rename = "predictedYSmooth")]
        predicted_mean: Option<f64>,
        /// Aggregate of the strictly positive residuals.
        #[serde(rename = "errPos")]
        err_pos: Option<f64>,
        /// Aggregate of the strictly negative residuals.
        #[serde(rename = "errNeg")]
        err_neg: Option<f64>,
    },
    /// Sensitivity-mode reduction: one signed delta aggregate.
    Sensitivity {
        /// Representative column value for the bucket.
        #[serde(rename = "colValue")]
        column_value: Option<ColumnValue>,
        /// Modal group-variable level within the bucket.
        #[serde(rename = "groupByValue")]
        group_value: Option<String>,
        /// Configured aggregate of the perturbation deltas.
        #[serde(rename = "predictedYSmooth")]
        predicted_mean: Option<f64>,
    },
}

impl SummaryRecord {
    /// The record's aggregated prediction value.
    #[must_use]
    pub fn predicted_mean(&self) -> Option<f64> {
        match self {
            SummaryRecord::Error { predicted_mean, .. }
            | SummaryRecord::Sensitivity { predicted_mean, .. } => *predicted_mean,
        }
    }

    /// The record's representative column value.
    #[must_use]
    pub fn column_value(&self) -> Option<&ColumnValue> {
        match self {
            SummaryRecord::Error { column_value, .. }
            | SummaryRecord::Sensitivity { column_value, .. } => column_value.as_ref(),
        }
    }

    /// The record's group-variable level.
    #[must_use]
    pub fn group_value(&self) -> Option<&str> {
        match self {
            SummaryRecord::Error { group_value, .. }
            | SummaryRecord::Sensitivity { group_value, .. } => group_value.as_deref(),
        }
    }
}

/// One unaggregated row, as processed for a (column, group variable) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    /// Display label of the analysis column.
    #[serde(rename = "col_name")]
    pub column: String,
    /// Display label of the grouping variable.
    #[serde(rename = "groupByVar")]
    pub group_var: String,
    /// The row's value in the analysis column.
    #[serde(rename = "col_value")]
    pub column_value: Option<ColumnValue>,
    /// The row's grouping-variable level.
    #[serde(rename = "groupby_level")]
    pub group_level: String,
    /// The row's model prediction.
    pub prediction: Option<f64>,
    /// The row's signed residual.
    pub error: Option<f64>,
    /// The row's perturbation delta (sensitivity mode only).
    #[serde(rename = "diff", skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

/// All summary records for one (column, group variable) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Display label of the grouping variable.
    #[serde(rename = "groupByVarName")]
    pub group_var: String,
    /// The perturbation applied to this pair (sensitivity mode only).
    #[serde(rename = "incremental_val", skip_serializing_if = "Option::is_none")]
    pub incremental_value: Option<IncrementalValue>,
    /// Reduced buckets in iteration order: ascending bucket id for
    /// continuous columns, first-seen cell order for categorical ones.
    pub records: Vec<SummaryRecord>,
}

/// All group summaries for one analysis column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Display label of the analysis column.
    pub column: String,
    /// The column's variable kind.
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    /// One entry per grouping variable, in configured order.
    pub groups: Vec<GroupSummary>,
}

/// Aggregate error metric for one group partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyRecord {
    /// Display label of the grouping variable.
    #[serde(rename = "groupByVarName")]
    pub group_var: String,
    /// The partition's group level.
    #[serde(rename = "groupByValue")]
    pub group_value: String,
    /// The metric value over the partition's residuals.
    pub value: Option<f64>,
    /// Partition row count.
    #[serde(rename = "Total")]
    pub total: f64,
}

/// The trailing accuracy section: per-group aggregate error for the
/// dependent variable itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracySection {
    /// Display name of the metric used (RAW for classification runs).
    #[serde(rename = "errType")]
    pub error_type: String,
    /// One record per (grouping variable, group level).
    pub records: Vec<AccuracyRecord>,
}

/// Degenerate-data warning: a group too small for percentile binning fell
/// back to raw-value buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
#[display("group {group_value} of {group_var} has {rows} rows; \
          using raw values instead of percentile buckets for column {column}")]
pub struct RunWarning {
    /// Display label of the analysis column.
    pub column: String,
    /// Display label of the grouping variable.
    pub group_var: String,
    /// The small group's level.
    pub group_value: String,
    /// The group's row count.
    pub rows: usize,
}

/// The complete nested result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTree {
    /// Per-column summaries in column iteration order.
    pub columns: Vec<ColumnSummary>,
    /// Trailing per-group accuracy metrics.
    pub accuracy: AccuracySection,
    /// Trailing population percentile metadata, appended verbatim.
    pub percentiles: PercentileMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_aggregate_serializes_as_null() {
        let record = SummaryRecord::Error {
            column_value: Some(ColumnValue::Num(4.0)),
            group_value: Some("red".to_string()),
            predicted_mean: Some(5.5),
            err_pos: Some(0.25),
            err_neg: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["errNeg"], serde_json::Value::Null);
        assert_eq!(json["errPos"], 0.25);
        assert_eq!(json["predictedYSmooth"], 5.5);
    }

    #[test]
    fn test_column_value_serializes_untagged() {
        let num = serde_json::to_value(ColumnValue::Num(2.5)).unwrap();
        assert_eq!(num, 2.5);
        let level = serde_json::to_value(ColumnValue::Level("red".to_string())).unwrap();
        assert_eq!(level, "red");
    }

    #[test]
    fn test_sensitivity_record_has_no_error_fields() {
        let record = SummaryRecord::Sensitivity {
            column_value: Some(ColumnValue::Level("red".to_string())),
            group_value: Some("white".to_string()),
            predicted_mean: Some(-0.5),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("errPos").is_none());
        assert_eq!(json["predictedYSmooth"], -0.5);
    }

    #[test]
    fn test_warning_display() {
        let warning = RunWarning {
            column: "alcohol".to_string(),
            group_var: "type".to_string(),
            group_value: "red".to_string(),
            rows: 42,
        };
        let text = warning.to_string();
        assert!(text.contains("42 rows"));
        assert!(text.contains("alcohol"));
    }
}
