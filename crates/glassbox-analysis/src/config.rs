//! Analysis configuration with eager validation.

use std::collections::BTreeMap;

use glassbox_frame::{ColumnData, Frame, ModelTask};
use glassbox_stats::{aggregate::Aggregate, metrics::ErrorMetric};

/// Signed standard-deviation multipliers accepted for continuous
/// perturbation.
pub const SUPPORTED_STD_NUMS: [i32; 6] = [-3, -2, -1, 1, 2, 3];

/// Which diagnostics the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bucket and aggregate the model's signed residuals.
    Error,
    /// Perturb each column, re-score, and aggregate prediction deltas.
    Sensitivity,
}

/// Configuration rejected before any data processing.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    /// No grouping variables were supplied.
    #[display("at least one grouping variable is required")]
    NoGroupVariables,
    /// The perturbation multiplier is outside the supported set.
    #[display("std_num must be -3, -2, -1, 1, 2, or 3; got {value}")]
    InvalidStdNum {
        /// The rejected multiplier.
        value: i32,
    },
    /// A configured column does not exist in the input table.
    #[display("configured column not found in table: {name}")]
    UnknownColumn {
        /// The missing column name.
        name: String,
    },
    /// A grouping variable is not a categorical column.
    #[display("grouping variable must be categorical: {name}")]
    GroupVarNotCategorical {
        /// The offending column name.
        name: String,
    },
}

/// Settings for one analysis run.
///
/// Construction and the `with_*` builders validate eagerly, so an invalid
/// configuration is rejected before any table is touched.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    mode: Mode,
    task: ModelTask,
    group_vars: Vec<String>,
    keep_features: Option<Vec<String>>,
    labels: BTreeMap<String, String>,
    aggregate: Aggregate,
    error_metric: ErrorMetric,
    std_num: i32,
}

impl AnalysisConfig {
    /// Creates a configuration for `mode` grouping by `group_vars`.
    ///
    /// The default aggregate is the mean for error mode and the median for
    /// sensitivity mode; the default accuracy metric is RMSE and the
    /// default perturbation multiplier is 1.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoGroupVariables`] when `group_vars` is
    /// empty.
    pub fn new(mode: Mode, group_vars: Vec<String>) -> Result<Self, ConfigError> {
        if group_vars.is_empty() {
            return Err(ConfigError::NoGroupVariables);
        }
        let aggregate = match mode {
            Mode::Error => Aggregate::Mean,
            Mode::Sensitivity => Aggregate::Median,
        };
        Ok(Self {
            mode,
            task: ModelTask::Regression,
            group_vars,
            keep_features: None,
            labels: BTreeMap::new(),
            aggregate,
            error_metric: ErrorMetric::Rmse,
            std_num: 1,
        })
    }

    /// Sets the model task (classification forces the RAW accuracy metric).
    #[must_use]
    pub fn with_task(mut self, task: ModelTask) -> Self {
        self.task = task;
        self
    }

    /// Restricts the analysis to the named columns.
    #[must_use]
    pub fn with_keep_features(mut self, features: Vec<String>) -> Self {
        self.keep_features = Some(features);
        self
    }

    /// Sets the display-label mapping applied to output records.
    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the aggregate function applied to bucket slices.
    #[must_use]
    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Sets the per-group accuracy metric.
    #[must_use]
    pub fn with_error_metric(mut self, metric: ErrorMetric) -> Self {
        self.error_metric = metric;
        self
    }

    /// Sets the signed standard-deviation multiplier for continuous
    /// perturbation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStdNum`] outside
    /// [`SUPPORTED_STD_NUMS`].
    pub fn with_std_num(mut self, std_num: i32) -> Result<Self, ConfigError> {
        if !SUPPORTED_STD_NUMS.contains(&std_num) {
            return Err(ConfigError::InvalidStdNum { value: std_num });
        }
        self.std_num = std_num;
        Ok(self)
    }

    /// Checks the configured columns against the input table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownColumn`] for a grouping variable or
    /// kept feature absent from `frame`, and
    /// [`ConfigError::GroupVarNotCategorical`] for a numeric grouping
    /// variable.
    pub fn validate_against(&self, frame: &Frame) -> Result<(), ConfigError> {
        for name in &self.group_vars {
            match frame.column(name) {
                None => {
                    return Err(ConfigError::UnknownColumn { name: name.clone() });
                }
                Some(ColumnData::Float(_)) => {
                    return Err(ConfigError::GroupVarNotCategorical { name: name.clone() });
                }
                Some(ColumnData::Label(_)) => {}
            }
        }
        if let Some(features) = &self.keep_features {
            for name in features {
                if !frame.contains(name) {
                    return Err(ConfigError::UnknownColumn { name: name.clone() });
                }
            }
        }
        Ok(())
    }

    /// The analysis mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The model task.
    #[must_use]
    pub fn task(&self) -> ModelTask {
        self.task
    }

    /// The grouping variables, in configured order.
    #[must_use]
    pub fn group_vars(&self) -> &[String] {
        &self.group_vars
    }

    /// The kept analysis columns, if restricted.
    #[must_use]
    pub fn keep_features(&self) -> Option<&[String]> {
        self.keep_features.as_deref()
    }

    /// The display label for a raw column name.
    #[must_use]
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map_or(name, String::as_str)
    }

    /// The configured aggregate function.
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// The accuracy metric, with RAW forced for classification models.
    #[must_use]
    pub fn error_metric(&self) -> ErrorMetric {
        match self.task {
            ModelTask::Regression => self.error_metric,
            ModelTask::Classification => ErrorMetric::Raw,
        }
    }

    /// The perturbation multiplier.
    #[must_use]
    pub fn std_num(&self) -> i32 {
        self.std_num
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_group_vars() {
        let result = AnalysisConfig::new(Mode::Error, vec![]);
        assert_eq!(result.unwrap_err(), ConfigError::NoGroupVariables);
    }

    #[test]
    fn test_rejects_unsupported_std_num() {
        let config = AnalysisConfig::new(Mode::Sensitivity, vec!["g".to_string()]).unwrap();
        let result = config.with_std_num(5);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidStdNum { value: 5 });
    }

    #[test]
    fn test_accepts_negative_std_num() {
        let config = AnalysisConfig::new(Mode::Sensitivity, vec!["g".to_string()])
            .unwrap()
            .with_std_num(-3)
            .unwrap();
        assert_eq!(config.std_num(), -3);
    }

    #[test]
    fn test_default_aggregate_follows_mode() {
        let error = AnalysisConfig::new(Mode::Error, vec!["g".to_string()]).unwrap();
        assert_eq!(error.aggregate(), Aggregate::Mean);
        let sensitivity = AnalysisConfig::new(Mode::Sensitivity, vec!["g".to_string()]).unwrap();
        assert_eq!(sensitivity.aggregate(), Aggregate::Median);
    }

    #[test]
    fn test_classification_forces_raw_metric() {
        let config = AnalysisConfig::new(Mode::Error, vec!["g".to_string()])
            .unwrap()
            .with_task(ModelTask::Classification)
            .with_error_metric(ErrorMetric::Rmse);
        assert_eq!(config.error_metric(), ErrorMetric::Raw);
    }

    #[test]
    fn test_label_mapping_falls_back_to_name() {
        let mut labels = BTreeMap::new();
        labels.insert("alcohol".to_string(), "ALCOHOL".to_string());
        let config = AnalysisConfig::new(Mode::Error, vec!["g".to_string()])
            .unwrap()
            .with_labels(labels);
        assert_eq!(config.label_for("alcohol"), "ALCOHOL");
        assert_eq!(config.label_for("sulphates"), "sulphates");
    }

    #[test]
    fn test_validate_against_table() {
        let frame = Frame::new(vec![
            ("x".to_string(), ColumnData::Float(vec![1.0])),
            (
                "g".to_string(),
                ColumnData::Label(vec!["a".to_string()]),
            ),
        ])
        .unwrap();

        let ok = AnalysisConfig::new(Mode::Error, vec!["g".to_string()]).unwrap();
        assert!(ok.validate_against(&frame).is_ok());

        let missing = AnalysisConfig::new(Mode::Error, vec!["h".to_string()]).unwrap();
        assert!(matches!(
            missing.validate_against(&frame),
            Err(ConfigError::UnknownColumn { .. })
        ));

        let numeric = AnalysisConfig::new(Mode::Error, vec!["x".to_string()]).unwrap();
        assert!(matches!(
            numeric.validate_against(&frame),
            Err(ConfigError::GroupVarNotCategorical { .. })
        ));
    }
}
