//! Per-(column, group variable) analysis: classify, bucket, reduce.

use std::collections::BTreeMap;

use glassbox_frame::{ColumnDescriptor, ColumnKind, FrameError, ScoreError, Scorer};
use glassbox_stats::binning::assign_bins;

use crate::{
    config::{AnalysisConfig, Mode},
    perturb::{Perturbation, PerturbError, perturb_categorical, perturb_continuous},
    reduce::{
        reduce_error_categorical, reduce_error_continuous, reduce_sensitivity_categorical,
        reduce_sensitivity_continuous,
    },
    report::{ColumnValue, GroupSummary, RawRecord, RunWarning},
    scored::ScoredFrame,
};

/// Failure while analyzing one (column, group variable) pair.
///
/// Frame errors are precondition violations, fatal for the pair only;
/// scoring errors abort the whole run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PairError {
    /// A required column is missing or of the wrong kind.
    Frame(FrameError),
    /// The model rejected a perturbed table.
    Score(ScoreError),
    /// The analysis column has no values to perturb.
    #[display("cannot perturb empty column: {name}")]
    #[from(skip)]
    EmptyColumn {
        /// The empty column name.
        name: String,
    },
}

impl From<PerturbError> for PairError {
    fn from(err: PerturbError) -> Self {
        match err {
            PerturbError::Frame(e) => PairError::Frame(e),
            PerturbError::Score(e) => PairError::Score(e),
            PerturbError::EmptyColumn { name } => PairError::EmptyColumn { name },
        }
    }
}

/// Everything one (column, group variable) pair contributes to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOutput {
    /// The aggregated records and incremental value for the pair.
    pub summary: GroupSummary,
    /// Row-level records for the pair.
    pub raw: Vec<RawRecord>,
    /// Degenerate-data warnings raised while bucketing.
    pub warnings: Vec<RunWarning>,
}

/// Analyzes one (column, group variable) pair.
///
/// The column's declared kind selects the path once: categorical columns
/// group by (group level, category level) cell, continuous columns group by
/// group level and bucket by percentile within each group. In sensitivity
/// mode the perturbation engine runs first and, for categorical columns,
/// rows already at the modal level are dropped from bucketing.
///
/// Records preserve bucket iteration order: ascending bucket id for
/// continuous columns, first-seen cell order for categorical ones.
///
/// # Errors
///
/// Returns [`PairError`] on a missing or mistyped column (before any
/// bucketing) or on a scoring failure.
pub fn analyze_pair(
    scored: &ScoredFrame,
    descriptor: &ColumnDescriptor,
    group_var: &str,
    config: &AnalysisConfig,
    scorer: &dyn Scorer,
) -> Result<PairOutput, PairError> {
    let group_levels = scored.frame().label_column(group_var)?;

    match descriptor.kind {
        ColumnKind::Continuous => {
            continuous_pair(scored, descriptor, group_var, group_levels, config, scorer)
        }
        ColumnKind::Categorical => {
            categorical_pair(scored, descriptor, group_var, group_levels, config, scorer)
        }
    }
}

fn continuous_pair(
    scored: &ScoredFrame,
    descriptor: &ColumnDescriptor,
    group_var: &str,
    group_levels: &[String],
    config: &AnalysisConfig,
    scorer: &dyn Scorer,
) -> Result<PairOutput, PairError> {
    let values = scored.frame().float_column(&descriptor.name)?;
    let group_var_label = config.label_for(group_var).to_string();

    let perturbation = match config.mode() {
        Mode::Error => None,
        Mode::Sensitivity => Some(perturb_continuous(
            scored,
            &descriptor.name,
            config.std_num(),
            scorer,
        )?),
    };

    let mut records = Vec::new();
    let mut raw = Vec::new();
    let mut warnings = Vec::new();

    for (level, rows) in group_rows(group_levels) {
        let group_values: Vec<f64> = rows.iter().map(|&i| values[i]).collect();
        let assignment = assign_bins(&group_values);
        if assignment.degenerate {
            warnings.push(RunWarning {
                column: descriptor.label.clone(),
                group_var: group_var_label.clone(),
                group_value: level.clone(),
                rows: rows.len(),
            });
        }

        let mut buckets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (pos, bin) in assignment.bins.iter().enumerate() {
            if let Some(bin) = bin {
                buckets.entry(*bin).or_default().push(rows[pos]);
            }
        }

        for bucket in buckets.values() {
            let bucket_values: Vec<f64> = bucket.iter().map(|&i| values[i]).collect();
            let bucket_levels: Vec<String> =
                bucket.iter().map(|&i| group_levels[i].clone()).collect();
            let record = match &perturbation {
                None => {
                    let predictions: Vec<f64> =
                        bucket.iter().map(|&i| scored.predictions()[i]).collect();
                    let errors: Vec<f64> = bucket.iter().map(|&i| scored.errors()[i]).collect();
                    reduce_error_continuous(
                        &bucket_values,
                        &bucket_levels,
                        &predictions,
                        &errors,
                        config.aggregate(),
                    )
                }
                Some(perturbation) => {
                    let deltas: Vec<f64> =
                        bucket.iter().map(|&i| perturbation.deltas[i]).collect();
                    reduce_sensitivity_continuous(
                        &bucket_values,
                        &bucket_levels,
                        &deltas,
                        config.aggregate(),
                    )
                }
            };
            records.push(record);
        }

        for &i in &rows {
            raw.push(raw_record(
                scored,
                descriptor,
                &group_var_label,
                &level,
                finite_opt(values[i]).map(ColumnValue::Num),
                perturbation.as_ref(),
                i,
            ));
        }
    }

    Ok(PairOutput {
        summary: GroupSummary {
            group_var: group_var_label,
            incremental_value: perturbation.map(|p| p.incremental),
            records,
        },
        raw,
        warnings,
    })
}

fn categorical_pair(
    scored: &ScoredFrame,
    descriptor: &ColumnDescriptor,
    group_var: &str,
    group_levels: &[String],
    config: &AnalysisConfig,
    scorer: &dyn Scorer,
) -> Result<PairOutput, PairError> {
    let col_levels = scored.frame().label_column(&descriptor.name)?;
    let group_var_label = config.label_for(group_var).to_string();

    let perturbation = match config.mode() {
        Mode::Error => None,
        Mode::Sensitivity => Some(perturb_categorical(scored, &descriptor.name, scorer)?),
    };

    // Rows whose value already equals the perturbation baseline are a
    // no-op under the perturbation and would manufacture zero-delta cells.
    let baseline = perturbation
        .as_ref()
        .map_or(&[] as &[bool], |p| p.baseline_rows.as_slice());

    let mut cells: Vec<((String, String), Vec<usize>)> = Vec::new();
    for i in 0..scored.rows() {
        if baseline.get(i).copied().unwrap_or(false) {
            continue;
        }
        let key = (group_levels[i].clone(), col_levels[i].clone());
        match cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(i),
            None => cells.push((key, vec![i])),
        }
    }

    let mut records = Vec::new();
    let mut raw = Vec::new();

    for ((group_level, col_level), rows) in &cells {
        let record = match &perturbation {
            None => {
                let predictions: Vec<f64> =
                    rows.iter().map(|&i| scored.predictions()[i]).collect();
                let errors: Vec<f64> = rows.iter().map(|&i| scored.errors()[i]).collect();
                reduce_error_categorical(
                    col_level,
                    group_level,
                    &predictions,
                    &errors,
                    config.aggregate(),
                )
            }
            Some(perturbation) => {
                let deltas: Vec<f64> = rows.iter().map(|&i| perturbation.deltas[i]).collect();
                reduce_sensitivity_categorical(
                    col_level,
                    group_level,
                    &deltas,
                    config.aggregate(),
                )
            }
        };
        records.push(record);

        for &i in rows {
            raw.push(raw_record(
                scored,
                descriptor,
                &group_var_label,
                group_level,
                Some(ColumnValue::Level(col_levels[i].clone())),
                perturbation.as_ref(),
                i,
            ));
        }
    }

    Ok(PairOutput {
        summary: GroupSummary {
            group_var: group_var_label,
            incremental_value: perturbation.map(|p| p.incremental),
            records,
        },
        raw,
        warnings: Vec::new(),
    })
}

fn raw_record(
    scored: &ScoredFrame,
    descriptor: &ColumnDescriptor,
    group_var_label: &str,
    group_level: &str,
    column_value: Option<ColumnValue>,
    perturbation: Option<&Perturbation>,
    row: usize,
) -> RawRecord {
    RawRecord {
        column: descriptor.label.clone(),
        group_var: group_var_label.to_string(),
        column_value,
        group_level: group_level.to_string(),
        prediction: finite_opt(scored.predictions()[row]),
        error: finite_opt(scored.errors()[row]),
        delta: perturbation.and_then(|p| finite_opt(p.deltas[row])),
    }
}

/// Partitions row indices by group level in first-seen order.
fn group_rows(levels: &[String]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (i, level) in levels.iter().enumerate() {
        match groups.iter_mut().find(|(l, _)| l == level) {
            Some((_, rows)) => rows.push(i),
            None => groups.push((level.clone(), vec![i])),
        }
    }
    groups
}

fn finite_opt(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
