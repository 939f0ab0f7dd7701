use std::{collections::BTreeMap, path::PathBuf};

use glassbox_analysis::{
    config::{AnalysisConfig, Mode},
    percentile_meta::PercentileMetadata,
    scored::ScoredFrame,
    session::AnalysisSession,
};
use glassbox_frame::one_hot_matrix;
use glassbox_stats::{aggregate::Aggregate, metrics::ErrorMetric};

use crate::{
    schema::{dataset::Dataset, model::LinearModel},
    util::{Output, read_json_file},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum AggregateArg {
    #[default]
    Mean,
    Median,
}

impl From<AggregateArg> for Aggregate {
    fn from(arg: AggregateArg) -> Self {
        match arg {
            AggregateArg::Mean => Aggregate::Mean,
            AggregateArg::Median => Aggregate::Median,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum MetricArg {
    Mse,
    #[default]
    Rmse,
    Mae,
    Raw,
}

impl From<MetricArg> for ErrorMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Mse => ErrorMetric::Mse,
            MetricArg::Rmse => ErrorMetric::Rmse,
            MetricArg::Mae => ErrorMetric::Mae,
            MetricArg::Raw => ErrorMetric::Raw,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputType {
    /// The nested result tree.
    #[default]
    Tree,
    /// The aggregated column summaries only.
    Agg,
    /// The unaggregated row-level records.
    Raw,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CommonArgs {
    /// Dataset JSON file
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Fitted model JSON file
    #[arg(long)]
    pub(crate) model: PathBuf,
    /// Dependent variable column
    #[arg(long)]
    pub(crate) target: String,
    /// Grouping variable (repeatable)
    #[arg(long = "groupby", required = true)]
    pub(crate) groupby: Vec<String>,
    /// Aggregate function applied to buckets (mean or median; defaults to
    /// mean for analyze, median for sensitivity)
    #[arg(long)]
    pub(crate) aggregate: Option<AggregateArg>,
    /// Aggregate error metric for the accuracy section
    #[arg(long, default_value = "rmse")]
    pub(crate) error_type: MetricArg,
    /// Display-label mapping JSON file (raw name to label)
    #[arg(long)]
    pub(crate) labels: Option<PathBuf>,
    /// Restrict the analysis to these columns (repeatable)
    #[arg(long = "keep")]
    pub(crate) keep: Vec<String>,
    /// What to write: tree, agg, or raw
    #[arg(long, default_value = "tree")]
    pub(crate) output_type: OutputType,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    common: CommonArgs,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    run_analysis(&arg.common, Mode::Error, None)
}

pub(crate) fn run_analysis(
    common: &CommonArgs,
    mode: Mode,
    std_num: Option<i32>,
) -> anyhow::Result<()> {
    // Configuration is validated before any data is read.
    let mut config = AnalysisConfig::new(mode, common.groupby.clone())?;
    if let Some(aggregate) = common.aggregate {
        config = config.with_aggregate(aggregate.into());
    }
    config = config.with_error_metric(common.error_type.into());
    if !common.keep.is_empty() {
        config = config.with_keep_features(common.keep.clone());
    }
    if let Some(std_num) = std_num {
        config = config.with_std_num(std_num)?;
    }

    let dataset: Dataset = read_json_file("dataset", &common.data)?;
    let model: LinearModel = read_json_file("model", &common.model)?;
    config = config.with_task(model.task);
    if let Some(path) = &common.labels {
        let labels: BTreeMap<String, String> = read_json_file("labels", path)?;
        config = config.with_labels(labels);
    }

    let frame = dataset.into_frame()?;
    let matrix = one_hot_matrix(&frame, &[common.target.as_str()])?;
    let scored = ScoredFrame::score(frame, matrix, &common.target, &model)?;
    let percentile_meta = PercentileMetadata::from_frame(scored.frame(), config.group_vars())?;

    let mut session = AnalysisSession::new(scored, &model, config, percentile_meta)?;
    session.run_with_progress(|progress| {
        eprint!("\rPercent Complete: {:3.0}%", progress.fraction() * 100.0);
    })?;
    eprintln!();

    let report = session.report()?;
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    for failure in &report.pair_failures {
        eprintln!(
            "Skipped column {} against {}: {}",
            failure.column, failure.group_var, failure.error
        );
    }

    match common.output_type {
        OutputType::Tree => Output::save_json(session.result_tree()?, common.output.clone()),
        OutputType::Agg => {
            Output::save_json(&session.result_tree()?.columns, common.output.clone())
        }
        OutputType::Raw => Output::save_json(&session.raw_records()?, common.output.clone()),
    }
}
