//! The run orchestrator: every (column, group variable) pair, one result
//! tree.

use glassbox_frame::{ColumnDescriptor, FrameError, ScoreError, Scorer};

use crate::{
    accuracy::group_accuracy,
    config::{AnalysisConfig, ConfigError},
    driver::{PairError, analyze_pair},
    percentile_meta::PercentileMetadata,
    report::{AccuracySection, ColumnSummary, RawRecord, ResultTree, RunWarning},
    scored::ScoredFrame,
};

/// Monotonically increasing run progress, proportional to the count of
/// columns processed. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Columns fully processed so far.
    pub completed_columns: usize,
    /// Total columns in this run.
    pub total_columns: usize,
}

impl Progress {
    /// Completed fraction in `[0, 1]`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_columns == 0 {
            1.0
        } else {
            self.completed_columns as f64 / self.total_columns as f64
        }
    }
}

/// Requesting run results before the run has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("run() must be called before accessing analysis results")]
pub struct RunNotComplete;

/// Unrecovered failure that aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RunError {
    /// Configuration rejected against the input table.
    Config(ConfigError),
    /// The model rejected a table; deterministic, so never retried.
    Score(ScoreError),
    /// A grouping column disappeared mid-run.
    Frame(FrameError),
}

/// A (column, group variable) pair that failed its preconditions. Fatal for
/// the pair only; the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    /// Raw name of the analysis column.
    pub column: String,
    /// Raw name of the grouping variable.
    pub group_var: String,
    /// The precondition violation.
    pub error: PairError,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The nested, ordered result tree.
    pub tree: ResultTree,
    /// Row-level records across all pairs.
    pub raw: Vec<RawRecord>,
    /// Degenerate-data warnings raised while bucketing.
    pub warnings: Vec<RunWarning>,
    /// Pairs skipped on precondition violations.
    pub pair_failures: Vec<PairFailure>,
}

/// One analysis run over an immutable scored table.
///
/// The session owns the scored table for the duration of the run and
/// threads all accumulators explicitly; nothing is shared or mutated
/// between pairs, so repeated runs over the same inputs produce identical
/// results.
pub struct AnalysisSession<'a> {
    scored: ScoredFrame,
    scorer: &'a dyn Scorer,
    config: AnalysisConfig,
    percentile_meta: PercentileMetadata,
    report: Option<AnalysisReport>,
}

impl<'a> AnalysisSession<'a> {
    /// Creates a session, validating the configuration against the scored
    /// table before any processing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for grouping variables or kept features
    /// absent from the table, or numeric grouping variables.
    pub fn new(
        scored: ScoredFrame,
        scorer: &'a dyn Scorer,
        config: AnalysisConfig,
        percentile_meta: PercentileMetadata,
    ) -> Result<Self, ConfigError> {
        config.validate_against(scored.frame())?;
        Ok(Self {
            scored,
            scorer,
            config,
            percentile_meta,
            report: None,
        })
    }

    /// Runs the full analysis.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on the first unrecovered failure; partial
    /// results are discarded.
    pub fn run(&mut self) -> Result<(), RunError> {
        self.run_with_progress(|_| {})
    }

    /// Runs the full analysis, reporting progress after each column.
    ///
    /// Iterates every analysis column × grouping variable. A column paired
    /// with itself has no error/sensitivity meaning; that slot computes the
    /// per-group accuracy metrics instead. Pair precondition violations are
    /// recorded and skipped; scoring failures abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on the first unrecovered failure; partial
    /// results are discarded.
    pub fn run_with_progress(
        &mut self,
        mut observer: impl FnMut(Progress),
    ) -> Result<(), RunError> {
        let columns = self.analysis_columns();
        let total_columns = columns.len();

        let mut tree_columns = Vec::new();
        let mut accuracy_records = Vec::new();
        let mut raw = Vec::new();
        let mut warnings = Vec::new();
        let mut pair_failures = Vec::new();

        for (idx, name) in columns.iter().enumerate() {
            let descriptor = self.descriptor(name);
            let mut groups = Vec::new();

            for group_var in self.config.group_vars() {
                if name == group_var {
                    accuracy_records.extend(group_accuracy(
                        &self.scored,
                        group_var,
                        &self.config,
                    )?);
                    continue;
                }

                match analyze_pair(&self.scored, &descriptor, group_var, &self.config, self.scorer)
                {
                    Ok(output) => {
                        groups.push(output.summary);
                        raw.extend(output.raw);
                        warnings.extend(output.warnings);
                    }
                    Err(PairError::Score(err)) => return Err(RunError::Score(err)),
                    Err(err) => pair_failures.push(PairFailure {
                        column: name.clone(),
                        group_var: group_var.clone(),
                        error: err,
                    }),
                }
            }

            if !groups.is_empty() {
                tree_columns.push(ColumnSummary {
                    column: descriptor.label.clone(),
                    kind: descriptor.kind,
                    groups,
                });
            }

            observer(Progress {
                completed_columns: idx + 1,
                total_columns,
            });
        }

        let tree = ResultTree {
            columns: tree_columns,
            accuracy: AccuracySection {
                error_type: self.config.error_metric().label().to_string(),
                records: accuracy_records,
            },
            percentiles: self.percentile_meta.clone(),
        };

        self.report = Some(AnalysisReport {
            tree,
            raw,
            warnings,
            pair_failures,
        });
        Ok(())
    }

    /// The completed run's full report.
    ///
    /// # Errors
    ///
    /// Returns [`RunNotComplete`] before [`run`](Self::run) has completed.
    pub fn report(&self) -> Result<&AnalysisReport, RunNotComplete> {
        self.report.as_ref().ok_or(RunNotComplete)
    }

    /// The completed run's result tree.
    ///
    /// # Errors
    ///
    /// Returns [`RunNotComplete`] before [`run`](Self::run) has completed.
    pub fn result_tree(&self) -> Result<&ResultTree, RunNotComplete> {
        self.report().map(|report| &report.tree)
    }

    /// The completed run's unaggregated row-level records.
    ///
    /// # Errors
    ///
    /// Returns [`RunNotComplete`] before [`run`](Self::run) has completed.
    pub fn raw_records(&self) -> Result<&[RawRecord], RunNotComplete> {
        self.report().map(|report| report.raw.as_slice())
    }

    /// The columns iterated in this run: the kept features (with grouping
    /// variables appended so every one gets its accuracy slot), or every
    /// table column; the dependent variable is never analyzed as a feature.
    fn analysis_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = match self.config.keep_features() {
            Some(features) => features.to_vec(),
            None => self
                .scored
                .frame()
                .names()
                .map(ToString::to_string)
                .collect(),
        };
        for group_var in self.config.group_vars() {
            if !columns.contains(group_var) {
                columns.push(group_var.clone());
            }
        }
        columns.retain(|name| name != self.scored.target());
        columns
    }

    fn descriptor(&self, name: &str) -> ColumnDescriptor {
        let kind = self
            .scored
            .frame()
            .column(name)
            .map_or(glassbox_frame::ColumnKind::Continuous, |data| data.kind());
        ColumnDescriptor::new(name, kind).with_label(self.config.label_for(name))
    }
}

impl std::fmt::Debug for AnalysisSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("rows", &self.scored.rows())
            .field("group_vars", &self.config.group_vars())
            .field("complete", &self.report.is_some())
            .finish_non_exhaustive()
    }
}
