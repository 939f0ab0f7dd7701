//! Per-feature diagnostics for fitted regression and classification models.
//!
//! This crate is the aggregation/perturbation engine behind Glassbox model
//! audits. For every (analysis column, grouping variable) pair it summarizes
//! either the model's prediction error or the model's sensitivity to a
//! synthetic perturbation of that column, bucketed by percentile (continuous
//! columns) or category level (categorical columns) and aggregated per
//! group.
//!
//! # Overview
//!
//! An analysis run walks through these stages:
//!
//! 1. **Score** ([`scored::ScoredFrame`]): run the fitted model once over
//!    the input table and attach predictions and signed residuals
//! 2. **Configure** ([`config::AnalysisConfig`]): choose the analysis
//!    [`config::Mode`], grouping variables, aggregate function, and error
//!    metric; configuration is validated before any data is touched
//! 3. **Drive** ([`driver`]): for each (column, group variable) pair,
//!    classify the column, bucket the group's rows, perturb and re-score in
//!    sensitivity mode ([`perturb`]), and reduce every bucket to one summary
//!    record ([`reduce`])
//! 4. **Assemble** ([`session::AnalysisSession`]): merge pair outputs into
//!    the nested [`report::ResultTree`], with per-group accuracy metrics
//!    ([`accuracy`]) and population percentile metadata
//!    ([`percentile_meta`]) as trailing sections
//!
//! # Analysis Modes
//!
//! - **Error mode**: bucket the model's signed residuals, split into
//!   positive and negative aggregates per bucket (zero residuals join
//!   neither side)
//! - **Sensitivity mode**: perturb one column at a time over a private copy
//!   of the model input (a uniform standard-deviation shift for continuous
//!   columns, forcing every row to the modal level for categorical
//!   columns), re-score, and aggregate the prediction deltas per bucket
//!
//! # Examples
//!
//! ```
//! use glassbox_analysis::{
//!     config::{AnalysisConfig, Mode},
//!     percentile_meta::PercentileMetadata,
//!     scored::ScoredFrame,
//!     session::AnalysisSession,
//! };
//! use glassbox_frame::{ColumnData, Frame, ModelMatrix, ScoreError, Scorer, one_hot_matrix};
//! # struct HalfX;
//! # impl Scorer for HalfX {
//! #     fn score(&self, matrix: &ModelMatrix) -> Result<Vec<f64>, ScoreError> {
//! #         Ok(matrix.column("x").unwrap().iter().map(|x| 0.5 * x).collect())
//! #     }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = Frame::new(vec![
//!     ("x".to_string(), ColumnData::Float(vec![1.0, 2.0, 3.0, 4.0])),
//!     (
//!         "type".to_string(),
//!         ColumnData::Label(vec![
//!             "red".to_string(),
//!             "red".to_string(),
//!             "white".to_string(),
//!             "white".to_string(),
//!         ]),
//!     ),
//!     ("quality".to_string(), ColumnData::Float(vec![0.5, 1.2, 1.4, 2.2])),
//! ])?;
//!
//! let matrix = one_hot_matrix(&frame, &["quality"])?;
//! let scored = ScoredFrame::score(frame, matrix, "quality", &HalfX)?;
//!
//! let config = AnalysisConfig::new(Mode::Error, vec!["type".to_string()])?;
//! let meta = PercentileMetadata::from_frame(scored.frame(), config.group_vars())?;
//!
//! let mut session = AnalysisSession::new(scored, &HalfX, config, meta)?;
//! session.run()?;
//! let tree = session.result_tree()?;
//! assert_eq!(tree.accuracy.records.len(), 2); // one per "type" level
//! # Ok(())
//! # }
//! ```

pub mod accuracy;
pub mod config;
pub mod driver;
pub mod percentile_meta;
pub mod perturb;
pub mod reduce;
pub mod report;
pub mod scored;
pub mod session;
