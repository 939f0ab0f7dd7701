//! Statistical primitives for the Glassbox model-diagnostics project.
//!
//! This crate provides the numeric building blocks used by the analysis
//! engine:
//!
//! - **Percentiles**: Compute and store percentile values for datasets
//! - **Binning**: Assign observations to percentile buckets, with a
//!   raw-value fallback for small groups
//! - **Aggregates**: Missing-value-aware mean and median
//! - **Error metrics**: Aggregate error measures (MSE, RMSE, MAE, RAW)
//! - **Descriptive statistics**: Summaries of location and spread
//!
//! # Modules
//!
//! - [`percentiles`]: Percentile computation and storage
//! - [`binning`]: Percentile bucket assignment for group slices
//! - [`aggregate`]: Missing-value-aware aggregate functions
//! - [`metrics`]: Aggregate error metrics over model residuals
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Computing percentiles
//!
//! ```
//! use glassbox_stats::percentiles::Percentiles;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
//! assert_eq!(percentiles.get(50.0), Some(3.0));
//! ```
//!
//! ## Assigning percentile buckets
//!
//! ```
//! use glassbox_stats::binning::assign_bins;
//!
//! let values: Vec<f64> = (0..300).map(f64::from).collect();
//! let assignment = assign_bins(&values);
//! assert!(!assignment.degenerate);
//! assert_eq!(assignment.bins.len(), values.len());
//! ```
//!
//! ## Aggregating with missing values
//!
//! ```
//! use glassbox_stats::aggregate::Aggregate;
//!
//! let values = [1.0, f64::NAN, 3.0];
//! assert_eq!(Aggregate::Mean.apply(&values), Some(2.0));
//! assert_eq!(Aggregate::Mean.apply(&[f64::NAN]), None);
//! ```

pub mod aggregate;
pub mod binning;
pub mod descriptive;
pub mod metrics;
pub mod percentiles;
