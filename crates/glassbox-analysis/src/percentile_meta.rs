//! Population percentile metadata appended to the result tree.

use serde::{Deserialize, Serialize};

use glassbox_frame::{ColumnData, Frame, FrameError, distinct_levels};
use glassbox_stats::percentiles::Percentiles;

/// Percentile points reported in the metadata sections.
pub const OUTPUT_PERCENTILES: [f64; 8] = [0.0, 1.0, 10.0, 25.0, 50.0, 75.0, 90.0, 100.0];

/// One (percentile, value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentilePoint {
    /// The percentile, 0–100.
    pub percentile: f64,
    /// The column value at that percentile.
    pub value: f64,
}

/// Percentile points for one continuous column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPercentiles {
    /// Raw column name.
    pub column: String,
    /// Points at [`OUTPUT_PERCENTILES`].
    pub percentiles: Vec<PercentilePoint>,
}

/// Percentile points for the continuous columns of one group partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPercentiles {
    /// The grouping variable.
    #[serde(rename = "groupByVarName")]
    pub group_var: String,
    /// The partition's group level.
    #[serde(rename = "groupByValue")]
    pub group_value: String,
    /// Per-column points within the partition.
    pub columns: Vec<ColumnPercentiles>,
}

/// Population percentile metadata: whole-table and per-group percentile
/// tables, appended verbatim as the trailing result-tree section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileMetadata {
    /// Whole-table percentiles per continuous column.
    pub population: Vec<ColumnPercentiles>,
    /// Per-group percentiles for every grouping variable level.
    pub groups: Vec<GroupPercentiles>,
}

impl PercentileMetadata {
    /// Computes the metadata for `frame`, with per-group tables for each
    /// variable in `group_vars`.
    ///
    /// Columns with no finite values are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] when a grouping variable is missing or not
    /// categorical.
    pub fn from_frame(frame: &Frame, group_vars: &[String]) -> Result<Self, FrameError> {
        let population = column_percentiles(frame, None);

        let mut groups = Vec::new();
        for group_var in group_vars {
            let levels = frame.label_column(group_var)?;
            for level in distinct_levels(levels) {
                let mask: Vec<usize> = levels
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| **l == level)
                    .map(|(i, _)| i)
                    .collect();
                groups.push(GroupPercentiles {
                    group_var: group_var.clone(),
                    group_value: level,
                    columns: column_percentiles(frame, Some(&mask)),
                });
            }
        }

        Ok(Self { population, groups })
    }
}

/// Percentile tables for every continuous column, optionally restricted to
/// the rows in `mask`.
fn column_percentiles(frame: &Frame, mask: Option<&[usize]>) -> Vec<ColumnPercentiles> {
    let mut columns = Vec::new();
    for name in frame.names() {
        let Some(ColumnData::Float(values)) = frame.column(name) else {
            continue;
        };
        let selected: Vec<f64> = match mask {
            Some(rows) => rows
                .iter()
                .map(|&i| values[i])
                .filter(|v| v.is_finite())
                .collect(),
            None => values.iter().copied().filter(|v| v.is_finite()).collect(),
        };
        if selected.is_empty() {
            continue;
        }
        let percentiles = Percentiles::new(&selected, &OUTPUT_PERCENTILES)
            .iter()
            .map(|(percentile, value)| PercentilePoint { percentile, value })
            .collect();
        columns.push(ColumnPercentiles {
            column: name.to_string(),
            percentiles,
        });
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new(vec![
            (
                "x".to_string(),
                ColumnData::Float((0..101).map(f64::from).collect()),
            ),
            (
                "g".to_string(),
                ColumnData::Label(
                    (0..101)
                        .map(|i| if i < 50 { "a".to_string() } else { "b".to_string() })
                        .collect(),
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_population_covers_continuous_columns_only() {
        let meta = PercentileMetadata::from_frame(&sample_frame(), &["g".to_string()]).unwrap();
        assert_eq!(meta.population.len(), 1);
        assert_eq!(meta.population[0].column, "x");
        assert_eq!(
            meta.population[0].percentiles.len(),
            OUTPUT_PERCENTILES.len()
        );
    }

    #[test]
    fn test_population_extremes() {
        let meta = PercentileMetadata::from_frame(&sample_frame(), &["g".to_string()]).unwrap();
        let points = &meta.population[0].percentiles;
        assert_eq!(points[0].value, 0.0); // 0th percentile
        assert_eq!(points[points.len() - 1].value, 100.0); // 100th percentile
        assert_eq!(points[4].value, 50.0); // median of 0..=100
    }

    #[test]
    fn test_one_group_section_per_level() {
        let meta = PercentileMetadata::from_frame(&sample_frame(), &["g".to_string()]).unwrap();
        assert_eq!(meta.groups.len(), 2);
        assert_eq!(meta.groups[0].group_value, "a");
        assert_eq!(meta.groups[1].group_value, "b");
        // Group "a" holds rows 0..50, so its median is 24.5.
        assert_eq!(meta.groups[0].columns[0].percentiles[4].value, 24.5);
    }

    #[test]
    fn test_unknown_group_var_fails() {
        let frame = Frame::new(vec![(
            "x".to_string(),
            ColumnData::Float(vec![1.0]),
        )])
        .unwrap();
        assert!(PercentileMetadata::from_frame(&frame, &["g".to_string()]).is_err());
    }
}
