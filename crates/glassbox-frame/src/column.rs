//! Column payloads, kinds, and descriptors.

use serde::{Deserialize, Serialize};

/// Payload of one named column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Continuous numeric values.
    Float(Vec<f64>),
    /// Categorical label values.
    Label(Vec<String>),
}

impl ColumnData {
    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Label(values) => values.len(),
        }
    }

    /// Whether the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variable kind implied by the payload type.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Float(_) => ColumnKind::Continuous,
            ColumnData::Label(_) => ColumnKind::Categorical,
        }
    }
}

/// Variable kind of an analysis column, fixed once per run from the
/// categorical-typed view of the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Numeric variable, bucketed by percentile.
    Continuous,
    /// Label variable, bucketed by category level.
    Categorical,
}

/// Immutable description of one analysis column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Raw column name in the input table.
    pub name: String,
    /// Variable kind, determined from the column payload.
    pub kind: ColumnKind,
    /// Human-readable label substituted into output records.
    pub label: String,
}

impl ColumnDescriptor {
    /// Creates a descriptor, defaulting the display label to the raw name.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        let label = name.clone();
        Self { name, kind, label }
    }

    /// Replaces the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Distinct levels of a label column, sorted ascending.
#[must_use]
pub fn distinct_levels(labels: &[String]) -> Vec<String> {
    let mut levels: Vec<String> = labels.to_vec();
    levels.sort();
    levels.dedup();
    levels
}

/// Most frequent level among `labels`, ties broken toward the
/// lexicographically smallest level.
///
/// Returns `None` for empty input.
///
/// # Examples
///
/// ```
/// use glassbox_frame::column::label_mode;
///
/// let labels: Vec<String> = ["b", "a", "b", "a", "c"]
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(label_mode(&labels), Some("a".to_string()));
/// ```
#[must_use]
pub fn label_mode(labels: &[String]) -> Option<String> {
    let mut counts = std::collections::BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0_usize) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        // Ascending key order makes the smallest label win ties.
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_kind_from_payload() {
        assert_eq!(ColumnData::Float(vec![1.0]).kind(), ColumnKind::Continuous);
        assert_eq!(
            ColumnData::Label(labels(&["x"])).kind(),
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        assert_eq!(
            label_mode(&labels(&["red", "white", "red"])),
            Some("red".to_string())
        );
    }

    #[test]
    fn test_mode_tie_breaks_lexicographically() {
        assert_eq!(
            label_mode(&labels(&["white", "red", "white", "red"])),
            Some("red".to_string())
        );
    }

    #[test]
    fn test_mode_of_empty_is_none() {
        assert_eq!(label_mode(&[]), None);
    }

    #[test]
    fn test_distinct_levels_sorted() {
        assert_eq!(
            distinct_levels(&labels(&["b", "a", "b"])),
            labels(&["a", "b"])
        );
    }

    #[test]
    fn test_descriptor_label_defaults_to_name() {
        let descriptor = ColumnDescriptor::new("alcohol", ColumnKind::Continuous);
        assert_eq!(descriptor.label, "alcohol");
        let relabeled = descriptor.with_label("ALCOHOL CONTENT");
        assert_eq!(relabeled.label, "ALCOHOL CONTENT");
        assert_eq!(relabeled.name, "alcohol");
    }
}
