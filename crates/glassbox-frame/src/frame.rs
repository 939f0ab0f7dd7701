//! Named-column tables: the categorical-typed [`Frame`] and the numeric
//! [`ModelMatrix`] the model scores.

use crate::column::{ColumnData, ColumnKind};

/// Errors raised when constructing or slicing tables.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FrameError {
    /// A referenced column does not exist in the table.
    #[display("column not found: {name}")]
    ColumnMissing {
        /// The missing column name.
        name: String,
    },
    /// A column's row count disagrees with the table's.
    #[display("column {name} has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// The offending column name.
        name: String,
        /// Row count implied by the first column.
        expected: usize,
        /// Row count of the offending column.
        actual: usize,
    },
    /// Two columns share one name.
    #[display("duplicate column name: {name}")]
    DuplicateColumn {
        /// The duplicated column name.
        name: String,
    },
    /// A column holds the wrong payload kind for the requested access.
    #[display("column {name} is not {expected:?}")]
    KindMismatch {
        /// The column name.
        name: String,
        /// The kind the caller required.
        expected: ColumnKind,
    },
}

/// A table of equal-length named columns, numeric or label-valued.
///
/// This is the categorical-typed view of the input data: label columns keep
/// their raw levels, and the engine uses them to classify variable kinds
/// and compute category modes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<(String, ColumnData)>,
    rows: usize,
}

impl Frame {
    /// Builds a frame from named columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] for repeated names and
    /// [`FrameError::LengthMismatch`] when column lengths disagree.
    pub fn new(columns: Vec<(String, ColumnData)>) -> Result<Self, FrameError> {
        let rows = columns.first().map_or(0, |(_, data)| data.len());
        for (name, data) in &columns {
            if columns.iter().filter(|(other, _)| other == name).count() > 1 {
                return Err(FrameError::DuplicateColumn { name: name.clone() });
            }
            if data.len() != rows {
                return Err(FrameError::LengthMismatch {
                    name: name.clone(),
                    expected: rows,
                    actual: data.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a column exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(other, _)| other == name)
    }

    /// Looks up a column payload by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|(other, _)| other == name)
            .map(|(_, data)| data)
    }

    /// The numeric values of a continuous column.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnMissing`] or [`FrameError::KindMismatch`].
    pub fn float_column(&self, name: &str) -> Result<&[f64], FrameError> {
        match self.column(name) {
            Some(ColumnData::Float(values)) => Ok(values),
            Some(ColumnData::Label(_)) => Err(FrameError::KindMismatch {
                name: name.to_string(),
                expected: ColumnKind::Continuous,
            }),
            None => Err(FrameError::ColumnMissing {
                name: name.to_string(),
            }),
        }
    }

    /// The label values of a categorical column.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnMissing`] or [`FrameError::KindMismatch`].
    pub fn label_column(&self, name: &str) -> Result<&[String], FrameError> {
        match self.column(name) {
            Some(ColumnData::Label(values)) => Ok(values),
            Some(ColumnData::Float(_)) => Err(FrameError::KindMismatch {
                name: name.to_string(),
                expected: ColumnKind::Categorical,
            }),
            None => Err(FrameError::ColumnMissing {
                name: name.to_string(),
            }),
        }
    }
}

/// The numeric model-input table: the column set the model was trained on,
/// with categorical variables one-hot encoded. Never contains the target or
/// any derived column.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMatrix {
    columns: Vec<(String, Vec<f64>)>,
    rows: usize,
}

impl ModelMatrix {
    /// Builds a matrix from named numeric columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] or
    /// [`FrameError::LengthMismatch`] like [`Frame::new`].
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self, FrameError> {
        let rows = columns.first().map_or(0, |(_, values)| values.len());
        for (name, values) in &columns {
            if columns.iter().filter(|(other, _)| other == name).count() > 1 {
                return Err(FrameError::DuplicateColumn { name: name.clone() });
            }
            if values.len() != rows {
                return Err(FrameError::LengthMismatch {
                    name: name.clone(),
                    expected: rows,
                    actual: values.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(other, _)| other == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Mutable access to a column's values, for synthetic perturbation of a
    /// private copy.
    #[must_use]
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
        self.columns
            .iter_mut()
            .find(|(other, _)| other == name)
            .map(|(_, values)| values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_frame_rejects_ragged_columns() {
        let result = Frame::new(vec![
            ("a".to_string(), ColumnData::Float(vec![1.0, 2.0])),
            ("b".to_string(), ColumnData::Float(vec![1.0])),
        ]);
        assert!(matches!(result, Err(FrameError::LengthMismatch { .. })));
    }

    #[test]
    fn test_frame_rejects_duplicate_names() {
        let result = Frame::new(vec![
            ("a".to_string(), ColumnData::Float(vec![1.0])),
            ("a".to_string(), ColumnData::Float(vec![2.0])),
        ]);
        assert!(matches!(result, Err(FrameError::DuplicateColumn { .. })));
    }

    #[test]
    fn test_typed_column_access() {
        let frame = Frame::new(vec![
            ("x".to_string(), ColumnData::Float(vec![1.0, 2.0])),
            ("g".to_string(), ColumnData::Label(labels(&["a", "b"]))),
        ])
        .unwrap();

        assert_eq!(frame.float_column("x").unwrap(), &[1.0, 2.0]);
        assert_eq!(frame.label_column("g").unwrap(), labels(&["a", "b"]));
        assert!(matches!(
            frame.float_column("g"),
            Err(FrameError::KindMismatch { .. })
        ));
        assert!(matches!(
            frame.float_column("missing"),
            Err(FrameError::ColumnMissing { .. })
        ));
    }

    #[test]
    fn test_matrix_column_mut() {
        let mut matrix = ModelMatrix::new(vec![("x".to_string(), vec![1.0, 2.0])]).unwrap();
        for value in matrix.column_mut("x").unwrap() {
            *value += 0.5;
        }
        assert_eq!(matrix.column("x").unwrap(), &[1.5, 2.5]);
    }
}
