use chrono::{DateTime, Utc};
use glassbox_frame::{ColumnData, Frame, FrameError};
use serde::{Deserialize, Serialize};

/// A dataset as stored on disk: named columns of numeric or string values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Timestamp when the dataset was generated (ISO 8601 format), if it
    /// came from `generate-data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Columns in table order.
    pub columns: Vec<DatasetColumn>,
}

/// One named column of the stored dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetColumn {
    /// Column name.
    pub name: String,
    /// Column payload; string values mark the column as categorical.
    pub values: ColumnValues,
}

/// Column payload: numeric values make a continuous column, string values a
/// categorical one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValues {
    /// Continuous numeric values.
    Numeric(Vec<f64>),
    /// Categorical label values.
    Labels(Vec<String>),
}

impl Dataset {
    /// Converts the stored dataset into the engine's categorical-typed
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] for duplicate names or ragged columns.
    pub fn into_frame(self) -> Result<Frame, FrameError> {
        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let data = match column.values {
                    ColumnValues::Numeric(values) => ColumnData::Float(values),
                    ColumnValues::Labels(values) => ColumnData::Label(values),
                };
                (column.name, data)
            })
            .collect();
        Frame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_label_columns_round_trip() {
        let json = r#"{
            "columns": [
                {"name": "alcohol", "values": [9.4, 10.2]},
                {"name": "type", "values": ["red", "white"]}
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let frame = dataset.into_frame().unwrap();
        assert_eq!(frame.float_column("alcohol").unwrap(), &[9.4, 10.2]);
        assert_eq!(frame.label_column("type").unwrap().len(), 2);
    }

    #[test]
    fn test_ragged_dataset_is_rejected() {
        let json = r#"{
            "columns": [
                {"name": "a", "values": [1.0]},
                {"name": "b", "values": [1.0, 2.0]}
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert!(dataset.into_frame().is_err());
    }

    #[test]
    fn test_generated_at_is_optional() {
        let json = r#"{"columns": []}"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert!(dataset.generated_at.is_none());
    }
}
