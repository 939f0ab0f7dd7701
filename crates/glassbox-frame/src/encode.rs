//! One-hot encoding of label columns into a numeric model matrix.

use crate::{
    column::{ColumnData, distinct_levels},
    frame::{Frame, FrameError, ModelMatrix},
};

/// Builds the numeric model-input matrix for `frame`.
///
/// Continuous columns are copied as-is; each categorical column expands into
/// one `{column}_{level}` indicator column per distinct level, levels
/// ordered ascending. Columns named in `exclude` (the target, typically) are
/// left out entirely, so the resulting matrix is exactly the column set a
/// model is trained and scored on.
///
/// # Errors
///
/// Returns [`FrameError::DuplicateColumn`] if an indicator name collides
/// with another column.
///
/// # Examples
///
/// ```
/// use glassbox_frame::{ColumnData, Frame, one_hot_matrix};
///
/// let frame = Frame::new(vec![
///     ("x".to_string(), ColumnData::Float(vec![1.0, 2.0])),
///     (
///         "color".to_string(),
///         ColumnData::Label(vec!["red".to_string(), "white".to_string()]),
///     ),
/// ])
/// .unwrap();
///
/// let matrix = one_hot_matrix(&frame, &[]).unwrap();
/// assert_eq!(matrix.column("color_red").unwrap(), &[1.0, 0.0]);
/// assert_eq!(matrix.column("color_white").unwrap(), &[0.0, 1.0]);
/// ```
pub fn one_hot_matrix(frame: &Frame, exclude: &[&str]) -> Result<ModelMatrix, FrameError> {
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();

    for name in frame.names() {
        if exclude.contains(&name) {
            continue;
        }
        match frame.column(name) {
            Some(ColumnData::Float(values)) => {
                columns.push((name.to_string(), values.clone()));
            }
            Some(ColumnData::Label(labels)) => {
                for level in distinct_levels(labels) {
                    let indicator = labels
                        .iter()
                        .map(|l| if *l == level { 1.0 } else { 0.0 })
                        .collect();
                    columns.push((indicator_name(name, &level), indicator));
                }
            }
            None => unreachable!("iterating the frame's own names"),
        }
    }

    ModelMatrix::new(columns)
}

/// The indicator-column name for one level of a categorical column.
#[must_use]
pub fn indicator_name(column: &str, level: &str) -> String {
    format!("{column}_{level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn sample_frame() -> Frame {
        Frame::new(vec![
            ("x".to_string(), ColumnData::Float(vec![1.0, 2.0, 3.0])),
            ("quality".to_string(), ColumnData::Float(vec![5.0, 6.0, 7.0])),
            (
                "type".to_string(),
                ColumnData::Label(labels(&["red", "white", "red"])),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_excludes_target() {
        let matrix = one_hot_matrix(&sample_frame(), &["quality"]).unwrap();
        assert!(matrix.column("quality").is_none());
        assert!(matrix.column("x").is_some());
    }

    #[test]
    fn test_indicator_values() {
        let matrix = one_hot_matrix(&sample_frame(), &["quality"]).unwrap();
        assert_eq!(matrix.column("type_red").unwrap(), &[1.0, 0.0, 1.0]);
        assert_eq!(matrix.column("type_white").unwrap(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_levels_expand_in_sorted_order() {
        let matrix = one_hot_matrix(&sample_frame(), &[]).unwrap();
        let names: Vec<&str> = matrix.names().collect();
        let red = names.iter().position(|n| *n == "type_red").unwrap();
        let white = names.iter().position(|n| *n == "type_white").unwrap();
        assert!(red < white);
    }
}
