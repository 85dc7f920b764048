//! Row decoding
//!
//! Drivers hand `JSON` columns over as text. `decode_row` parses them back
//! into structured values, keyed by the column types of the result set.

use crate::types::{ColumnType, Row};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A `JSON` column holding text that does not parse
#[derive(Debug)]
pub struct DecodeError {
    pub column: String,
    pub source: serde_json::Error,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column '{}' holds invalid JSON: {}", self.column, self.source)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Parse the text of every `JSON` column; other columns pass through
pub fn decode_row(mut row: Row, column_types: &HashMap<String, ColumnType>) -> Result<Row, DecodeError> {
    for (column, value) in row.iter_mut() {
        if column_types.get(column) != Some(&ColumnType::Json) {
            continue;
        }
        if let Value::String(text) = value {
            let parsed = serde_json::from_str(text).map_err(|source| DecodeError {
                column: column.clone(),
                source,
            })?;
            *value = parsed;
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn types() -> HashMap<String, ColumnType> {
        HashMap::from([
            ("id".to_string(), ColumnType::Integer),
            ("tags".to_string(), ColumnType::Json),
            ("note".to_string(), ColumnType::Text),
        ])
    }

    #[test]
    fn test_json_columns_are_parsed() {
        let row = json!({"id": 1, "tags": r#"["a","b"]"#, "note": r#"["kept"]"#});
        let decoded = decode_row(row.as_object().cloned().unwrap(), &types()).unwrap();
        assert_eq!(decoded["tags"], json!(["a", "b"]));
        assert_eq!(decoded["note"], json!(r#"["kept"]"#));
        assert_eq!(decoded["id"], json!(1));
    }

    #[test]
    fn test_null_json_column_stays_null() {
        let row = json!({"tags": null});
        let decoded = decode_row(row.as_object().cloned().unwrap(), &types()).unwrap();
        assert_eq!(decoded["tags"], Value::Null);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let row = json!({"tags": "{oops"});
        let err = decode_row(row.as_object().cloned().unwrap(), &types()).unwrap_err();
        assert_eq!(err.column, "tags");
    }
}
