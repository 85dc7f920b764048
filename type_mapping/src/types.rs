//! Type mapping definitions
//!
//! Rows travel as JSON maps; arguments are bound as `SqlValue`s and result
//! columns are described by `ColumnType`.

use serde::{Deserialize, Serialize};

/// One result row, column name to value
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Canonical text form for datetime values
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Values bound as stored procedure arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    UnsignedBigInt(u64),
    Double(f64),
    Boolean(bool),
    /// Structured value serialized to JSON text
    Json(String),
    Null,
}

impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::BigInt(val)
    }
}

impl From<i32> for SqlValue {
    fn from(val: i32) -> Self {
        SqlValue::BigInt(val.into())
    }
}

impl From<u64> for SqlValue {
    fn from(val: u64) -> Self {
        SqlValue::UnsignedBigInt(val)
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Double(val)
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Boolean(val)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Column families of MySQL result sets, as far as decoding cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    UnsignedInteger,
    Float,
    /// Exact numerics, kept as text to preserve precision
    Decimal,
    Boolean,
    Text,
    DateTime,
    Date,
    Time,
    Json,
    Binary,
    Null,
}

impl ColumnType {
    /// Map a MySQL type name (as reported by the driver) to its family
    pub fn from_type_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_uppercase();
        let unsigned = normalized.ends_with(" UNSIGNED");
        let base = normalized.trim_end_matches(" UNSIGNED");
        match base {
            "BOOLEAN" | "BOOL" => ColumnType::Boolean,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "YEAR" | "BIT" => {
                if unsigned {
                    ColumnType::UnsignedInteger
                } else {
                    ColumnType::Integer
                }
            }
            "FLOAT" | "DOUBLE" | "REAL" => ColumnType::Float,
            "DECIMAL" | "NUMERIC" | "NEWDECIMAL" => ColumnType::Decimal,
            "DATETIME" | "TIMESTAMP" => ColumnType::DateTime,
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time,
            "JSON" => ColumnType::Json,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                ColumnType::Binary
            }
            "NULL" => ColumnType::Null,
            _ => ColumnType::Text, // CHAR, VARCHAR, TEXT, ENUM, SET, ...
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_from_type_name() {
        assert_eq!(ColumnType::from_type_name("BIGINT"), ColumnType::Integer);
        assert_eq!(ColumnType::from_type_name("INT UNSIGNED"), ColumnType::UnsignedInteger);
        assert_eq!(ColumnType::from_type_name("BOOLEAN"), ColumnType::Boolean);
        assert_eq!(ColumnType::from_type_name("decimal"), ColumnType::Decimal);
        assert_eq!(ColumnType::from_type_name("JSON"), ColumnType::Json);
        assert_eq!(ColumnType::from_type_name("TIMESTAMP"), ColumnType::DateTime);
        assert_eq!(ColumnType::from_type_name("VARCHAR"), ColumnType::Text);
        assert_eq!(ColumnType::from_type_name("ENUM"), ColumnType::Text);
        assert_eq!(ColumnType::from_type_name("LONGBLOB"), ColumnType::Binary);
    }

    #[test]
    fn test_option_into_sql_value() {
        assert_eq!(SqlValue::from(Some(3i64)), SqlValue::BigInt(3));
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
    }
}
