//! Argument encoding
//!
//! Converts validated JSON arguments into bindable values. Objects and arrays
//! are sent as JSON text, which is what MySQL procedures expect for `JSON`
//! parameters.

use crate::types::SqlValue;
use serde_json::Value;

pub fn encode_arg(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::BigInt(i)
            } else if let Some(u) = n.as_u64() {
                SqlValue::UnsignedBigInt(u)
            } else {
                // Non-integral numbers always have an f64 representation
                SqlValue::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Json(value.to_string()),
    }
}

/// Encode arguments in binding order
pub fn encode_args(args: &[(String, Value)]) -> Vec<SqlValue> {
    args.iter().map(|(_, value)| encode_arg(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_values_become_json_text() {
        assert_eq!(
            encode_arg(&json!({"a": [1, 2]})),
            SqlValue::Json(r#"{"a":[1,2]}"#.to_string())
        );
        assert_eq!(encode_arg(&json!(["x"])), SqlValue::Json(r#"["x"]"#.to_string()));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode_arg(&json!(null)), SqlValue::Null);
        assert_eq!(encode_arg(&json!(true)), SqlValue::Boolean(true));
        assert_eq!(encode_arg(&json!(-4)), SqlValue::BigInt(-4));
        assert_eq!(encode_arg(&json!(u64::MAX)), SqlValue::UnsignedBigInt(u64::MAX));
        assert_eq!(encode_arg(&json!(1.5)), SqlValue::Double(1.5));
        assert_eq!(encode_arg(&json!("hi")), SqlValue::Text("hi".to_string()));
    }

    #[test]
    fn test_encode_args_keeps_order() {
        let args = vec![("b".to_string(), json!(2)), ("a".to_string(), json!("x"))];
        assert_eq!(
            encode_args(&args),
            vec![SqlValue::BigInt(2), SqlValue::Text("x".to_string())]
        );
    }
}
