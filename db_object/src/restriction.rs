//! Field restrictions
//!
//! A restriction validates and coerces one field value and may carry a
//! default used when the value is absent.

use crate::errors::RestrictionError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub use type_mapping::DATETIME_FORMAT;

const DATETIME_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Signature of a user supplied coercion
pub type CoerceFn = fn(&Value) -> Result<Value, String>;

#[derive(Clone)]
pub enum FieldKind {
    Any,
    Int,
    Float,
    Str,
    Bool,
    DateTime,
    /// Instant in UTC, rendered as RFC 3339 with an offset
    Timestamp,
    Json,
    Object,
    List,
    OneOf(Vec<Value>),
    Custom { name: &'static str, coerce: CoerceFn },
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::OneOf(choices) => f.debug_tuple("OneOf").field(choices).finish(),
            FieldKind::Custom { name, .. } => f.debug_tuple("Custom").field(name).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Str => "str",
            FieldKind::Bool => "bool",
            FieldKind::DateTime => "datetime",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Json => "json",
            FieldKind::Object => "object",
            FieldKind::List => "list",
            FieldKind::OneOf(_) => "one_of",
            FieldKind::Custom { name, .. } => *name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Restriction {
    kind: FieldKind,
    nullable: bool,
    default: Option<Value>,
}

impl Restriction {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
            default: None,
        }
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any).nullable()
    }

    pub fn int() -> Self {
        Self::new(FieldKind::Int)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn string() -> Self {
        Self::new(FieldKind::Str)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Bool)
    }

    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    /// Datetime that keeps its UTC offset; naive input is read as UTC
    pub fn timestamp() -> Self {
        Self::new(FieldKind::Timestamp)
    }

    pub fn json() -> Self {
        Self::new(FieldKind::Json)
    }

    pub fn object() -> Self {
        Self::new(FieldKind::Object)
    }

    pub fn list() -> Self {
        Self::new(FieldKind::List)
    }

    pub fn one_of<I: IntoIterator<Item = Value>>(choices: I) -> Self {
        Self::new(FieldKind::OneOf(choices.into_iter().collect()))
    }

    pub fn custom(name: &'static str, coerce: CoerceFn) -> Self {
        Self::new(FieldKind::Custom { name, coerce })
    }

    /// Allow `null` as a valid value
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validate a possibly absent value, falling back to the default
    pub fn apply(&self, value: Option<&Value>) -> Result<Value, RestrictionError> {
        match value.or(self.default.as_ref()) {
            Some(value) => self.validate(value),
            None => self.validate(&Value::Null),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<Value, RestrictionError> {
        if value.is_null() {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err(RestrictionError::new(format!(
                    "null is not allowed for {}",
                    self.kind.name()
                )))
            };
        }

        match &self.kind {
            FieldKind::Any => Ok(value.clone()),
            FieldKind::Int => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                _ => Err(mismatch("int", value)),
            },
            FieldKind::Float => match value.as_f64() {
                Some(f) if value.is_number() => Ok(Value::from(f)),
                _ => Err(mismatch("float", value)),
            },
            FieldKind::Str => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(mismatch("str", value)),
            },
            FieldKind::Bool => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(mismatch("bool", value)),
            },
            FieldKind::DateTime => match value {
                Value::String(s) => parse_datetime(s)
                    .map(|dt| Value::String(dt.format(DATETIME_FORMAT).to_string()))
                    .ok_or_else(|| {
                        RestrictionError::new(format!("\"{}\" is not a valid datetime", s))
                    }),
                _ => Err(mismatch("datetime", value)),
            },
            FieldKind::Timestamp => match value {
                Value::String(s) => parse_datetime(s)
                    .map(|dt| Value::String(dt.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, false)))
                    .ok_or_else(|| {
                        RestrictionError::new(format!("\"{}\" is not a valid timestamp", s))
                    }),
                _ => Err(mismatch("timestamp", value)),
            },
            FieldKind::Json => Ok(value.clone()),
            FieldKind::Object => match value {
                Value::Object(_) => Ok(value.clone()),
                _ => Err(mismatch("object", value)),
            },
            FieldKind::List => match value {
                Value::Array(_) => Ok(value.clone()),
                _ => Err(mismatch("list", value)),
            },
            FieldKind::OneOf(choices) => {
                if choices.contains(value) {
                    Ok(value.clone())
                } else {
                    Err(RestrictionError::new(format!(
                        "{} is not one of {}",
                        value,
                        Value::Array(choices.clone())
                    )))
                }
            }
            FieldKind::Custom { coerce, .. } => coerce(value).map_err(RestrictionError::new),
        }
    }

    /// Check that the restriction itself is well formed
    pub fn check(&self) -> Result<(), RestrictionError> {
        if let FieldKind::OneOf(choices) = &self.kind {
            if choices.is_empty() {
                return Err(RestrictionError::new("one_of requires at least one choice"));
            }
        }
        if let Some(default) = &self.default {
            self.validate(default).map_err(|e| {
                RestrictionError::new(format!("default {} is invalid: {}", default, e))
            })?;
        }
        Ok(())
    }
}

fn mismatch(expected: &str, value: &Value) -> RestrictionError {
    RestrictionError::new(format!("expected {}, got {}", expected, value))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

/// Name to restriction table of one entity
#[derive(Debug, Clone, Default)]
pub struct Restrictions {
    fields: BTreeMap<String, Restriction>,
}

impl Restrictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, restriction: Restriction) -> Self {
        self.fields.insert(name.into(), restriction);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, restriction: Restriction) {
        self.fields.insert(name.into(), restriction);
    }

    pub fn get(&self, name: &str) -> Option<&Restriction> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Restriction)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_restriction() {
        let r = Restriction::int();
        assert_eq!(r.validate(&json!(1)).unwrap(), json!(1));
        assert!(r.validate(&json!("abc")).is_err());
        assert!(r.validate(&json!(1.5)).is_err());
        assert!(r.validate(&Value::Null).is_err());
        assert_eq!(r.clone().nullable().validate(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_default_applies_only_when_absent() {
        let r = Restriction::int().with_default(5);
        assert_eq!(r.apply(None).unwrap(), json!(5));
        assert_eq!(r.apply(Some(&json!(7))).unwrap(), json!(7));
        assert!(Restriction::int().apply(None).is_err());
        assert_eq!(Restriction::int().nullable().apply(None).unwrap(), Value::Null);
    }

    #[test]
    fn test_float_widens_integers() {
        assert_eq!(Restriction::float().validate(&json!(12)).unwrap(), json!(12.0));
        assert!(Restriction::float().validate(&json!("12")).is_err());
    }

    #[test]
    fn test_datetime_normalizes() {
        let r = Restriction::datetime();
        assert_eq!(
            r.validate(&json!("2021-11-18 00:00:00")).unwrap(),
            json!("2021-11-18T00:00:00")
        );
        assert_eq!(
            r.validate(&json!("2021-11-18T10:20:30.5+00:00")).unwrap(),
            json!("2021-11-18T10:20:30.500")
        );
        assert!(r.validate(&json!("yesterday")).is_err());
    }

    #[test]
    fn test_timestamp_keeps_utc_offset() {
        let r = Restriction::timestamp();
        assert_eq!(
            r.validate(&json!("2024-01-02 03:04:05")).unwrap(),
            json!("2024-01-02T03:04:05+00:00")
        );
        assert_eq!(
            r.validate(&json!("2024-01-02T05:04:05.250+02:00")).unwrap(),
            json!("2024-01-02T03:04:05.250+00:00")
        );
        assert!(r.validate(&json!("soon")).is_err());

        let value = r.validate(&json!("2024-01-02T03:04:05Z")).unwrap();
        let parsed: chrono::DateTime<chrono::Utc> = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_one_of_and_check() {
        let r = Restriction::one_of([json!("a"), json!("b")]);
        assert!(r.validate(&json!("a")).is_ok());
        assert!(r.validate(&json!("c")).is_err());
        assert!(r.check().is_ok());

        assert!(Restriction::one_of(Vec::new()).check().is_err());
        assert!(Restriction::one_of([json!("a")]).with_default("z").check().is_err());
        assert!(Restriction::int().with_default("ten").check().is_err());
    }

    #[test]
    fn test_custom_restriction() {
        fn non_empty(value: &Value) -> Result<Value, String> {
            match value.as_str() {
                Some(s) if !s.is_empty() => Ok(value.clone()),
                _ => Err("must be a non-empty string".to_string()),
            }
        }
        let r = Restriction::custom("non_empty", non_empty);
        assert!(r.validate(&json!("x")).is_ok());
        assert_eq!(
            r.validate(&json!("")).unwrap_err().message,
            "must be a non-empty string"
        );
    }
}
