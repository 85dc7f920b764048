//! Rust type conversion utilities
//!
//! Used by `#[derive(Entity)]` to infer a field's restriction from its
//! declared Rust type.

/// Map a Rust type name to the `Restriction` constructor validating it.
///
/// `Option<T>` maps to the restriction of `T`; nullability is decided by the
/// caller through `is_optional_type`.
pub fn rust_type_to_restriction(rust_type: &str) -> &'static str {
    // Normalize type string by removing all whitespace for consistent matching
    let normalized: String = rust_type.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = inner_optional_type(&normalized).unwrap_or(normalized.as_str());
    match inner {
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => "int",
        "f32" | "f64" => "float",
        "String" | "&str" | "&'staticstr" => "string",
        "bool" => "boolean",
        "NaiveDateTime" | "chrono::NaiveDateTime" => "datetime",
        _ if inner.starts_with("DateTime<") || inner.starts_with("chrono::DateTime<") => "timestamp",
        "serde_json::Value" | "Value" => "json",
        "serde_json::Map<String,serde_json::Value>" | "Map<String,Value>" => "object",
        _ if inner.starts_with("Vec<") => "list",
        _ if inner.starts_with("HashMap<") || inner.starts_with("BTreeMap<") => "object",
        _ => "any", // default fallback, serde decides
    }
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    let normalized: String = rust_type.chars().filter(|c| !c.is_whitespace()).collect();
    inner_optional_type(&normalized).is_some()
}

/// `T` of an `Option<T>` type name without whitespace
pub fn inner_optional_type(rust_type: &str) -> Option<&str> {
    ["Option<", "std::option::Option<", "core::option::Option<"]
        .iter()
        .find_map(|prefix| rust_type.strip_prefix(prefix))
        .and_then(|rest| rest.strip_suffix('>'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_type_to_restriction() {
        assert_eq!(rust_type_to_restriction("i64"), "int");
        assert_eq!(rust_type_to_restriction("Option < u32 >"), "int");
        assert_eq!(rust_type_to_restriction("f64"), "float");
        assert_eq!(rust_type_to_restriction("String"), "string");
        assert_eq!(rust_type_to_restriction("bool"), "boolean");
        assert_eq!(rust_type_to_restriction("chrono::NaiveDateTime"), "datetime");
        assert_eq!(rust_type_to_restriction("DateTime<Utc>"), "timestamp");
        assert_eq!(rust_type_to_restriction("Option<chrono::DateTime<chrono::Utc>>"), "timestamp");
        assert_eq!(rust_type_to_restriction("Option<serde_json::Value>"), "json");
        assert_eq!(rust_type_to_restriction("Vec<String>"), "list");
        assert_eq!(rust_type_to_restriction("HashMap<String, i64>"), "object");
        assert_eq!(rust_type_to_restriction("Status"), "any");
    }

    #[test]
    fn test_is_optional_type() {
        assert!(is_optional_type("Option<String>"));
        assert!(is_optional_type("Option < i64 >"));
        assert!(is_optional_type("std::option::Option<i64>"));
        assert!(!is_optional_type("String"));
        assert!(!is_optional_type("Vec<Option<i64>>"));
    }
}
