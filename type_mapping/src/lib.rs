//! Unified type mapping between Rust, JSON values and MySQL
//! This crate provides the conversion logic shared across the dbable ecosystem

pub mod decode;
pub mod encode;
pub mod sql;
pub mod types;

pub use decode::{decode_row, DecodeError};
pub use encode::{encode_arg, encode_args};
pub use sql::{inner_optional_type, is_optional_type, rust_type_to_restriction};
pub use types::{ColumnType, Row, SqlValue, DATETIME_FORMAT};
