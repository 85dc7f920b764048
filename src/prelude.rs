//! Convenience re-exports for common DbAble usage
//!
//! This prelude module re-exports the most commonly used items from the DbAble ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use dbable::prelude::*;
//!
//! // Now you have access to all the common DbAble types and traits
//! ```

// Core DbAble components
pub use crate::client::MySqlProcedureClient;
pub use crate::core::DbAble;
pub use crate::errors::DbAbleError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export commonly used db-object types for convenience
pub use db_object::prelude::*;

// Re-export entity derive for model creation
pub use entity_derive::Entity;

// Common external dependencies
pub use async_trait;
pub use futures::{StreamExt, TryStreamExt};
pub use sqlx;
pub use tokio;
