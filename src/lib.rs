//! # DbAble
//!
//! Declarative CRUD and pagination for entity types backed by MySQL stored
//! procedures. An entity declares which verbs it supports and the parameters
//! of each procedure; every call is validated before it reaches the database.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbable::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
//! #[entity(database = "blog", extra = "post_extra")]
//! #[load(id)]
//! #[create(title)]
//! #[save(id, title)]
//! #[delete(id)]
//! #[scrollable(after, limit, cursor = id)]
//! pub struct Post {
//!     pub id: Option<i64>,
//!     pub title: String,
//! }
//!
//! fn post_extra() -> Restrictions {
//!     Restrictions::new()
//!         .field("after", Restriction::int().with_default(0))
//!         .field("limit", Restriction::int().with_default(20))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 3306,
//!         "root".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let mut dbable = DbAble::new(config).await?;
//!     let posts = dbable.register_store::<Post>("posts")?;
//!
//!     // CALL `blog`.`Post_create`(?)
//!     let mut post = posts.create(json!({"title": "Hello"})).await?.unwrap_or_default();
//!     post.title = "Hello, world".to_string();
//!     posts.save(&mut post).await?;
//!
//!     let mut all = posts.yield_all(json!({"limit": 50}));
//!     while let Some(post) = all.try_next().await? {
//!         println!("{}", post.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod client;
pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use client::MySqlProcedureClient;
pub use self::core::DbAble;
pub use errors::DbAbleError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use db_object;
pub use entity_derive;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
