//! Convenience re-exports for common db-object usage

// Core traits
pub use crate::traits::{
    Creatable, Deletable, Entity, Listable, Loadable, Paginated, ProcedureExecutor, Savable,
    Scrollable,
};

// Error types
pub use crate::errors::{ConfigurationError, ProcedureError};

// Core store functionality
pub use crate::procedure_store::ProcedureStore;

// Declarations
pub use crate::contract::Contract;
pub use crate::params::ParameterSet;
pub use crate::restriction::{Restriction, Restrictions};

// Pagination
pub use crate::pagination::{Cursor, InfiniteScroll, OffsetPagination, Page, PaginationCursor};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
