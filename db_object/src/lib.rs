//! DB Object - Core abstraction layer for DbAble
//!
//! This crate provides the foundational types and traits for entities backed
//! by stored procedures: restrictions, parameter sets, capability contracts,
//! pagination cursors and the procedure store executing the verbs.

pub mod contract;
pub mod errors;
pub mod kwargs;
pub mod pagination;
pub mod params;
pub mod prelude;
pub mod procedure_store;
pub mod restriction;
pub mod traits;
pub mod validation;

pub use contract::{CompiledContract, Contract, PaginationStrategy, PaginationType, LIMIT_KEY};
pub use errors::{ConfigurationError, ProcedureError, RestrictionError};
pub use kwargs::{to_kwargs, Kwargs, KwargsValidator};
pub use pagination::{Cursor, InfiniteScroll, OffsetPagination, Page, PaginationCursor};
pub use params::{ParameterSet, Verb};
pub use procedure_store::ProcedureStore;
pub use restriction::{FieldKind, Restriction, Restrictions, DATETIME_FORMAT};
pub use traits::*;
pub use validation::{ValidatedIdentifier, ValidationError};

// Used by code generated with `#[derive(Entity)]`
pub use serde_json;
