//! Traits for procedure-backed entities
//!
//! This module contains the traits that define an entity, its capabilities
//! and the database collaborator executing stored procedures.

pub mod capabilities;
pub mod entity;
pub mod executor;

pub use capabilities::{Creatable, Deletable, Listable, Loadable, Paginated, Savable, Scrollable};
pub use entity::Entity;
pub use executor::{ProcedureCall, ProcedureExecutor, ResultSet, ResultSets, Row};
