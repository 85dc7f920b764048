//! Capability traits
//!
//! Each capability contributes one verb and names the parameter set of the
//! procedure backing it. Implementing a capability alone is not enough: the
//! entity's `Contract` must declare it, which is what the registration check
//! validates.
//!
//! `#[derive(Entity)]` always emits both halves. A hand-written impl must
//! pair every capability with its builder call in `Entity::contract`
//! (`Loadable` with `.loadable()`, `Scrollable` with `.scrollable()`, ...).
//! A capability left out of the contract is never checked at registration,
//! and its verb fails with `ConfigurationError::UndeclaredVerb`.

use super::entity::Entity;
use crate::params::ParameterSet;
use serde_json::Value;

/// Supplants the "R" of CRUD: `<Entity>_load`
pub trait Loadable: Entity {
    fn load_params() -> ParameterSet;
}

/// Supplants the "C" of CRUD: `<Entity>_create`
///
/// The procedure is expected to insert and return the freshly loaded row.
pub trait Creatable: Entity {
    fn create_params() -> ParameterSet;
}

/// Supplants the "U" of CRUD: `<Entity>_save`
///
/// Usually `load_params` + `create_params`.
pub trait Savable: Entity {
    fn save_params() -> ParameterSet;
}

/// Supplants the "D" of CRUD: `<Entity>_delete`
pub trait Deletable: Entity {
    fn delete_params() -> ParameterSet;
}

/// Entities exposing `<Entity>_list`
pub trait Listable: Entity {
    fn list_params() -> ParameterSet;
}

/// Offset pagination: the procedure returns the page rows followed by a
/// single `{page, page_size, total}` row.
pub trait Paginated: Listable {}

/// Cursor ("infinite scroll") pagination driven by `limit` and `after`.
pub trait Scrollable: Listable {
    /// Project this entity to the cursor value resuming after it
    fn to_after(&self) -> Value;
}
