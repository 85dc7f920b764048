pub mod core;
pub mod crud;
pub mod listable;


pub use self::core::ProcedureStore;
