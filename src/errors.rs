//! Error types for the DbAble crate
//!
//! This module contains all error types that can be returned by DbAble operations.

use db_object::ProcedureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbAbleError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Procedure(#[from] ProcedureError),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Store already registered: {0}")]
    StoreAlreadyRegistered(String),
}
