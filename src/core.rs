//! Core DbAble functionality
//!
//! This module contains the main DbAble struct, which owns the procedure
//! executor and the registry of entity stores.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use config::{AppConfig, DatabaseConfig};
use db_object::{Entity, ProcedureExecutor, ProcedureStore};

use crate::client::MySqlProcedureClient;
use crate::errors::DbAbleError;

/// Main DbAble coordinator that manages the executor and registered stores
pub struct DbAble {
    executor: Arc<dyn ProcedureExecutor>,
    stores: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for DbAble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbAble")
            .field("stores", &self.list_stores())
            .finish()
    }
}

impl DbAble {
    /// Create new DbAble with a MySQL connection pool
    pub async fn new(config: DatabaseConfig) -> Result<Self, DbAbleError> {
        let client = MySqlProcedureClient::connect(&config).await?;
        Ok(Self::with_executor(Arc::new(client)))
    }

    /// Create new DbAble from `$DBABLE_CONFIG` or `./dbable.toml`
    pub async fn from_config() -> Result<Self, DbAbleError> {
        let config = AppConfig::load()?;
        Self::new(config.database).await
    }

    /// Create new DbAble on top of any executor
    pub fn with_executor(executor: Arc<dyn ProcedureExecutor>) -> Self {
        Self {
            executor,
            stores: HashMap::new(),
        }
    }

    pub fn executor(&self) -> &Arc<dyn ProcedureExecutor> {
        &self.executor
    }

    /// Register the store of entity `T` under `name`.
    ///
    /// Runs `T`'s registration check; a type whose contract does not pass
    /// is never registered.
    pub fn register_store<T: Entity>(&mut self, name: impl Into<String>) -> Result<ProcedureStore<T>, DbAbleError> {
        let name = name.into();
        if self.stores.contains_key(&name) {
            return Err(DbAbleError::StoreAlreadyRegistered(name));
        }

        let store = ProcedureStore::<T>::new(Arc::clone(&self.executor))?;
        crate::debug_log!("[REGISTER] {} -> {}.{}", name, T::DATABASE, T::NAME);
        self.stores.insert(name, Box::new(store.clone()));
        Ok(store)
    }

    /// Get a registered store by name
    pub fn get_store<T: Entity>(&self, name: &str) -> Result<&ProcedureStore<T>, DbAbleError> {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<ProcedureStore<T>>())
            .ok_or_else(|| DbAbleError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), DbAbleError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| DbAbleError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), DbAbleError> {
        self.executor.health_check().await?;
        Ok(())
    }
}
