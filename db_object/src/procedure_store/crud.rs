//! Load, create, save and delete verbs

use super::core::ProcedureStore;
use crate::errors::ProcedureError;
use crate::kwargs::to_kwargs;
use crate::params::Verb;
use crate::traits::capabilities::{Creatable, Deletable, Loadable, Savable};
use crate::traits::entity::Entity;
use serde::Serialize;
use serde_json::Value;

impl<T: Loadable> ProcedureStore<T> {
    /// Call `<T>_load` and build an entity from the first row.
    ///
    /// Extra rows are ignored; narrowing the lookup to one row is up to the
    /// procedure and its parameters.
    pub async fn load<K: Serialize>(&self, kwargs: K) -> Result<Option<T>, ProcedureError> {
        let kwargs = to_kwargs(T::NAME, kwargs)?;
        let call = self.prepare(Verb::Load, &kwargs)?;
        let sets = self.execute(&call).await?;
        sets.data().first().map(T::from_row).transpose()
    }
}

impl<T: Creatable> ProcedureStore<T> {
    /// Call `<T>_create` and build the created entity from the returned row
    pub async fn create<K: Serialize>(&self, kwargs: K) -> Result<Option<T>, ProcedureError> {
        let kwargs = to_kwargs(T::NAME, kwargs)?;
        let call = self.prepare(Verb::Create, &kwargs)?.with_rollback(true);
        let sets = self.execute(&call).await?;
        sets.data().first().map(T::from_row).transpose()
    }
}

impl<T: Savable> ProcedureStore<T> {
    /// Persist the entity's current values and refresh it from the returned row
    pub async fn save(&self, entity: &mut T) -> Result<bool, ProcedureError> {
        let kwargs = entity.to_kwargs()?;
        let call = self.prepare(Verb::Save, &kwargs)?.with_rollback(true);
        let sets = self.execute(&call).await?;
        let row = sets
            .data()
            .first()
            .ok_or_else(|| self.integration_error(&call, "DB response required, no row returned"))?;
        *entity = T::from_row(row)?;
        Ok(true)
    }
}

impl<T: Deletable> ProcedureStore<T> {
    /// Delete the entity and reset it to its default value.
    ///
    /// The procedure must answer with a row whose `deleted` column is truthy.
    pub async fn delete(&self, entity: &mut T) -> Result<bool, ProcedureError> {
        let kwargs = entity.to_kwargs()?;
        let call = self.prepare(Verb::Delete, &kwargs)?;
        let sets = self.execute(&call).await?;
        let row = sets
            .data()
            .first()
            .ok_or_else(|| self.integration_error(&call, "DB response required, no row returned"))?;
        if !is_truthy(row.get("deleted")) {
            return Err(self.integration_error(&call, "No data deleted"));
        }
        *entity = T::default();
        Ok(true)
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
