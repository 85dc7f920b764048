//! Keyword argument validation
//!
//! Validation runs before any database interaction so that input already
//! known to be invalid never costs a connection.

use crate::errors::{ProcedureError, RestrictionError};
use crate::restriction::{Restriction, Restrictions};
use serde::Serialize;
use serde_json::Value;

/// Keyword bag supplied to a verb
pub type Kwargs = serde_json::Map<String, Value>;

/// Serialize caller input into a keyword bag. `null` means no arguments.
pub fn to_kwargs<K: Serialize>(entity: &str, kwargs: K) -> Result<Kwargs, ProcedureError> {
    match serde_json::to_value(kwargs)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Kwargs::new()),
        other => Err(ProcedureError::validation(
            entity,
            "kwargs",
            RestrictionError::new(format!("expected an object of keyword arguments, got {}", other)),
        )),
    }
}

/// Validates keyword bags against an entity's restriction tables
#[derive(Debug, Clone, Copy)]
pub struct KwargsValidator<'a> {
    entity: &'a str,
    restrictions: &'a Restrictions,
    extra_restrictions: &'a Restrictions,
}

impl<'a> KwargsValidator<'a> {
    pub fn new(
        entity: &'a str,
        restrictions: &'a Restrictions,
        extra_restrictions: &'a Restrictions,
    ) -> Self {
        Self {
            entity,
            restrictions,
            extra_restrictions,
        }
    }

    /// Primary table first, then the extra table
    pub fn restriction(&self, name: &str) -> Option<&'a Restriction> {
        self.restrictions
            .get(name)
            .or_else(|| self.extra_restrictions.get(name))
    }

    /// Validate `kwargs` in `signature` order, injecting defaults.
    ///
    /// Fails with a lookup error when a name has no restriction and with a
    /// validation error when a value is rejected.
    pub fn validate<I, S>(&self, signature: I, kwargs: &Kwargs) -> Result<Vec<(String, Value)>, ProcedureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validated = Vec::new();
        for name in signature {
            let name = name.as_ref();
            let restriction = self.restriction(name).ok_or_else(|| ProcedureError::Lookup {
                entity: self.entity.to_string(),
                parameter: name.to_string(),
            })?;
            let value = restriction
                .apply(kwargs.get(name))
                .map_err(|e| ProcedureError::validation(self.entity, name, e))?;
            validated.push((name.to_string(), value));
        }
        Ok(validated)
    }
}
