//! Entity trait
//!
//! An entity is a typed record backed by stored procedures. It names its
//! database namespace, its restriction tables and its contract; the verbs
//! themselves live on `ProcedureStore`.

use crate::contract::Contract;
use crate::errors::ProcedureError;
use crate::kwargs::{Kwargs, KwargsValidator};
use crate::restriction::Restrictions;
use crate::traits::executor::Row;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Data model consuming the procedure capabilities
///
/// Usually derived with `#[derive(Entity)]`, which infers restrictions from
/// field types and builds the contract from the `#[load(..)]`,
/// `#[create(..)]`, `#[save(..)]`, `#[delete(..)]`, `#[paginated(..)]` and
/// `#[scrollable(..)]` attributes.
pub trait Entity:
    Clone + Debug + Default + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Procedure prefix, `<NAME>_<verb>`
    const NAME: &'static str;

    /// Database namespace holding the procedures
    const DATABASE: &'static str;

    /// Restrictions of the persisted fields
    fn restrictions() -> Restrictions;

    /// Restrictions for arguments that are not persisted fields, such as
    /// pagination cursors
    fn extra_restrictions() -> Restrictions {
        Restrictions::new()
    }

    /// Declared capabilities and their parameter sets.
    ///
    /// Must declare every capability trait the type implements.
    fn contract() -> Contract<Self>;

    /// Build an entity from a row, validating every field.
    ///
    /// Missing columns take their declared default; unknown columns are
    /// ignored.
    fn from_row(row: &Row) -> Result<Self, ProcedureError> {
        let restrictions = Self::restrictions();
        let mut fields = Kwargs::new();
        for (name, restriction) in restrictions.iter() {
            let value = restriction
                .apply(row.get(name))
                .map_err(|e| ProcedureError::validation(Self::NAME, name, e))?;
            fields.insert(name.to_string(), value);
        }
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Current field values as a keyword bag
    fn to_kwargs(&self) -> Result<Kwargs, ProcedureError> {
        crate::kwargs::to_kwargs(Self::NAME, self)
    }

    /// Validate a keyword bag against this entity's restriction tables.
    ///
    /// Useful for checking auxiliary arguments before building a call, e.g.
    /// a password that is hashed before `create`.
    fn kwargs_validator<I, S>(signature: I, kwargs: &Kwargs) -> Result<Vec<(String, Value)>, ProcedureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let restrictions = Self::restrictions();
        let extra = Self::extra_restrictions();
        KwargsValidator::new(Self::NAME, &restrictions, &extra).validate(signature, kwargs)
    }
}
