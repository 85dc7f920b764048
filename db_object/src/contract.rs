//! Entity contracts
//!
//! A `Contract` is the declarative description of which verbs an entity
//! exposes. Compiling it runs every check once, at registration, so that a
//! broken declaration is never discovered on a live call.

use crate::errors::ConfigurationError;
use crate::kwargs::KwargsValidator;
use crate::params::{ParameterSet, Verb};
use crate::restriction::Restrictions;
use crate::traits::capabilities::{Creatable, Deletable, Loadable, Paginated, Savable, Scrollable};
use crate::traits::entity::Entity;
use crate::validation::ValidatedIdentifier;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Name of the limit parameter required by cursor pagination
pub const LIMIT_KEY: &str = "limit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationType {
    /// page / page_size / total
    Pagination,
    /// after / has_more
    InfiniteScroll,
}

impl PaginationType {
    /// Field used as the resume token by `yield_all`
    pub fn cursor_key(&self) -> &'static str {
        match self {
            PaginationType::Pagination => "page",
            PaginationType::InfiniteScroll => "after",
        }
    }
}

/// How `list` paginates for one entity type
pub enum PaginationStrategy<T> {
    Offset,
    Cursor { to_after: fn(&T) -> Value },
}

impl<T> PaginationStrategy<T> {
    pub fn pagination_type(&self) -> PaginationType {
        match self {
            PaginationStrategy::Offset => PaginationType::Pagination,
            PaginationStrategy::Cursor { .. } => PaginationType::InfiniteScroll,
        }
    }

    pub fn cursor_key(&self) -> &'static str {
        self.pagination_type().cursor_key()
    }
}

impl<T> Clone for PaginationStrategy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PaginationStrategy<T> {}

impl<T> fmt::Debug for PaginationStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaginationStrategy::Offset => "Offset",
            PaginationStrategy::Cursor { .. } => "Cursor",
        })
    }
}

/// Declared capabilities of an entity, before validation
///
/// The builder methods are bounded by the capability traits, so a verb can
/// only be declared by a type that implements it.
pub struct Contract<T> {
    declared: Vec<(Verb, ParameterSet)>,
    pagination: Vec<PaginationStrategy<T>>,
    _phantom: PhantomData<T>,
}

impl<T> fmt::Debug for Contract<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("declared", &self.declared)
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl<T: Entity> Default for Contract<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Contract<T> {
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
            pagination: Vec::new(),
            _phantom: PhantomData,
        }
    }

    fn declare(mut self, verb: Verb, params: ParameterSet) -> Self {
        self.declared.push((verb, params));
        self
    }

    pub fn loadable(self) -> Self
    where
        T: Loadable,
    {
        self.declare(Verb::Load, T::load_params())
    }

    pub fn creatable(self) -> Self
    where
        T: Creatable,
    {
        self.declare(Verb::Create, T::create_params())
    }

    pub fn savable(self) -> Self
    where
        T: Savable,
    {
        self.declare(Verb::Save, T::save_params())
    }

    pub fn deletable(self) -> Self
    where
        T: Deletable,
    {
        self.declare(Verb::Delete, T::delete_params())
    }

    pub fn paginated(mut self) -> Self
    where
        T: Paginated,
    {
        self.pagination.push(PaginationStrategy::Offset);
        self.declare(Verb::List, T::list_params())
    }

    pub fn scrollable(mut self) -> Self
    where
        T: Scrollable,
    {
        self.pagination.push(PaginationStrategy::Cursor {
            to_after: <T as Scrollable>::to_after,
        });
        self.declare(Verb::List, T::list_params())
    }

    /// Run every registration check and freeze the result
    pub fn compile(self) -> Result<CompiledContract<T>, ConfigurationError> {
        let entity = T::NAME;

        ValidatedIdentifier::new(entity).map_err(|e| ConfigurationError::InvalidEntityName {
            entity: entity.to_string(),
            reason: e.to_string(),
        })?;
        ValidatedIdentifier::new(T::DATABASE).map_err(|e| ConfigurationError::InvalidDatabase {
            entity: entity.to_string(),
            reason: e.to_string(),
        })?;

        let restrictions = T::restrictions();
        let extra_restrictions = T::extra_restrictions();
        for (field, restriction) in extra_restrictions.iter() {
            restriction
                .check()
                .map_err(|source| ConfigurationError::MalformedRestriction {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    source,
                })?;
        }

        if self.pagination.len() > 1 {
            return Err(ConfigurationError::ConflictingPagination {
                entity: entity.to_string(),
            });
        }
        let pagination = self.pagination.first().copied();

        let validator = KwargsValidator::new(entity, &restrictions, &extra_restrictions);
        let mut params = HashMap::new();
        for (verb, set) in self.declared {
            if params.contains_key(&verb) {
                return Err(ConfigurationError::DuplicateVerb {
                    entity: entity.to_string(),
                    verb: verb.to_string(),
                });
            }
            if let Some(parameter) = set.first_duplicate() {
                return Err(ConfigurationError::DuplicateParameter {
                    entity: entity.to_string(),
                    verb: verb.to_string(),
                    parameter: parameter.to_string(),
                });
            }
            if let Some(parameter) = set.iter().find(|name| validator.restriction(name).is_none()) {
                return Err(ConfigurationError::MissingRestriction {
                    entity: entity.to_string(),
                    verb: verb.to_string(),
                    parameter: parameter.clone(),
                });
            }
            params.insert(verb, set);
        }

        if let Some(strategy) = &pagination {
            let list_params = params.get(&Verb::List).ok_or_else(|| ConfigurationError::UndeclaredVerb {
                entity: entity.to_string(),
                verb: Verb::List.to_string(),
            })?;

            if let PaginationStrategy::Cursor { .. } = strategy {
                if validator.restriction(LIMIT_KEY).is_none() {
                    return Err(ConfigurationError::MissingLimit {
                        entity: entity.to_string(),
                        what: "restriction".to_string(),
                    });
                }
                if !list_params.contains(LIMIT_KEY) {
                    return Err(ConfigurationError::MissingLimit {
                        entity: entity.to_string(),
                        what: "parameter in list_params".to_string(),
                    });
                }
            }

            if !list_params.contains(strategy.cursor_key()) {
                return Err(ConfigurationError::MissingCursorParameter {
                    entity: entity.to_string(),
                    cursor_key: strategy.cursor_key().to_string(),
                });
            }
        }

        tracing::debug!(
            "[CONTRACT] {} compiled: {} verb(s), pagination {:?}",
            entity,
            params.len(),
            pagination
        );

        Ok(CompiledContract {
            restrictions,
            extra_restrictions,
            params,
            pagination,
        })
    }
}

/// A contract that passed every registration check
pub struct CompiledContract<T> {
    restrictions: Restrictions,
    extra_restrictions: Restrictions,
    params: HashMap<Verb, ParameterSet>,
    pagination: Option<PaginationStrategy<T>>,
}

impl<T> fmt::Debug for CompiledContract<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledContract")
            .field("params", &self.params)
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl<T: Entity> CompiledContract<T> {
    pub fn entity(&self) -> &'static str {
        T::NAME
    }

    pub fn database(&self) -> &'static str {
        T::DATABASE
    }

    pub fn validator(&self) -> KwargsValidator<'_> {
        KwargsValidator::new(T::NAME, &self.restrictions, &self.extra_restrictions)
    }

    pub fn params(&self, verb: Verb) -> Result<&ParameterSet, ConfigurationError> {
        self.params
            .get(&verb)
            .ok_or_else(|| ConfigurationError::UndeclaredVerb {
                entity: T::NAME.to_string(),
                verb: verb.to_string(),
            })
    }

    pub fn declares(&self, verb: Verb) -> bool {
        self.params.contains_key(&verb)
    }

    pub fn pagination(&self) -> Option<PaginationStrategy<T>> {
        self.pagination
    }
}
