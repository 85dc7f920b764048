use thiserror::Error;

/// Failure raised by a single restriction when it rejects a value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RestrictionError {
    pub message: String,
}

impl RestrictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Contract problems found while registering an entity type.
///
/// These are fatal: a `ProcedureStore` is never built for a type whose
/// contract does not pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{entity}: database namespace is invalid: {reason}")]
    InvalidDatabase { entity: String, reason: String },

    #[error("{entity}: entity name is not a valid procedure prefix: {reason}")]
    InvalidEntityName { entity: String, reason: String },

    #[error("{entity}: missing restrictions for \"{parameter}\" in {verb}_params")]
    MissingRestriction {
        entity: String,
        verb: String,
        parameter: String,
    },

    #[error("{entity}: \"{parameter}\" is declared more than once in {verb}_params")]
    DuplicateParameter {
        entity: String,
        verb: String,
        parameter: String,
    },

    #[error("{entity}: {verb}_params is declared more than once")]
    DuplicateVerb { entity: String, verb: String },

    #[error("{entity}: {verb}_params is required but was not declared")]
    UndeclaredVerb { entity: String, verb: String },

    #[error("{entity}: Paginated and Scrollable are mutually exclusive")]
    ConflictingPagination { entity: String },

    #[error("{entity}: Scrollable requires a \"limit\" {what}")]
    MissingLimit { entity: String, what: String },

    #[error("{entity}: list_params must include the cursor key \"{cursor_key}\"")]
    MissingCursorParameter { entity: String, cursor_key: String },

    #[error("{entity}: extra restriction \"{field}\" is malformed: {source}")]
    MalformedRestriction {
        entity: String,
        field: String,
        source: RestrictionError,
    },
}

#[derive(Error, Debug)]
pub enum ProcedureError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {entity}.{field}: {source}")]
    Validation {
        entity: String,
        field: String,
        source: RestrictionError,
    },

    #[error("Lookup error: restrictions required for \"{parameter}\" in {entity}")]
    Lookup { entity: String, parameter: String },

    #[error("Integration error: {entity} via {procedure}: {message}")]
    Integration {
        entity: String,
        procedure: String,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProcedureError {
    pub fn validation(entity: &str, field: &str, source: RestrictionError) -> Self {
        Self::Validation {
            entity: entity.to_string(),
            field: field.to_string(),
            source,
        }
    }

    pub fn integration(entity: &str, procedure: &str, message: impl Into<String>) -> Self {
        Self::Integration {
            entity: entity.to_string(),
            procedure: procedure.to_string(),
            message: message.into(),
        }
    }

    pub fn database<E: std::fmt::Display>(error: E) -> Self {
        Self::Database(error.to_string())
    }

    /// Whether the failure happened before any database interaction
    pub fn is_pre_io(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Validation { .. } | Self::Lookup { .. }
        )
    }
}
