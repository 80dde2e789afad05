use serde_json::Value;
use thiserror::Error;

/// Errors raised while building a `Structure`, before any object is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("Output key '{key}' is declared more than once in the same structure")]
    DuplicateKey { key: String },

    #[error("Value map for '{key}' defaults to entry '{entry}', which is not in its table")]
    UndefinedDefault { key: String, entry: Value },
}

/// Errors raised while a transformer and its collaborators are being constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("No dependency of type '{type_name}' is registered in the container")]
    MissingDependency { type_name: &'static str },

    #[error("Failed to construct transformer '{transformer}': {message}")]
    Failed {
        transformer: String,
        message: String,
    },
}

/// Errors reported by the object store while loading relations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Failed to load relation '{path}': {message}")]
    RelationLoad { path: String, message: String },

    #[error("Object store is unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a transform pass. There are no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot format value '{value}' of key '{key}': {reason}")]
    Format {
        key: String,
        value: Value,
        reason: String,
    },
}

/// Errors that can occur when turning a declarative definition into a transformer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Failed to parse transformer definition: {0}")]
    Parse(String),

    #[error("Minimal field '{key}' of '{transformer}' is not one of its fields")]
    UnknownMinimalField { transformer: String, key: String },

    #[error("Invalid definition '{transformer}': {source}")]
    Spec {
        transformer: String,
        #[source]
        source: SpecError,
    },

    #[error("Invalid custom data: {0}")]
    Validation(String),
}
