use http::{Method, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Builder already finalized: build() may only be called once per builder")]
    AlreadyFinalized,

    #[error(
        "Ambiguous type name '{name}': the same generated name was requested for two different field sets"
    )]
    AmbiguousTypeName { name: String },

    #[error(
        "Ambiguous security scheme '{name}': the same scheme name was registered with two different definitions"
    )]
    AmbiguousSecurityScheme { name: String },

    #[error("Missing required option '{option}' for operation '{operation}'")]
    MissingRequiredOption {
        operation: String,
        option: &'static str,
    },

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Unexpected status {status} for {context}")]
    UnexpectedStatus {
        status: StatusCode,
        context: &'static str,
    },

    #[error("Duplicate example name '{name}' in {status} exception set")]
    DuplicateExampleName { status: StatusCode, name: String },

    #[error("Duplicate operation: {method} {path} is already documented")]
    DuplicateOperation { method: Method, path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
