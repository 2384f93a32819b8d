//! Error types for schema mapping

use thiserror::Error;

/// Result type for schema mapping operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema mapping errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The contract provider must be finalized before generating schemas")]
    NotReady,

    #[error("The depth of the generated JSON schema exceeds the maximum depth of {max_depth} at '{path}'")]
    DepthExceeded { max_depth: usize, path: String },

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Contract configuration error: {0}")]
    Configuration(String),

    #[error("No contract registered for type: {0}")]
    UnknownType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
