//! Error types for traefik-crds

use thiserror::Error;

/// Result type for traefik-crds operations
pub type Result<T> = std::result::Result<T, CrdError>;

/// Errors raised while decoding or encoding custom resources
#[derive(Debug, Error)]
pub enum CrdError {
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unexpected kind '{found}', expected '{expected}'")]
    UnexpectedKind { expected: String, found: String },

    #[error("Unexpected apiVersion '{found}', expected '{expected}'")]
    UnexpectedApiVersion { expected: String, found: String },
}
