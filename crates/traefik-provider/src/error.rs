//! Error types for traefik-provider

use std::time::Duration;

use thiserror::Error;

/// Result type for traefik-provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while serving a resource or data source
///
/// Every variant maps to a diagnostic summary through [`ProviderError::summary`];
/// the `Display` text becomes the diagnostic detail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Building the request body failed
    #[error("failed to marshal {target}: {source}")]
    Marshal {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API server answered with something that does not fit the schema
    #[error("failed to unmarshal {target}: {source}")]
    Unmarshal {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// GET failed
    #[error("GET {target} failed: {source}")]
    Get {
        target: String,
        #[source]
        source: kube::Error,
    },

    /// Server-side apply PATCH failed
    #[error("PATCH {target} failed: {source}")]
    Patch {
        target: String,
        #[source]
        source: kube::Error,
    },

    /// DELETE failed
    #[error("DELETE {target} failed: {source}")]
    Delete {
        target: String,
        #[source]
        source: kube::Error,
    },

    /// Object does not exist
    #[error("{target} not found")]
    NotFound { target: String },

    /// A wait condition was not met in time
    #[error("timed out after {timeout:?} waiting for {target} to satisfy {condition}")]
    Timeout {
        target: String,
        condition: String,
        timeout: Duration,
    },

    /// JSONPath expression could not be parsed
    #[error("invalid JSONPath expression '{expression}': {message}")]
    InvalidJsonPath { expression: String, message: String },

    /// Import identifier is not `namespace/name`
    #[error("expected import identifier with format 'namespace/name', got '{id}'")]
    InvalidImportId { id: String },

    /// The provider was configured without cluster access
    #[error("the provider is configured in offline mode, enable cluster access to use resources and data sources")]
    Offline,

    /// Resource or data source type name is not served
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Configuration or state payload does not match the schema
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Kubernetes client configuration failed
    #[error("failed to configure the Kubernetes client: {0}")]
    ClientConfig(String),

    /// Rendering YAML failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Short, human-readable diagnostic summary for this error
    pub fn summary(&self) -> &'static str {
        match self {
            ProviderError::Marshal { .. } => "Unable to marshal resource",
            ProviderError::Unmarshal { .. } => "Unable to unmarshal resource",
            ProviderError::Get { .. } => "Unable to GET resource",
            ProviderError::Patch { .. } => "Unable to PATCH resource",
            ProviderError::Delete { .. } => "Unable to DELETE resource",
            ProviderError::NotFound { .. } => "Resource not found",
            ProviderError::Timeout { .. } => "Timeout while waiting for condition",
            ProviderError::InvalidJsonPath { .. } => "Invalid JSONPath expression",
            ProviderError::InvalidImportId { .. } => "Unexpected Import Identifier",
            ProviderError::Offline => "Provider in offline mode",
            ProviderError::UnknownType(_) => "Unknown type",
            ProviderError::InvalidConfig(_) => "Invalid configuration",
            ProviderError::ClientConfig(_) => "Unable to create Kubernetes client",
            ProviderError::Yaml(_) => "Unable to render manifest",
            ProviderError::Io(_) => "IO error",
        }
    }

    /// Check if this is a server-side apply field conflict (409)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ProviderError::Patch { source: kube::Error::Api(resp), .. } if resp.code == 409
        )
    }
}
