//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;
use traefik_provider::Diagnostics;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Provider diagnostics, already printed to stderr
    #[error("{summary} ({errors} error(s))")]
    #[diagnostic(code(traefik_provider::cli::diagnostics))]
    Reported {
        summary: String,
        errors: usize,
        exit_code: i32,
    },

    /// State file missing, unreadable or for another type
    #[error("State error: {message}")]
    #[diagnostic(code(traefik_provider::cli::state))]
    State {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Bad command-line input or configuration file
    #[error("Invalid input: {message}")]
    #[diagnostic(code(traefik_provider::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(traefik_provider::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(traefik_provider::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Reported { exit_code, .. } => *exit_code,
            CliError::State { .. } => exit_codes::STATE_ERROR,
            CliError::Input { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Whether the details were already shown to the user
    pub fn is_reported(&self) -> bool {
        matches!(self, CliError::Reported { .. })
    }

    /// Error for diagnostics that have been rendered already
    pub fn reported(diagnostics: &Diagnostics) -> Self {
        let summary = diagnostics
            .errors()
            .next()
            .map(|d| d.summary.clone())
            .unwrap_or_else(|| "Operation failed".to_string());
        Self::Reported {
            exit_code: exit_code_for(&summary),
            errors: diagnostics.errors().count(),
            summary,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
            help: None,
        }
    }

    /// Create a state error with help text
    pub fn state_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

fn exit_code_for(summary: &str) -> i32 {
    match summary {
        "Invalid configuration"
        | "Unexpected Import Identifier"
        | "Unknown type"
        | "Invalid JSONPath expression"
        | "Resource requires replacement" => exit_codes::VALIDATION_ERROR,
        "Provider in offline mode" | "Unable to create Kubernetes client" => {
            exit_codes::UNAVAILABLE
        }
        "IO error" => exit_codes::IO_ERROR,
        "Unable to marshal resource" | "Unable to render manifest" => exit_codes::ERROR,
        _ => exit_codes::API_ERROR,
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use traefik_provider::{Diagnostic, ProviderError};

    #[test]
    fn test_reported_exit_codes() {
        let diags = Diagnostics::from(ProviderError::Offline);
        let err = CliError::reported(&diags);
        assert_eq!(err.exit_code(), exit_codes::UNAVAILABLE);
        assert!(err.is_reported());

        let diags: Diagnostics = vec![
            Diagnostic::warning("Deprecated attribute", "ipWhiteList"),
            Diagnostic::error("Invalid configuration", "bad").at("spec"),
            Diagnostic::error("Unable to PATCH resource", "conflict"),
        ]
        .into_iter()
        .collect();
        let err = CliError::reported(&diags);
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(err.to_string(), "Invalid configuration (2 error(s))");

        let diags = Diagnostics::from(Diagnostic::error("Unable to GET resource", "boom"));
        assert_eq!(CliError::reported(&diags).exit_code(), exit_codes::API_ERROR);

        for summary in ["Unable to marshal resource", "Unable to render manifest"] {
            let diags = Diagnostics::from(Diagnostic::error(summary, "boom"));
            assert_eq!(CliError::reported(&diags).exit_code(), exit_codes::ERROR);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::input_with_help("x", "y").exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(CliError::state("x").exit_code(), exit_codes::STATE_ERROR);
        assert_eq!(CliError::internal("x").exit_code(), exit_codes::ERROR);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(CliError::from(io).exit_code(), exit_codes::IO_ERROR);
    }
}
