//! Error types used throughout the connector

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Fishbowl connector
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FishbowlError {
    /// Login failed or returned no token.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-2xx upstream response (other than a recovered 401) or a network
    /// failure. `status` is `None` when no response was received.
    #[error("{}", format_upstream(.status, .message))]
    UpstreamApi { status: Option<u16>, message: String },

    /// Malformed caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unrecognized resource, operation or trigger event.
    #[error("{0}")]
    UnknownOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_upstream(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Fishbowl API error ({status}): {message}"),
        None => format!("Fishbowl API error: {message}"),
    }
}

/// Coarse classification used by hosts to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    Authentication,
    Upstream,
    Validation,
    UnknownOperation,
    Configuration,
    Cancelled,
    Internal,
}

impl FishbowlError {
    /// Build an upstream error for an HTTP status.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamApi { status: Some(status), message: message.into() }
    }

    /// Build an upstream error for a failure with no HTTP response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::UpstreamApi { status: None, message: message.into() }
    }

    /// Upstream HTTP status, when the error carries one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamApi { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this is an upstream 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Coarse category for logs and host error mapping.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::UpstreamApi { .. } => ErrorCategory::Upstream,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::UnknownOperation(_) => ErrorCategory::UnknownOperation,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl From<serde_json::Error> for FishbowlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {err}"))
    }
}

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, FishbowlError>;
