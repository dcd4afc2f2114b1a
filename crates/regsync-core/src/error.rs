//! Error types for regsync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for regsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result codes the registrar uses for a successful call
pub const RESULT_CODE_SUCCESS: [i32; 2] = [200, 201];

/// Core error type for regsync
#[derive(Error, Debug)]
pub enum Error {
    /// Collaborator unreachable or returned something we could not parse
    #[error("Transport error: {0}")]
    Transport(String),

    /// Registrar answered with a non-success result code or an error list
    #[error("Registrar rejected request (code {code}): {}", errors_or_message(.message, .errors))]
    Upstream {
        /// Result code returned by the registrar
        code: i32,
        /// Result message returned by the registrar
        message: String,
        /// Raw error strings returned by the registrar
        errors: Vec<String>,
    },

    /// Action blocked by a TLD policy gate
    #[error("Policy block: {0}")]
    PolicyBlock(String),

    /// Two mutually exclusive changes in the same run
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Policy cache could not be read or written
    #[error("Policy cache error: {0}")]
    Cache(String),

    /// TLD catalog lookup failed
    #[error("TLD catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

fn errors_or_message(message: &str, errors: &[String]) -> String {
    if errors.is_empty() {
        message.to_string()
    } else {
        errors.join("; ")
    }
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an upstream rejection
    pub fn upstream(code: i32, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
            errors,
        }
    }

    /// Create a policy block
    pub fn policy_block(msg: impl Into<String>) -> Self {
        Self::PolicyBlock(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a policy cache error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a TLD catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error means the collaborator could not be talked to at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Error strings as they should appear in a reconciliation result
    ///
    /// Upstream rejections surface the registrar's raw strings so the
    /// normalizer can recognize them; everything else is a single line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Upstream { errors, .. } if !errors.is_empty() => errors.clone(),
            Self::Upstream { code, message, .. } => {
                vec![format!("Registrar returned result code {}: {}", code, message)]
            }
            other => vec![other.to_string()],
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_are_raw_strings() {
        let err = Error::upstream(500, "Failed", vec!["FO405 pending".to_string()]);
        assert_eq!(err.messages(), vec!["FO405 pending".to_string()]);
        assert!(!err.is_transport());
    }

    #[test]
    fn upstream_without_errors_reports_code() {
        let err = Error::upstream(404, "Not found", Vec::new());
        assert_eq!(
            err.messages(),
            vec!["Registrar returned result code 404: Not found".to_string()]
        );
    }

    #[test]
    fn transport_is_single_message() {
        let err = Error::transport("connection refused");
        assert!(err.is_transport());
        assert_eq!(err.messages(), vec!["Transport error: connection refused".to_string()]);
    }
}
