//! Error types for the admission chain.

use thiserror::Error;

/// Errors returned by an admission plugin when it refuses a request.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The request is not permitted.
    #[error("{plugin}: forbidden: {reason}")]
    Forbidden { plugin: String, reason: String },

    /// The request is malformed for this plugin.
    #[error("{plugin}: invalid: {reason}")]
    Invalid { plugin: String, reason: String },

    /// An internal error occurred while evaluating the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdmissionError {
    #[must_use]
    pub fn forbidden(plugin: &str, reason: impl Into<String>) -> Self {
        Self::Forbidden {
            plugin: plugin.to_owned(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid(plugin: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            plugin: plugin.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<CollaboratorError> for AdmissionError {
    fn from(e: CollaboratorError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Errors surfaced by collaborator APIs.
///
/// These represent infrastructure failures. An authorization denial is
/// expressed via `Decision.allowed == false`, not as an error variant.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The requested object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The collaborator is not ready or cannot be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
