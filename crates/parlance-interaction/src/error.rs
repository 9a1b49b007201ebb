//! Collaborator error types.

use thiserror::Error;

/// Failure reported by an external collaborator (transcription service or
/// AI provider).
///
/// `Unavailable` is kept distinct from `Rejected` because the pipeline
/// surfaces outages to the caller as a retryable condition, while a rejected
/// request is an ordinary handler failure.
#[derive(Error, Debug, Clone)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or is down.
    #[error("{service} unavailable: {message}")]
    Unavailable { service: &'static str, message: String },

    /// The collaborator was reachable but refused the request.
    #[error("{service} rejected the request: {message}")]
    Rejected { service: &'static str, message: String },
}

impl CollaboratorError {
    /// Creates an Unavailable error
    pub fn unavailable(service: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            message: message.into(),
        }
    }

    /// Creates a Rejected error
    pub fn rejected(service: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            service,
            message: message.into(),
        }
    }

    /// Check if this is an Unavailable error
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
