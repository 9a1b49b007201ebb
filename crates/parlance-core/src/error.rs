//! Error types for the Parlance pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Parlance command pipeline.
///
/// Only infrastructure faults are represented here. Domain-expected failures
/// (classification misses, exhausted recovery, unknown domains, collaborator
/// outages) are carried inside [`CommandResult`](crate::result::CommandResult)
/// as structured data and never thrown.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ParlanceError {
    /// Malformed request, rejected before the pipeline runs
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The context store itself is unreachable
    #[error("Session store unavailable: {0}")]
    SessionUnavailable(String),

    /// The transcription collaborator produced no text
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParlanceError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a SessionUnavailable error
    pub fn session_unavailable(message: impl Into<String>) -> Self {
        Self::SessionUnavailable(message.into())
    }

    /// Creates a TranscriptionFailed error
    pub fn transcription_failed(message: impl Into<String>) -> Self {
        Self::TranscriptionFailed(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a SessionUnavailable error
    pub fn is_session_unavailable(&self) -> bool {
        matches!(self, Self::SessionUnavailable(_))
    }

    /// Check if this is a TranscriptionFailed error
    pub fn is_transcription_failed(&self) -> bool {
        matches!(self, Self::TranscriptionFailed(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ParlanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ParlanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization: {err}"))
    }
}

/// Conversion from anyhow::Error (transitional glue at trait seams)
impl From<anyhow::Error> for ParlanceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ParlanceError>`.
pub type Result<T> = std::result::Result<T, ParlanceError>;
