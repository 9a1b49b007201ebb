//! Transcription collaborator interface.
//!
//! Speech-to-text itself is out of scope for this core; the pipeline only
//! consumes the narrow interface below. Real backends live with the
//! surrounding application.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The text produced from an audio blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// An external speech-to-text service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes an audio blob to text.
    ///
    /// # Errors
    ///
    /// Returns a [`CollaboratorError`] when the service is down or produced
    /// no text; the caller surfaces this as `TranscriptionFailed`.
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, CollaboratorError>;
}

/// A canned transcriber returning a fixed transcript.
///
/// Stands in for a real backend in tests and in deployments where commands
/// arrive as text only.
pub struct StaticTranscriber {
    text: String,
}

impl StaticTranscriber {
    /// Creates a transcriber that always returns `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, CollaboratorError> {
        if audio.is_empty() {
            return Err(CollaboratorError::rejected("transcription", "empty audio blob"));
        }
        Ok(Transcript {
            text: self.text.clone(),
        })
    }
}
