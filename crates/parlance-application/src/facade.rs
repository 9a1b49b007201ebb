//! The contract exposed to the route layer.
//!
//! [`CommandService`] is the only boundary this core defines upward: text
//! (or audio) plus identity in, a structured [`CommandResult`] out. Route
//! wiring, validation, and response shaping live outside.

use crate::pipeline::CommandPipeline;
use parlance_core::error::{ParlanceError, Result};
use parlance_core::help::HelpEntry;
use parlance_core::result::CommandResult;
use parlance_core::session::CommandContext;
use parlance_interaction::Transcriber;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// A command request as it arrives from the route layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCommandRequest {
    /// The utterance to resolve
    pub text: String,
    /// Requesting user id
    pub user_id: i64,
    /// Session to run in; a fresh session id is generated when absent
    #[serde(default)]
    pub session_id: Option<String>,
    /// Active UI context; defaults to "global"
    #[serde(default)]
    pub context_id: Option<String>,
    /// Opaque client device description
    #[serde(default)]
    pub device_info: Option<serde_json::Value>,
}

/// The exposed command-processing service.
pub struct CommandService {
    pipeline: CommandPipeline,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl CommandService {
    /// Creates a service with no transcription backend wired up.
    pub fn new(pipeline: CommandPipeline) -> Self {
        Self {
            pipeline,
            transcriber: None,
        }
    }

    /// Attaches a transcription backend, builder-style.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// The underlying pipeline, for store and alias administration.
    pub fn pipeline(&self) -> &CommandPipeline {
        &self.pipeline
    }

    /// Resolves a text command.
    ///
    /// Generates a session id when the request carries none, so the caller
    /// can thread the returned `session_id` through subsequent commands.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank text or a non-positive user id;
    /// `SessionUnavailable` when the context store is unreachable.
    pub async fn process_command(&self, request: ProcessCommandRequest) -> Result<CommandResult> {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let ctx = CommandContext {
            user_id: request.user_id,
            session_id,
            context_id: request.context_id.unwrap_or_else(|| "global".to_string()),
            device_info: request.device_info.unwrap_or(serde_json::Value::Null),
        };
        self.pipeline.process_command(&request.text, ctx).await
    }

    /// Transcribes an audio blob and resolves the resulting text.
    ///
    /// The request's `text` field is ignored; the transcript replaces it.
    ///
    /// # Errors
    ///
    /// `TranscriptionFailed` when no transcriber is configured or the
    /// transcription collaborator fails; otherwise as
    /// [`process_command`](Self::process_command).
    pub async fn process_audio(
        &self,
        audio: &[u8],
        request: ProcessCommandRequest,
    ) -> Result<CommandResult> {
        let transcriber = self.transcriber.as_ref().ok_or_else(|| {
            ParlanceError::transcription_failed("no transcription service configured")
        })?;
        let transcript = transcriber
            .transcribe(audio)
            .await
            .map_err(|err| ParlanceError::transcription_failed(err.to_string()))?;
        self.process_command(ProcessCommandRequest {
            text: transcript.text,
            ..request
        })
        .await
    }

    /// The commands available in `context_id`, for the route layer's
    /// "available commands" endpoint.
    pub fn available_commands(&self, context_id: &str) -> Vec<HelpEntry> {
        self.pipeline.available_commands(context_id)
    }
}
