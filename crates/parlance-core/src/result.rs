//! Structured command results.
//!
//! Every well-formed request gets a [`CommandResult`] back; domain-expected
//! failures travel inside it as a [`FailureKind`] instead of being thrown.

use crate::help::HelpEntry;
use crate::intent::{Intent, IntentKind};
use serde::{Deserialize, Serialize};

/// Terminal status of one command exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    /// The intent was dispatched and a domain result produced.
    Success,
    /// Nothing resolvable; `suggestions` carries the help fallback.
    Unresolved,
}

/// Why an exchange came back unresolved.
///
/// `CollaboratorUnavailable` is kept distinct so the route layer can render a
/// retry affordance instead of a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Classifier confidence fell below the dispatch threshold.
    ClassificationMiss,
    /// No handler registered for the classified intent kind.
    UnknownDomain,
    /// Recovery found no alternate intent.
    RecoveryExhausted,
    /// A transcription or AI-provider collaborator was down.
    CollaboratorUnavailable,
}

/// Payload produced by a domain handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    /// The domain that produced this result
    pub kind: IntentKind,
    /// One-line human-readable outcome
    pub summary: String,
    /// Structured result payload for the client
    #[serde(default)]
    pub data: serde_json::Value,
}

impl DomainResult {
    /// Creates a result with a null payload.
    pub fn new(kind: IntentKind, summary: impl Into<String>) -> Self {
        Self {
            kind,
            summary: summary.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Attaches a structured payload, builder-style.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// The structured answer `process_command` returns for every well-formed
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Session the command ran in (generated when the caller omitted one)
    pub session_id: String,
    /// Terminal status
    pub status: CommandStatus,
    /// The dispatched intent, when one resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// The handler payload, when dispatch succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_result: Option<DomainResult>,
    /// Help fallback for unresolved commands; empty on success
    #[serde(default)]
    pub suggestions: Vec<HelpEntry>,
    /// Failure detail for unresolved commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl CommandResult {
    /// Builds a success result.
    pub fn success(session_id: impl Into<String>, intent: Intent, domain_result: DomainResult) -> Self {
        Self {
            session_id: session_id.into(),
            status: CommandStatus::Success,
            intent: Some(intent),
            domain_result: Some(domain_result),
            suggestions: Vec::new(),
            failure: None,
        }
    }

    /// Builds an unresolved result carrying help suggestions.
    pub fn unresolved(
        session_id: impl Into<String>,
        failure: FailureKind,
        suggestions: Vec<HelpEntry>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            status: CommandStatus::Unresolved,
            intent: None,
            domain_result: None,
            suggestions,
            failure: Some(failure),
        }
    }
}
