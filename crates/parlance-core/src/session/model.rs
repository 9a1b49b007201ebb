//! Session domain model.
//!
//! This module contains the core [`Session`] entity and the immutable
//! [`Turn`] records it accumulates. A session is owned exclusively by the
//! [`SessionStore`](super::store::SessionStore); all mutation goes through
//! [`Session::record_turn`].

use crate::intent::Intent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How one command exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Classified and dispatched on the first pass.
    Success,
    /// Dispatched after the recovery engine corrected the utterance.
    Recovered,
    /// Neither classification nor recovery resolved the utterance.
    Failed,
}

/// One resolved or failed command exchange within a session.
///
/// Turns are appended by the orchestrator and never mutated afterwards; they
/// feed reference resolution ("undo that") and command-history UX.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The utterance as received, before shortcut expansion
    pub raw_text: String,
    /// The intent the turn resolved to, if any
    pub resolved_intent: Option<Intent>,
    /// How the exchange ended
    pub outcome: TurnOutcome,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(raw_text: impl Into<String>, resolved_intent: Option<Intent>, outcome: TurnOutcome) -> Self {
        Self {
            raw_text: raw_text.into(),
            resolved_intent,
            outcome,
            timestamp: Utc::now(),
        }
    }
}

/// The per-call view of a request, assembled from the session and request
/// fields. Passed by value through the pipeline stages; never shared-mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandContext {
    /// Requesting user id (must be positive)
    pub user_id: i64,
    /// Session this command belongs to
    pub session_id: String,
    /// Active UI context id ("map", "editor", "global", ...)
    pub context_id: String,
    /// Opaque client device description
    #[serde(default)]
    pub device_info: serde_json::Value,
}

/// Per-user, per-conversation state tracked across commands.
///
/// Sessions are keyed uniquely by `session_id`, created on first command for
/// an unseen id, and evicted after an idle timeout. The turn sequence is
/// append-only: entries are only dropped from the front when the retention
/// window overflows, and the whole session disappears only via eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (client-supplied or generated)
    pub session_id: String,
    /// Owning user id
    pub user_id: i64,
    /// Ordered turn history, oldest first
    turns: Vec<Turn>,
    /// Context id of the most recent command
    pub current_context_id: String,
    /// Opaque client device description
    pub device_info: serde_json::Value,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session last processed a command
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session from the first command's context.
    pub fn new(ctx: &CommandContext) -> Self {
        let now = Utc::now();
        Self {
            session_id: ctx.session_id.clone(),
            user_id: ctx.user_id,
            turns: Vec::new(),
            current_context_id: ctx.context_id.clone(),
            device_info: ctx.device_info.clone(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// The ordered turn history, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Appends a turn and touches `last_active_at`.
    ///
    /// This is the single mutation point for session history. When the
    /// retention window overflows, the oldest turn is dropped.
    pub fn record_turn(&mut self, turn: Turn, max_turns: usize) {
        self.turns.push(turn);
        if self.turns.len() > max_turns {
            let overflow = self.turns.len() - max_turns;
            self.turns.drain(..overflow);
        }
        self.last_active_at = Utc::now();
    }

    /// The most recent turn that dispatched successfully, if any.
    pub fn last_successful_turn(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .find(|turn| matches!(turn.outcome, TurnOutcome::Success | TurnOutcome::Recovered))
    }

    /// Whether the session has been idle since `cutoff`.
    pub fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active_at <= cutoff
    }
}
