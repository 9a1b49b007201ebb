//! Session orchestration.
//!
//! [`CommandPipeline`] sequences one command through the resolution stages:
//! shortcut expansion, classification, dispatch, recovery, and the
//! contextual-help fallback. The whole invocation runs inside the session's
//! mutual-exclusion scope, and exactly one turn is recorded per call
//! whatever the outcome.

use crate::domains::{DispatchError, HandlerError, HandlerRegistry};
use parlance_core::classify::IntentClassifier;
use parlance_core::config::PipelineConfig;
use parlance_core::error::{ParlanceError, Result};
use parlance_core::help::{self, HelpEntry};
use parlance_core::recovery::RecoveryEngine;
use parlance_core::result::{CommandResult, FailureKind};
use parlance_core::session::{CommandContext, Session, SessionStore, Turn, TurnOutcome};
use parlance_core::shortcut::ShortcutExpander;
use std::sync::Arc;

/// The entry point for resolving one command within a session.
pub struct CommandPipeline {
    store: Arc<SessionStore>,
    expander: Arc<ShortcutExpander>,
    classifier: IntentClassifier,
    recovery: RecoveryEngine,
    registry: Arc<HandlerRegistry>,
    config: PipelineConfig,
}

impl CommandPipeline {
    /// Creates a pipeline with the given policy and handler registry.
    pub fn new(config: PipelineConfig, registry: HandlerRegistry) -> Self {
        Self {
            store: Arc::new(SessionStore::new(config.clone())),
            expander: Arc::new(ShortcutExpander::new()),
            classifier: IntentClassifier::new(config.clone()),
            recovery: RecoveryEngine::new(config.clone()),
            registry: Arc::new(registry),
            config,
        }
    }

    /// The context store backing this pipeline.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The shortcut expander, for alias administration.
    pub fn expander(&self) -> &Arc<ShortcutExpander> {
        &self.expander
    }

    /// Resolves one command.
    ///
    /// Loads (or creates) the session, expands shortcuts, classifies, and
    /// dispatches; on a classification or dispatch failure the recovery
    /// engine gets one attempt before the contextual help fallback. The
    /// session's turn history and `last_active_at` are updated exactly once
    /// on every outcome path.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the text is blank or the user id is not positive
    /// (no turn is recorded); `SessionUnavailable` only when the context
    /// store itself is unreachable. All domain-level failures are returned
    /// inside the [`CommandResult`].
    pub async fn process_command(&self, raw_text: &str, ctx: CommandContext) -> Result<CommandResult> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(ParlanceError::invalid_input("command text is empty"));
        }
        if ctx.user_id <= 0 {
            return Err(ParlanceError::invalid_input("user id must be positive"));
        }

        let entry = self.store.checkout(&ctx).await?;
        let mut session = entry.lock().await;
        session.current_context_id = ctx.context_id.clone();

        let (turn, result) = self.resolve(trimmed, &session, &ctx).await;
        session.record_turn(turn, self.config.max_turns);
        Ok(result)
    }

    /// The commands available in `context_id`, including global entries.
    pub fn available_commands(&self, context_id: &str) -> Vec<HelpEntry> {
        help::help_for_context(context_id, true)
    }

    /// Runs the resolution stages for one utterance against a locked session.
    async fn resolve(&self, raw: &str, session: &Session, ctx: &CommandContext) -> (Turn, CommandResult) {
        let expanded = self.expander.expand(raw, ctx.user_id);
        let intent = self
            .classifier
            .classify(&expanded, session.turns(), &ctx.context_id);
        tracing::debug!(
            kind = %intent.kind,
            confidence = intent.confidence,
            "classified command"
        );

        // Preserved when the first failure is a configuration gap rather
        // than a bad utterance.
        let mut unresolved_failure = FailureKind::RecoveryExhausted;

        if intent.confidence >= self.config.confidence_threshold {
            match self.registry.dispatch(&intent, ctx).await {
                Ok(domain_result) => {
                    return (
                        Turn::new(raw, Some(intent.clone()), TurnOutcome::Success),
                        CommandResult::success(&ctx.session_id, intent, domain_result),
                    );
                }
                Err(DispatchError::Handler(HandlerError::Unavailable(message))) => {
                    // A deterministic outage: recovery would re-dispatch into
                    // the same downed collaborator.
                    tracing::warn!(%message, "collaborator unavailable during dispatch");
                    return (
                        Turn::new(raw, Some(intent), TurnOutcome::Failed),
                        self.unresolved(ctx, FailureKind::CollaboratorUnavailable),
                    );
                }
                Err(DispatchError::UnknownDomain(kind)) => {
                    tracing::warn!(%kind, "dispatch hit unregistered domain");
                    unresolved_failure = FailureKind::UnknownDomain;
                }
                Err(DispatchError::Handler(HandlerError::Failed(message))) => {
                    tracing::debug!(%message, "handler failed, attempting recovery");
                }
            }
        }

        if let Some(alternate) = self.recovery.recover(raw, session.turns(), &ctx.context_id) {
            match self.registry.dispatch(&alternate, ctx).await {
                Ok(domain_result) => {
                    return (
                        Turn::new(raw, Some(alternate.clone()), TurnOutcome::Recovered),
                        CommandResult::success(&ctx.session_id, alternate, domain_result),
                    );
                }
                Err(DispatchError::Handler(HandlerError::Unavailable(message))) => {
                    tracing::warn!(%message, "collaborator unavailable during recovery dispatch");
                    unresolved_failure = FailureKind::CollaboratorUnavailable;
                }
                Err(DispatchError::UnknownDomain(kind)) => {
                    tracing::warn!(%kind, "recovery dispatch hit unregistered domain");
                    unresolved_failure = FailureKind::UnknownDomain;
                }
                Err(DispatchError::Handler(HandlerError::Failed(message))) => {
                    tracing::debug!(%message, "recovered intent failed dispatch");
                }
            }
        }

        (
            Turn::new(raw, None, TurnOutcome::Failed),
            self.unresolved(ctx, unresolved_failure),
        )
    }

    /// Builds the unresolved result with the help fallback for the context.
    fn unresolved(&self, ctx: &CommandContext, failure: FailureKind) -> CommandResult {
        let suggestions = help::help_for_context(&ctx.context_id, true);
        CommandResult::unresolved(&ctx.session_id, failure, suggestions)
    }
}
