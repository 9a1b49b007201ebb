//! Domain handlers and the dispatch registry.
//!
//! One handler per [`IntentKind`]; the registry is built once at startup and
//! read-only thereafter. Each handler owns its failure semantics: a query
//! with no matches is a normal [`DomainResult`], while a provider outage is
//! an [`HandlerError::Unavailable`] the orchestrator surfaces as a retryable
//! condition.
//!
//! # Module Structure
//!
//! - `navigation`: map navigation and zoom
//! - `query`: record lookup
//! - `edit`: undo/redo operations
//! - `coding`: coding assistance delegated to the AI provider

mod coding;
mod edit;
mod navigation;
mod query;

pub use coding::CodingAssistHandler;
pub use edit::EditHandler;
pub use navigation::NavigationHandler;
pub use query::QueryHandler;

use async_trait::async_trait;
use parlance_core::intent::{Intent, IntentKind};
use parlance_core::result::DomainResult;
use parlance_core::session::CommandContext;
use parlance_interaction::ProviderAgent;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Failure produced by a domain handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// An external collaborator the handler depends on is down.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The handler could not act on the intent.
    #[error("handler failed: {0}")]
    Failed(String),
}

/// Failure produced by dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler registered for the intent's kind. A configuration gap,
    /// distinct from a classification miss.
    #[error("no handler registered for domain '{0}'")]
    UnknownDomain(IntentKind),

    /// The selected handler failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// The capability each command domain implements.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// The intent kind this handler serves.
    fn kind(&self) -> IntentKind;

    /// Executes the intent and produces a result payload.
    async fn handle(&self, intent: &Intent, ctx: &CommandContext) -> Result<DomainResult, HandlerError>;
}

/// Process-wide, read-only mapping from intent kind to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<IntentKind, Arc<dyn DomainHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the builtin handler set.
    ///
    /// The coding-assist handler delegates to `provider`; the remaining
    /// handlers are self-contained.
    pub fn builtin(provider: Arc<dyn ProviderAgent>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NavigationHandler::new()));
        registry.register(Arc::new(QueryHandler::new()));
        registry.register(Arc::new(EditHandler::new()));
        registry.register(Arc::new(CodingAssistHandler::new(provider)));
        registry
    }

    /// Registers a handler, replacing any existing handler for its kind.
    pub fn register(&mut self, handler: Arc<dyn DomainHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Whether a handler is registered for `kind`.
    pub fn contains(&self, kind: IntentKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Dispatches an intent to the handler keyed by its kind.
    ///
    /// # Errors
    ///
    /// `UnknownDomain` when no handler is registered for the kind, or the
    /// handler's own error when execution fails.
    pub async fn dispatch(
        &self,
        intent: &Intent,
        ctx: &CommandContext,
    ) -> Result<DomainResult, DispatchError> {
        let handler = self.handlers.get(&intent.kind).ok_or_else(|| {
            tracing::warn!(kind = %intent.kind, "no handler registered for domain");
            DispatchError::UnknownDomain(intent.kind)
        })?;
        Ok(handler.handle(intent, ctx).await?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use parlance_interaction::StaticProviderAgent;

    fn ctx() -> CommandContext {
        CommandContext {
            user_id: 1,
            session_id: "s-1".to_string(),
            context_id: "map".to_string(),
            device_info: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_builtin_registry_covers_every_kind() {
        use strum::IntoEnumIterator;
        let registry = HandlerRegistry::builtin(Arc::new(StaticProviderAgent::new("ok")));
        for kind in IntentKind::iter() {
            assert!(registry.contains(kind), "missing handler for {kind}");
        }
    }

    #[tokio::test]
    async fn test_dispatch_unregistered_kind_is_unknown_domain() {
        let registry = HandlerRegistry::new();
        let intent = Intent::new(IntentKind::Edit, 0.9);
        let err = registry.dispatch(&intent, &ctx()).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownDomain(IntentKind::Edit)));
    }
}
