//! Coding assistance handler.

use super::{DomainHandler, HandlerError};
use async_trait::async_trait;
use parlance_core::intent::{Intent, IntentKind};
use parlance_core::result::DomainResult;
use parlance_core::session::CommandContext;
use parlance_interaction::{CollaboratorError, InvokeOptions, ProviderAgent};
use serde_json::json;
use std::sync::Arc;

/// Delegates coding requests to the AI provider.
pub struct CodingAssistHandler {
    provider: Arc<dyn ProviderAgent>,
}

impl CodingAssistHandler {
    pub fn new(provider: Arc<dyn ProviderAgent>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DomainHandler for CodingAssistHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::CodingAssist
    }

    async fn handle(&self, intent: &Intent, _ctx: &CommandContext) -> Result<DomainResult, HandlerError> {
        let request = intent
            .parameter("request")
            .ok_or_else(|| HandlerError::Failed("missing coding request".to_string()))?;

        let prompt = format!("You are a coding assistant. {request}");
        let response = self
            .provider
            .invoke(&prompt, &InvokeOptions::default())
            .await
            .map_err(|err| match err {
                CollaboratorError::Unavailable { .. } => HandlerError::Unavailable(err.to_string()),
                CollaboratorError::Rejected { .. } => HandlerError::Failed(err.to_string()),
            })?;

        Ok(DomainResult::new(IntentKind::CodingAssist, "Generated a response")
            .with_data(json!({ "request": request, "response": response })))
    }
}
