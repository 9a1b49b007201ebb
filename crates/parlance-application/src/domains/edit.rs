//! Edit operation handler.

use super::{DomainHandler, HandlerError};
use async_trait::async_trait;
use parlance_core::intent::{Intent, IntentKind};
use parlance_core::result::DomainResult;
use parlance_core::session::CommandContext;
use serde_json::json;

/// Executes edit intents (undo/redo).
///
/// The document model being edited lives with the client; this handler
/// validates the operation and produces the instruction payload the client
/// applies.
#[derive(Default)]
pub struct EditHandler;

impl EditHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DomainHandler for EditHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Edit
    }

    async fn handle(&self, intent: &Intent, _ctx: &CommandContext) -> Result<DomainResult, HandlerError> {
        let operation = intent
            .parameter("operation")
            .ok_or_else(|| HandlerError::Failed("missing edit operation".to_string()))?;

        let summary = match operation {
            "undo" => "Reverted the last change",
            "redo" => "Reapplied the last change",
            other => {
                return Err(HandlerError::Failed(format!(
                    "unsupported edit operation '{other}'"
                )));
            }
        };
        Ok(DomainResult::new(IntentKind::Edit, summary)
            .with_data(json!({ "action": operation })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CommandContext {
        CommandContext {
            user_id: 1,
            session_id: "s-1".to_string(),
            context_id: "global".to_string(),
            device_info: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_undo() {
        let intent = Intent::new(IntentKind::Edit, 0.9).with_parameter("operation", "undo");
        let result = EditHandler::new().handle(&intent, &ctx()).await.unwrap();
        assert_eq!(result.summary, "Reverted the last change");
        assert_eq!(result.data["action"], "undo");
    }

    #[tokio::test]
    async fn test_unsupported_operation_fails() {
        let intent = Intent::new(IntentKind::Edit, 0.9).with_parameter("operation", "transmogrify");
        assert!(EditHandler::new().handle(&intent, &ctx()).await.is_err());
    }
}
