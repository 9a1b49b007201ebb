//! End-to-end pipeline scenarios.
//!
//! Exercises the exposed contract the way the route layer does: text in,
//! structured result out, with session history inspected through the store.

use async_trait::async_trait;
use parlance_application::{CommandPipeline, CommandService, HandlerRegistry, ProcessCommandRequest};
use parlance_application::domains::{EditHandler, NavigationHandler, QueryHandler};
use parlance_core::config::PipelineConfig;
use parlance_core::intent::IntentKind;
use parlance_core::result::{CommandStatus, FailureKind};
use parlance_core::session::TurnOutcome;
use parlance_interaction::{
    CollaboratorError, InvokeOptions, ProviderAgent, StaticProviderAgent, StaticTranscriber,
};
use std::sync::Arc;

/// Provider that is always down.
struct FailingProvider;

#[async_trait]
impl ProviderAgent for FailingProvider {
    async fn invoke(&self, _prompt: &str, _options: &InvokeOptions) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::unavailable("provider", "connection refused"))
    }
}

fn service() -> CommandService {
    let registry = HandlerRegistry::builtin(Arc::new(StaticProviderAgent::new("// generated")));
    CommandService::new(CommandPipeline::new(PipelineConfig::default(), registry))
}

fn request(text: &str, session_id: &str, context_id: &str) -> ProcessCommandRequest {
    ProcessCommandRequest {
        text: text.to_string(),
        user_id: 7,
        session_id: Some(session_id.to_string()),
        context_id: Some(context_id.to_string()),
        device_info: None,
    }
}

async fn turn_count(service: &CommandService, session_id: &str) -> usize {
    let entry = service
        .pipeline()
        .store()
        .get(session_id)
        .await
        .expect("session exists");
    let session = entry.lock().await;
    session.turns().len()
}

#[tokio::test]
async fn test_navigation_command_resolves_with_address() {
    let service = service();
    let result = service
        .process_command(request("show me 123 Main St", "s-nav", "map"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    let intent = result.intent.unwrap();
    assert_eq!(intent.kind, IntentKind::Navigation);
    assert_eq!(intent.parameter("address"), Some("123 Main St"));
    let domain = result.domain_result.unwrap();
    assert_eq!(domain.data["action"], "navigate");
    assert_eq!(turn_count(&service, "s-nav").await, 1);
}

#[tokio::test]
async fn test_undo_that_follows_prior_edit_turn() {
    let service = service();
    service
        .process_command(request("undo", "s-edit", "global"))
        .await
        .unwrap();

    let result = service
        .process_command(request("undo that", "s-edit", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    let intent = result.intent.unwrap();
    assert_eq!(intent.kind, IntentKind::Edit);
    assert_eq!(intent.parameter("operation"), Some("undo"));
    assert_eq!(turn_count(&service, "s-edit").await, 2);
}

#[tokio::test]
async fn test_unmatchable_command_returns_global_suggestions() {
    let service = service();
    let result = service
        .process_command(request("frobnicate the thing", "s-frob", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Unresolved);
    assert_eq!(result.failure, Some(FailureKind::RecoveryExhausted));
    assert!(!result.suggestions.is_empty());
    assert!(result.intent.is_none());

    // The failed exchange is still a recorded turn.
    assert_eq!(turn_count(&service, "s-frob").await, 1);
}

#[tokio::test]
async fn test_blank_text_is_invalid_input_with_no_turn() {
    let service = service();
    let err = service
        .process_command(request("   \t ", "s-blank", "global"))
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
    assert!(service.pipeline().store().get("s-blank").await.is_none());
}

#[tokio::test]
async fn test_non_positive_user_id_is_invalid_input() {
    let service = service();
    let mut req = request("undo", "s-user", "global");
    req.user_id = 0;
    let err = service.process_command(req).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_exactly_one_turn_per_call() {
    let service = service();
    let commands = ["undo", "frobnicate the thing", "search for permits"];
    let mut previous = 0;
    for (i, command) in commands.iter().enumerate() {
        service
            .process_command(request(command, "s-turns", "global"))
            .await
            .unwrap();
        let count = turn_count(&service, "s-turns").await;
        assert_eq!(count, i + 1);
        assert!(count > previous);
        previous = count;
    }
}

#[tokio::test]
async fn test_concurrent_same_session_calls_lose_no_turns() {
    let service = Arc::new(service());

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move {
            service
                .process_command(request("undo", "s-race", "global"))
                .await
        }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move {
            service
                .process_command(request("search for permits", "s-race", "global"))
                .await
        }
    });

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(turn_count(&service, "s-race").await, 2);
}

#[tokio::test]
async fn test_misspelled_command_is_recovered() {
    let service = service();
    let result = service
        .process_command(request("unod", "s-typo", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    assert_eq!(result.intent.unwrap().kind, IntentKind::Edit);

    let entry = service.pipeline().store().get("s-typo").await.unwrap();
    let session = entry.lock().await;
    assert_eq!(session.turns()[0].outcome, TurnOutcome::Recovered);
}

#[tokio::test]
async fn test_provider_outage_surfaces_as_collaborator_unavailable() {
    let registry = HandlerRegistry::builtin(Arc::new(FailingProvider));
    let service = CommandService::new(CommandPipeline::new(PipelineConfig::default(), registry));

    let result = service
        .process_command(request(
            "write a function that parses the import file",
            "s-outage",
            "global",
        ))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Unresolved);
    assert_eq!(result.failure, Some(FailureKind::CollaboratorUnavailable));
    assert!(!result.suggestions.is_empty());
    assert_eq!(turn_count(&service, "s-outage").await, 1);
}

#[tokio::test]
async fn test_unregistered_domain_surfaces_as_unknown_domain() {
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(NavigationHandler::new()));
    registry.register(Arc::new(QueryHandler::new()));
    let service = CommandService::new(CommandPipeline::new(PipelineConfig::default(), registry));

    let result = service
        .process_command(request("undo", "s-nodomain", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Unresolved);
    assert_eq!(result.failure, Some(FailureKind::UnknownDomain));
    assert!(!result.suggestions.is_empty());
}

#[tokio::test]
async fn test_session_id_generated_when_absent() {
    let service = service();
    let mut req = request("undo", "ignored", "global");
    req.session_id = None;

    let result = service.process_command(req).await.unwrap();
    assert!(!result.session_id.is_empty());

    // The generated id addresses a live session with the recorded turn.
    assert_eq!(turn_count(&service, &result.session_id).await, 1);
}

#[tokio::test]
async fn test_expanded_shortcut_resolves_like_canonical_phrase() {
    let service = service();
    let result = service
        .process_command(request("goto 123 Main St", "s-alias", "map"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    let intent = result.intent.unwrap();
    assert_eq!(intent.kind, IntentKind::Navigation);
    assert_eq!(intent.parameter("address"), Some("123 Main St"));
}

#[tokio::test]
async fn test_do_that_again_repeats_last_successful_intent() {
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(NavigationHandler::new()));
    registry.register(Arc::new(EditHandler::new()));
    registry.register(Arc::new(QueryHandler::with_records(vec![
        "Permit 2024-001".to_string(),
    ])));
    let service = CommandService::new(CommandPipeline::new(PipelineConfig::default(), registry));

    service
        .process_command(request("search for permit", "s-again", "global"))
        .await
        .unwrap();

    let result = service
        .process_command(request("do that again", "s-again", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    assert_eq!(result.intent.unwrap().kind, IntentKind::Query);

    let entry = service.pipeline().store().get("s-again").await.unwrap();
    let session = entry.lock().await;
    assert_eq!(session.turns()[1].outcome, TurnOutcome::Recovered);
}

#[tokio::test]
async fn test_process_audio_transcribes_then_resolves() {
    let registry = HandlerRegistry::builtin(Arc::new(StaticProviderAgent::new("// generated")));
    let service = CommandService::new(CommandPipeline::new(PipelineConfig::default(), registry))
        .with_transcriber(Arc::new(StaticTranscriber::new("undo")));

    let result = service
        .process_audio(&[0x52, 0x49, 0x46, 0x46], request("", "s-audio", "global"))
        .await
        .unwrap();

    assert_eq!(result.status, CommandStatus::Success);
    assert_eq!(result.intent.unwrap().kind, IntentKind::Edit);
}

#[tokio::test]
async fn test_process_audio_without_transcriber_fails_distinctly() {
    let service = service();
    let err = service
        .process_audio(&[1, 2, 3], request("", "s-audio2", "global"))
        .await
        .unwrap_err();
    assert!(err.is_transcription_failed());
}
