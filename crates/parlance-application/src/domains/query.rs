//! Record lookup handler.

use super::{DomainHandler, HandlerError};
use async_trait::async_trait;
use parlance_core::intent::{Intent, IntentKind};
use parlance_core::result::DomainResult;
use parlance_core::session::CommandContext;
use serde_json::json;

/// Executes query intents against an in-memory record set.
///
/// The surveyed system resolves queries against its own storage; that
/// storage is out of scope here, so the handler is seeded with whatever
/// records the application wires in. An empty match is a normal result,
/// not a failure.
#[derive(Default)]
pub struct QueryHandler {
    records: Vec<String>,
}

impl QueryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the handler with searchable records.
    pub fn with_records(records: Vec<String>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DomainHandler for QueryHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Query
    }

    async fn handle(&self, intent: &Intent, _ctx: &CommandContext) -> Result<DomainResult, HandlerError> {
        let term = intent
            .parameter("term")
            .ok_or_else(|| HandlerError::Failed("missing search term".to_string()))?;
        let needle = term.to_lowercase();

        let matches: Vec<&str> = self
            .records
            .iter()
            .filter(|record| record.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect();

        let summary = if matches.is_empty() {
            format!("No records matched '{term}'")
        } else {
            format!("Found {} record(s) matching '{term}'", matches.len())
        };
        Ok(DomainResult::new(IntentKind::Query, summary)
            .with_data(json!({ "term": term, "matches": matches })))
    }
}
