//! Contextual help index.
//!
//! Projects the command catalog into client-facing [`HelpEntry`] values,
//! filtered by context. Used both as the unresolved-command fallback and for
//! the "available commands" query.

use crate::catalog::{self, CommandSpec};
use crate::intent::IntentKind;
use serde::{Deserialize, Serialize};

/// A named parameter descriptor for help rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// One command's help card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpEntry {
    /// Command domain
    pub command_type: IntentKind,
    /// Short title
    pub title: String,
    /// Human-readable description
    pub description: String,
    /// Example utterances, in catalog order
    pub examples: Vec<String>,
    /// Accepted parameters
    pub parameters: Vec<HelpParameter>,
}

impl From<&CommandSpec> for HelpEntry {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            command_type: spec.kind,
            title: spec.title.to_string(),
            description: spec.description.to_string(),
            examples: spec.example_phrases.iter().map(|s| s.to_string()).collect(),
            parameters: spec
                .parameters
                .iter()
                .map(|p| HelpParameter {
                    name: p.name.to_string(),
                    description: p.description.to_string(),
                    required: p.required,
                })
                .collect(),
        }
    }
}

/// Returns the help entries valid in `context_id`.
///
/// Context-scoped entries matching `context_id` are always included; global
/// entries only when `include_global` is set. Ordering is stable (command
/// type, then title) for deterministic client rendering.
pub fn help_for_context(context_id: &str, include_global: bool) -> Vec<HelpEntry> {
    let mut entries: Vec<HelpEntry> = catalog::command_catalog()
        .iter()
        .filter(|spec| {
            if spec.contexts.is_global() {
                include_global
            } else {
                spec.contexts.applies_to(context_id)
            }
        })
        .map(HelpEntry::from)
        .collect();
    entries.sort_by(|a, b| {
        a.command_type
            .to_string()
            .cmp(&b.command_type.to_string())
            .then_with(|| a.title.cmp(&b.title))
    });
    entries
}
