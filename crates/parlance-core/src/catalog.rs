//! Canonical command catalog.
//!
//! The catalog is the single source of reference data for the pipeline: the
//! classifier scores utterances against it, the recovery engine fuzzy-matches
//! its phrases, and the help index projects its entries. It is initialized
//! once on first access and read-only thereafter.

use crate::intent::IntentKind;
use regex::Regex;
use std::sync::OnceLock;

/// The contexts a command applies to.
#[derive(Debug, Clone)]
pub enum ContextScope {
    /// Valid in every context.
    Global,
    /// Valid only in the listed context ids.
    Contexts(&'static [&'static str]),
}

impl ContextScope {
    /// Whether a command with this scope is usable from `context_id`.
    pub fn applies_to(&self, context_id: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Contexts(ids) => ids.contains(&context_id),
        }
    }

    /// Whether this scope is global.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

/// A named parameter a command accepts, for help rendering.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name as it appears in `Intent.parameters`
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Whether classification is penalized when the parameter is absent
    pub required: bool,
}

/// How a command extracts its free-text parameter from an utterance.
#[derive(Debug)]
pub struct CaptureSpec {
    /// Parameter name the capture fills
    pub parameter: &'static str,
    /// Pattern with exactly one capture group, applied to the expanded text
    pub regex: Regex,
    /// Whether the captured value must parse as a number
    pub numeric: bool,
}

/// A canonical command known to the pipeline.
#[derive(Debug)]
pub struct CommandSpec {
    /// Command domain this spec classifies into
    pub kind: IntentKind,
    /// Canonical phrase ("navigate to", "undo", ...)
    pub name: &'static str,
    /// Short title for help rendering
    pub title: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Content words that vote for this command during classification
    pub keywords: &'static [&'static str],
    /// Example utterances, also used as recovery match targets
    pub example_phrases: &'static [&'static str],
    /// Parameter descriptors for help rendering
    pub parameters: &'static [ParameterSpec],
    /// Parameters set unconditionally when this command matches
    pub fixed_parameters: &'static [(&'static str, &'static str)],
    /// Free-text parameter extraction, if the command takes one
    pub capture: Option<CaptureSpec>,
    /// Contexts this command is valid in
    pub contexts: ContextScope,
}

impl CommandSpec {
    /// All phrases recovery may fuzzy-match against for this command.
    pub fn phrases(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.example_phrases.iter().copied())
    }
}

/// Static storage for the catalog (initialized once).
static COMMAND_CATALOG: OnceLock<Vec<CommandSpec>> = OnceLock::new();

/// Returns the full command catalog.
///
/// Entries are initialized on first access and cached for the lifetime of the
/// process. Catalog order is the final classification tie-break, so entries
/// are listed most-specific first.
pub fn command_catalog() -> &'static [CommandSpec] {
    COMMAND_CATALOG.get_or_init(|| {
        vec![
            CommandSpec {
                kind: IntentKind::Navigation,
                name: "navigate to",
                title: "Navigate the map",
                description: "Pan the map to an address or named location",
                keywords: &["navigate", "go", "show", "open", "take", "view", "street", "address", "map"],
                example_phrases: &[
                    "navigate to 500 Oak Ave",
                    "show me 123 Main St",
                    "go to the parcel layer",
                ],
                parameters: &[ParameterSpec {
                    name: "address",
                    description: "Street address or location to navigate to",
                    required: false,
                }],
                fixed_parameters: &[],
                capture: Some(CaptureSpec {
                    parameter: "address",
                    regex: Regex::new(r"(\d+\s+\S[^,.!?]*)").expect("static pattern"),
                    numeric: false,
                }),
                contexts: ContextScope::Contexts(&["map"]),
            },
            CommandSpec {
                kind: IntentKind::Navigation,
                name: "zoom to",
                title: "Zoom the map",
                description: "Change the map zoom level",
                keywords: &["zoom", "level", "closer", "out"],
                example_phrases: &["zoom to level 5", "zoom out"],
                parameters: &[ParameterSpec {
                    name: "level",
                    description: "Numeric zoom level",
                    required: true,
                }],
                fixed_parameters: &[],
                capture: Some(CaptureSpec {
                    parameter: "level",
                    regex: Regex::new(r"(?i)zoom\s+(?:to\s+)?(?:level\s+)?([\w.-]+)")
                        .expect("static pattern"),
                    numeric: true,
                }),
                contexts: ContextScope::Contexts(&["map"]),
            },
            CommandSpec {
                kind: IntentKind::Query,
                name: "search for",
                title: "Search records",
                description: "Look up records matching a term",
                keywords: &["search", "find", "lookup", "query", "records", "list"],
                example_phrases: &["search for open permits", "find the Hansen workspace"],
                parameters: &[ParameterSpec {
                    name: "term",
                    description: "Search term",
                    required: true,
                }],
                fixed_parameters: &[],
                capture: Some(CaptureSpec {
                    parameter: "term",
                    regex: Regex::new(r"(?i)(?:search|find|look)(?:\s+up)?\s+(?:for\s+)?(.+)$")
                        .expect("static pattern"),
                    numeric: false,
                }),
                contexts: ContextScope::Global,
            },
            CommandSpec {
                kind: IntentKind::Edit,
                name: "undo",
                title: "Undo last change",
                description: "Revert the most recent edit",
                keywords: &["undo", "revert", "rollback"],
                example_phrases: &["undo that", "undo the last change"],
                parameters: &[],
                fixed_parameters: &[("operation", "undo")],
                capture: None,
                contexts: ContextScope::Global,
            },
            CommandSpec {
                kind: IntentKind::Edit,
                name: "redo",
                title: "Redo change",
                description: "Reapply the most recently reverted edit",
                keywords: &["redo", "reapply"],
                example_phrases: &["redo that"],
                parameters: &[],
                fixed_parameters: &[("operation", "redo")],
                capture: None,
                contexts: ContextScope::Global,
            },
            CommandSpec {
                kind: IntentKind::CodingAssist,
                name: "generate code",
                title: "Coding assistance",
                description: "Delegate a coding request to the AI provider",
                keywords: &["generate", "write", "code", "function", "refactor", "explain", "implement"],
                example_phrases: &[
                    "write a function that parses the import file",
                    "explain the selected code",
                ],
                parameters: &[ParameterSpec {
                    name: "request",
                    description: "What to generate or explain",
                    required: true,
                }],
                fixed_parameters: &[],
                capture: Some(CaptureSpec {
                    parameter: "request",
                    regex: Regex::new(
                        r"(?i)(?:generate|write|refactor|explain|implement)\s+(.+)$",
                    )
                    .expect("static pattern"),
                    numeric: false,
                }),
                contexts: ContextScope::Global,
            },
        ]
    })
}

/// Returns the catalog entries usable from `context_id`.
pub fn specs_for_context(context_id: &str) -> Vec<&'static CommandSpec> {
    command_catalog()
        .iter()
        .filter(|spec| spec.contexts.applies_to(context_id))
        .collect()
}

/// Finds a catalog entry by canonical name.
pub fn find_spec(name: &str) -> Option<&'static CommandSpec> {
    command_catalog().iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_initialized() {
        let catalog = command_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().any(|c| c.kind == IntentKind::Navigation));
        assert!(catalog.iter().any(|c| c.kind == IntentKind::Edit));
    }

    #[test]
    fn test_context_scoping() {
        let map_specs = specs_for_context("map");
        assert!(map_specs.iter().any(|s| s.name == "navigate to"));

        let global_specs = specs_for_context("global");
        assert!(global_specs.iter().all(|s| s.contexts.is_global()));
        assert!(!global_specs.is_empty());
    }

    #[test]
    fn test_find_spec() {
        assert!(find_spec("undo").is_some());
        assert!(find_spec("frobnicate").is_none());
    }

    #[test]
    fn test_capture_patterns_have_one_group() {
        for spec in command_catalog() {
            if let Some(capture) = &spec.capture {
                assert_eq!(
                    capture.regex.captures_len(),
                    2,
                    "capture for '{}' must have exactly one group",
                    spec.name
                );
            }
        }
    }
}
