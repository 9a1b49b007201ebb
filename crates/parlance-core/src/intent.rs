//! Classified intent types.
//!
//! An [`Intent`] is the typed meaning of an utterance: a command domain plus
//! extracted parameters and a confidence score. Intents are produced by the
//! classifier (or the recovery engine) and consumed by the domain router;
//! they are immutable once produced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString};

/// The command domains the pipeline can dispatch to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Map/page navigation ("show me 123 Main St", "zoom to level 5")
    Navigation,
    /// Data lookup ("search for open permits")
    Query,
    /// Document/content editing ("undo that")
    Edit,
    /// Coding assistance delegated to the AI provider
    CodingAssist,
}

/// A classified, parameterized command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// The command domain this intent dispatches to
    pub kind: IntentKind,
    /// Extracted parameters, keyed by parameter name
    #[serde(default)]
    pub parameters: HashMap<String, String>,
    /// Classifier confidence, always within `[0, 1]`
    pub confidence: f64,
}

impl Intent {
    /// Creates a new intent with no parameters.
    ///
    /// Confidence is clamped into `[0, 1]`; a NaN score collapses to 0.
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            kind,
            parameters: HashMap::new(),
            confidence,
        }
    }

    /// Adds a parameter, builder-style.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Looks up a parameter value by name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}
