//! Intent classification.
//!
//! Deterministic keyword-weight scoring against the command catalog. The
//! classifier never throws: extraction problems lower confidence so the
//! recovery engine can still attempt a partial match downstream.

use crate::catalog::{self, CommandSpec};
use crate::config::PipelineConfig;
use crate::intent::{Intent, IntentKind};
use crate::session::{Turn, TurnOutcome};
use crate::text;
use std::collections::HashMap;

const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Maps canonical text to a typed intent using the catalog and, for
/// reference resolution only, the session's recent turns.
pub struct IntentClassifier {
    config: PipelineConfig,
}

impl IntentClassifier {
    /// Creates a classifier with the given policy.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The confidence floor the orchestrator dispatches at.
    pub fn confidence_threshold(&self) -> f64 {
        self.config.confidence_threshold
    }

    /// Classifies `text` into an intent.
    ///
    /// `recent_turns` is read only for reference resolution: when the
    /// utterance points back at an earlier turn ("undo that"), specs matching
    /// the domain of the most recent successful turn win ties. Ties between
    /// equally confident specs otherwise prefer context-scoped entries over
    /// global ones, then catalog order.
    ///
    /// Always returns an intent; an unclassifiable utterance comes back with
    /// confidence 0 so the caller can route it into recovery.
    pub fn classify(&self, text: &str, recent_turns: &[Turn], context_id: &str) -> Intent {
        let tokens = text::tokenize(text);
        let prior_kind = if text::has_reference(&tokens) {
            last_dispatched_kind(recent_turns)
        } else {
            None
        };

        let mut best: Option<Candidate<'_>> = None;
        for spec in catalog::specs_for_context(context_id) {
            let (parameters, confidence) = self.score_spec(spec, text);
            let candidate = Candidate {
                spec,
                parameters,
                confidence,
                context_specific: !spec.contexts.is_global(),
                prior_match: prior_kind == Some(spec.kind),
            };
            if best.as_ref().is_none_or(|current| candidate.beats(current)) {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => {
                let mut intent = Intent::new(candidate.spec.kind, candidate.confidence);
                intent.parameters = candidate.parameters;
                intent
            }
            // Unreachable while the catalog has global entries; kept total.
            None => Intent::new(IntentKind::Query, 0.0),
        }
    }

    /// Scores one catalog entry against `text`.
    ///
    /// Confidence is the fraction of content tokens (parameter spans and
    /// stopwords removed) that are keywords of the spec, penalized when a
    /// required parameter is missing or a numeric parameter fails to parse.
    fn score_spec(&self, spec: &CommandSpec, text: &str) -> (HashMap<String, String>, f64) {
        let mut parameters: HashMap<String, String> = spec
            .fixed_parameters
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let mut penalty = 1.0;
        let mut remaining = text.to_string();

        if let Some(capture) = &spec.capture {
            match capture.regex.captures(text).and_then(|c| c.get(1)) {
                Some(group) => {
                    let value = group.as_str().trim();
                    if capture.numeric && value.parse::<f64>().is_err() {
                        penalty *= 0.5;
                    }
                    parameters.insert(capture.parameter.to_string(), value.to_string());
                    remaining = format!("{} {}", &text[..group.start()], &text[group.end()..]);
                }
                None => {
                    if spec.parameters.iter().any(|p| p.required) {
                        penalty *= 0.5;
                    }
                }
            }
        }

        let content = text::content_tokens(&remaining);
        if content.is_empty() {
            return (parameters, 0.0);
        }
        let hits = content
            .iter()
            .filter(|token| spec.keywords.contains(&token.as_str()))
            .count();
        let confidence = (hits as f64 / content.len() as f64) * penalty;
        (parameters, confidence)
    }
}

/// One scored catalog entry during classification.
struct Candidate<'a> {
    spec: &'a CommandSpec,
    parameters: HashMap<String, String>,
    confidence: f64,
    context_specific: bool,
    prior_match: bool,
}

impl Candidate<'_> {
    /// Strict-improvement comparator; earlier catalog entries win full ties.
    fn beats(&self, other: &Self) -> bool {
        if self.confidence > other.confidence + CONFIDENCE_EPSILON {
            return true;
        }
        if (self.confidence - other.confidence).abs() > CONFIDENCE_EPSILON {
            return false;
        }
        if self.context_specific != other.context_specific {
            return self.context_specific;
        }
        if self.prior_match != other.prior_match {
            return self.prior_match;
        }
        false
    }
}

/// Domain of the most recent turn that dispatched, for anaphora resolution.
fn last_dispatched_kind(recent_turns: &[Turn]) -> Option<IntentKind> {
    recent_turns
        .iter()
        .rev()
        .find(|turn| matches!(turn.outcome, TurnOutcome::Success | TurnOutcome::Recovered))
        .and_then(|turn| turn.resolved_intent.as_ref())
        .map(|intent| intent.kind)
}
