//! Error recovery.
//!
//! When classification or dispatch fails, the recovery engine makes two
//! bounded attempts before the pipeline falls back to contextual help:
//! a normalized edit-distance match against the catalog's canonical phrases,
//! then a repeat of the most recent successful intent for "do that again"
//! style utterances. Recovery is a pure function of its inputs.

use crate::catalog::{self, CommandSpec};
use crate::config::PipelineConfig;
use crate::intent::Intent;
use crate::session::{Turn, TurnOutcome};
use crate::text;

/// Words that ask for the previous command to run again.
const REPEAT_MARKERS: &[&str] = &["again", "repeat"];

/// Best-effort correction of an unclassifiable command.
pub struct RecoveryEngine {
    config: PipelineConfig,
}

impl RecoveryEngine {
    /// Creates a recovery engine with the given policy.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Attempts to recover an intent from `raw_text`.
    ///
    /// Strategies, in order:
    ///
    /// 1. Closest catalog phrase within the context's applicable set, accepted
    ///    only when the normalized edit distance (distance divided by the
    ///    longer length) stays within the configured ratio.
    /// 2. Repeat of the most recent successful intent when the utterance
    ///    carries a repeat marker or overlaps heavily with that turn's text.
    ///
    /// Returns `None` when neither strategy applies. Identical inputs always
    /// yield identical output.
    pub fn recover(&self, raw_text: &str, recent_turns: &[Turn], context_id: &str) -> Option<Intent> {
        if let Some(intent) = self.closest_phrase(raw_text, context_id) {
            tracing::debug!(kind = %intent.kind, "recovered via phrase match");
            return Some(intent);
        }
        if let Some(intent) = self.repeat_last(raw_text, recent_turns) {
            tracing::debug!(kind = %intent.kind, "recovered via repeat of last intent");
            return Some(intent);
        }
        None
    }

    /// Strategy 1: normalized edit distance against catalog phrases.
    fn closest_phrase(&self, raw_text: &str, context_id: &str) -> Option<Intent> {
        let normalized = text::normalize_phrase(raw_text);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(&'static CommandSpec, f64)> = None;
        for spec in catalog::specs_for_context(context_id) {
            for phrase in spec.phrases() {
                let target = text::normalize_phrase(phrase);
                let longer = normalized.chars().count().max(target.chars().count());
                if longer == 0 {
                    continue;
                }
                let ratio = strsim::damerau_levenshtein(&normalized, &target) as f64 / longer as f64;
                if best.is_none_or(|(_, current)| ratio < current) {
                    best = Some((spec, ratio));
                }
            }
        }

        let (spec, ratio) = best?;
        if ratio > self.config.max_edit_distance_ratio {
            return None;
        }

        let mut intent = Intent::new(spec.kind, 1.0 - ratio);
        for (name, value) in spec.fixed_parameters {
            intent.parameters.insert(name.to_string(), value.to_string());
        }
        if let Some(capture) = &spec.capture {
            if let Some(group) = capture.regex.captures(raw_text).and_then(|c| c.get(1)) {
                intent
                    .parameters
                    .insert(capture.parameter.to_string(), group.as_str().trim().to_string());
            }
        }
        Some(intent)
    }

    /// Strategy 2: repeat the most recent successful intent.
    fn repeat_last(&self, raw_text: &str, recent_turns: &[Turn]) -> Option<Intent> {
        let prior = recent_turns
            .iter()
            .rev()
            .find(|turn| matches!(turn.outcome, TurnOutcome::Success | TurnOutcome::Recovered))?;
        let intent = prior.resolved_intent.as_ref()?;

        let tokens = text::tokenize(raw_text);
        if tokens.is_empty() {
            return None;
        }
        if tokens.iter().any(|t| REPEAT_MARKERS.contains(&t.as_str())) {
            return Some(intent.clone());
        }

        let prior_tokens = text::tokenize(&prior.raw_text);
        let overlap = tokens
            .iter()
            .filter(|token| prior_tokens.contains(token))
            .count();
        let ratio = overlap as f64 / tokens.len() as f64;
        (ratio >= self.config.repeat_overlap_threshold).then(|| intent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentKind;

    fn engine() -> RecoveryEngine {
        RecoveryEngine::new(PipelineConfig::default())
    }

    fn prior_turn(raw: &str, kind: IntentKind) -> Turn {
        Turn::new(
            raw,
            Some(Intent::new(kind, 0.9).with_parameter("operation", "undo")),
            TurnOutcome::Success,
        )
    }

    #[test]
    fn test_recovers_close_phrase() {
        // One transposition away from the canonical "undo".
        let intent = engine().recover("unod", &[], "global").unwrap();
        assert_eq!(intent.kind, IntentKind::Edit);
        assert_eq!(intent.parameter("operation"), Some("undo"));
    }

    #[test]
    fn test_recovers_example_phrase_with_parameters() {
        let intent = engine()
            .recover("navigate to 500 Oak Ave", &[], "map")
            .unwrap();
        assert_eq!(intent.kind, IntentKind::Navigation);
        assert_eq!(intent.parameter("address"), Some("500 Oak Ave"));
    }

    #[test]
    fn test_rejects_distant_text() {
        assert!(engine().recover("frobnicate the thing", &[], "global").is_none());
    }

    #[test]
    fn test_repeat_marker_replays_last_intent() {
        let turns = vec![prior_turn("undo the last change", IntentKind::Edit)];
        let intent = engine().recover("do that again", &turns, "global").unwrap();
        assert_eq!(intent.kind, IntentKind::Edit);
        assert_eq!(intent.parameter("operation"), Some("undo"));
    }

    #[test]
    fn test_token_overlap_replays_last_intent() {
        let turns = vec![prior_turn("undo the last change", IntentKind::Edit)];
        // "the last change" shares three of four tokens with the prior turn
        // without carrying an explicit repeat marker.
        let intent = engine().recover("the last change", &turns, "global").unwrap();
        assert_eq!(intent.kind, IntentKind::Edit);
    }

    #[test]
    fn test_no_repeat_without_history() {
        assert!(engine().recover("do that again", &[], "global").is_none());
    }

    #[test]
    fn test_recover_is_deterministic() {
        let turns = vec![prior_turn("undo the last change", IntentKind::Edit)];
        for input in ["unod", "do that again", "frobnicate the thing", "navigate to 500 Oak Ave"] {
            let first = engine().recover(input, &turns, "map");
            for _ in 0..3 {
                assert_eq!(engine().recover(input, &turns, "map"), first, "{input}");
            }
        }
    }
}
