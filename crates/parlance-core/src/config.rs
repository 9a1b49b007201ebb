//! Pipeline policy configuration.
//!
//! The thresholds here are deliberate policy choices rather than tunables
//! inferred from request traffic; see DESIGN.md for the rationale behind
//! each value.

use serde::{Deserialize, Serialize};

/// Policy constants governing the command pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum classifier confidence required to dispatch an intent.
    pub confidence_threshold: f64,
    /// Maximum normalized edit distance (distance / longer phrase length)
    /// the recovery engine accepts as a phrase match.
    pub max_edit_distance_ratio: f64,
    /// Minimum token-overlap ratio for the repeat-last-intent recovery
    /// strategy ("do that again").
    pub repeat_overlap_threshold: f64,
    /// Seconds of inactivity after which a session is evicted.
    pub idle_eviction_secs: u64,
    /// Seconds between eviction sweeps.
    pub sweep_interval_secs: u64,
    /// Retention window: maximum turns kept per session.
    pub max_turns: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.55,
            max_edit_distance_ratio: 0.34,
            repeat_overlap_threshold: 0.5,
            idle_eviction_secs: 30 * 60,
            sweep_interval_secs: 60,
            max_turns: 50,
        }
    }
}
