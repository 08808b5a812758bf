//! Agent configuration with documented constants
//!
//! The calibration values here (fuzzy threshold, history window sizes)
//! are hardcoded heuristics carried over for behavioral compatibility.
//! There is no documented tuning methodology behind them; treat them as
//! calibration constants that may need revisiting.

use serde::Deserialize;

use crate::core::error::{Result, TaskmateError};

/// Configuration for the message-processing pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Minimum similarity score for a fuzzy title match
    ///
    /// A candidate task is only accepted if its containment/overlap
    /// score reaches this threshold. 0.70 is strict: "buy groceries"
    /// matches "Buy groceries" (1.0) but not "buy a birthday present"
    /// (overlap well below threshold).
    pub fuzzy_match_threshold: f32,

    /// How many trailing conversation turns are considered for
    /// pronoun/reference resolution
    ///
    /// Only the most recent entries matter; older turns are noise for
    /// "mark it done" style references.
    pub history_window: usize,

    /// How many distinct user turns survive deduplication inside the
    /// window
    ///
    /// Three turns is enough to catch "I prepared slides" ... "mark it
    /// done" exchanges without scanning the whole conversation.
    pub history_user_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: 0.70,
            history_window: 6,
            history_user_turns: 3,
        }
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file, falling back to defaults
    /// for any missing field
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| TaskmateError::Config(e.to_string()))
    }
}
