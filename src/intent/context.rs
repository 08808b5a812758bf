//! Conversation-history reference resolution
//!
//! When a completion message only says "mark it done", the task title
//! has to come from what the user talked about recently. This is a
//! heuristic context lookup, not coreference resolution: we scan the
//! most recent user turns for a past-tense activity phrase and treat
//! its object as the title fragment. The seam is deliberately narrow
//! ([`resolve_reference`]) so a better algorithm can replace it without
//! touching the extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::AgentConfig;
use crate::core::types::{HistoryEntry, Role};

static DID_ACTIVITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bi\s+(?:did|bought|finished|completed|prepared|studied)\s+(.+)")
        .expect("valid did-activity regex")
});
static WENT_ACTIVITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bi\s+(?:went|had)\s+(.+)").expect("valid went-activity regex"));
static JUST_ACTIVITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bjust\s+(?:did|finished|completed)\s+(.+)").expect("valid just-activity regex")
});
static SENTENCE_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,.!;].*$").expect("valid sentence tail regex"));

/// Trailing words that locate an activity in time but are never part
/// of a task title
const TEMPORAL_SUFFIXES: &[&str] = &["just now", "today", "yesterday", "earlier"];

/// Most-recent-first window over prior user turns
///
/// Takes the last `history_window` entries, keeps user turns only, and
/// deduplicates down to the last `history_user_turns` distinct
/// contents.
pub struct ContextWindow {
    turns: Vec<String>,
}

impl ContextWindow {
    pub fn new(history: &[HistoryEntry], config: &AgentConfig) -> Self {
        let mut turns: Vec<String> = Vec::new();
        for entry in history.iter().rev().take(config.history_window) {
            if entry.role != Role::User {
                continue;
            }
            let content = entry.content.trim().to_lowercase();
            if content.is_empty() || turns.contains(&content) {
                continue;
            }
            turns.push(content);
            if turns.len() == config.history_user_turns {
                break;
            }
        }
        Self { turns }
    }

    /// Prior user turns, most recent first
    pub fn user_turns(&self) -> &[String] {
        &self.turns
    }
}

/// Resolve a pronoun reference ("it", "that") to a title fragment from
/// recent conversation history. Returns `None` when no recent turn
/// mentions an activity.
pub fn resolve_reference(history: &[HistoryEntry], config: &AgentConfig) -> Option<String> {
    let window = ContextWindow::new(history, config);
    for turn in window.user_turns() {
        if let Some(activity) = activity_phrase(turn) {
            return Some(activity);
        }
    }
    None
}

fn activity_phrase(turn: &str) -> Option<String> {
    for re in [&*DID_ACTIVITY_RE, &*WENT_ACTIVITY_RE, &*JUST_ACTIVITY_RE] {
        if let Some(caps) = re.captures(turn) {
            if let Some(m) = caps.get(1) {
                let fragment = SENTENCE_TAIL_RE.replace(m.as_str(), "");
                let fragment = strip_temporal(fragment.trim());
                if !fragment.is_empty() {
                    return Some(fragment);
                }
            }
        }
    }
    None
}

/// Strip trailing temporal words ("today", "yesterday", "just now",
/// "earlier") and any punctuation left behind
pub fn strip_temporal(text: &str) -> String {
    let mut t = text.trim().trim_end_matches(['.', '!', '?', ',']).trim();
    loop {
        let mut changed = false;
        for suffix in TEMPORAL_SUFFIXES {
            if let Some(rest) = t.strip_suffix(suffix) {
                t = rest.trim().trim_end_matches(['.', '!', '?', ',']).trim();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    t.to_string()
}
