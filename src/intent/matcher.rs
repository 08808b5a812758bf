//! Rule-based intent matching
//!
//! Five ordered pattern groups; the first group with any matching
//! pattern wins, otherwise UNKNOWN. Confidence is a static property of
//! the matched rule, not a computed probability - it is surfaced for
//! transparency and never gates downstream behavior.
//!
//! The patterns are intentionally permissive word-boundary fragments,
//! not grammars: they tolerate filler words like "high priority"
//! between verb and noun.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::types::Intent;

static CREATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(create|add|new)\s+(?:a\s+)?(?:\w+\s+)*task\b",
        r"\bremind\s+me\s+to\b",
        r"\b(make|add)\s+a\s+(?:new\s+)?(?:\w+\s+)?(task|todo|reminder)\b",
    ])
});

static LIST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(show|list|display|get|view)\s+(?:me\s+)?(?:my\s+)?(?:\w+\s+)*tasks?\b",
        r"\bwhat\s+(?:are\s+)?(?:my\s+)?tasks?\b(?:\s+\w+)*",
        r"\b(see|check)\s+(?:my\s+)?(?:\w+\s+)*tasks?\b",
    ])
});

static COMPLETE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(mark|set)\s+.*\s+as\s+(done|complete|finished)\b",
        r"\b(complete|finish|done)\s+",
        r"\bundo\s+(completion|complete)\b",
    ])
});

static UPDATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(change|update|modify|edit|rename)\s+.*\s+to\b",
        r"\bupdate\s+(task|the)\b",
        r"\brename\s+task\b",
    ])
});

static DELETE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(delete|remove|get\s+rid\s+of)\s+",
        r"\bdelete\s+.*\s+task\b",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid intent pattern"))
        .collect()
}

/// Fixed confidence per matched rule group
pub const CREATE_CONFIDENCE: f32 = 0.95;
pub const LIST_CONFIDENCE: f32 = 0.98;
pub const COMPLETE_CONFIDENCE: f32 = 0.92;
pub const UPDATE_CONFIDENCE: f32 = 0.89;
pub const DELETE_CONFIDENCE: f32 = 0.91;
pub const UNKNOWN_CONFIDENCE: f32 = 0.45;

/// Match a message against the ordered pattern groups
pub fn match_intent(message: &str) -> (Intent, f32) {
    let lowered = message.to_lowercase();
    let msg = lowered.trim();

    let groups: [(Intent, f32, &[Regex]); 5] = [
        (Intent::Create, CREATE_CONFIDENCE, &CREATE_PATTERNS),
        (Intent::List, LIST_CONFIDENCE, &LIST_PATTERNS),
        (Intent::Complete, COMPLETE_CONFIDENCE, &COMPLETE_PATTERNS),
        (Intent::Update, UPDATE_CONFIDENCE, &UPDATE_PATTERNS),
        (Intent::Delete, DELETE_CONFIDENCE, &DELETE_PATTERNS),
    ];

    for (intent, confidence, patterns) in groups {
        if patterns.iter().any(|p| p.is_match(msg)) {
            return (intent, confidence);
        }
    }
    (Intent::Unknown, UNKNOWN_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matches() {
        assert_eq!(
            match_intent("Create a task to buy milk"),
            (Intent::Create, 0.95)
        );
        assert_eq!(
            match_intent("add a high priority task call mom"),
            (Intent::Create, 0.95)
        );
        assert_eq!(
            match_intent("remind me to water the plants"),
            (Intent::Create, 0.95)
        );
        assert_eq!(match_intent("make a new todo"), (Intent::Create, 0.95));
    }

    #[test]
    fn test_list_matches() {
        assert_eq!(match_intent("Show me my tasks"), (Intent::List, 0.98));
        assert_eq!(
            match_intent("what are my tasks today"),
            (Intent::List, 0.98)
        );
        assert_eq!(
            match_intent("check my pending tasks"),
            (Intent::List, 0.98)
        );
    }

    #[test]
    fn test_complete_matches() {
        assert_eq!(
            match_intent("mark buy milk as done"),
            (Intent::Complete, 0.92)
        );
        assert_eq!(
            match_intent("finish the laundry run"),
            (Intent::Complete, 0.92)
        );
        assert_eq!(
            match_intent("undo completion of the essay"),
            (Intent::Complete, 0.92)
        );
    }

    #[test]
    fn test_update_matches() {
        assert_eq!(
            match_intent("rename buy milk to buy oat milk"),
            (Intent::Update, 0.89)
        );
        assert_eq!(match_intent("update the report"), (Intent::Update, 0.89));
    }

    #[test]
    fn test_delete_matches() {
        assert_eq!(
            match_intent("delete the groceries task"),
            (Intent::Delete, 0.91)
        );
        assert_eq!(
            match_intent("get rid of my old reminder"),
            (Intent::Delete, 0.91)
        );
    }

    #[test]
    fn test_group_order_is_significant() {
        // "add ... task" also contains "to"; CREATE wins because its
        // group is evaluated first
        assert_eq!(
            match_intent("add a task to change the tires"),
            (Intent::Create, 0.95)
        );
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(
            match_intent("how about that weather"),
            (Intent::Unknown, 0.45)
        );
    }
}
