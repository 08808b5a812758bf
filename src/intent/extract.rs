//! Per-intent parameter extraction
//!
//! One pure routine per intent. Extraction is heuristic and total:
//! every field of the returned [`Parameters`] variant is always
//! present, `None` where the message gave no signal, and no routine
//! ever fails. Extracted values are advisory - the dispatcher
//! re-validates them before any store call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::AgentConfig;
use crate::core::types::{HistoryEntry, Intent, Parameters, Priority};
use crate::intent::context;

static REMIND_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"remind\s+me\s+to\s+(.+)").expect("valid remind title regex"));
static CREATE_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:create|add|new)\s+(?:a\s+)?task\s+(?:to\s+)?(.+)")
        .expect("valid create title regex")
});
static TRAILING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+$").expect("valid trailing punctuation regex"));
static HIGH_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bhigh\s+priority\b").expect("valid priority regex"));
static MEDIUM_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmedium\s+priority\b").expect("valid priority regex"));
static LOW_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blow\s+priority\b").expect("valid priority regex"));
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"with\s+(.+)").expect("valid description regex"));

static INCOMPLETE_FILTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(left|incomplete|not\s+done|pending)\b").expect("valid filter regex")
});
static COMPLETE_FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(completed|done|finished)\b").expect("valid filter regex"));

static TASK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"task\s+(\d+)").expect("valid task id regex"));
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("valid quoted title regex"));

static MARK_TASK_DONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bmark\s+(.+?)\s+task\s+(?:done|complete|finished)\b")
        .expect("valid mark-task regex")
});
static MARK_DONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bmark\s+(.+?)\s+(?:done|complete|finished)\b").expect("valid mark regex")
});
static MARK_AS_DONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bmark\s+(.+?)\s+as\s+(?:done|complete|finished)\b")
        .expect("valid mark-as regex")
});
static ACTIVITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bi\s+(?:prepared|finished|completed|did|studied)\s+(.+)")
        .expect("valid activity regex")
});
static ACTIVITY_STOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s*[,.!;]|\s+\bmark\b|\s+\bdone\b|\s+\bcomplete\b).*$")
        .expect("valid activity stop regex")
});
static PRONOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(it|that|this)(\s+task)?\b").expect("valid pronoun regex")
});

static QUOTED_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"]([^'"]+)['"]\s+to\s+['"]([^'"]+)['"]"#).expect("valid rename pair regex")
});
static UNQUOTED_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:change|update|rename)\s+(.+?)\s+to\s+(.+)").expect("valid rename regex")
});
static NEW_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"description\s+to\s+(.+)").expect("valid description regex"));

static DELETE_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:delete|remove)\s+(.+)$").expect("valid delete title regex"));

/// Extract the parameter set for a classified intent
pub fn extract(
    intent: Intent,
    message: &str,
    history: &[HistoryEntry],
    config: &AgentConfig,
) -> Parameters {
    match intent {
        Intent::Create => extract_create(message),
        Intent::List => extract_list(message),
        Intent::Complete => extract_complete(message, history, config),
        Intent::Update => extract_update(message),
        Intent::Delete => extract_delete(message),
        Intent::Unknown => Parameters::None,
    }
}

fn extract_priority(lower: &str) -> Option<Priority> {
    if HIGH_PRIORITY_RE.is_match(lower) {
        Some(Priority::High)
    } else if MEDIUM_PRIORITY_RE.is_match(lower) {
        Some(Priority::Medium)
    } else if LOW_PRIORITY_RE.is_match(lower) {
        Some(Priority::Low)
    } else {
        None
    }
}

fn extract_task_id(lower: &str) -> Option<u64> {
    TASK_ID_RE
        .captures(lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// CREATE: title after "remind me to" / "create|add|new task [to]",
/// falling back to the whole message
fn extract_create(message: &str) -> Parameters {
    let lower = message.to_lowercase();

    let title = if lower.contains("remind me to") {
        capture(&REMIND_TITLE_RE, &lower)
    } else if lower.contains("create") || lower.contains("add") {
        capture(&CREATE_TITLE_RE, &lower)
    } else {
        None
    };
    let title = match title {
        Some(t) => TRAILING_PUNCT_RE.replace(&t, "").trim().to_string(),
        None => message.trim().to_string(),
    };

    Parameters::Create {
        title,
        description: capture(&DESCRIPTION_RE, &lower),
        priority: extract_priority(&lower),
        // Temporal expressions are not parsed yet; reserved
        due_date: None,
    }
}

/// LIST: completion and priority filters
fn extract_list(message: &str) -> Parameters {
    let lower = message.to_lowercase();

    let completed = if INCOMPLETE_FILTER_RE.is_match(&lower) {
        Some(false)
    } else if COMPLETE_FILTER_RE.is_match(&lower) {
        Some(true)
    } else {
        None
    };

    Parameters::List {
        completed,
        priority: extract_priority(&lower),
    }
}

/// COMPLETE: task id, title reference chain, and the target flag
///
/// The title chain is ordered: quoted substring, "mark X task done",
/// "mark X done", "mark X as done", an activity phrase in the current
/// message, and finally a bare pronoun resolved against conversation
/// history.
fn extract_complete(message: &str, history: &[HistoryEntry], config: &AgentConfig) -> Parameters {
    let lower = message.to_lowercase();

    let task_title = complete_title(message, &lower)
        .or_else(|| pronoun_reference(&lower, history, config))
        .map(|t| clean_title(&t));

    Parameters::Complete {
        task_id: extract_task_id(&lower),
        task_title,
        // "undo" flips the target status back to not-done
        completed: !lower.contains("undo"),
    }
}

fn complete_title(message: &str, lower: &str) -> Option<String> {
    if let Some(title) = capture(&QUOTED_RE, message) {
        return Some(title);
    }
    // Bare pronouns are not titles; they fall through to the
    // history-based reference rule
    if let Some(title) = capture(&MARK_TASK_DONE_RE, lower).filter(|t| !is_pronoun(t)) {
        return Some(title);
    }
    if let Some(title) = capture(&MARK_DONE_RE, lower).filter(|t| !is_pronoun(t)) {
        // "mark X as done" belongs to the next rule
        if !title.ends_with(" as") && title != "as" {
            return Some(strip_suffix_word(&title, "task"));
        }
    }
    if let Some(title) = capture(&MARK_AS_DONE_RE, lower).filter(|t| !is_pronoun(t)) {
        return Some(title);
    }
    if let Some(activity) = capture(&ACTIVITY_RE, lower) {
        let trimmed = ACTIVITY_STOP_RE.replace(&activity, "").trim().to_string();
        if !trimmed.is_empty() {
            return Some(context::strip_temporal(&trimmed));
        }
    }
    None
}

fn pronoun_reference(
    lower: &str,
    history: &[HistoryEntry],
    config: &AgentConfig,
) -> Option<String> {
    if !PRONOUN_RE.is_match(lower) {
        return None;
    }
    context::resolve_reference(history, config)
}

fn is_pronoun(title: &str) -> bool {
    matches!(title, "it" | "that" | "this" | "this task")
}

fn strip_suffix_word(title: &str, word: &str) -> String {
    let suffix = format!(" {word}");
    title
        .strip_suffix(&suffix)
        .unwrap_or(title)
        .trim()
        .to_string()
}

/// Strip leading "my "/"the " and a trailing " task"
fn clean_title(title: &str) -> String {
    let mut t = title.trim();
    if let Some(rest) = t.strip_prefix("my ") {
        t = rest.trim();
    }
    if let Some(rest) = t.strip_prefix("the ") {
        t = rest.trim();
    }
    strip_suffix_word(t, "task")
}

/// UPDATE: quoted `'X' to 'Y'` pair preferred, unquoted
/// `change|update|rename X to Y` fallback; new description extracted
/// independently
fn extract_update(message: &str) -> Parameters {
    let lower = message.to_lowercase();

    let (task_title, new_title) = if let Some(caps) = QUOTED_PAIR_RE.captures(message) {
        (
            caps.get(1).map(|m| m.as_str().trim().to_string()),
            caps.get(2).map(|m| m.as_str().trim().to_string()),
        )
    } else if let Some(caps) = UNQUOTED_PAIR_RE.captures(&lower) {
        (
            caps.get(1).map(|m| m.as_str().trim().to_string()),
            caps.get(2).map(|m| m.as_str().trim().to_string()),
        )
    } else {
        (None, None)
    };

    Parameters::Update {
        task_id: extract_task_id(&lower),
        task_title,
        new_title,
        new_description: capture(&NEW_DESCRIPTION_RE, &lower),
    }
}

/// DELETE: quoted title, or text after "delete|remove" with leading
/// "the "/"task " tokens stripped until neither remains
fn extract_delete(message: &str) -> Parameters {
    let lower = message.to_lowercase();

    let task_title = capture(&QUOTED_RE, message).or_else(|| {
        capture(&DELETE_TITLE_RE, &lower).map(|mut title| {
            loop {
                if let Some(rest) = title.strip_prefix("the ") {
                    title = rest.trim().to_string();
                } else if let Some(rest) = title.strip_prefix("task ") {
                    title = rest.trim().to_string();
                } else {
                    break;
                }
            }
            title
        })
    });

    Parameters::Delete {
        task_id: extract_task_id(&lower),
        task_title,
    }
}
