//! Casual-vs-task pre-filter
//!
//! Decides whether a message is conversational chit-chat (no tool
//! invocation) or a task operation. The categories overlap, so the
//! rules are an ordered table and the order itself is part of the
//! contract: explicit task wording always wins, farewell always loses,
//! short vague messages default to casual, everything else defaults to
//! a task operation.
//!
//! The word lists below are calibration constants carried over for
//! behavioral compatibility; there is no tuning methodology behind
//! them.

/// Wording that unambiguously requests a task operation
const EXPLICIT_TASK_KEYWORDS: &[&str] = &[
    "add task",
    "create task",
    "new task",
    "make task",
    "delete task",
    "remove task",
    "update task",
    "change task",
    "modify task",
    "edit task",
    "list task",
    "show task",
    "view task",
    "my tasks",
    "get tasks",
    "mark task",
    "complete task",
];

const PURE_GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "yo",
    "sup",
    "wassup",
    "good morning",
    "good evening",
];

/// Past-tense personal-sharing phrases ("I bought groceries today")
const SHARING_PATTERNS: &[&str] = &[
    "i went",
    "i bought",
    "i did",
    "i had",
    "i saw",
    "i met",
    "today i",
    "yesterday i",
    "last night i",
    "just",
    "recently",
];

/// Words that turn a past-tense share into a completion request
const COMPLETION_WORDS: &[&str] = &["mark", "complete", "done", "finished"];

const GRATITUDE_WORDS: &[&str] = &["thank", "thanks", "appreciate"];

const FEELING_PATTERNS: &[&str] = &[
    "how are you",
    "what's up",
    "i feel",
    "i'm feeling",
    "feeling",
    "my day",
    "today was",
    "had a",
    "been",
    "tired",
    "exhausted",
    "stressed",
    "frustrated",
    "happy",
    "excited",
    "sad",
];

const META_QUESTIONS: &[&str] = &["who are you", "what are you", "what can you", "how do you"];

const FAREWELLS: &[&str] = &["bye", "goodbye", "see you", "good night"];

/// Messages at or below this word count with no task wording default
/// to casual
const SHORT_MESSAGE_WORD_LIMIT: usize = 5;

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// One classification rule: returns `Some(is_casual)` when decisive,
/// `None` to pass to the next rule
struct CasualRule {
    name: &'static str,
    check: fn(&str) -> Option<bool>,
}

fn explicit_task_keyword(msg: &str) -> Option<bool> {
    contains_any(msg, EXPLICIT_TASK_KEYWORDS).then_some(false)
}

fn mark_done(msg: &str) -> Option<bool> {
    (msg.contains("mark") && (msg.contains("done") || msg.contains("complete"))).then_some(false)
}

fn greeting(msg: &str) -> Option<bool> {
    (contains_any(msg, PURE_GREETINGS) && !msg.contains("task")).then_some(true)
}

fn personal_sharing(msg: &str) -> Option<bool> {
    (contains_any(msg, SHARING_PATTERNS)
        && !msg.contains("task")
        && !contains_any(msg, COMPLETION_WORDS))
    .then_some(true)
}

fn gratitude(msg: &str) -> Option<bool> {
    (contains_any(msg, GRATITUDE_WORDS) && !msg.contains("task")).then_some(true)
}

fn feelings(msg: &str) -> Option<bool> {
    (contains_any(msg, FEELING_PATTERNS) && !msg.contains("task")).then_some(true)
}

fn meta_question(msg: &str) -> Option<bool> {
    (contains_any(msg, META_QUESTIONS) && !msg.contains("task")).then_some(true)
}

fn farewell(msg: &str) -> Option<bool> {
    contains_any(msg, FAREWELLS).then_some(true)
}

fn short_and_vague(msg: &str) -> Option<bool> {
    (msg.split_whitespace().count() <= SHORT_MESSAGE_WORD_LIMIT && !msg.contains("task"))
        .then_some(true)
}

/// Ordered rule table. First decisive rule wins.
const CASUAL_RULES: &[CasualRule] = &[
    CasualRule {
        name: "explicit_task_keyword",
        check: explicit_task_keyword,
    },
    CasualRule {
        name: "mark_done",
        check: mark_done,
    },
    CasualRule {
        name: "greeting",
        check: greeting,
    },
    CasualRule {
        name: "personal_sharing",
        check: personal_sharing,
    },
    CasualRule {
        name: "gratitude",
        check: gratitude,
    },
    CasualRule {
        name: "feelings",
        check: feelings,
    },
    CasualRule {
        name: "meta_question",
        check: meta_question,
    },
    CasualRule {
        name: "farewell",
        check: farewell,
    },
    CasualRule {
        name: "short_and_vague",
        check: short_and_vague,
    },
];

/// True if the message is conversational chit-chat rather than a task
/// operation. Pure function over the lowercased, trimmed text.
pub fn classify_conversational(text: &str) -> bool {
    decide(text).1
}

/// Like [`classify_conversational`], but also names the deciding rule
/// so each rule can be tested in isolation
pub fn decide(text: &str) -> (&'static str, bool) {
    let lowered = text.to_lowercase();
    let msg = lowered.trim();
    for rule in CASUAL_RULES {
        if let Some(is_casual) = (rule.check)(msg) {
            return (rule.name, is_casual);
        }
    }
    // Ambiguous messages default to a task operation
    ("default_task", false)
}

/// Canned empathetic reply for a casual message
///
/// Decision table keyed by message category, evaluated in a fixed
/// order, falling back to a generic supportive reply.
pub fn casual_reply(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let msg = lowered.trim();

    if contains_any(
        msg,
        &["hi", "hello", "hey", "good morning", "good evening"],
    ) {
        return "Hey there! 💜 How can I help you today? Whether you need help with tasks or just want to chat, I'm here for you!";
    }
    if contains_any(msg, GRATITUDE_WORDS) {
        return "You're so welcome! I'm always here to help and support you. Keep crushing those goals! 💪✨";
    }
    if contains_any(msg, &["i bought", "i did", "i went", "i had", "i finished"]) {
        return "Nice! 🌟 Sounds like you've been productive! Want to add that to your task list to track it, or just sharing your day with me? Either way, I'm here! 💜";
    }
    if contains_any(
        msg,
        &["great", "awesome", "happy", "excited", "good day", "went well"],
    ) {
        return "That's wonderful! I'm so happy to hear that! 🌟 Keep up the amazing work! Is there anything you'd like to tackle while you're feeling great?";
    }
    if contains_any(
        msg,
        &[
            "tired",
            "exhausted",
            "stressed",
            "couldn't",
            "didn't",
            "wasn't able",
            "failed",
            "struggled",
            "hard",
            "difficult",
        ],
    ) {
        return "I hear you, and that sounds really tough. 💜 It's totally okay to have challenging days - you're doing your best, and that's what matters. Sometimes taking a small step or even just taking a break is the right move. Want to talk about it or focus on something manageable?";
    }
    if contains_any(
        msg,
        &["frustrated", "annoying", "ugh", "argh", "why is", "hate"],
    ) {
        return "I totally get it - that sounds frustrating! 😤 Sometimes things just don't go our way, and it's okay to feel that way. Want to break things down into smaller steps together, or just need a moment to vent? I'm here either way!";
    }
    if contains_any(
        msg,
        &[
            "who are you",
            "what are you",
            "what can you",
            "can you help",
            "what do you do",
        ],
    ) {
        return "I'm your personal task assistant and daily companion! 💜 I'm here to help you manage your tasks (add, complete, update, delete), but I'm also here to listen when you need to talk about your day, your feelings, or anything on your mind. Think of me as your friendly productivity buddy who actually cares! ✨";
    }

    "I'm here with you! 💜 Whether you want to work on tasks or just chat about how things are going, I'm all ears. What's on your mind?"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_keyword_overrides_everything() {
        // Casual-looking words elsewhere in the message must not win
        let (rule, casual) = decide("thanks, now add task buy milk");
        assert_eq!(rule, "explicit_task_keyword");
        assert!(!casual);

        let (rule, casual) = decide("hey, delete task 2 please");
        assert_eq!(rule, "explicit_task_keyword");
        assert!(!casual);
    }

    #[test]
    fn test_mark_done_is_a_task() {
        let (rule, casual) = decide("mark buy milk as done");
        assert_eq!(rule, "mark_done");
        assert!(!casual);
    }

    #[test]
    fn test_greeting_is_casual() {
        let (rule, casual) = decide("hello, how is it going with everything today");
        assert_eq!(rule, "greeting");
        assert!(casual);
    }

    #[test]
    fn test_greeting_with_task_word_falls_through() {
        assert!(!classify_conversational(
            "hello, please show all my tasks for this week"
        ));
    }

    #[test]
    fn test_personal_sharing_is_casual() {
        // Avoids greeting-substring collisions ("this" contains "hi")
        let (rule, casual) = decide("i went shopping for groceries and flowers yesterday afternoon");
        assert_eq!(rule, "personal_sharing");
        assert!(casual);
    }

    #[test]
    fn test_sharing_with_completion_word_is_task() {
        // "finished" turns a share into a completion request
        assert!(!classify_conversational(
            "i just finished the report, mark it off please"
        ));
    }

    #[test]
    fn test_gratitude_is_casual() {
        let (rule, casual) = decide("thanks a bunch, appreciate all of it truly");
        assert_eq!(rule, "gratitude");
        assert!(casual);
    }

    #[test]
    fn test_feelings_are_casual() {
        let (rule, casual) = decide("i feel really stressed about work at the moment");
        assert_eq!(rule, "feelings");
        assert!(casual);
    }

    #[test]
    fn test_meta_question_is_casual() {
        // Any "you" contains the greeting "yo", so the greeting rule
        // decides first; the outcome is casual either way.
        let (rule, casual) = decide("so tell me, what can you actually do around here");
        assert_eq!(rule, "greeting");
        assert!(casual);
    }

    #[test]
    fn test_farewell_is_casual_even_with_task_word() {
        // Farewell is unconditional
        let (rule, casual) = decide("goodbye, we will sort out that task tomorrow for certain");
        assert_eq!(rule, "farewell");
        assert!(casual);
    }

    #[test]
    fn test_short_vague_default() {
        let (rule, casual) = decide("hmm okay");
        assert_eq!(rule, "short_and_vague");
        assert!(casual);
    }

    #[test]
    fn test_ambiguous_defaults_to_task() {
        let (rule, casual) = decide("reorganize the garage shelves before winter arrives in town");
        assert_eq!(rule, "default_task");
        assert!(!casual);
    }

    #[test]
    fn test_reply_categories_are_ordered() {
        assert!(casual_reply("hello there").contains("Hey there"));
        assert!(casual_reply("thanks so much").contains("welcome"));
        assert!(casual_reply("i bought groceries").contains("productive"));
        assert!(casual_reply("feeling awesome").contains("wonderful"));
        assert!(casual_reply("so tired today").contains("tough"));
        assert!(casual_reply("ugh so annoying").contains("frustrating"));
        assert!(casual_reply("what can you do").contains("task assistant"));
        assert!(casual_reply("mm").contains("all ears"));
    }
}
