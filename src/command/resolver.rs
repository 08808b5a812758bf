//! Task reference resolution
//!
//! Maps an extracted id or fuzzy title reference to a concrete stored
//! record. The resolver always re-fetches the owner's full task list
//! and never trusts a caller-supplied id without verification - this
//! is the single owner-isolation checkpoint of the pipeline.
//!
//! The title match is a containment/character-overlap heuristic, not a
//! string-edit-distance algorithm. Known precision limitation: short
//! needles sharing letters with long titles can score surprisingly
//! high, and transpositions are invisible to it.

use crate::store::{TaskFilter, TaskStore};

/// Resolves task references against one owner's task set
pub struct TaskResolver<'a> {
    store: &'a dyn TaskStore,
    /// Minimum similarity score; a calibration constant (0.70 by
    /// default), see `AgentConfig`
    threshold: f32,
}

impl<'a> TaskResolver<'a> {
    pub fn new(store: &'a dyn TaskStore, threshold: f32) -> Self {
        Self { store, threshold }
    }

    /// Resolve an id or title reference to a task id
    ///
    /// A supplied id is accepted only if present among the owner's own
    /// tasks. A title is fuzzy-matched; the highest-scoring candidate
    /// at or above the threshold wins, ties keeping the first-seen
    /// maximum. Anything else, including a store failure, is `None`.
    pub fn resolve(&self, owner: &str, task_id: Option<u64>, task_title: Option<&str>) -> Option<u64> {
        let tasks = self.store.list(owner, TaskFilter::default()).ok()?;

        if let Some(id) = task_id {
            return tasks.iter().any(|t| t.id == id).then_some(id);
        }

        let needle = task_title?.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<u64> = None;
        let mut best_score = 0.0_f32;
        for task in &tasks {
            let score = similarity(&needle, &task.title.to_lowercase());
            if score > best_score && score >= self.threshold {
                best_score = score;
                best = Some(task.id);
            }
        }
        best
    }
}

/// Containment-ratio similarity between a lowercased needle and
/// haystack
///
/// substring containment scores by length ratio; otherwise the score
/// is the fraction of needle characters (with multiplicity) that
/// appear anywhere in the haystack.
pub(crate) fn similarity(needle: &str, haystack: &str) -> f32 {
    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }
    let needle_len = needle.chars().count() as f32;
    let haystack_len = haystack.chars().count() as f32;

    if haystack.contains(needle) {
        needle_len / haystack_len
    } else if needle.contains(haystack) {
        haystack_len / needle_len
    } else {
        let common = needle.chars().filter(|&c| haystack.contains(c)).count() as f32;
        common / needle_len.max(haystack_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewTask};

    fn store_with(titles: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for title in titles {
            store
                .create(
                    "alice",
                    NewTask {
                        title: (*title).into(),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_exact_containment_scores_one() {
        assert!((similarity("buy groceries", "buy groceries") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_containment_ratio() {
        // needle 3 chars inside a 9-char haystack
        assert!((similarity("buy", "buy bread") - 3.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_ratio() {
        let score = similarity("abc", "xbcy");
        // 'b' and 'c' of 3 needle chars appear in the 4-char haystack
        assert!((score - 2.0 / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_bounds() {
        for (a, b) in [("a", "b"), ("task", "tasks"), ("xyz", "buy milk"), ("", "x")] {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "score {score} for {a:?}/{b:?}");
        }
    }

    #[test]
    fn test_resolve_case_insensitive_exact() {
        let store = store_with(&["Buy groceries"]);
        let resolver = TaskResolver::new(&store, 0.70);
        assert_eq!(resolver.resolve("alice", None, Some("buy groceries")), Some(1));
    }

    #[test]
    fn test_resolve_below_threshold() {
        let store = store_with(&["Buy groceries", "Call dentist"]);
        let resolver = TaskResolver::new(&store, 0.70);
        assert_eq!(resolver.resolve("alice", None, Some("xyz")), None);
    }

    #[test]
    fn test_resolve_keeps_first_seen_maximum() {
        let store = store_with(&["buy milk", "buy milk"]);
        let resolver = TaskResolver::new(&store, 0.70);
        assert_eq!(resolver.resolve("alice", None, Some("buy milk")), Some(1));
    }

    #[test]
    fn test_resolve_id_must_belong_to_owner() {
        let store = store_with(&["Buy groceries"]);
        let resolver = TaskResolver::new(&store, 0.70);
        assert_eq!(resolver.resolve("alice", Some(1), None), Some(1));
        assert_eq!(resolver.resolve("bob", Some(1), None), None);
        assert_eq!(resolver.resolve("alice", Some(99), None), None);
    }

    #[test]
    fn test_resolve_nothing_supplied() {
        let store = store_with(&["Buy groceries"]);
        let resolver = TaskResolver::new(&store, 0.70);
        assert_eq!(resolver.resolve("alice", None, None), None);
    }

    proptest::proptest! {
        #[test]
        fn similarity_stays_in_unit_interval(a in ".{0,40}", b in ".{0,40}") {
            let score = similarity(&a.to_lowercase(), &b.to_lowercase());
            proptest::prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_id_takes_precedence_over_title() {
        let store = store_with(&["Buy groceries", "Call dentist"]);
        let resolver = TaskResolver::new(&store, 0.70);
        // A wrong id is not rescued by a matching title
        assert_eq!(
            resolver.resolve("alice", Some(99), Some("buy groceries")),
            None
        );
    }
}
