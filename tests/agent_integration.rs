//! End-to-end agent pipeline tests
//!
//! Drives whole conversational turns through classification, dispatch,
//! and formatting against an in-memory store, including a spy store
//! that counts mutations to prove failed turns leave the data alone.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Runtime;

use taskmate::agent::{Agent, AgentResponse};
use taskmate::core::config::AgentConfig;
use taskmate::core::types::Task;
use taskmate::store::{
    MemoryStore, NewTask, StoreError, TaskChanges, TaskFilter, TaskStore,
};

/// Wraps a MemoryStore and counts mutating calls. Reads pass through
/// uncounted because the resolver legitimately lists tasks.
struct SpyStore {
    inner: MemoryStore,
    mutations: AtomicUsize,
}

impl SpyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            mutations: AtomicUsize::new(0),
        }
    }

    fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

impl TaskStore for SpyStore {
    fn create(&self, owner: &str, task: NewTask) -> Result<Task, StoreError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.create(owner, task)
    }

    fn list(&self, owner: &str, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        self.inner.list(owner, filter)
    }

    fn set_completed(&self, owner: &str, id: u64, completed: bool) -> Result<Task, StoreError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.set_completed(owner, id, completed)
    }

    fn update(&self, owner: &str, id: u64, changes: TaskChanges) -> Result<Task, StoreError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.update(owner, id, changes)
    }

    fn delete(&self, owner: &str, id: u64) -> Result<Task, StoreError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(owner, id)
    }
}

fn turn(agent: &Agent, rt: &Runtime, owner: &str, message: &str) -> AgentResponse {
    rt.block_on(agent.process(owner, message, &[]))
}

#[test]
fn test_create_then_list_round_trip() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    let created = turn(&agent, &rt, "alice", "create a task to water the plants");
    assert_eq!(created.response, "Task created: water the plants");

    let listed = turn(&agent, &rt, "alice", "show my tasks");
    // Fresh tasks list as incomplete (no checkmark)
    assert_eq!(listed.response, "You have 1 task: 1) water the plants");
    assert_eq!(listed.metadata.tool_called.as_deref(), Some("list_tasks"));
}

#[test]
fn test_complete_shows_checkmark() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    turn(&agent, &rt, "alice", "create a task to water the plants");
    let done = turn(&agent, &rt, "alice", "mark water the plants as done");
    assert_eq!(done.response, "Marked 'water the plants' as done");

    let listed = turn(&agent, &rt, "alice", "show my tasks");
    assert_eq!(listed.response, "You have 1 task: 1) ✓water the plants");
}

#[test]
fn test_explicit_keyword_beats_casual_wording() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    // Starts like gratitude chit-chat but names a task operation
    let response = turn(&agent, &rt, "alice", "thanks! now show my tasks please");
    assert_eq!(response.metadata.intent, "LIST");
    assert_eq!(response.response, "You have no tasks");
}

#[test]
fn test_greeting_never_touches_the_store() {
    let rt = Runtime::new().unwrap();
    let spy = Arc::new(SpyStore::new());
    let agent = Agent::new(spy.clone(), AgentConfig::default());

    let response = turn(&agent, &rt, "alice", "hello");
    assert_eq!(response.metadata.intent, "CASUAL_CONVERSATION");
    assert!(response.metadata.tool_called.is_none());
    assert_eq!(spy.mutation_count(), 0);
}

#[test]
fn test_cross_owner_delete_is_refused() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    turn(&agent, &rt, "alice", "create a task to water the plants");
    let response = turn(&agent, &rt, "bob", "delete task 1");
    assert_eq!(
        response.response,
        "I couldn't find that task. Try listing your tasks first."
    );

    // Alice still sees her task
    let listed = turn(&agent, &rt, "alice", "show my tasks");
    assert_eq!(listed.response, "You have 1 task: 1) water the plants");
}

#[test]
fn test_update_without_fields_mutates_nothing() {
    let rt = Runtime::new().unwrap();
    let spy = Arc::new(SpyStore::new());
    let agent = Agent::new(spy.clone(), AgentConfig::default());

    turn(&agent, &rt, "alice", "create a task to water the plants");
    let before = spy.mutation_count();

    // Matches the update pattern but supplies neither field
    let response = turn(&agent, &rt, "alice", "update task 1");
    assert!(response.response.starts_with("Invalid input:"));
    assert_eq!(spy.mutation_count(), before);
}

#[test]
fn test_rename_via_quoted_titles() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    turn(&agent, &rt, "alice", "create a task to buy milk today");
    let response = turn(
        &agent,
        &rt,
        "alice",
        "change 'buy milk today' to 'buy oat milk today'",
    );
    assert_eq!(
        response.response,
        "Updated 'buy milk today' to 'buy oat milk today'"
    );
}

#[test]
fn test_unknown_gives_fixed_guidance() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    let first = turn(
        &agent,
        &rt,
        "alice",
        "weather forecast for the task tomorrow please",
    );
    let second = turn(
        &agent,
        &rt,
        "alice",
        "weather forecast for the task tomorrow please",
    );
    assert_eq!(
        first.response,
        "I can only help with task management. Try 'create a task' or 'show my tasks'."
    );
    // Same input, same reply
    assert_eq!(first.response, second.response);
}

#[test]
fn test_fuzzy_title_reaches_the_right_task() {
    let rt = Runtime::new().unwrap();
    let agent = Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default());

    turn(&agent, &rt, "alice", "create a task to call the dentist office");
    turn(&agent, &rt, "alice", "create a task to water the plants");

    let response = turn(&agent, &rt, "alice", "delete the water the plants task");
    assert_eq!(response.response, "Deleted task 'water the plants'");

    let listed = turn(&agent, &rt, "alice", "show my tasks");
    assert_eq!(
        listed.response,
        "You have 1 task: 1) call the dentist office"
    );
}
