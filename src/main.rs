//! Taskmate - Entry Point
//!
//! Interactive REPL for the task assistant. Sets up logging and the
//! async runtime, wires the in-memory store into the agent, and feeds
//! each line of input through the full pipeline with a rolling
//! conversation history.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;
use uuid::Uuid;

use taskmate::agent::Agent;
use taskmate::core::config::AgentConfig;
use taskmate::core::error::Result;
use taskmate::core::types::HistoryEntry;
use taskmate::intent::LlmClient;
use taskmate::store::MemoryStore;

#[derive(Parser, Debug)]
#[command(name = "taskmate", about = "Natural language task assistant")]
struct Args {
    /// Owner id used for all tasks in this session
    #[arg(long, default_value = "local")]
    owner: String,

    /// Optional TOML config overriding the agent calibration constants
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmate=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };

    // Runtime for the LLM fallback calls
    let rt = Runtime::new()?;

    let store = Arc::new(MemoryStore::new());
    let mut agent = Agent::new(store, config);

    match LlmClient::from_env() {
        Ok(llm) => agent = agent.with_llm(llm),
        Err(_) => {
            tracing::warn!("LLM_API_KEY not set - running with rule-based classification only");
        }
    }

    println!("\n=== TASKMATE ===");
    println!("Tell me what to do in plain English.");
    println!();
    println!("Examples:");
    println!("  create a task to buy milk");
    println!("  show my tasks");
    println!("  mark buy milk as done");
    println!("  quit / exit    - leave");
    println!();

    let conversation_id = Uuid::new_v4();
    let mut history: Vec<HistoryEntry> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        let response = rt.block_on(agent.process_with_conversation(
            &args.owner,
            input,
            &history,
            conversation_id,
        ));

        println!("{}", response.response);
        tracing::debug!(
            intent = %response.metadata.intent,
            tool = ?response.metadata.tool_called,
            ms = response.metadata.execution_time_ms,
            "turn complete"
        );

        history.push(HistoryEntry::user(input));
        history.push(HistoryEntry::assistant(response.response.as_str()));
    }

    println!("Goodbye!");
    Ok(())
}
