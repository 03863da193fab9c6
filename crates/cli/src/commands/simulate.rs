use std::io::{self, BufRead, Write};
use std::sync::Arc;

use statusbot_agent::recognizer::UnconfiguredRecognizer;
use statusbot_agent::search::StaticSearchIndex;
use statusbot_agent::AgentRuntime;
use statusbot_core::ExecutionRecord;
use uuid::Uuid;

use super::CommandResult;

const CONVERSATION_ID: &str = "console";

/// Drive the full slot-filling flow on stdin/stdout with an unconfigured
/// recognizer and a seeded in-memory execution index. No external services
/// are contacted.
pub fn run() -> CommandResult {
    let runtime = AgentRuntime::new(
        Arc::new(UnconfiguredRecognizer),
        Arc::new(StaticSearchIndex::new(demo_records())),
    );

    let async_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(async_runtime) => async_runtime,
        Err(error) => {
            return CommandResult {
                exit_code: 1,
                output: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    for message in runtime.greeting() {
        println!("bot: {message}");
    }
    println!("(type `quit` to end the simulation)");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                return CommandResult {
                    exit_code: 1,
                    output: format!("failed to read console input: {error}"),
                };
            }
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "quit" | "exit") {
            break;
        }

        let correlation_id = Uuid::new_v4().to_string();
        let turn =
            async_runtime.block_on(runtime.handle_message(CONVERSATION_ID, text, &correlation_id));
        match turn {
            Ok(replies) => {
                for reply in replies {
                    println!("bot: {reply}");
                }
            }
            Err(error) => println!("bot: (turn failed: {error})"),
        }
        let _ = io::stdout().flush();
    }

    CommandResult { exit_code: 0, output: "simulation ended".to_string() }
}

fn demo_records() -> Vec<ExecutionRecord> {
    let record = |description: &str, status: &str| ExecutionRecord {
        suite_description: Some(description.to_string()),
        executions_status: Some(status.to_string()),
    };

    vec![
        record("Login regression suite", "Pass"),
        record("Checkout smoke suite", "Pass"),
        record("Search indexing suite", "Fail"),
    ]
}
