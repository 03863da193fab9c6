//! Turn engine - intent routing and conversation orchestration
//!
//! This crate is the part of statusbot that reacts to a user message:
//! - **Intent Routing** (`router`) - one recognizer call per idle-turn
//!   utterance, seeding the slot-filling flow or reporting "not understood"
//! - **Sessions** (`session`) - per-conversation dialog state, keyed by the
//!   transport's conversation id
//! - **Runtime** (`runtime`) - resumes suspended dialogs, runs the search on
//!   confirmation, renders the report messages
//! - **Collaborators** (`recognizer`, `search`) - traits plus HTTP clients
//!   for the external language recognizer and execution index
//!
//! # Boundary principle
//!
//! The recognizer only labels utterances and extracts entity strings; every
//! flow decision (what to prompt, when to confirm, what to search) is made
//! deterministically by the dialog engine in `statusbot-core`.

pub mod recognizer;
pub mod router;
pub mod runtime;
pub mod search;
pub mod session;

pub use recognizer::{HttpRecognizer, Recognizer, StaticRecognizer, UnconfiguredRecognizer};
pub use router::{IntentRouter, RoutedTurn};
pub use runtime::AgentRuntime;
pub use search::{HttpSearchIndex, SearchIndex, StaticSearchIndex};
