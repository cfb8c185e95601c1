//! # Chirp Core
//!
//! Domain types, collaborator traits, and error definitions for the Chirp
//! prompt engine. This crate has **no engine logic**: it defines the model
//! that the memory, config, and prompt crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (memory graph, knowledge store, embedding
//! service, topic extractor, schedule, chat history, clock) is a trait here.
//! Implementations live in their respective crates. This enables:
//! - Swapping a local store for a remote one without touching retrieval
//! - Testing every stage with scripted stubs
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod memory;
pub mod schedule;
pub mod history;

// Re-export key types at crate root for ergonomics
pub use error::{Error, InitiativeError, MemoryError, Result};
pub use message::{GroupId, IncomingMessage};
pub use memory::{
    EmbeddingService, KnowledgeEntry, KnowledgeStore, MemoryGraph, MemoryNode, TopicExtractor,
    TopicSet,
};
pub use schedule::{Clock, ScheduleProvider, SystemClock};
pub use history::ChatHistoryProvider;
