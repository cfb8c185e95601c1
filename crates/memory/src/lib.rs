//! Memory, knowledge, and context collaborators for Chirp.
//!
//! Local implementations of the traits in `chirp-core`: the concept graph,
//! the knowledge store with exact similarity ranking, topic extraction,
//! the daily schedule, group chat history, and embedding clients.

pub mod embedding;
pub mod graph;
pub mod history;
pub mod knowledge;
pub mod schedule;
pub mod topics;
pub mod vector;

pub use embedding::{NoopEmbedder, OpenAiEmbedder};
pub use graph::{GraphSnapshot, InMemoryGraph};
pub use history::{HistoryLine, InMemoryChatHistory};
pub use knowledge::InMemoryKnowledgeStore;
pub use schedule::StaticSchedule;
pub use topics::KeywordTopicExtractor;
pub use vector::{cosine_similarity, rank_by_similarity, ScoredKnowledge};
