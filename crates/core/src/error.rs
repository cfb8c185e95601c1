//! Error types for the Chirp domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Only failures the caller must act on are errors. An empty topic set,
//! an unreachable embedding service, or a knowledge store with no match
//! degrade to an empty prompt clause and never surface here.

use thiserror::Error;

/// The top-level error type for all Chirp operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Memory / knowledge collaborators ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Initiative flow ---
    #[error("Initiative error: {0}")]
    Initiative(#[from] InitiativeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Chat history unavailable: {0}")]
    HistoryUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitiativeError {
    /// Too few memory nodes carry enough items to offer a topic choice.
    #[error(
        "Insufficient initiative candidates: {qualifying} node(s) qualify, {required} required"
    )]
    InsufficientCandidates { qualifying: usize, required: usize },
}
