//! Memory traits — the associative concept graph and the knowledge store.
//!
//! Two read-only stores feed the prompt engine:
//! - A concept graph, queried by topic for memories one and two hops away
//! - A knowledge store of embedded passages, ranked by cosine similarity
//!
//! Both are owned outside the engine. The engine only ever reads them.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MemoryError;

/// Topic labels extracted from one message. Ordered so traversal is repeatable.
pub type TopicSet = BTreeSet<String>;

/// A concept node in the memory graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Concept label (unique key)
    pub concept: String,

    /// Memory items attached to this concept, in insertion order
    #[serde(default)]
    pub memory_items: Vec<String>,
}

impl MemoryNode {
    pub fn new(concept: impl Into<String>, memory_items: Vec<String>) -> Self {
        Self {
            concept: concept.into(),
            memory_items,
        }
    }
}

/// A passage in the knowledge store together with its stored embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// The passage text
    pub content: String,

    /// Stored embedding, same dimensionality as query embeddings
    pub embedding: Vec<f32>,
}

/// Read-only query interface over the concept graph.
pub trait MemoryGraph: Send + Sync {
    /// Memory items of nodes reachable from `topic`.
    ///
    /// Returns `(first_layer, second_layer)`: items of nodes exactly one hop
    /// away and items of nodes exactly two hops away. A node is reported only
    /// at its shortest hop. An unknown topic yields two empty lists.
    fn related_items(&self, topic: &str, depth: usize) -> (Vec<String>, Vec<String>);

    /// Every node in the graph.
    fn all_nodes(&self) -> Vec<MemoryNode>;
}

/// Extracts topic labels from message text.
pub trait TopicExtractor: Send + Sync {
    fn identify(&self, text: &str) -> TopicSet;
}

/// Turns text into an embedding vector.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// The service name (e.g., "openai", "none").
    fn name(&self) -> &str;

    /// Embed a single text. An empty vector is treated like a failure by callers.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, MemoryError>;
}

/// Holds embedded knowledge passages.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// The store name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Snapshot of every entry. Ranking happens on the caller's side.
    async fn entries(&self) -> std::result::Result<Vec<KnowledgeEntry>, MemoryError>;
}
