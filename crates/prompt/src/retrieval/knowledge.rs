//! Knowledge lookup: embed the message, rank the store, join the winners.
//!
//! Any collaborator failure degrades to an empty result. The prompt build
//! never aborts because the embedding service or the store is unavailable.

use chirp_core::memory::{EmbeddingService, KnowledgeStore};
use chirp_memory::vector::{ScoredKnowledge, rank_by_similarity};
use tracing::{debug, warn};

/// Characters of the message echoed in the debug log.
const LOG_PREVIEW_CHARS: usize = 30;

pub struct KnowledgeRetriever<'a> {
    embedder: &'a dyn EmbeddingService,
    store: &'a dyn KnowledgeStore,
}

impl<'a> KnowledgeRetriever<'a> {
    pub fn new(embedder: &'a dyn EmbeddingService, store: &'a dyn KnowledgeStore) -> Self {
        Self { embedder, store }
    }

    /// Entries scoring at least `threshold`, best first, at most `limit`.
    pub async fn ranked(&self, text: &str, threshold: f32, limit: usize) -> Vec<ScoredKnowledge> {
        let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        debug!(
            preview = %preview,
            length = text.chars().count(),
            "Querying knowledge store"
        );

        let query = match self.embedder.embed(text).await {
            Ok(v) if !v.is_empty() => v,
            Ok(_) => {
                warn!(embedder = self.embedder.name(), "Embedding came back empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(embedder = self.embedder.name(), error = %e, "Embedding failed");
                return Vec::new();
            }
        };

        let entries = match self.store.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Knowledge store query failed");
                return Vec::new();
            }
        };

        let ranked = rank_by_similarity(&entries, &query, limit, threshold);
        debug!(
            candidates = entries.len(),
            matched = ranked.len(),
            top = ranked.first().map(|k| k.similarity),
            "Knowledge ranked"
        );
        ranked
    }

    /// Matched contents joined by newline, or the empty string.
    pub async fn retrieve(&self, text: &str, threshold: f32, limit: usize) -> String {
        self.ranked(text, threshold, limit)
            .await
            .into_iter()
            .map(|k| k.content)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
