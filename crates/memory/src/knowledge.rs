//! In-memory knowledge store — embedded passages kept in a Vec.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chirp_core::error::MemoryError;
use chirp_core::memory::{KnowledgeEntry, KnowledgeStore};
use tokio::sync::RwLock;
use tracing::debug;

/// A knowledge store holding every passage in memory.
pub struct InMemoryKnowledgeStore {
    entries: Arc<RwLock<Vec<KnowledgeEntry>>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Load passages from a JSON array on disk. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        if !path.exists() {
            debug!("No knowledge file at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&content)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        Ok(Self::with_entries(entries))
    }

    pub async fn insert(&self, entry: KnowledgeEntry) {
        self.entries.write().await.push(entry);
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn entries(&self) -> Result<Vec<KnowledgeEntry>, MemoryError> {
        Ok(self.entries.read().await.clone())
    }
}
