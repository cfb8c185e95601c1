//! In-memory chat history — per-group message lines.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chirp_core::error::MemoryError;
use chirp_core::history::ChatHistoryProvider;
use chirp_core::message::GroupId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// One message posted in a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLine {
    pub sender: String,
    pub text: String,
}

/// Keeps every group's messages in memory, oldest first.
pub struct InMemoryChatHistory {
    groups: Arc<RwLock<HashMap<GroupId, Vec<HistoryLine>>>>,
}

impl InMemoryChatHistory {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load `{ "group_id": [{sender, text}, ...] }` from disk. A missing file yields no history.
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        if !path.exists() {
            debug!("No history file at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        let raw: HashMap<String, Vec<HistoryLine>> = serde_json::from_str(&content)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        let groups = raw.into_iter().map(|(k, v)| (GroupId(k), v)).collect();
        Ok(Self {
            groups: Arc::new(RwLock::new(groups)),
        })
    }

    pub async fn push(&self, group: &GroupId, sender: impl Into<String>, text: impl Into<String>) {
        self.groups
            .write()
            .await
            .entry(group.clone())
            .or_default()
            .push(HistoryLine {
                sender: sender.into(),
                text: text.into(),
            });
    }
}

impl Default for InMemoryChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatHistoryProvider for InMemoryChatHistory {
    async fn recent_messages(&self, group: &GroupId, limit: usize) -> Result<String, MemoryError> {
        let groups = self.groups.read().await;
        let Some(lines) = groups.get(group) else {
            return Ok(String::new());
        };
        let skip = lines.len().saturating_sub(limit);
        Ok(lines[skip..]
            .iter()
            .map(|l| format!("{}: {}", l.sender, l.text))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
