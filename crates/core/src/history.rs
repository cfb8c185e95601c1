//! Chat history trait — recent messages of a group as plain text.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::message::GroupId;

/// Provides the most recent messages posted in a group.
#[async_trait]
pub trait ChatHistoryProvider: Send + Sync {
    /// Up to `limit` most recent messages, oldest first, combined into one text.
    async fn recent_messages(
        &self,
        group: &GroupId,
        limit: usize,
    ) -> std::result::Result<String, MemoryError>;
}
