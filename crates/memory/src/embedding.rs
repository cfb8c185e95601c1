//! Embedding service clients.
//!
//! - `OpenAiEmbedder` — any OpenAI-compatible `/embeddings` endpoint
//! - `NoopEmbedder` — always fails, which disables knowledge retrieval

use async_trait::async_trait;
use chirp_core::error::MemoryError;
use chirp_core::memory::EmbeddingService;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An embedding client for OpenAI-compatible APIs.
pub struct OpenAiEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let url = format!("{}/embeddings", self.base_url);
        debug!(model = %self.model, chars = text.chars().count(), "Requesting embedding");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MemoryError::EmbeddingFailed(format!("status {status}")));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MemoryError::EmbeddingFailed("empty embedding response".into()))
    }
}

/// Embedding service that is switched off.
pub struct NoopEmbedder;

#[async_trait]
impl EmbeddingService for NoopEmbedder {
    fn name(&self) -> &str {
        "none"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MemoryError> {
        Err(MemoryError::EmbeddingFailed(
            "no embedding provider configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_always_fails() {
        let err = NoopEmbedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, MemoryError::EmbeddingFailed(_)));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let embedder = OpenAiEmbedder::new("http://localhost:8080/v1/", "key", "m");
        assert_eq!(embedder.base_url, "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_embedding_error() {
        let embedder = OpenAiEmbedder::new("http://127.0.0.1:9", "key", "m");
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, MemoryError::EmbeddingFailed(_)));
    }
}
