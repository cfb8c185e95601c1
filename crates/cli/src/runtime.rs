//! Wiring: config and data files in, a ready [`PromptEngine`] out.

use std::path::PathBuf;
use std::sync::Arc;

use chirp_config::ChirpConfig;
use chirp_core::memory::EmbeddingService;
use chirp_memory::{
    InMemoryChatHistory, InMemoryGraph, InMemoryKnowledgeStore, KeywordTopicExtractor,
    NoopEmbedder, OpenAiEmbedder,
};
use chirp_prompt::PromptEngine;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

/// Locations of the data files next to `config.toml`.
pub struct DataPaths {
    pub graph: PathBuf,
    pub knowledge: PathBuf,
    pub history: PathBuf,
}

impl DataPaths {
    pub fn default_location() -> Self {
        let dir = ChirpConfig::config_dir();
        Self {
            graph: dir.join("graph.json"),
            knowledge: dir.join("knowledge.json"),
            history: dir.join("history.json"),
        }
    }
}

/// Embedding client selected by `embedding.provider`.
pub fn embedder(config: &ChirpConfig) -> Arc<dyn EmbeddingService> {
    match (config.embedding.provider.as_str(), &config.embedding.api_key) {
        ("openai", Some(key)) => Arc::new(OpenAiEmbedder::new(
            config.embedding.api_url.clone(),
            key.clone(),
            config.embedding.model.clone(),
        )),
        ("openai", None) => {
            warn!("embedding.provider is openai but no API key is set; knowledge lookup disabled");
            Arc::new(NoopEmbedder)
        }
        _ => Arc::new(NoopEmbedder),
    }
}

pub fn build_engine(
    config: &ChirpConfig,
    paths: &DataPaths,
) -> Result<PromptEngine, Box<dyn std::error::Error>> {
    let graph = Arc::new(InMemoryGraph::load(&paths.graph)?);
    let topics = Arc::new(KeywordTopicExtractor::from_graph(graph.as_ref()));
    let knowledge = Arc::new(InMemoryKnowledgeStore::load(&paths.knowledge)?);
    let history = Arc::new(InMemoryChatHistory::load(&paths.history)?);

    info!(concepts = graph.len(), "Loaded concept graph");

    let engine = PromptEngine::new(config, graph, topics)?
        .with_knowledge(embedder(config), knowledge)
        .with_history(history);
    Ok(engine)
}

pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
