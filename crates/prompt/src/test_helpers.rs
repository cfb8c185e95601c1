//! Shared test helpers for prompt tests.

use std::sync::Mutex;

use chirp_core::error::MemoryError;
use chirp_core::memory::{EmbeddingService, KnowledgeEntry, KnowledgeStore, MemoryNode, TopicSet};
use chirp_core::schedule::Clock;
use chirp_memory::{GraphSnapshot, InMemoryGraph};
use chrono::{NaiveDate, NaiveDateTime};

use crate::compose::PersonaProfile;

/// A clock stuck at one instant.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

pub fn profile() -> PersonaProfile {
    PersonaProfile::new(
        "小啾",
        &[
            "是一个喜欢晒太阳的大学生".to_string(),
            "是一个说话很冲的程序员".to_string(),
        ],
    )
    .unwrap()
}

/// Build a graph from `(concept, items)` pairs and concept edges.
pub fn graph(nodes: &[(&str, &[&str])], edges: &[(&str, &str)]) -> InMemoryGraph {
    InMemoryGraph::from_snapshot(GraphSnapshot {
        nodes: nodes
            .iter()
            .map(|(concept, items)| {
                MemoryNode::new(*concept, items.iter().map(|s| s.to_string()).collect())
            })
            .collect(),
        edges: edges
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect(),
    })
}

pub fn topics(labels: &[&str]) -> TopicSet {
    labels.iter().map(|s| s.to_string()).collect()
}

pub fn node_with_items(concept: &str, count: usize) -> MemoryNode {
    MemoryNode::new(
        concept,
        (1..=count).map(|i| format!("{concept}的第{i}件事")).collect(),
    )
}

/// `qualifying` nodes with 4 items and `small` nodes with exactly 3.
pub fn rich_graph(qualifying: usize, small: usize) -> InMemoryGraph {
    let mut g = InMemoryGraph::new();
    for i in 0..qualifying {
        g.add_node(node_with_items(&format!("话题{i}"), 4));
    }
    for i in 0..small {
        g.add_node(node_with_items(&format!("小话题{i}"), 3));
    }
    g
}

pub fn entry<const N: usize>(content: &str, embedding: [f32; N]) -> KnowledgeEntry {
    KnowledgeEntry {
        content: content.to_string(),
        embedding: embedding.to_vec(),
    }
}

/// Returns the same vector for every text and records what it was asked.
pub struct StubEmbedder {
    vector: Vec<f32>,
    seen: Mutex<Vec<String>>,
}

impl StubEmbedder {
    pub fn fixed(vector: Vec<f32>) -> Self {
        Self {
            vector,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EmbeddingService for StubEmbedder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(self.vector.clone())
    }
}

/// A store whose every query fails.
pub struct FailingStore;

#[async_trait::async_trait]
impl KnowledgeStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn entries(&self) -> Result<Vec<KnowledgeEntry>, MemoryError> {
        Err(MemoryError::Storage("connection refused".into()))
    }
}
