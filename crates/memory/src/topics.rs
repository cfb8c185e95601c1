//! Keyword topic extraction against the graph's own vocabulary.
//!
//! A topic is any known concept label that appears verbatim in the message.
//! Longer labels win when the cap is reached, so "机器人" beats "机器".

use chirp_core::memory::{MemoryGraph, TopicExtractor, TopicSet};

/// Default cap on topics extracted from one message.
pub const DEFAULT_MAX_TOPICS: usize = 5;

pub struct KeywordTopicExtractor {
    /// Known labels, longest first
    labels: Vec<String>,
    max_topics: usize,
}

impl KeywordTopicExtractor {
    pub fn new(labels: Vec<String>, max_topics: usize) -> Self {
        let mut labels: Vec<String> = labels
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();
        labels.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        labels.dedup();
        Self { labels, max_topics }
    }

    /// Use every concept of a graph as the vocabulary.
    pub fn from_graph(graph: &dyn MemoryGraph) -> Self {
        let labels = graph.all_nodes().into_iter().map(|n| n.concept).collect();
        Self::new(labels, DEFAULT_MAX_TOPICS)
    }
}

impl TopicExtractor for KeywordTopicExtractor {
    fn identify(&self, text: &str) -> TopicSet {
        let lowered = text.to_lowercase();
        self.labels
            .iter()
            .filter(|label| lowered.contains(&label.to_lowercase()))
            .take(self.max_topics)
            .cloned()
            .collect()
    }
}
