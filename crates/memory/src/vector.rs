//! Vector similarity and knowledge ranking utilities.
//!
//! Pure-Rust implementations of:
//! - Cosine similarity
//! - Exact threshold + top-k ranking of knowledge passages
//!
//! Ranking scores every entry; there is no approximate index, so the
//! returned top-k is always the true top-k for the store.

use chirp_core::memory::KnowledgeEntry;
use serde::{Deserialize, Serialize};

/// A knowledge passage with the similarity it scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKnowledge {
    pub content: String,
    pub similarity: f32,
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if the vectors differ in length, are empty, or either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank knowledge entries by cosine similarity to a query embedding.
///
/// Pipeline: score every entry → keep `similarity >= threshold` → sort
/// descending → truncate to `limit`. The sort is stable, so entries with
/// equal scores keep their store order and the result is deterministic.
pub fn rank_by_similarity(
    entries: &[KnowledgeEntry],
    query_embedding: &[f32],
    limit: usize,
    threshold: f32,
) -> Vec<ScoredKnowledge> {
    if query_embedding.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredKnowledge> = entries
        .iter()
        .filter_map(|entry| {
            let similarity = cosine_similarity(&entry.embedding, query_embedding);
            (similarity >= threshold).then(|| ScoredKnowledge {
                content: entry.content.clone(),
                similarity,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}
