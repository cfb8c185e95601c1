//! Retrieval stages: associative recall over the concept graph and
//! similarity lookup in the knowledge store.

pub mod knowledge;
pub mod recall;

pub use knowledge::KnowledgeRetriever;
pub use recall::{MemoryRetriever, Recall, RecallBundle, RecallSettings};

use rand::Rng;
use rand::seq::index;

/// Sample `min(amount, pool.len())` distinct positions of `pool` without
/// replacement. Never fails on a short or empty pool.
pub(crate) fn sample_up_to<T: Clone, R: Rng + ?Sized>(
    pool: &[T],
    amount: usize,
    rng: &mut R,
) -> Vec<T> {
    let amount = amount.min(pool.len());
    if amount == 0 {
        return Vec::new();
    }
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}
