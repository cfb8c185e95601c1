//! Initiative flow: the agent deciding to bring up a topic on its own.
//!
//! Three independent prompts make up one cycle:
//!
//! 1. **Select**: pick one of a handful of memory-rich concepts
//! 2. **Check**: yes/no on whether the chosen topic fits the chat right now
//! 3. **Generate**: speak about it
//!
//! The memory sample drawn for the check is handed back to the caller and
//! must be passed unchanged to the generation step.

use chirp_core::error::InitiativeError;
use chirp_core::memory::{MemoryGraph, MemoryNode};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::Persona;
use crate::retrieval::sample_up_to;

/// Selection thresholds and sample sizes.
#[derive(Debug, Clone, Copy)]
pub struct InitiativeSettings {
    /// A node qualifies with strictly more items than this
    pub min_memory_items: usize,
    pub candidate_count: usize,
    pub memory_samples: usize,
}

impl Default for InitiativeSettings {
    fn default() -> Self {
        Self {
            min_memory_items: 3,
            candidate_count: 5,
            memory_samples: 3,
        }
    }
}

/// Output of the select step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeSelection {
    pub select_prompt: String,
    pub candidates: Vec<MemoryNode>,
    /// Date, history and persona; reused by check and generate
    pub base_context: String,
    pub persona: Persona,
}

impl InitiativeSelection {
    /// Resolve the model's answer to one of the candidates.
    ///
    /// Tolerates surrounding whitespace and quotes the model was told not to emit.
    pub fn candidate(&self, answer: &str) -> Option<&MemoryNode> {
        let label = answer
            .trim()
            .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '「' | '」'))
            .trim();
        self.candidates.iter().find(|n| n.concept == label)
    }
}

/// Output of the check step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeCheck {
    pub check_prompt: String,
    /// Newline-joined memory items; pass unchanged to generation
    pub sampled_memory: String,
}

pub struct InitiativeSelector<'a> {
    graph: &'a dyn MemoryGraph,
    settings: InitiativeSettings,
}

impl<'a> InitiativeSelector<'a> {
    pub fn new(graph: &'a dyn MemoryGraph, settings: InitiativeSettings) -> Self {
        Self { graph, settings }
    }

    /// Nodes with more than `min_memory_items` items.
    pub fn qualifying(&self) -> Vec<MemoryNode> {
        self.graph
            .all_nodes()
            .into_iter()
            .filter(|n| n.memory_items.len() > self.settings.min_memory_items)
            .collect()
    }

    /// Exactly `candidate_count` distinct qualifying nodes.
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<MemoryNode>, InitiativeError> {
        let pool = self.qualifying();
        let required = self.settings.candidate_count;
        if pool.len() < required {
            return Err(InitiativeError::InsufficientCandidates {
                qualifying: pool.len(),
                required,
            });
        }

        let candidates: Vec<MemoryNode> = index::sample(rng, pool.len(), required)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect();
        debug!(
            qualifying = pool.len(),
            picked = ?candidates.iter().map(|n| n.concept.as_str()).collect::<Vec<_>>(),
            "Initiative candidates"
        );
        Ok(candidates)
    }

    /// Ask the model to name exactly one of the candidate concepts.
    pub fn selection_prompt(&self, base_context: &str, candidates: &[MemoryNode]) -> String {
        let labels = candidates
            .iter()
            .map(|n| format!("\"{}\"", n.concept))
            .collect::<Vec<_>>()
            .join("，");
        format!(
            "{base_context}\n你现在想在群里发言，回忆了一下，想到几个话题，分别是{labels}，\
综合当前状态以及群内气氛，请你在其中选择一个合适的话题，\
注意只需要输出话题，除了话题什么也不要输出(双引号也不要输出)"
        )
    }

    /// Sample the node's memories and ask whether bringing it up fits now.
    pub fn check<R: Rng + ?Sized>(
        &self,
        node: &MemoryNode,
        base_context: &str,
        rng: &mut R,
    ) -> InitiativeCheck {
        let sampled_memory =
            sample_up_to(&node.memory_items, self.settings.memory_samples, rng).join("\n");
        let check_prompt = format!(
            "{}以这个作为主题发言合适吗？请在把握群里的聊天内容的基础上，综合群内的氛围，\
如果认为应该发言请输出yes，否则输出no，请注意是决定是否需要发言，而不是编写回复内容，\
除了yes和no不要输出任何回复内容。",
            recollection(node, base_context, &sampled_memory)
        );
        InitiativeCheck {
            check_prompt,
            sampled_memory,
        }
    }

    pub fn generation_prompt(
        &self,
        node: &MemoryNode,
        base_context: &str,
        sampled_memory: &str,
    ) -> String {
        format!(
            "{}请在把握群里的聊天内容的基础上，综合群内的氛围，以日常且口语化的口吻，\
简短且随意一点进行发言，不要说的太有条理，可以有个性。\
记住不要输出多余内容(包括前后缀，冒号和引号，括号，表情等)",
            recollection(node, base_context, sampled_memory)
        )
    }
}

fn recollection(node: &MemoryNode, base_context: &str, memory: &str) -> String {
    format!(
        "{base_context}\n你现在想在群里发言，回忆了一下，想到一个话题，是{}，关于这个话题的记忆有\n{memory}\n，",
        node.concept
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{node_with_items, rich_graph};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    #[test]
    fn only_nodes_above_threshold_qualify() {
        let g = rich_graph(3, 4);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let qualifying = selector.qualifying();
        assert_eq!(qualifying.len(), 3);
        assert!(qualifying.iter().all(|n| n.memory_items.len() > 3));
    }

    #[test]
    fn insufficient_candidates_reported() {
        let g = rich_graph(3, 10);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let err = selector.candidates(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(
            err,
            InitiativeError::InsufficientCandidates {
                qualifying: 3,
                required: 5
            }
        );
    }

    #[test]
    fn exactly_five_distinct_candidates() {
        let g = rich_graph(12, 3);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        for seed in 0..30 {
            let picked = selector.candidates(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(picked.len(), 5);
            let unique: BTreeSet<_> = picked.iter().map(|n| n.concept.clone()).collect();
            assert_eq!(unique.len(), 5);
            assert!(picked.iter().all(|n| n.memory_items.len() > 3));
        }
    }

    #[test]
    fn exactly_five_qualifying_uses_all() {
        let g = rich_graph(5, 0);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let picked = selector.candidates(&mut StdRng::seed_from_u64(9)).unwrap();
        let unique: BTreeSet<_> = picked.iter().map(|n| n.concept.clone()).collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn labels_quoted_individually() {
        let g = rich_graph(0, 0);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let candidates = vec![
            node_with_items("猫", 4),
            node_with_items("天气", 4),
            node_with_items("考试", 4),
        ];
        let prompt = selector.selection_prompt("BASE", &candidates);
        assert!(prompt.starts_with("BASE\n"));
        assert!(prompt.contains("\"猫\"，\"天气\"，\"考试\""));
        assert!(prompt.contains("只需要输出话题"));
    }

    #[test]
    fn check_samples_three_items() {
        let g = rich_graph(0, 0);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let node = node_with_items("猫", 6);
        let check = selector.check(&node, "BASE", &mut StdRng::seed_from_u64(4));
        let lines: Vec<&str> = check.sampled_memory.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| node.memory_items.iter().any(|i| i == l)));
        assert!(check.check_prompt.contains(&check.sampled_memory));
        assert!(check.check_prompt.contains("是猫"));
        assert!(check.check_prompt.contains("请输出yes"));
    }

    #[test]
    fn generation_reuses_check_memory() {
        let g = rich_graph(0, 0);
        let selector = InitiativeSelector::new(&g, InitiativeSettings::default());
        let node = node_with_items("猫", 6);
        let check = selector.check(&node, "BASE", &mut StdRng::seed_from_u64(4));
        let prompt = selector.generation_prompt(&node, "BASE", &check.sampled_memory);
        assert!(prompt.starts_with("BASE\n"));
        assert!(prompt.contains(&check.sampled_memory));
        assert!(prompt.contains("简短且随意"));
        assert!(!prompt.contains("yes"));
    }

    #[test]
    fn answer_resolves_to_candidate() {
        let selection = InitiativeSelection {
            select_prompt: String::new(),
            candidates: vec![node_with_items("猫", 4), node_with_items("天气", 4)],
            base_context: String::new(),
            persona: Persona::Primary,
        };
        assert_eq!(selection.candidate(" 天气\n").unwrap().concept, "天气");
        assert_eq!(selection.candidate("\"猫\"").unwrap().concept, "猫");
        assert!(selection.candidate("火星").is_none());
    }
}
