//! Associative recall over the concept graph.
//!
//! For every topic of a message the graph yields memories one hop away
//! (first layer) and two hops away (second layer). First-layer items are
//! pooled across topics; second-layer items shared by two or more topics
//! form the overlap set. A small random sample of each becomes the
//! "you are reminded of ..." clause of the prompt.

use std::collections::{BTreeMap, BTreeSet};

use chirp_core::memory::{MemoryGraph, TopicSet};
use rand::Rng;
use tracing::debug;

use super::sample_up_to;

/// Traversal depth and sample sizes.
#[derive(Debug, Clone, Copy)]
pub struct RecallSettings {
    pub depth: usize,
    pub first_layer_samples: usize,
    pub overlap_samples: usize,
}

impl Default for RecallSettings {
    fn default() -> Self {
        Self {
            depth: 2,
            first_layer_samples: 2,
            overlap_samples: 2,
        }
    }
}

/// Everything the graph returned for one message, before sampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallBundle {
    /// First-layer items of all topics; duplicates kept
    pub first_layer: Vec<String>,
    /// Second-layer items per topic
    pub second_layer: BTreeMap<String, Vec<String>>,
    /// Items present in the second layer of at least two topics
    pub overlap: BTreeSet<String>,
}

/// The sampled memories and the clause rendered from them.
#[derive(Debug, Clone, Default)]
pub struct Recall {
    pub bundle: RecallBundle,
    /// Deduplicated union of both samples, first-layer picks first
    pub selected: Vec<String>,
    /// Empty when nothing was selected
    pub clause: String,
}

pub struct MemoryRetriever<'a> {
    graph: &'a dyn MemoryGraph,
    settings: RecallSettings,
}

impl<'a> MemoryRetriever<'a> {
    pub fn new(graph: &'a dyn MemoryGraph, settings: RecallSettings) -> Self {
        Self { graph, settings }
    }

    /// Query the graph for every topic and detect second-layer overlaps.
    pub fn collect(&self, topics: &TopicSet) -> RecallBundle {
        let mut bundle = RecallBundle::default();

        for topic in topics {
            let (first, second) = self.graph.related_items(topic, self.settings.depth);
            bundle.first_layer.extend(first);

            let current: BTreeSet<&String> = second.iter().collect();
            for (other_topic, other_second) in &bundle.second_layer {
                if other_topic == topic {
                    continue;
                }
                let shared: Vec<String> = other_second
                    .iter()
                    .filter(|item| current.contains(item))
                    .cloned()
                    .collect();
                if !shared.is_empty() {
                    debug!(topic = %topic, other = %other_topic, shared = shared.len(), "Second-layer overlap");
                    bundle.overlap.extend(shared);
                }
            }

            bundle.second_layer.insert(topic.clone(), second);
        }

        bundle
    }

    /// Collect, sample, and render the memory clause.
    pub fn recall<R: Rng + ?Sized>(&self, topics: &TopicSet, rng: &mut R) -> Recall {
        if topics.is_empty() {
            return Recall::default();
        }

        let bundle = self.collect(topics);
        let overlap: Vec<String> = bundle.overlap.iter().cloned().collect();

        let mut selected = sample_up_to(&bundle.first_layer, self.settings.first_layer_samples, rng);
        selected.extend(sample_up_to(&overlap, self.settings.overlap_samples, rng));
        let mut seen = BTreeSet::new();
        selected.retain(|item| seen.insert(item.clone()));

        let clause = render_clause(&selected);
        if !selected.is_empty() {
            debug!(memories = ?selected, "Recalled memories");
        }

        Recall {
            bundle,
            selected,
            clause,
        }
    }
}

fn render_clause(memories: &[String]) -> String {
    if memories.is_empty() {
        String::new()
    } else {
        format!("看到这些聊天，你想起来{}\n", memories.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{graph, topics};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// 猫-宠物, 宠物-狗, 狗-骨头, 猫-鱼, 鱼-海, 狗-宠物医院, 宠物医院-猫
    fn pets() -> chirp_memory::InMemoryGraph {
        graph(
            &[
                ("猫", &["猫会抓老鼠"]),
                ("宠物", &["宠物需要照顾"]),
                ("狗", &["狗很忠诚"]),
                ("骨头", &["狗喜欢啃骨头"]),
                ("鱼", &["鱼在水里游"]),
                ("海", &["海边很凉快"]),
                ("宠物医院", &["打疫苗很贵"]),
            ],
            &[
                ("猫", "宠物"),
                ("宠物", "狗"),
                ("狗", "骨头"),
                ("猫", "鱼"),
                ("鱼", "海"),
                ("狗", "宠物医院"),
                ("宠物医院", "猫"),
            ],
        )
    }

    #[test]
    fn empty_topics_give_empty_recall() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let recall = retriever.recall(&TopicSet::new(), &mut StdRng::seed_from_u64(1));
        assert!(recall.selected.is_empty());
        assert!(recall.clause.is_empty());
        assert_eq!(recall.bundle, RecallBundle::default());
    }

    #[test]
    fn first_layer_pools_across_topics() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let bundle = retriever.collect(&topics(&["猫", "狗"]));
        // 猫 → 宠物, 鱼, 宠物医院 ; 狗 → 宠物, 骨头, 宠物医院
        assert_eq!(bundle.first_layer.len(), 6);
        assert_eq!(
            bundle.first_layer.iter().filter(|i| *i == "宠物需要照顾").count(),
            2
        );
    }

    #[test]
    fn overlap_is_shared_second_layer() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let bundle = retriever.collect(&topics(&["骨头", "海"]));
        // 骨头 hop2: 宠物, 宠物医院 ; 海 hop2: 猫
        assert!(bundle.overlap.is_empty());

        let bundle = retriever.collect(&topics(&["宠物医院", "宠物"]));
        // 宠物医院 hop2: 宠物, 骨头, 鱼 ; 宠物 hop2: 鱼, 宠物医院, 骨头
        assert!(bundle.overlap.contains("鱼在水里游"));
        assert!(bundle.overlap.contains("狗喜欢啃骨头"));
    }

    #[test]
    fn single_topic_has_no_overlap() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let bundle = retriever.collect(&topics(&["猫"]));
        assert!(bundle.overlap.is_empty());
        assert_eq!(bundle.second_layer.len(), 1);
    }

    #[test]
    fn sample_sizes_bounded() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let recall = retriever.recall(&topics(&["宠物医院", "宠物", "猫"]), &mut rng);
            assert!(recall.selected.len() <= 4);
            assert!(!recall.selected.is_empty());
            let unique: BTreeSet<_> = recall.selected.iter().collect();
            assert_eq!(unique.len(), recall.selected.len());
            for item in &recall.selected {
                assert!(recall.clause.contains(item.as_str()));
            }
        }
    }

    #[test]
    fn overlap_sample_reaches_clause() {
        // a and b both reach x through m; a is also two hops from b
        let g = graph(
            &[("a", &[]), ("b", &[]), ("m", &[]), ("x", &["X1", "X2", "X3"])],
            &[("a", "m"), ("b", "m"), ("m", "x")],
        );
        let retriever = MemoryRetriever::new(
            &g,
            RecallSettings {
                first_layer_samples: 0,
                ..RecallSettings::default()
            },
        );
        for seed in 0..30 {
            let recall = retriever.recall(&topics(&["a", "b"]), &mut StdRng::seed_from_u64(seed));
            let overlap = &recall.bundle.overlap;
            assert_eq!(overlap.len(), 3);
            assert_eq!(recall.selected.len(), 2.min(overlap.len()));
            for item in &recall.selected {
                assert!(overlap.contains(item));
                assert!(recall.clause.contains(item.as_str()));
            }
        }
    }

    #[test]
    fn overlap_sample_capped_by_overlap_size() {
        let g = graph(
            &[("a", &[]), ("b", &[]), ("m", &[]), ("x", &["X1"])],
            &[("a", "m"), ("b", "m"), ("m", "x")],
        );
        let retriever = MemoryRetriever::new(
            &g,
            RecallSettings {
                first_layer_samples: 0,
                ..RecallSettings::default()
            },
        );
        let recall = retriever.recall(&topics(&["a", "b"]), &mut StdRng::seed_from_u64(4));
        assert_eq!(recall.selected, vec!["X1".to_string()]);
        assert_eq!(recall.clause, "看到这些聊天，你想起来X1\n");
    }

    #[test]
    fn small_pools_never_fail() {
        let g = graph(&[("a", &["only"]), ("b", &[])], &[("a", "b")]);
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let recall = retriever.recall(&topics(&["b"]), &mut StdRng::seed_from_u64(3));
        assert_eq!(recall.selected, vec!["only".to_string()]);

        let recall = retriever.recall(&topics(&["a"]), &mut StdRng::seed_from_u64(3));
        assert!(recall.selected.is_empty());
        assert!(recall.clause.is_empty());
    }

    #[test]
    fn unknown_topics_yield_empty_clause() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let recall = retriever.recall(&topics(&["火星"]), &mut StdRng::seed_from_u64(5));
        assert!(recall.clause.is_empty());
    }

    #[test]
    fn same_seed_same_recall() {
        let g = pets();
        let retriever = MemoryRetriever::new(&g, RecallSettings::default());
        let t = topics(&["猫", "狗"]);
        let a = retriever.recall(&t, &mut StdRng::seed_from_u64(99));
        let b = retriever.recall(&t, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.selected, b.selected);
        assert_eq!(a.clause, b.clause);
    }
}
