//! `chirp doctor` — Diagnose config and data files.

use chirp_config::ChirpConfig;
use chirp_core::memory::MemoryGraph;
use chirp_memory::{InMemoryChatHistory, InMemoryGraph, InMemoryKnowledgeStore};

use crate::runtime::DataPaths;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Chirp Doctor — Diagnostics");
    println!("=============================\n");

    let mut issues = 0;

    // Check config
    let config_path = ChirpConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match ChirpConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file — run `chirp init` (using defaults)");
        issues += 1;
        Some(ChirpConfig::default())
    };

    if let Some(config) = &config {
        match (config.embedding.provider.as_str(), &config.embedding.api_key) {
            ("openai", Some(_)) => println!("  ✅ Embedding API key configured"),
            ("openai", None) => {
                println!("  ⚠️  embedding.provider is openai but no API key is set");
                issues += 1;
            }
            _ => println!("  ℹ️  Knowledge lookup disabled (embedding.provider = none)"),
        }
    }

    let paths = DataPaths::default_location();

    // Check graph
    match InMemoryGraph::load(&paths.graph) {
        Ok(graph) if graph.is_empty() => {
            println!("  ⚠️  Concept graph is empty — recall and initiative will be idle");
            issues += 1;
        }
        Ok(graph) => {
            let required = config
                .as_ref()
                .map(|c| (c.initiative.min_memory_items, c.initiative.candidate_count))
                .unwrap_or((3, 5));
            let rich = graph
                .all_nodes()
                .iter()
                .filter(|n| n.memory_items.len() > required.0)
                .count();
            println!("  ✅ Concept graph: {} concepts, {rich} initiative-ready", graph.len());
            if rich < required.1 {
                println!(
                    "  ⚠️  Initiative needs {} concepts with more than {} memories",
                    required.1, required.0
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Concept graph unreadable: {e}");
            issues += 1;
        }
    }

    // Check knowledge
    match InMemoryKnowledgeStore::load(&paths.knowledge) {
        Ok(store) => println!("  ✅ Knowledge store: {} passages", store.count().await),
        Err(e) => {
            println!("  ❌ Knowledge store unreadable: {e}");
            issues += 1;
        }
    }

    // Check history
    match InMemoryChatHistory::load(&paths.history) {
        Ok(_) => println!("  ✅ Chat history readable"),
        Err(e) => {
            println!("  ❌ Chat history unreadable: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
