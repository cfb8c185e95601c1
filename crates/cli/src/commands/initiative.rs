//! `chirp initiative` — Build one initiative cycle: select, check, generate.

use chirp_config::ChirpConfig;
use chirp_core::memory::MemoryNode;
use chirp_core::message::GroupId;
use chirp_prompt::InitiativeSelection;

use crate::runtime::{self, DataPaths};

pub async fn run(
    group: Option<String>,
    seed: Option<u64>,
    topic: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ChirpConfig::load()?;
    let engine = runtime::build_engine(&config, &DataPaths::default_location())?;
    let group = group.map(GroupId::from);
    let mut rng = runtime::rng(seed);

    let selection = engine
        .build_initiative_selection_with_rng(group.as_ref(), &mut rng)
        .await?;

    println!("── SELECT ───────────────────────────────────────────");
    println!("{}\n", selection.select_prompt);

    let node = pick_topic(&selection, topic.as_deref())?;

    let check = engine.build_initiative_check_with_rng(node, &selection.base_context, &mut rng);
    let generate =
        engine.build_initiative_generation(node, &selection.base_context, &check.sampled_memory);

    println!("── CHECK ({}) ───────────────────────────────────────", node.concept);
    println!("{}\n", check.check_prompt);
    println!("── GENERATE ─────────────────────────────────────────");
    println!("{generate}");

    Ok(())
}

/// The candidate named by `--topic`, or the first one when none was given.
fn pick_topic<'a>(
    selection: &'a InitiativeSelection,
    topic: Option<&str>,
) -> Result<&'a MemoryNode, String> {
    match topic {
        Some(answer) => selection.candidate(answer).ok_or_else(|| {
            let labels: Vec<&str> = selection
                .candidates
                .iter()
                .map(|n| n.concept.as_str())
                .collect();
            format!("'{answer}' is not a candidate. Candidates: {}", labels.join(", "))
        }),
        None => selection
            .candidates
            .first()
            .ok_or_else(|| "no initiative candidates".to_string()),
    }
}
