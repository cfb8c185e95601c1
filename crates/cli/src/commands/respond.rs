//! `chirp respond` — Build the GATE and GENERATE prompts for one message.

use chirp_config::ChirpConfig;
use chirp_core::message::{GroupId, IncomingMessage};

use crate::runtime::{self, DataPaths};

pub async fn run(
    text: String,
    sender: String,
    relationship: f64,
    group: Option<String>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ChirpConfig::load()?;
    let engine = runtime::build_engine(&config, &DataPaths::default_location())?;

    let mut message = IncomingMessage::new(text)
        .with_sender(sender)
        .with_relationship(relationship);
    if let Some(group) = group {
        message = message.in_group(GroupId::from(group));
    }

    let mut rng = runtime::rng(seed);
    let prompts = engine
        .build_response_prompts_with_rng(&message, &mut rng)
        .await;

    println!("── GATE ─────────────────────────────────────────────");
    println!("{}\n", prompts.gate);
    println!("── GENERATE ─────────────────────────────────────────");
    println!("{}", prompts.generate);
    println!("─────────────────────────────────────────────────────");
    println!(
        "  tone: {:?}  persona: {:?}  styles: {:?}",
        prompts.tone, prompts.persona, prompts.styles
    );
    println!(
        "  topics: {:?}  memories: {}",
        prompts.topics,
        prompts.memories.len()
    );
    println!(
        "  recall: {:.3}s  knowledge: {:.3}s",
        prompts.timings.recall.as_secs_f64(),
        prompts.timings.knowledge.as_secs_f64()
    );

    Ok(())
}
