//! Minimal end-to-end example for `blindfold`.
//!
//! Runs one blind trial, records a choice for slot 1, then reveals which
//! backend was behind each slot.
//!
//! To run:
//! - Set `OPENROUTER_API_KEY`
//! - `cargo run --example quickstart`

use std::sync::Arc;

use blindfold::gateway::{ChatGateway, OpenRouterAdapter};
use blindfold::{Orchestrator, TrialConfig, TrialStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // OpenRouter adapter; reads OPENROUTER_API_KEY from the environment.
    let gateway: Arc<dyn ChatGateway> = Arc::new(OpenRouterAdapter::from_env()?);

    // The store lives for the life of the process; every trial and choice
    // goes through this one instance.
    let store = Arc::new(TrialStore::new());

    // Default config compares openai/o3 vs openai/gpt-5 with
    // anthropic/claude-opus-4.1 as the style-normalizing paraphraser.
    let orchestrator = Orchestrator::new(gateway, store, TrialConfig::from_env());

    let presentation = orchestrator
        .run_blind_trial("Explain why the sky is blue in two paragraphs.")
        .await?;

    for output in &presentation.outputs {
        println!("=== Output {} ===\n{}\n", output.slot, output.text);
    }

    // Pretend the human picked output 1.
    let winner = orchestrator.record_choice(presentation.trial_id, "1", Some("quickstart"), None)?;
    println!("slot 1 was backend \"{winner}\"");

    let reveal = orchestrator.reveal(presentation.trial_id)?;
    println!("full order: {}", serde_json::to_string(&reveal.order)?);

    let stats = orchestrator.stats();
    println!("stats: {}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
