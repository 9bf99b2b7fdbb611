#![forbid(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use blindfold::gateway::OpenRouterAdapter;
use blindfold::trial::{Slot, TrialError};
use blindfold::{Orchestrator, TrialConfig, TrialStore};

#[derive(Parser)]
#[command(name = "blindfold", version, about = "Blind A/B trials for LLM outputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one blind trial: generate, paraphrase, pick a winner, reveal
    Compare {
        /// The prompt both backends answer
        prompt: String,
        /// Participant identifier recorded with the choice
        #[arg(long, default_value = "anon")]
        participant: String,
        /// Skip the reveal after recording the choice
        #[arg(long)]
        no_reveal: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            prompt,
            participant,
            no_reveal,
        } => {
            let adapter = OpenRouterAdapter::from_env()?;
            let store = Arc::new(TrialStore::new());
            let orchestrator =
                Orchestrator::new(Arc::new(adapter), store, TrialConfig::from_env());

            compare(&orchestrator, &prompt, &participant, no_reveal).await?;
        }
    }

    Ok(())
}

async fn compare(
    orchestrator: &Orchestrator,
    prompt: &str,
    participant: &str,
    no_reveal: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Running blind trial...");
    let presentation = match orchestrator.run_blind_trial(prompt).await {
        Ok(p) => p,
        Err(err) => {
            if let TrialError::Backend { stage, source, .. } = &err {
                eprintln!("trial failed during {stage}: {source}");
                if let Some(hint) = source.remediation() {
                    eprintln!("hint: {hint}");
                }
                return Err(err.to_string().into());
            }
            return Err(err.to_string().into());
        }
    };

    for output in &presentation.outputs {
        println!("\n=== Output {} ===\n{}", output.slot, output.text);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let shown_at = Instant::now();
    let slot_label = loop {
        print!("\nWhich output is better? [1/2] ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!("no choice made");
            return Ok(());
        };
        let line = line?;
        let trimmed = line.trim();
        if Slot::from_label(trimmed).is_some() {
            break trimmed.to_string();
        }
        println!("please answer 1 or 2");
    };
    let reacted_ms = shown_at.elapsed().as_millis() as u64;

    let winner = orchestrator.record_choice(
        presentation.trial_id,
        &slot_label,
        Some(participant),
        Some(reacted_ms),
    )?;
    println!("You picked output {slot_label} -> backend \"{winner}\"");

    if !no_reveal {
        let reveal = orchestrator.reveal(presentation.trial_id)?;
        println!("\n=== Reveal ===");
        println!("{}", serde_json::to_string_pretty(&reveal)?);
    }

    let stats = orchestrator.stats();
    println!("\n=== Aggregate stats ===");
    println!("{}", serde_json::to_string_pretty(&stats)?);

    // Optional unblinded follow-up against one side.
    print!("\nFollow-up question? Enter slot (1/2) or blank to finish: ");
    io::stdout().flush()?;
    if let Some(line) = lines.next() {
        let line = line?;
        let slot = line.trim().to_string();
        if Slot::from_label(&slot).is_some() {
            print!("Follow-up for output {slot}: ");
            io::stdout().flush()?;
            if let Some(message) = lines.next() {
                let message = message?;
                if !message.trim().is_empty() {
                    let reply = orchestrator
                        .continue_conversation(presentation.trial_id, &slot, message.trim())
                        .await?;
                    println!("\n=== Continuation (unblinded, unparaphrased) ===\n{reply}");
                }
            }
        }
    }

    Ok(())
}
