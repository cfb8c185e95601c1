//! Chirp CLI — the main entry point.
//!
//! Commands:
//! - `init`        — Write the default config and sample data files
//! - `respond`     — Build GATE and GENERATE prompts for one message
//! - `initiative`  — Build the select, check and generate prompts of an initiative cycle
//! - `doctor`      — Diagnose config and data files

use clap::{Parser, Subcommand};

mod commands;
mod runtime;

#[derive(Parser)]
#[command(
    name = "chirp",
    about = "Chirp — prompt assembly for a group-chat agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default configuration and sample data
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Build the prompts for an incoming message
    Respond {
        /// The message text
        #[arg(short, long)]
        message: String,

        /// Display name of the sender
        #[arg(short, long, default_value = "")]
        sender: String,

        /// Relationship score between the agent and the sender
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        relationship: f64,

        /// Group the message was posted in
        #[arg(short, long)]
        group: Option<String>,

        /// Seed the random draws for a repeatable build
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build the prompts for unprompted speech
    Initiative {
        /// Group whose chat history sets the mood
        #[arg(short, long)]
        group: Option<String>,

        /// Seed the random draws for a repeatable build
        #[arg(long)]
        seed: Option<u64>,

        /// Candidate concept to continue with (defaults to the first candidate)
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Diagnose config and data files
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Respond {
            message,
            sender,
            relationship,
            group,
            seed,
        } => commands::respond::run(message, sender, relationship, group, seed).await?,
        Commands::Initiative { group, seed, topic } => {
            commands::initiative::run(group, seed, topic).await?
        }
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
