//! promptbound CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Execute a one-off prompt under a USD budget
//! - `models`  — List the capability table
//! - `inspect` — Summarize a serialized context file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod hints;

#[derive(Parser)]
#[command(
    name = "promptbound",
    about = "promptbound — shape, bound, and dispatch LLM requests",
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
    /// Execute a one-off run with a prompt and budget
    Run(commands::run::RunArgs),

    /// List models in the capability table
    Models,

    /// Inspect a serialized context file
    Inspect {
        /// Path to a context JSON file
        file: PathBuf,
    },
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
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Models => commands::models::run()?,
        Commands::Inspect { file } => commands::inspect::run(&file)?,
    }

    Ok(())
}
