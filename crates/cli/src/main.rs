//! Command-line driver for the attribute engine.
//!
//! Loads content from a data directory and replays scripted scenarios.
//! Run with: `attrs <command>`

mod commands;
mod config;
mod runner;

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, ReadState, Replay};

/// Attribute engine tools
#[derive(Parser)]
#[command(name = "attrs")]
#[command(about = "Replay and inspect attribute scenarios", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a scenario against freshly loaded content
    Replay(Replay),

    /// Validate and summarize the content directory
    Inspect(Inspect),

    /// Decode a saved attributable state file
    ReadState(ReadState),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for ATTRS_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(cmd) => cmd.execute(),
        Command::Inspect(cmd) => cmd.execute(),
        Command::ReadState(cmd) => cmd.execute(),
    }
}
