//! Subcommand implementations.

mod inspect;
mod read_state;
mod replay;

pub use inspect::Inspect;
pub use read_state::ReadState;
pub use replay::Replay;

/// Output format shared by every command.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
}
