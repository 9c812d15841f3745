//! Read and inspect saved attributable state files.
//!
//! Decodes `entity_<id>.bin` files written by `replay --save-states`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use attribute_core::AttributableState;
use clap::Parser;

use super::OutputFormat;

/// Decode a saved attributable state file
#[derive(Parser)]
pub struct ReadState {
    /// Path to the state file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl ReadState {
    pub fn execute(self) -> Result<()> {
        if !self.path.exists() {
            anyhow::bail!("State file not found: {}", self.path.display());
        }

        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let state = AttributableState::from_bytes(&bytes)
            .with_context(|| format!("Failed to decode state file: {}", self.path.display()))?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
            OutputFormat::Summary => {
                println!("State: {}", self.path.display());
                println!(
                    "  modifier set: {}",
                    state.modifier_set_id.as_deref().unwrap_or("(none)")
                );
                println!("  total:        {}", state.ledger().total());
                for (attribute, value) in &state.attributes {
                    println!("  {:<12}  {}", attribute, value);
                }
            }
        }

        Ok(())
    }
}
