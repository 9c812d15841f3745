//! Validate and summarize a content directory.

use std::path::PathBuf;

use anyhow::Result;
use attribute_content::ContentFactory;
use attribute_core::{ConfigRegistry, ModifierSet};
use clap::Parser;
use serde::Serialize;

use super::OutputFormat;
use crate::config::CliConfig;

/// Validate and summarize the content directory
#[derive(Parser)]
pub struct Inspect {
    /// Content directory (defaults to $ATTRS_DATA_DIR, then `data`)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct ContentSummary<'a> {
    max_nesting_depth: u32,
    attribute_types: Vec<&'a str>,
    containers: Vec<(&'a str, &'a [String])>,
    modifier_sets: Vec<(&'a str, &'a ModifierSet)>,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let config = CliConfig::resolve(self.data_dir);
        let factory = ContentFactory::new(&config.data_dir);

        let engine_config = factory.load_config()?;
        let registry = factory.load_registry()?;

        let summary = ContentSummary {
            max_nesting_depth: engine_config.max_nesting_depth,
            attribute_types: registry.attribute_type_ids(),
            containers: registry
                .containers()
                .map(|c| (c.id.as_str(), c.supported_types.as_slice()))
                .collect(),
            modifier_sets: registry.modifier_sets().collect(),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Summary => {
                println!("Content: {}", config.data_dir.display());
                println!("Max nesting depth: {}", summary.max_nesting_depth);
                println!();
                println!("Attribute types ({}):", summary.attribute_types.len());
                for id in &summary.attribute_types {
                    let name = registry
                        .attribute_type(id)
                        .map(|d| d.name.as_str())
                        .unwrap_or("");
                    println!("  {:<12} {}", id, name);
                }
                println!();
                println!("Containers ({}):", summary.containers.len());
                for (id, types) in &summary.containers {
                    println!("  {:<12} {}", id, types.join(", "));
                }
                println!();
                println!("Modifier sets ({}):", summary.modifier_sets.len());
                for (id, set) in &summary.modifier_sets {
                    println!(
                        "  {:<12} coefficients {:?}, flat reductions {:?}",
                        id, set.coefficients, set.flat_reductions
                    );
                }
            }
        }

        Ok(())
    }
}
