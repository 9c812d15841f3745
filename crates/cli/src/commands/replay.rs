//! Replay a scenario and report realized deltas.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use attribute_content::{ContentFactory, Scenario, ScenarioLoader};
use clap::Parser;

use super::OutputFormat;
use crate::config::CliConfig;
use crate::runner::{ReplayReport, ScenarioRunner, StepOutcome};

/// Replay a scenario against freshly loaded content
#[derive(Parser)]
pub struct Replay {
    /// Scenario name under `<data-dir>/scenarios/`, or a path to a RON file
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Content directory (defaults to $ATTRS_DATA_DIR, then `data`)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Write each surviving entity's state to `<DIR>/entity_<id>.bin`
    #[arg(long, value_name = "DIR")]
    save_states: Option<PathBuf>,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let config = CliConfig::resolve(self.data_dir);
        let factory = ContentFactory::new(&config.data_dir);

        let engine_config = factory.load_config()?;
        let registry = factory
            .load_registry()
            .with_context(|| format!("Failed to load content from {}", config.data_dir.display()))?;
        let scenario = load_scenario(&factory, &self.scenario)?;

        let report = ScenarioRunner::new(registry, engine_config).run(&scenario);

        if let Some(dir) = &self.save_states {
            save_states(dir, &report)?;
        }

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        Ok(())
    }
}

fn load_scenario(factory: &ContentFactory, scenario: &str) -> Result<Scenario> {
    let path = Path::new(scenario);
    if path.extension().is_some_and(|ext| ext == "ron") {
        return ScenarioLoader::load(path);
    }
    factory.load_scenario(scenario)
}

fn save_states(dir: &Path, report: &ReplayReport) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

    for (id, state) in &report.final_states {
        let path = dir.join(format!("entity_{}.bin", id));
        let bytes = state.to_bytes()?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        tracing::info!(entity = id, path = %path.display(), "saved state");
    }

    Ok(())
}

fn print_summary(report: &ReplayReport) {
    println!(
        "Scenario: {}",
        report.name.as_deref().unwrap_or("(unnamed)")
    );
    println!();

    for step in &report.steps {
        let outcome = match &step.outcome {
            StepOutcome::Realized(delta) if delta.is_empty() => "no change".to_owned(),
            StepOutcome::Realized(delta) => delta
                .iter()
                .map(|(id, value)| {
                    let sign = if value.is_positive() { "+" } else { "" };
                    format!("{id} {sign}{value}")
                })
                .collect::<Vec<_>>()
                .join(", "),
            StepOutcome::Applied => "applied".to_owned(),
            StepOutcome::Refused => "refused".to_owned(),
        };
        println!("  [{:>3}] #{:<4} {}", step.index, step.entity, outcome);
    }

    println!();
    println!(
        "Notifications: {} ({} interrupting)",
        report.notifications, report.interrupts
    );

    for (id, state) in &report.final_states {
        println!();
        println!("Entity #{}", id);
        if let Some(set) = &state.modifier_set_id {
            println!("  modifier set: {}", set);
        }
        for (attribute, value) in &state.attributes {
            println!("  {:<12} {}", attribute, value);
        }
    }
}
