//! Scenario execution against a live engine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use attribute_content::{Scenario, ScenarioStep};
use attribute_core::{
    AttributableState, AttributeChangedEvent, AttributeEngine, ChangeLogObserver, ChangeObserver,
    EngineConfig, FixedPoint2, InMemoryRegistry,
};
use serde::Serialize;

/// Counts notifications raised while a scenario runs.
#[derive(Debug, Default)]
struct NotificationCounter {
    changes: AtomicUsize,
    interrupts: AtomicUsize,
}

impl ChangeObserver for NotificationCounter {
    fn name(&self) -> &'static str {
        "notification_counter"
    }

    fn attribute_changed(&self, _engine: &mut AttributeEngine, event: &AttributeChangedEvent) {
        self.changes.fetch_add(1, Ordering::Relaxed);
        if event.interrupts {
            self.interrupts.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Result of one scenario step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Delta that actually landed in the ledger.
    Realized(BTreeMap<String, FixedPoint2>),
    /// The operation ran; it reports no delta.
    Applied,
    /// Missing entity, cancellation or nesting limit.
    Refused,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub entity: u32,
    pub outcome: StepOutcome,
}

/// Everything a replay produced.
#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub name: Option<String>,
    pub steps: Vec<StepReport>,
    pub notifications: usize,
    pub interrupts: usize,
    pub final_states: BTreeMap<u32, AttributableState>,
}

/// Owns an engine wired with the CLI's observers.
pub struct ScenarioRunner {
    engine: AttributeEngine,
    counter: Arc<NotificationCounter>,
}

impl ScenarioRunner {
    pub fn new(registry: InMemoryRegistry, config: EngineConfig) -> Self {
        let mut engine = AttributeEngine::with_config(Arc::new(registry), config);
        let counter = Arc::new(NotificationCounter::default());
        engine.register_observer(counter.clone());
        engine.register_observer(Arc::new(ChangeLogObserver));
        Self { engine, counter }
    }

    /// Attaches the scenario's entities and applies every step in order.
    pub fn run(mut self, scenario: &Scenario) -> ReplayReport {
        for entity in &scenario.entities {
            self.engine.attach(entity.entity(), entity.spec());
        }

        let steps = scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.apply(index, step))
            .collect();

        let final_states = scenario
            .entities
            .iter()
            .filter_map(|entity| {
                self.engine
                    .get_state(entity.entity())
                    .map(|state| (entity.id, state))
            })
            .collect();

        ReplayReport {
            name: scenario.name.clone(),
            steps,
            notifications: self.counter.changes.load(Ordering::Relaxed),
            interrupts: self.counter.interrupts.load(Ordering::Relaxed),
            final_states,
        }
    }

    fn apply(&mut self, index: usize, step: &ScenarioStep) -> StepReport {
        let entity = step.entity();
        let present = self.engine.contains(entity);

        let outcome = match step {
            ScenarioStep::Change { .. } => {
                let delta = step.ledger().unwrap_or_default();
                match self.engine.try_change_attribute(entity, delta, step.options()) {
                    Some(realized) => StepOutcome::Realized(realized.into_map()),
                    None => StepOutcome::Refused,
                }
            }
            ScenarioStep::Set { .. } => {
                self.engine
                    .set_attributes(entity, step.ledger().unwrap_or_default());
                applied_if(present)
            }
            ScenarioStep::SetAll { value, .. } => {
                self.engine.set_all_attributes(entity, *value);
                applied_if(present && !value.is_negative())
            }
            ScenarioStep::SetModifierSet { id, .. } => {
                self.engine.set_modifier_set_id(entity, id.clone());
                applied_if(present)
            }
            ScenarioStep::Detach { .. } => applied_if(self.engine.detach(entity).is_some()),
        };

        tracing::debug!(index, entity = %entity, outcome = ?outcome, "replayed step");

        StepReport {
            index,
            entity: entity.0,
            outcome,
        }
    }
}

fn applied_if(applied: bool) -> StepOutcome {
    if applied {
        StepOutcome::Applied
    } else {
        StepOutcome::Refused
    }
}

#[cfg(test)]
mod tests {
    use attribute_content::ScenarioLoader;
    use attribute_core::{ContainerSpec, ModifierSet};

    use super::*;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::with_known_attributes()
            .with_container(ContainerSpec::new("Humanoid", ["Strength", "Body"]))
            .with_modifier_set(
                "Armored",
                ModifierSet::new()
                    .with_flat_reduction("Body", 3.0)
                    .with_coefficient("Body", 0.5),
            )
    }

    #[test]
    fn replays_steps_in_order() {
        let scenario = ScenarioLoader::parse(
            r#"(
                entities: [(id: 1, container: Some("Humanoid"), modifier_set: Some("Armored"))],
                steps: [
                    SetAll(entity: 1, value: 10.0),
                    Change(entity: 1, delta: {"Body": 10.0}, interrupts: true),
                    Change(entity: 1, delta: {"Strength": -15.0}),
                    SetAll(entity: 1, value: -1.0),
                    Detach(entity: 1),
                    Change(entity: 1, delta: {"Body": 1.0}),
                ],
            )"#,
        )
        .unwrap();

        let report = ScenarioRunner::new(registry(), EngineConfig::default()).run(&scenario);

        let outcomes: Vec<_> = report.steps.iter().map(|s| s.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Applied,
                StepOutcome::Realized(
                    [("Body".to_owned(), FixedPoint2::from_raw(350))].into_iter().collect()
                ),
                StepOutcome::Realized(
                    [("Strength".to_owned(), FixedPoint2::from_int(-10))]
                        .into_iter()
                        .collect()
                ),
                StepOutcome::Refused,
                StepOutcome::Applied,
                StepOutcome::Refused,
            ]
        );
        assert_eq!(report.notifications, 3);
        assert_eq!(report.interrupts, 1);
        assert!(report.final_states.is_empty());
    }
}
