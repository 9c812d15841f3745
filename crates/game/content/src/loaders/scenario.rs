//! Scripted scenario loader.
//!
//! A scenario declares entities and a list of engine operations to replay
//! against them in order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use attribute_core::{AttributableSpec, AttributeLedger, ChangeOptions, EntityId, FixedPoint2};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Scenario file structure for RON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub entities: Vec<ScenarioEntity>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

/// Entity attached before the first step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEntity {
    pub id: u32,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub modifier_set: Option<String>,
}

impl ScenarioEntity {
    pub fn entity(&self) -> EntityId {
        EntityId(self.id)
    }

    pub fn spec(&self) -> AttributableSpec {
        AttributableSpec {
            container_id: self.container.clone(),
            modifier_set_id: self.modifier_set.clone(),
        }
    }
}

/// One engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioStep {
    Change {
        entity: u32,
        delta: BTreeMap<String, FixedPoint2>,
        #[serde(default)]
        ignore_resistances: bool,
        #[serde(default)]
        interrupts: bool,
        #[serde(default)]
        origin: Option<u32>,
    },
    Set {
        entity: u32,
        attributes: BTreeMap<String, FixedPoint2>,
    },
    SetAll {
        entity: u32,
        value: FixedPoint2,
    },
    SetModifierSet {
        entity: u32,
        id: Option<String>,
    },
    Detach {
        entity: u32,
    },
}

impl ScenarioStep {
    /// Target of the operation.
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Change { entity, .. }
            | Self::Set { entity, .. }
            | Self::SetAll { entity, .. }
            | Self::SetModifierSet { entity, .. }
            | Self::Detach { entity } => EntityId(*entity),
        }
    }

    /// Change options for a [`ScenarioStep::Change`]; default otherwise.
    pub fn options(&self) -> ChangeOptions {
        match self {
            Self::Change {
                ignore_resistances,
                interrupts,
                origin,
                ..
            } => ChangeOptions {
                ignore_resistances: *ignore_resistances,
                interrupts: *interrupts,
                origin: origin.map(EntityId),
            },
            _ => ChangeOptions::default(),
        }
    }

    /// Ledger payload carried by the step, if any.
    pub fn ledger(&self) -> Option<AttributeLedger> {
        match self {
            Self::Change { delta, .. } => Some(AttributeLedger::from(delta.clone())),
            Self::Set { attributes, .. } => Some(AttributeLedger::from(attributes.clone())),
            _ => None,
        }
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a RON scenario.
    ///
    /// Entity ids must be unique and every step must target a declared entity.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let mut declared = BTreeSet::new();
        for entity in &scenario.entities {
            if !declared.insert(entity.id) {
                anyhow::bail!("Duplicate scenario entity {}", entity.id);
            }
        }

        for (index, step) in scenario.steps.iter().enumerate() {
            let EntityId(id) = step.entity();
            if !declared.contains(&id) {
                anyhow::bail!("Step {} targets undeclared entity {}", index, id);
            }
        }

        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"(
        name: Some("skirmish"),
        entities: [
            (id: 1, container: Some("Humanoid"), modifier_set: Some("Armored")),
            (id: 2),
        ],
        steps: [
            SetAll(entity: 1, value: 10.0),
            Change(entity: 1, delta: {"Body": 10.0}, interrupts: true, origin: Some(2)),
            Change(entity: 2, delta: {"Body": 1.5}, ignore_resistances: true),
            Detach(entity: 2),
        ],
    )"#;

    #[test]
    fn parses_steps() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();

        assert_eq!(scenario.name.as_deref(), Some("skirmish"));
        assert_eq!(scenario.entities[1].spec(), AttributableSpec::new());
        assert_eq!(scenario.steps.len(), 4);

        let hit = &scenario.steps[1];
        assert_eq!(hit.entity(), EntityId(1));
        assert_eq!(
            hit.options(),
            ChangeOptions::new().interrupting().with_origin(EntityId(2))
        );
        assert_eq!(
            hit.ledger(),
            Some(AttributeLedger::with_value("Body", FixedPoint2::from_int(10)))
        );
        assert_eq!(
            scenario.steps[2].ledger().map(|l| l.get("Body")),
            Some(FixedPoint2::from_raw(150))
        );
    }

    #[test]
    fn rejects_undeclared_targets() {
        let err = ScenarioLoader::parse(
            r#"(entities: [(id: 1)], steps: [SetAll(entity: 9, value: 1.0)])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("undeclared entity 9"));
    }
}
