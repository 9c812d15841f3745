//! Modify hook that layers extra modifier sets on top of an entity's own.

use std::collections::BTreeMap;

use crate::engine::AttributeEngine;
use crate::events::AttributeModifyEvent;
use crate::modifier::{ModifierSet, apply_modifier_sets};
use crate::state::EntityId;

use super::ModifyHook;

/// Applies additional modifier sets to deltas aimed at specific entities.
///
/// Stands in for worn equipment or auras: each entity maps to an ordered
/// list of sets, folded over the delta after the entity's own set ran.
#[derive(Clone, Debug, Default)]
pub struct ModifierSetHook {
    sets: BTreeMap<EntityId, Vec<ModifierSet>>,
}

impl ModifierSetHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set for `entity` (builder pattern)
    pub fn with_set(mut self, entity: EntityId, set: ModifierSet) -> Self {
        self.sets.entry(entity).or_default().push(set);
        self
    }

    pub fn sets_for(&self, entity: EntityId) -> &[ModifierSet] {
        self.sets.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ModifyHook for ModifierSetHook {
    fn name(&self) -> &'static str {
        "modifier_sets"
    }

    fn modify(&self, _engine: &mut AttributeEngine, entity: EntityId, event: &mut AttributeModifyEvent) {
        let sets = self.sets_for(entity);
        if sets.is_empty() {
            return;
        }
        event.attributes = apply_modifier_sets(&event.attributes, sets);
    }
}
