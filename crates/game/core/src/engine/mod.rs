//! Per-entity attribute storage and the change pipeline.
//!
//! The [`AttributeEngine`] owns one [`Attributable`] per entity handle. Every
//! mutation flows through it so hooks, dirty tracking and notifications stay
//! consistent. Missing entities are a silent no-op everywhere: operations
//! return `None` or do nothing.

mod merge;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::events::{
    AttributeChangedEvent, AttributeModifyEvent, BeforeAttributeChangedEvent, ChangeOptions,
};
use crate::fixed::FixedPoint2;
use crate::hooks::{ChangeObserver, HookRegistry, ModifyHook, PreChangeHook};
use crate::ledger::AttributeLedger;
use crate::modifier::apply_modifier_set;
use crate::registry::ConfigRegistry;
use crate::state::{Attributable, AttributableSpec, AttributableState, EntityId};

use merge::merge_floored;

const TARGET: &str = "attributes::engine";

/// Owns every entity's ledger and routes changes through registered hooks.
pub struct AttributeEngine {
    registry: Arc<dyn ConfigRegistry>,
    config: EngineConfig,
    entities: BTreeMap<EntityId, Attributable>,
    hooks: HookRegistry,
    dirty: BTreeSet<EntityId>,
    depth: u32,
}

impl AttributeEngine {
    /// Creates an engine with the default [`EngineConfig`].
    pub fn new(registry: Arc<dyn ConfigRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: Arc<dyn ConfigRegistry>, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            entities: BTreeMap::new(),
            hooks: HookRegistry::new(),
            dirty: BTreeSet::new(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &dyn ConfigRegistry {
        self.registry.as_ref()
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn register_pre_change(&mut self, hook: Arc<dyn PreChangeHook>) {
        self.hooks.register_pre_change(hook);
    }

    pub fn register_modify(&mut self, hook: Arc<dyn ModifyHook>) {
        self.hooks.register_modify(hook);
    }

    pub fn register_observer(&mut self, observer: Arc<dyn ChangeObserver>) {
        self.hooks.register_observer(observer);
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    /// Attaches a ledger to `entity`, seeding every permitted attribute with zero.
    ///
    /// Permitted attributes come from the requested container; an absent or
    /// unresolvable container permits every known attribute type. Attaching
    /// an entity twice keeps existing values and only adds missing keys.
    pub fn attach(&mut self, entity: EntityId, spec: AttributableSpec) {
        let permitted = self.permitted_types(spec.container_id.as_deref());

        let attachment = self.entities.entry(entity).or_default();
        attachment.container_id = spec.container_id;
        attachment.modifier_set_id = spec.modifier_set_id;

        let added = permitted
            .into_iter()
            .filter(|id| attachment.attributes.try_insert(id.as_str(), FixedPoint2::ZERO))
            .count();

        tracing::debug!(
            target: TARGET,
            entity = %entity,
            container = ?attachment.container_id,
            modifier_set = ?attachment.modifier_set_id,
            attributes = attachment.attributes.len(),
            added,
            "attached attributes"
        );
    }

    /// Drops the attachment, returning it if one existed.
    pub fn detach(&mut self, entity: EntityId) -> Option<Attributable> {
        self.dirty.remove(&entity);
        let removed = self.entities.remove(&entity);
        if removed.is_some() {
            tracing::debug!(target: TARGET, entity = %entity, "detached attributes");
        }
        removed
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn ledger(&self, entity: EntityId) -> Option<&AttributeLedger> {
        self.entities.get(&entity).map(|a| &a.attributes)
    }

    pub fn attachment(&self, entity: EntityId) -> Option<&Attributable> {
        self.entities.get(&entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    fn permitted_types(&self, container_id: Option<&str>) -> Vec<String> {
        if let Some(id) = container_id {
            match self.registry.container(id) {
                Some(container) => return container.supported_types.clone(),
                None => tracing::warn!(
                    target: TARGET,
                    container = id,
                    "unknown attribute container; permitting every attribute type"
                ),
            }
        }

        self.registry
            .attribute_type_ids()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Applies `delta` to the entity's ledger.
    ///
    /// Returns `None` if the entity has no ledger, a pre-change hook cancelled
    /// the request, or hooks nested deeper than
    /// [`EngineConfig::max_nesting_depth`]. Otherwise returns the realized
    /// delta, which is empty when nothing changed.
    pub fn try_change_attribute(
        &mut self,
        entity: EntityId,
        delta: AttributeLedger,
        options: ChangeOptions,
    ) -> Option<AttributeLedger> {
        if !self.contains(entity) {
            return None;
        }

        if delta.is_empty() {
            return Some(delta);
        }

        if self.depth >= self.config.max_nesting_depth {
            tracing::warn!(
                target: TARGET,
                entity = %entity,
                depth = self.depth,
                max = self.config.max_nesting_depth,
                "attribute change nested too deeply; refusing"
            );
            return None;
        }

        self.depth += 1;
        let realized = self.change_attribute(entity, delta, options);
        self.depth -= 1;
        realized
    }

    fn change_attribute(
        &mut self,
        entity: EntityId,
        delta: AttributeLedger,
        options: ChangeOptions,
    ) -> Option<AttributeLedger> {
        let mut before = BeforeAttributeChangedEvent::new(delta, options.origin);
        let pre_change = self.hooks.pre_change();
        for hook in pre_change.iter() {
            hook.before_change(self, entity, &mut before);
            if before.is_cancelled() {
                tracing::debug!(
                    target: TARGET,
                    entity = %entity,
                    hook = hook.name(),
                    "attribute change cancelled"
                );
                return None;
            }
        }
        let mut delta = before.into_delta();

        if !options.ignore_resistances {
            delta = self.apply_resistances(entity, delta, options.origin)?;
            if delta.is_empty() {
                return Some(delta);
            }
        }

        // Hooks may have detached the entity
        let attachment = self.entities.get_mut(&entity)?;
        let realized = merge_floored(&mut attachment.attributes, &delta);

        tracing::trace!(
            target: TARGET,
            entity = %entity,
            requested = delta.len(),
            realized = realized.len(),
            "merged attribute delta"
        );

        if !realized.is_empty() {
            self.attribute_changed(entity, Some(realized.clone()), options.interrupts, options.origin);
        }

        Some(realized)
    }

    /// Runs the entity's modifier set followed by the modify hooks.
    fn apply_resistances(
        &mut self,
        entity: EntityId,
        delta: AttributeLedger,
        origin: Option<EntityId>,
    ) -> Option<AttributeLedger> {
        let modifier_set_id = self.entities.get(&entity)?.modifier_set_id.clone();

        let delta = match modifier_set_id {
            Some(id) => match self.registry.modifier_set(&id) {
                Some(set) => apply_modifier_set(&delta, set),
                None => {
                    tracing::warn!(
                        target: TARGET,
                        entity = %entity,
                        modifier_set = %id,
                        "unknown modifier set; delta passes unmodified"
                    );
                    delta
                }
            },
            None => delta,
        };

        let mut event = AttributeModifyEvent::new(delta, origin);
        let modify = self.hooks.modify();
        for hook in modify.iter() {
            hook.modify(self, entity, &mut event);
        }

        Some(event.attributes)
    }

    /// Replaces the entity's ledger wholesale.
    ///
    /// Observers receive `delta = None`: a direct set is neither damage nor healing.
    pub fn set_attributes(&mut self, entity: EntityId, attributes: AttributeLedger) {
        let Some(attachment) = self.entities.get_mut(&entity) else {
            return;
        };
        attachment.attributes = attributes;
        self.attribute_changed(entity, None, false, None);
    }

    /// Overwrites every present attribute with `value`.
    ///
    /// Negative values are ignored. Observers receive an explicit empty delta.
    pub fn set_all_attributes(&mut self, entity: EntityId, value: FixedPoint2) {
        if value.is_negative() {
            return;
        }
        let Some(attachment) = self.entities.get_mut(&entity) else {
            return;
        };

        let ids: Vec<String> = attachment.attributes.keys().map(str::to_owned).collect();
        for id in ids {
            attachment.attributes.insert(id, value);
        }
        self.attribute_changed(entity, Some(AttributeLedger::new()), false, None);
    }

    /// Points the entity at a different modifier set.
    pub fn set_modifier_set_id(&mut self, entity: EntityId, modifier_set_id: Option<String>) {
        let Some(attachment) = self.entities.get_mut(&entity) else {
            return;
        };
        attachment.modifier_set_id = modifier_set_id;
        self.dirty.insert(entity);
    }

    // ========================================================================
    // Replication
    // ========================================================================

    /// Snapshot of the entity for remote observers.
    pub fn get_state(&self, entity: EntityId) -> Option<AttributableState> {
        self.entities.get(&entity).map(Attributable::to_state)
    }

    /// Adopts an authoritative snapshot.
    ///
    /// The modifier-set id is always taken over. The ledger is replaced only if
    /// it differs, in which case observers receive `current - incoming`.
    /// Reconciled state is not marked dirty again.
    pub fn handle_state(&mut self, entity: EntityId, state: AttributableState) {
        let Some(attachment) = self.entities.get_mut(&entity) else {
            return;
        };
        attachment.modifier_set_id = state.modifier_set_id;

        let incoming = AttributeLedger::from(state.attributes);
        let mut delta = &attachment.attributes - &incoming;
        delta.trim_zeros();
        if delta.is_empty() {
            return;
        }

        tracing::debug!(
            target: TARGET,
            entity = %entity,
            changed = delta.len(),
            "reconciled attributes from state"
        );

        attachment.attributes = incoming;
        self.notify(entity, Some(delta), false, None);
    }

    /// Drains the set of entities changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn is_dirty(&self, entity: EntityId) -> bool {
        self.dirty.contains(&entity)
    }

    // ========================================================================
    // Notification
    // ========================================================================

    fn attribute_changed(
        &mut self,
        entity: EntityId,
        delta: Option<AttributeLedger>,
        interrupts: bool,
        origin: Option<EntityId>,
    ) {
        self.dirty.insert(entity);
        self.notify(entity, delta, interrupts, origin);
    }

    fn notify(
        &mut self,
        entity: EntityId,
        delta: Option<AttributeLedger>,
        interrupts: bool,
        origin: Option<EntityId>,
    ) {
        let Some(attachment) = self.entities.get(&entity) else {
            return;
        };
        let event =
            AttributeChangedEvent::new(entity, attachment.attributes.clone(), delta, interrupts, origin);

        let observers = self.hooks.observers();
        for observer in observers.iter() {
            observer.attribute_changed(self, &event);
        }
    }
}

impl std::fmt::Debug for AttributeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeEngine")
            .field("config", &self.config)
            .field("entities", &self.entities)
            .field("hooks", &self.hooks)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
