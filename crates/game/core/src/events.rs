//! Notification payloads raised by the engine.
//!
//! Every attribute change goes through the same sequence:
//!
//! ```text
//! BeforeAttributeChangedEvent  (cancellable)
//!   → modifier set + AttributeModifyEvent  (unless resistances are ignored)
//!   → merge into the stored ledger
//!   → AttributeChangedEvent  (only if something actually changed)
//! ```

use crate::ledger::AttributeLedger;
use crate::state::EntityId;

/// Per-call options for [`AttributeEngine::try_change_attribute`].
///
/// [`AttributeEngine::try_change_attribute`]: crate::engine::AttributeEngine::try_change_attribute
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Skip the entity's modifier set and the modify hooks.
    pub ignore_resistances: bool,
    /// Request that the change interrupt in-progress work on the target.
    /// Only honoured when the realized delta increased some attribute.
    pub interrupts: bool,
    /// Entity responsible for the change, if any.
    pub origin: Option<EntityId>,
}

impl ChangeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass resistances (builder pattern)
    pub fn ignore_resistances(mut self) -> Self {
        self.ignore_resistances = true;
        self
    }

    /// Request interruption (builder pattern)
    pub fn interrupting(mut self) -> Self {
        self.interrupts = true;
        self
    }

    /// Attach an origin (builder pattern)
    pub fn with_origin(mut self, origin: EntityId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Raised before any change is applied, so observers can veto it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeforeAttributeChangedEvent {
    delta: AttributeLedger,
    origin: Option<EntityId>,
    cancelled: bool,
}

impl BeforeAttributeChangedEvent {
    pub fn new(delta: AttributeLedger, origin: Option<EntityId>) -> Self {
        Self {
            delta,
            origin,
            cancelled: false,
        }
    }

    /// The delta as requested by the caller.
    pub fn delta(&self) -> &AttributeLedger {
        &self.delta
    }

    pub fn origin(&self) -> Option<EntityId> {
        self.origin
    }

    /// Vetoes the change. No mutation and no further events will happen.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn into_delta(self) -> AttributeLedger {
        self.delta
    }
}

/// Raised after the entity's own modifier set ran, letting other collaborators
/// (worn armour, auras) transform the delta further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeModifyEvent {
    /// Delta as it entered the modify stage.
    pub original: AttributeLedger,
    /// Delta that will be merged. Hooks replace or edit this.
    pub attributes: AttributeLedger,
    pub origin: Option<EntityId>,
}

impl AttributeModifyEvent {
    pub fn new(attributes: AttributeLedger, origin: Option<EntityId>) -> Self {
        Self {
            original: attributes.clone(),
            attributes,
            origin,
        }
    }
}

/// Raised after a ledger changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeChangedEvent {
    pub entity: EntityId,

    /// Ledger contents after the change.
    pub attributes: AttributeLedger,

    /// Realized change. `None` when the ledger was set directly rather than
    /// changed by a delta; observers must not treat that as damage or healing.
    pub delta: Option<AttributeLedger>,

    /// True iff some realized entry is strictly positive.
    pub increased: bool,

    /// Interruption requested by the caller *and* `increased`.
    pub interrupts: bool,

    pub origin: Option<EntityId>,
}

impl AttributeChangedEvent {
    pub fn new(
        entity: EntityId,
        attributes: AttributeLedger,
        delta: Option<AttributeLedger>,
        interrupts: bool,
        origin: Option<EntityId>,
    ) -> Self {
        let increased = delta.as_ref().is_some_and(AttributeLedger::any_positive);
        Self {
            entity,
            attributes,
            delta,
            increased,
            interrupts: interrupts && increased,
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FixedPoint2;

    #[test]
    fn interrupt_requires_increase() {
        let healing = AttributeLedger::with_value("Body", FixedPoint2::from_int(-2));
        let event = AttributeChangedEvent::new(
            EntityId(1),
            AttributeLedger::new(),
            Some(healing),
            true,
            None,
        );
        assert!(!event.increased);
        assert!(!event.interrupts);

        let damage = AttributeLedger::with_value("Body", FixedPoint2::from_int(2));
        let event =
            AttributeChangedEvent::new(EntityId(1), AttributeLedger::new(), Some(damage), true, None);
        assert!(event.increased);
        assert!(event.interrupts);
    }

    #[test]
    fn hard_set_never_counts_as_increase() {
        let event = AttributeChangedEvent::new(EntityId(1), AttributeLedger::new(), None, true, None);
        assert!(!event.increased);
        assert!(!event.interrupts);
    }

    #[test]
    fn cancel_is_sticky() {
        let mut event = BeforeAttributeChangedEvent::new(AttributeLedger::new(), Some(EntityId(4)));
        assert!(!event.is_cancelled());
        event.cancel();
        assert!(event.is_cancelled());
        assert_eq!(event.origin(), Some(EntityId(4)));
    }
}
