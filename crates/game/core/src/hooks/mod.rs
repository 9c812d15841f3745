//! Observer hooks attached to the attribute engine.
//!
//! Collaborators plug into three stages of an attribute change:
//! - [`PreChangeHook`]: inspects the requested delta and may cancel it
//! - [`ModifyHook`]: rewrites the delta after the entity's own modifier set
//! - [`ChangeObserver`]: reacts to the realized change
//!
//! # Execution Order
//!
//! Within each stage hooks run by priority (lower values first). Hooks receive
//! `&mut AttributeEngine` and may call back into it; the engine re-reads the
//! target ledger after every stage, so nested changes are never overwritten
//! by a stale snapshot.

mod log;
mod modifier;
mod registry;

pub use log::ChangeLogObserver;
pub use modifier::ModifierSetHook;
pub use registry::HookRegistry;

use crate::engine::AttributeEngine;
use crate::events::{AttributeChangedEvent, AttributeModifyEvent, BeforeAttributeChangedEvent};
use crate::state::EntityId;

/// Runs before a change is applied and may veto it.
pub trait PreChangeHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Lower values execute first.
    fn priority(&self) -> i32 {
        0
    }

    /// Inspect the request. Call [`BeforeAttributeChangedEvent::cancel`] to abort.
    fn before_change(
        &self,
        engine: &mut AttributeEngine,
        entity: EntityId,
        event: &mut BeforeAttributeChangedEvent,
    );
}

/// Transforms a delta after resistances and before the merge.
pub trait ModifyHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    /// Edit or replace `event.attributes`; leaving it untouched is a no-op.
    fn modify(&self, engine: &mut AttributeEngine, entity: EntityId, event: &mut AttributeModifyEvent);
}

/// Receives realized changes.
pub trait ChangeObserver: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    fn attribute_changed(&self, engine: &mut AttributeEngine, event: &AttributeChangedEvent);
}
