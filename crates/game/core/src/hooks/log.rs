//! Observer that reports realized changes through `tracing`.

use crate::engine::AttributeEngine;
use crate::events::AttributeChangedEvent;

use super::ChangeObserver;

/// Logs every realized change at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChangeLogObserver;

impl ChangeObserver for ChangeLogObserver {
    fn name(&self) -> &'static str {
        "change_log"
    }

    fn priority(&self) -> i32 {
        // After gameplay observers so the log reflects their nested changes
        100
    }

    fn attribute_changed(&self, _engine: &mut AttributeEngine, event: &AttributeChangedEvent) {
        match &event.delta {
            Some(delta) => tracing::info!(
                target: "attributes::changes",
                entity = %event.entity,
                delta = ?delta,
                total = %event.attributes.total(),
                increased = event.increased,
                interrupts = event.interrupts,
                origin = ?event.origin,
                "attributes changed"
            ),
            None => tracing::info!(
                target: "attributes::changes",
                entity = %event.entity,
                attributes = ?event.attributes,
                "attributes set"
            ),
        }
    }
}
