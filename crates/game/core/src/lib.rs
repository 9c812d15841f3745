//! Deterministic attribute ledgers and the modifier engine that mutates them.
//!
//! `attribute-core` owns per-entity ledgers of named fixed-point values and
//! routes every change through resistances and observer hooks. It never loads
//! configuration itself: definitions arrive through an injected
//! [`ConfigRegistry`]. All state mutation flows through
//! [`engine::AttributeEngine`].
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod fixed;
pub mod hooks;
pub mod known;
pub mod ledger;
pub mod modifier;
pub mod registry;
pub mod state;

pub use config::EngineConfig;
pub use engine::AttributeEngine;
pub use error::{AttributeError, ErrorSeverity, LedgerError};
pub use events::{
    AttributeChangedEvent, AttributeModifyEvent, BeforeAttributeChangedEvent, ChangeOptions,
};
pub use fixed::FixedPoint2;
pub use hooks::{
    ChangeLogObserver, ChangeObserver, HookRegistry, ModifierSetHook, ModifyHook, PreChangeHook,
};
pub use known::KnownAttribute;
pub use ledger::AttributeLedger;
pub use modifier::{ModifierSet, apply_modifier_set, apply_modifier_sets};
pub use registry::{AttributeTypeDefinition, ConfigRegistry, ContainerSpec, InMemoryRegistry};
#[cfg(feature = "serde")]
pub use state::StateCodecError;
pub use state::{Attributable, AttributableSpec, AttributableState, EntityId};
