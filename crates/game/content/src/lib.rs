//! Data-driven attribute definitions and loaders.
//!
//! This crate reads the definitions the attribute engine resolves at runtime:
//! - Attribute types (data-driven via RON)
//! - Container specifications (data-driven via RON)
//! - Modifier sets (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//! - Scripted scenarios for replaying attribute operations (RON)
//!
//! Everything loaded here ends up in an [`attribute_core::InMemoryRegistry`]
//! or [`attribute_core::EngineConfig`]; the core never touches files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AttributeTypeLoader, ConfigLoader, ContainerLoader, ContentFactory, LoadResult,
    ModifierSetLoader, Scenario, ScenarioEntity, ScenarioLoader, ScenarioStep,
};
