//! Content loaders for reading attribute data from files.
//!
//! Each loader turns one RON/TOML file into core types. [`ContentFactory`]
//! ties them together into a ready-to-use registry.

pub mod attribute_types;
pub mod config;
pub mod containers;
pub mod factory;
pub mod modifier_sets;
pub mod scenario;

pub use attribute_types::AttributeTypeLoader;
pub use config::ConfigLoader;
pub use containers::ContainerLoader;
pub use factory::ContentFactory;
pub use modifier_sets::ModifierSetLoader;
pub use scenario::{Scenario, ScenarioEntity, ScenarioLoader, ScenarioStep};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
