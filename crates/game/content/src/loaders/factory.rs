//! Content factory for building a registry from data files.

use std::path::{Path, PathBuf};

use attribute_core::{
    AttributeTypeDefinition, ContainerSpec, EngineConfig, InMemoryRegistry, ModifierSet,
};

use crate::loaders::{
    AttributeTypeLoader, ConfigLoader, ContainerLoader, LoadResult, ModifierSetLoader, Scenario,
    ScenarioLoader,
};

/// Content factory that loads all attribute content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── attribute_types.ron
/// ├── containers.ron
/// ├── modifier_sets.ron
/// └── scenarios/
///     └── skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config.toml; using defaults");
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load attribute types from `attribute_types.ron`.
    pub fn load_attribute_types(&self) -> LoadResult<Vec<AttributeTypeDefinition>> {
        let path = self.data_dir.join("attribute_types.ron");
        AttributeTypeLoader::load(&path)
    }

    /// Load containers from `containers.ron`.
    pub fn load_containers(&self, known_types: &[&str]) -> LoadResult<Vec<ContainerSpec>> {
        let path = self.data_dir.join("containers.ron");
        ContainerLoader::load(&path, known_types)
    }

    /// Load modifier sets from `modifier_sets.ron`.
    pub fn load_modifier_sets(&self, known_types: &[&str]) -> LoadResult<Vec<(String, ModifierSet)>> {
        let path = self.data_dir.join("modifier_sets.ron");
        ModifierSetLoader::load(&path, known_types)
    }

    /// Load every definition file into a registry.
    pub fn load_registry(&self) -> LoadResult<InMemoryRegistry> {
        let types = self.load_attribute_types()?;
        let known: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
        let containers = self.load_containers(&known)?;
        let modifier_sets = self.load_modifier_sets(&known)?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            attribute_types = types.len(),
            containers = containers.len(),
            modifier_sets = modifier_sets.len(),
            "loaded attribute content"
        );

        let mut registry = InMemoryRegistry::new();
        for container in containers {
            registry.insert_container(container);
        }
        for (id, set) in modifier_sets {
            registry.insert_modifier_set(id, set);
        }
        for definition in types {
            registry.insert_attribute_type(definition);
        }
        Ok(registry)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self
            .data_dir
            .join("scenarios")
            .join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use attribute_core::ConfigRegistry;

    use super::*;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join("config.toml"), "max_nesting_depth = 4\n").unwrap();
        fs::write(
            dir.join("attribute_types.ron"),
            r#"[
                (id: "Strength", name: "attribute-strength-name"),
                (id: "Body", name: "attribute-body-name"),
            ]"#,
        )
        .unwrap();
        fs::write(
            dir.join("containers.ron"),
            r#"[(id: "Humanoid", supported_types: ["Strength", "Body"])]"#,
        )
        .unwrap();
        fs::write(
            dir.join("modifier_sets.ron"),
            r#"[("Armored", (coefficients: {"Body": 0.5}, flat_reductions: {"Body": 3.0}))]"#,
        )
        .unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_registry_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap().max_nesting_depth, 4);

        let registry = factory.load_registry().unwrap();
        assert_eq!(registry.attribute_type_ids(), vec!["Body", "Strength"]);
        assert_eq!(
            registry.container("Humanoid").map(|c| c.supported_types.len()),
            Some(2)
        );
        assert!(registry.modifier_set("Armored").is_some());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn missing_definitions_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_registry().unwrap_err();
        assert!(err.to_string().contains("attribute_types.ron"));
    }

    #[test]
    fn invalid_container_aborts_registry() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join("containers.ron"),
            r#"[(id: "Golem", supported_types: ["Stone"])]"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_registry().unwrap_err();
        assert!(err.to_string().contains("unknown attribute type 'Stone'"));
    }
}
