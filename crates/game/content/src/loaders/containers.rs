//! Container specification loader.

use std::collections::BTreeSet;
use std::path::Path;

use attribute_core::ContainerSpec;

use crate::loaders::{LoadResult, read_file};

/// Loader for container specifications from RON files.
///
/// RON format: `Vec<ContainerSpec>`
///
/// ```ron
/// [
///     (id: "Humanoid", supported_types: ["Strength", "Dexterity", "Body"]),
/// ]
/// ```
pub struct ContainerLoader;

impl ContainerLoader {
    /// Load containers from a RON file, validating them against `known_types`.
    pub fn load(path: &Path, known_types: &[&str]) -> LoadResult<Vec<ContainerSpec>> {
        let content = read_file(path)?;
        Self::parse(&content, known_types)
    }

    /// Parse and validate a RON container list.
    ///
    /// Container ids must be unique and every supported type must be one of
    /// `known_types`. Repeated types inside one container are collapsed.
    pub fn parse(content: &str, known_types: &[&str]) -> LoadResult<Vec<ContainerSpec>> {
        let raw: Vec<ContainerSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse containers RON: {}", e))?;

        let mut seen = BTreeSet::new();
        let mut containers = Vec::with_capacity(raw.len());
        for container in raw {
            if !seen.insert(container.id.clone()) {
                anyhow::bail!("Duplicate container '{}'", container.id);
            }

            let mut types = BTreeSet::new();
            let mut supported = Vec::with_capacity(container.supported_types.len());
            for type_id in container.supported_types {
                if !known_types.contains(&type_id.as_str()) {
                    anyhow::bail!(
                        "Container '{}' references unknown attribute type '{}'",
                        container.id,
                        type_id
                    );
                }
                if types.insert(type_id.clone()) {
                    supported.push(type_id);
                } else {
                    tracing::warn!(
                        container = %container.id,
                        attribute = %type_id,
                        "duplicate attribute type in container"
                    );
                }
            }

            containers.push(ContainerSpec::new(container.id, supported));
        }

        Ok(containers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &[&str] = &["Strength", "Dexterity", "Body"];

    #[test]
    fn parses_and_preserves_order() {
        let containers = ContainerLoader::parse(
            r#"[(id: "Humanoid", supported_types: ["Body", "Strength", "Body"])]"#,
            KNOWN,
        )
        .unwrap();

        assert_eq!(containers, vec![ContainerSpec::new("Humanoid", ["Body", "Strength"])]);
    }

    #[test]
    fn rejects_unknown_types() {
        let err = ContainerLoader::parse(
            r#"[(id: "Golem", supported_types: ["Stone"])]"#,
            KNOWN,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'Golem'"));
        assert!(err.to_string().contains("'Stone'"));
    }
}
