//! Attribute type catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use attribute_core::AttributeTypeDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for attribute type definitions from RON files.
///
/// RON format: `Vec<AttributeTypeDefinition>`
///
/// ```ron
/// [
///     (id: "Strength", name: "attribute-strength-name"),
///     (id: "Body", name: "attribute-body-name"),
/// ]
/// ```
pub struct AttributeTypeLoader;

impl AttributeTypeLoader {
    /// Load attribute types from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<AttributeTypeDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a RON attribute type catalog.
    ///
    /// Ids must be non-empty and unique.
    pub fn parse(content: &str) -> LoadResult<Vec<AttributeTypeDefinition>> {
        let types: Vec<AttributeTypeDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse attribute types RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for definition in &types {
            if definition.id.trim().is_empty() {
                anyhow::bail!("Attribute type with empty id (name '{}')", definition.name);
            }
            if !seen.insert(definition.id.as_str()) {
                anyhow::bail!("Duplicate attribute type '{}'", definition.id);
            }
        }

        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog() {
        let types = AttributeTypeLoader::parse(
            r#"[
                (id: "Strength", name: "attribute-strength-name"),
                (id: "Body", name: "attribute-body-name"),
            ]"#,
        )
        .unwrap();

        assert_eq!(types.len(), 2);
        assert_eq!(types[1], AttributeTypeDefinition::new("Body", "attribute-body-name"));
    }

    #[test]
    fn rejects_duplicates() {
        let err = AttributeTypeLoader::parse(
            r#"[(id: "Body", name: "a"), (id: "Body", name: "b")]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate attribute type 'Body'"));
    }
}
