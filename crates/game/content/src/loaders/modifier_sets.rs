//! Modifier set loader.

use std::path::Path;

use attribute_core::ModifierSet;

use crate::loaders::{LoadResult, read_file};

/// Loader for modifier sets from RON files.
///
/// RON format: `Vec<(String, ModifierSet)>`
///
/// ```ron
/// [
///     ("Armored", (
///         coefficients: { "Body": 0.5 },
///         flat_reductions: { "Body": 3.0 },
///     )),
/// ]
/// ```
pub struct ModifierSetLoader;

impl ModifierSetLoader {
    /// Load modifier sets from a RON file.
    pub fn load(path: &Path, known_types: &[&str]) -> LoadResult<Vec<(String, ModifierSet)>> {
        let content = read_file(path)?;
        Self::parse(&content, known_types)
    }

    /// Parse and validate a RON modifier set list.
    ///
    /// Coefficients and flat reductions must be finite and non-negative.
    /// Entries for attribute types outside `known_types` are kept but logged,
    /// since they can never match a ledger key.
    pub fn parse(content: &str, known_types: &[&str]) -> LoadResult<Vec<(String, ModifierSet)>> {
        let sets: Vec<(String, ModifierSet)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse modifier sets RON: {}", e))?;

        for (id, set) in &sets {
            if sets.iter().filter(|(other, _)| other == id).count() > 1 {
                anyhow::bail!("Duplicate modifier set '{}'", id);
            }

            let entries = set
                .coefficients
                .iter()
                .map(|(attr, value)| ("coefficient", attr, *value))
                .chain(
                    set.flat_reductions
                        .iter()
                        .map(|(attr, value)| ("flat reduction", attr, *value)),
                );

            for (kind, attribute, value) in entries {
                if !value.is_finite() || value < 0.0 {
                    anyhow::bail!(
                        "Modifier set '{}' has invalid {} {} for '{}' (must be finite and >= 0)",
                        id,
                        kind,
                        value,
                        attribute
                    );
                }
                if !known_types.contains(&attribute.as_str()) {
                    tracing::warn!(
                        modifier_set = %id,
                        attribute = %attribute,
                        "modifier set references unknown attribute type"
                    );
                }
            }
        }

        Ok(sets)
    }
}
