//! Read-only definition lookups injected into the engine.
//!
//! The engine never loads or parses configuration. It resolves attribute
//! types, container specifications and modifier sets through a
//! [`ConfigRegistry`], which callers build however they like (the content
//! crate loads one from RON files, tests assemble an [`InMemoryRegistry`]).

use std::collections::BTreeMap;

use crate::known::KnownAttribute;
use crate::modifier::ModifierSet;

/// Definition of a single attribute type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeTypeDefinition {
    pub id: String,
    /// Localisation key for the display name.
    pub name: String,
}

impl AttributeTypeDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<KnownAttribute> for AttributeTypeDefinition {
    fn from(attribute: KnownAttribute) -> Self {
        Self::new(attribute.id(), attribute.name_key())
    }
}

/// Ordered list of attribute types an entity's ledger may hold.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerSpec {
    pub id: String,
    pub supported_types: Vec<String>,
}

impl ContainerSpec {
    pub fn new<I, S>(id: impl Into<String>, supported_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            supported_types: supported_types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolves definitions by identifier.
///
/// Every lookup is fallible by absence only: an unknown id returns `None`
/// and the engine falls back to its documented default.
pub trait ConfigRegistry: Send + Sync {
    /// Returns the attribute type with the given id.
    fn attribute_type(&self, id: &str) -> Option<&AttributeTypeDefinition>;

    /// Returns the ids of every known attribute type.
    fn attribute_type_ids(&self) -> Vec<&str>;

    /// Returns the container specification with the given id.
    fn container(&self, id: &str) -> Option<&ContainerSpec>;

    /// Returns the modifier set with the given id.
    fn modifier_set(&self, id: &str) -> Option<&ModifierSet>;
}

/// Map-backed [`ConfigRegistry`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryRegistry {
    attribute_types: BTreeMap<String, AttributeTypeDefinition>,
    containers: BTreeMap<String, ContainerSpec>,
    modifier_sets: BTreeMap<String, ModifierSet>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every [`KnownAttribute`].
    pub fn with_known_attributes() -> Self {
        use strum::IntoEnumIterator;

        KnownAttribute::iter().fold(Self::new(), |registry, attribute| {
            registry.with_attribute_type(attribute.into())
        })
    }

    pub fn insert_attribute_type(&mut self, definition: AttributeTypeDefinition) {
        self.attribute_types.insert(definition.id.clone(), definition);
    }

    pub fn insert_container(&mut self, container: ContainerSpec) {
        self.containers.insert(container.id.clone(), container);
    }

    pub fn insert_modifier_set(&mut self, id: impl Into<String>, set: ModifierSet) {
        self.modifier_sets.insert(id.into(), set);
    }

    /// Add an attribute type (builder pattern)
    pub fn with_attribute_type(mut self, definition: AttributeTypeDefinition) -> Self {
        self.insert_attribute_type(definition);
        self
    }

    /// Add a container specification (builder pattern)
    pub fn with_container(mut self, container: ContainerSpec) -> Self {
        self.insert_container(container);
        self
    }

    /// Add a modifier set (builder pattern)
    pub fn with_modifier_set(mut self, id: impl Into<String>, set: ModifierSet) -> Self {
        self.insert_modifier_set(id, set);
        self
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerSpec> + '_ {
        self.containers.values()
    }

    pub fn modifier_sets(&self) -> impl Iterator<Item = (&str, &ModifierSet)> + '_ {
        self.modifier_sets.iter().map(|(id, set)| (id.as_str(), set))
    }
}

impl ConfigRegistry for InMemoryRegistry {
    fn attribute_type(&self, id: &str) -> Option<&AttributeTypeDefinition> {
        self.attribute_types.get(id)
    }

    fn attribute_type_ids(&self) -> Vec<&str> {
        self.attribute_types.keys().map(String::as_str).collect()
    }

    fn container(&self, id: &str) -> Option<&ContainerSpec> {
        self.containers.get(id)
    }

    fn modifier_set(&self, id: &str) -> Option<&ModifierSet> {
        self.modifier_sets.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_attributes_are_registered() {
        let registry = InMemoryRegistry::with_known_attributes();
        let ids = registry.attribute_type_ids();
        assert_eq!(ids.len(), 6);
        assert!(ids.contains(&"Strength"));
        assert_eq!(
            registry.attribute_type("Wisdom").map(|d| d.name.as_str()),
            Some("attribute-wisdom-name")
        );
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        let registry = InMemoryRegistry::new()
            .with_container(ContainerSpec::new("Humanoid", ["Strength", "Body"]))
            .with_modifier_set("Armored", ModifierSet::new().with_coefficient("Body", 0.5));

        assert!(registry.container("Humanoid").is_some());
        assert!(registry.container("Golem").is_none());
        assert!(registry.modifier_set("Armored").is_some());
        assert!(registry.modifier_set("Missing").is_none());
        assert!(registry.attribute_type("Strength").is_none());
    }
}
