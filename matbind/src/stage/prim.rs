//! Prims and relationships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Collection;
use crate::binding::Strength;
use crate::path::ScenePath;

/// A named, ordered list of target paths owned by one prim.
///
/// An authored relationship with no targets is *blocked*: it exists, and it
/// hides whatever a weaker opinion would otherwise contribute.
///
/// # Examples
///
/// ```
/// use matbind::binding::Strength;
/// use matbind::path::ScenePath;
/// use matbind::stage::Relationship;
///
/// let material = ScenePath::parse("/Materials/Red").unwrap();
/// let rel = Relationship::new("material:binding", vec![material])
///     .with_strength(Strength::StrongerThanDescendants);
/// assert!(!rel.is_blocked());
/// assert!(Relationship::blocked("material:binding").is_blocked());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relationship {
    /// Namespaced relationship name.
    pub name: String,

    /// Target paths, in authored order.
    #[serde(default)]
    pub targets: Vec<ScenePath>,

    /// The `bindMaterialAs` metadata.
    #[serde(default, skip_serializing_if = "is_fallback")]
    pub strength: Strength,

    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: BTreeMap<String, String>,
}

fn is_fallback(strength: &Strength) -> bool {
    *strength == Strength::FallbackStrength
}

impl Relationship {
    /// Creates a relationship with the given targets and fallback strength.
    #[must_use]
    pub fn new(name: impl Into<String>, targets: Vec<ScenePath>) -> Self {
        Self {
            name: name.into(),
            targets,
            strength: Strength::FallbackStrength,
            custom_data: BTreeMap::new(),
        }
    }

    /// Creates a blocked relationship.
    #[must_use]
    pub fn blocked(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Sets the strength metadata.
    #[must_use]
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Adds a custom data entry.
    #[must_use]
    pub fn with_custom_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the relationship has no targets.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A node in the scene hierarchy.
///
/// Prims are owned by a [`Stage`](super::Stage) and referenced everywhere
/// else by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prim {
    path: ScenePath,
    type_name: String,
    active: bool,
    children: Vec<String>,
    relationships: BTreeMap<String, Relationship>,
    applied_schemas: Vec<String>,
    collections: BTreeMap<String, Collection>,
    custom_data: BTreeMap<String, String>,
}

impl Prim {
    /// Creates an active prim with no children or properties.
    #[must_use]
    pub fn new(path: ScenePath, type_name: impl Into<String>) -> Self {
        Self {
            path,
            type_name: type_name.into(),
            active: true,
            children: Vec::new(),
            relationships: BTreeMap::new(),
            applied_schemas: Vec::new(),
            collections: BTreeMap::new(),
            custom_data: BTreeMap::new(),
        }
    }

    /// The prim's path.
    #[must_use]
    pub fn path(&self) -> &ScenePath {
        &self.path
    }

    /// The schema type name (empty for typeless prims).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Sets the schema type name.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    /// Whether the prim is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Child prim names, in authored order.
    #[must_use]
    pub fn child_names(&self) -> &[String] {
        &self.children
    }

    pub(super) fn add_child(&mut self, name: &str) {
        if !self.children.iter().any(|c| c == name) {
            self.children.push(name.to_string());
        }
    }

    /// Looks up a relationship by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// All relationships, ordered by name.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Authors a relationship, replacing any existing one of the same name.
    pub fn set_relationship(&mut self, relationship: Relationship) {
        self.relationships
            .insert(relationship.name.clone(), relationship);
    }

    /// Applied API schemas, in application order.
    #[must_use]
    pub fn applied_schemas(&self) -> &[String] {
        &self.applied_schemas
    }

    /// Returns `true` if the schema has been applied.
    #[must_use]
    pub fn has_api_schema(&self, schema: &str) -> bool {
        self.applied_schemas.iter().any(|s| s == schema)
    }

    /// Applies an API schema; applying twice is a no-op.
    pub fn apply_api_schema(&mut self, schema: &str) {
        if !self.has_api_schema(schema) {
            self.applied_schemas.push(schema.to_string());
        }
    }

    /// Looks up a collection by name.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Looks up a collection by name for editing.
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// All collections, ordered by name.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub(super) fn insert_collection(&mut self, collection: Collection) -> &mut Collection {
        let name = collection.name.clone();
        self.collections.entry(name).or_insert(collection)
    }

    /// Reads a custom data entry.
    #[must_use]
    pub fn custom_data(&self, key: &str) -> Option<&str> {
        self.custom_data.get(key).map(String::as_str)
    }

    /// All custom data entries.
    #[must_use]
    pub fn custom_data_map(&self) -> &BTreeMap<String, String> {
        &self.custom_data
    }

    /// Writes a custom data entry.
    pub fn set_custom_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom_data.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_relationship_replace() {
        let mut prim = Prim::new(p("/World"), "Xform");
        prim.set_relationship(Relationship::new("material:binding", vec![p("/M1")]));
        prim.set_relationship(Relationship::new("material:binding", vec![p("/M2")]));
        assert_eq!(prim.relationships().count(), 1);
        assert_eq!(
            prim.relationship("material:binding").unwrap().targets,
            vec![p("/M2")]
        );
    }

    #[test]
    fn test_apply_schema_is_idempotent() {
        let mut prim = Prim::new(p("/World"), "Xform");
        prim.apply_api_schema("MaterialBindingAPI");
        prim.apply_api_schema("MaterialBindingAPI");
        assert_eq!(prim.applied_schemas(), ["MaterialBindingAPI".to_string()]);
    }

    #[test]
    fn test_relationship_serde_defaults() {
        let rel: Relationship =
            serde_yaml::from_str("name: material:binding\ntargets: [/M]\n").unwrap();
        assert_eq!(rel.strength, Strength::FallbackStrength);
        assert!(rel.custom_data.is_empty());

        let yaml = serde_yaml::to_string(&rel).unwrap();
        assert!(!yaml.contains("strength"));
    }
}
