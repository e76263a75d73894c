//! The scene graph the binding core operates on.
//!
//! The core only talks to a scene through the [`SceneGraph`] capability
//! trait: look up prims and their children, read and author relationships,
//! apply API schemas, and read or edit collections. [`Stage`] is the
//! in-memory implementation used by the CLI and the tests.
//!
//! # Examples
//!
//! ```
//! use matbind::path::ScenePath;
//! use matbind::stage::{SceneGraph, Stage};
//!
//! let mut stage = Stage::new();
//! stage.define_prim(&ScenePath::parse("/World/Geo").unwrap(), "Mesh").unwrap();
//!
//! let world = ScenePath::parse("/World").unwrap();
//! assert!(stage.has_prim(&world));
//! assert_eq!(stage.children(&world).len(), 1);
//! ```

pub mod collection;
pub mod document;
pub mod prim;

#[cfg(test)]
pub(crate) mod test_util;

use std::collections::BTreeMap;

pub use collection::{
    compute_membership_query, is_collection_path, split_collection_path, Collection,
    ExpansionRule, MembershipQuery,
};
pub use document::{CollectionDocument, PrimDocument, StageDocument};
pub use prim::{Prim, Relationship};

use crate::binding::tokens::COLLECTION_NAMESPACE;
use crate::error::{Error, Result};
use crate::path::ScenePath;

/// Capability interface over a mutable prim hierarchy.
///
/// Query methods never fail: a missing prim simply has no relationships,
/// children or collections. Editing methods return an error when the edit
/// cannot be made.
pub trait SceneGraph {
    /// Whether the underlying stage handle is still usable.
    fn is_valid(&self) -> bool;

    /// Returns `true` if a prim exists at `path`.
    fn has_prim(&self, path: &ScenePath) -> bool;

    /// The prim's schema type name.
    fn type_name(&self, path: &ScenePath) -> Option<&str>;

    /// Paths of the prim's children, in authored order.
    fn children(&self, path: &ScenePath) -> Vec<ScenePath>;

    /// A custom data entry on a prim.
    fn custom_data(&self, path: &ScenePath, key: &str) -> Option<&str>;

    /// A relationship authored on a prim.
    fn relationship(&self, prim: &ScenePath, name: &str) -> Option<&Relationship>;

    /// Names of all relationships authored on a prim, ordered by name.
    fn relationship_names(&self, prim: &ScenePath) -> Vec<String>;

    /// Authors `relationship` on `prim`, replacing one of the same name.
    ///
    /// # Errors
    ///
    /// Fails if the prim does not exist or is the root.
    fn author_relationship(&mut self, prim: &ScenePath, relationship: Relationship) -> Result<()>;

    /// Applies an API schema to a prim.
    ///
    /// # Errors
    ///
    /// Fails if the prim does not exist or is the root.
    fn apply_schema(&mut self, prim: &ScenePath, schema: &str) -> Result<()>;

    /// The collection at `/Prim.collection:name`.
    fn collection(&self, path: &ScenePath) -> Option<&Collection>;

    /// The collection at `/Prim.collection:name`, for editing.
    fn collection_mut(&mut self, path: &ScenePath) -> Option<&mut Collection>;

    /// Returns the named collection on `prim`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if the prim does not exist or is the root.
    fn define_collection(
        &mut self,
        prim: &ScenePath,
        name: &str,
        expansion: ExpansionRule,
    ) -> Result<&mut Collection>;

    /// Blocks the relationship by clearing its targets.
    ///
    /// Blocking a relationship that is not authored authors an empty one.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`SceneGraph::author_relationship`].
    fn block_relationship(&mut self, prim: &ScenePath, name: &str) -> Result<()> {
        let blocked = match self.relationship(prim, name) {
            Some(existing) => Relationship {
                targets: Vec::new(),
                ..existing.clone()
            },
            None => Relationship::blocked(name),
        };
        self.author_relationship(prim, blocked)
    }
}

/// An in-memory stage.
///
/// The pseudo-root `/` always exists and cannot carry properties. Prims are
/// kept in a path-ordered map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    prims: BTreeMap<ScenePath, Prim>,
    expired: bool,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Creates a stage containing only the pseudo-root.
    #[must_use]
    pub fn new() -> Self {
        let mut prims = BTreeMap::new();
        prims.insert(ScenePath::root(), Prim::new(ScenePath::root(), ""));
        Self {
            prims,
            expired: false,
        }
    }

    /// Defines a prim, creating typeless ancestors as needed.
    ///
    /// Defining an existing prim updates its type name when `type_name` is
    /// not empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for property paths.
    pub fn define_prim(&mut self, path: &ScenePath, type_name: &str) -> Result<&mut Prim> {
        if path.is_property_path() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "prims cannot be defined at property paths".into(),
            });
        }

        let mut missing: Vec<ScenePath> = Vec::new();
        let mut cursor = Some(path.clone());
        while let Some(current) = cursor {
            if self.prims.contains_key(&current) {
                break;
            }
            cursor = current.parent();
            missing.push(current);
        }

        for new_path in missing.into_iter().rev() {
            if let (Some(parent), Some(name)) = (new_path.parent(), new_path.name()) {
                if let Some(parent_prim) = self.prims.get_mut(&parent) {
                    parent_prim.add_child(name);
                }
            }
            self.prims
                .insert(new_path.clone(), Prim::new(new_path, ""));
        }

        let prim = self
            .prims
            .get_mut(path)
            .ok_or_else(|| Error::PrimNotFound { path: path.clone() })?;
        if !type_name.is_empty() {
            prim.set_type_name(type_name);
        }
        Ok(prim)
    }

    /// Looks up a prim.
    #[must_use]
    pub fn prim(&self, path: &ScenePath) -> Option<&Prim> {
        self.prims.get(path)
    }

    /// Looks up a prim for editing.
    pub fn prim_mut(&mut self, path: &ScenePath) -> Option<&mut Prim> {
        self.prims.get_mut(path)
    }

    /// All prims except the pseudo-root, in path order.
    pub fn prims(&self) -> impl Iterator<Item = &Prim> {
        self.prims.values().filter(|prim| !prim.path().is_root())
    }

    /// Number of prims, excluding the pseudo-root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prims.len() - 1
    }

    /// Returns `true` if only the pseudo-root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `path` and every prim beneath it, in path order.
    pub fn subtree<'a>(&'a self, path: &'a ScenePath) -> impl Iterator<Item = &'a Prim> + 'a {
        self.prims
            .range(path.clone()..)
            .take_while(move |(p, _)| p.has_prefix(path))
            .map(|(_, prim)| prim)
    }

    /// Invalidates the stage handle; every later orchestrated call fails.
    pub fn expire(&mut self) {
        self.expired = true;
    }

    fn editable_prim(&mut self, path: &ScenePath) -> Result<&mut Prim> {
        if path.is_root() {
            return Err(Error::BindingFailed {
                path: path.clone(),
                reason: "the pseudo-root cannot carry properties".into(),
            });
        }
        self.prims
            .get_mut(path)
            .ok_or_else(|| Error::PrimNotFound { path: path.clone() })
    }
}

impl SceneGraph for Stage {
    fn is_valid(&self) -> bool {
        !self.expired
    }

    fn has_prim(&self, path: &ScenePath) -> bool {
        self.prims.contains_key(path)
    }

    fn type_name(&self, path: &ScenePath) -> Option<&str> {
        self.prims.get(path).map(Prim::type_name)
    }

    fn children(&self, path: &ScenePath) -> Vec<ScenePath> {
        self.prims
            .get(path)
            .map(|prim| {
                prim.child_names()
                    .iter()
                    .filter_map(|name| path.child(name).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn custom_data(&self, path: &ScenePath, key: &str) -> Option<&str> {
        self.prims.get(path).and_then(|prim| prim.custom_data(key))
    }

    fn relationship(&self, prim: &ScenePath, name: &str) -> Option<&Relationship> {
        self.prims.get(prim).and_then(|p| p.relationship(name))
    }

    fn relationship_names(&self, prim: &ScenePath) -> Vec<String> {
        self.prims
            .get(prim)
            .map(|p| p.relationships().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    fn author_relationship(&mut self, prim: &ScenePath, relationship: Relationship) -> Result<()> {
        self.editable_prim(prim)?.set_relationship(relationship);
        Ok(())
    }

    fn apply_schema(&mut self, prim: &ScenePath, schema: &str) -> Result<()> {
        self.editable_prim(prim)?.apply_api_schema(schema);
        Ok(())
    }

    fn collection(&self, path: &ScenePath) -> Option<&Collection> {
        let (owner, name) = split_collection_path(path)?;
        self.prims.get(&owner)?.collection(name)
    }

    fn collection_mut(&mut self, path: &ScenePath) -> Option<&mut Collection> {
        let (owner, name) = split_collection_path(path)?;
        self.prims.get_mut(&owner)?.collection_mut(name)
    }

    fn define_collection(
        &mut self,
        prim: &ScenePath,
        name: &str,
        expansion: ExpansionRule,
    ) -> Result<&mut Collection> {
        // Validates the name as a property name.
        prim.with_property(&format!("{COLLECTION_NAMESPACE}:{name}"))?;
        let owner = self.editable_prim(prim)?;
        Ok(owner.insert_collection(Collection::new(name, expansion)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_define_prim_creates_ancestors() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/A/B/C"), "Mesh").unwrap();
        assert_eq!(stage.len(), 3);
        assert_eq!(stage.type_name(&p("/A")), Some(""));
        assert_eq!(stage.type_name(&p("/A/B/C")), Some("Mesh"));
        assert_eq!(stage.children(&ScenePath::root()), vec![p("/A")]);
        assert_eq!(stage.children(&p("/A/B")), vec![p("/A/B/C")]);
    }

    #[test]
    fn test_children_keep_authored_order() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/W/Z"), "").unwrap();
        stage.define_prim(&p("/W/A"), "").unwrap();
        assert_eq!(stage.children(&p("/W")), vec![p("/W/Z"), p("/W/A")]);
    }

    #[test]
    fn test_root_rejects_properties() {
        let mut stage = Stage::new();
        let err = stage
            .author_relationship(&ScenePath::root(), Relationship::blocked("x"))
            .unwrap_err();
        assert!(matches!(err, Error::BindingFailed { .. }));
        assert!(stage.apply_schema(&p("/Missing"), "X").is_err());
    }

    #[test]
    fn test_block_relationship_keeps_metadata() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/W"), "").unwrap();
        stage
            .author_relationship(
                &p("/W"),
                Relationship::new("material:binding", vec![p("/M")])
                    .with_custom_data("materialId", "7"),
            )
            .unwrap();
        stage.block_relationship(&p("/W"), "material:binding").unwrap();
        let rel = stage.relationship(&p("/W"), "material:binding").unwrap();
        assert!(rel.is_blocked());
        assert_eq!(rel.custom_data.get("materialId").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_define_collection_reuses_existing() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/W"), "").unwrap();
        stage
            .define_collection(&p("/W"), "geo", ExpansionRule::ExpandPrims)
            .unwrap()
            .include_path(p("/W/A"));
        let again = stage
            .define_collection(&p("/W"), "geo", ExpansionRule::ExplicitOnly)
            .unwrap();
        assert_eq!(again.includes, vec![p("/W/A")]);
        assert!(stage.collection(&p("/W.collection:geo")).is_some());
        assert!(stage.collection(&p("/W.collection:nope")).is_none());
    }

    #[test]
    fn test_subtree() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/A/B"), "").unwrap();
        stage.define_prim(&p("/AB"), "").unwrap();
        let paths: Vec<String> = stage
            .subtree(&p("/A"))
            .map(|prim| prim.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/A", "/A/B"]);
    }

    #[test]
    fn test_expire() {
        let mut stage = Stage::new();
        assert!(stage.is_valid());
        stage.expire();
        assert!(!stage.is_valid());
    }
}
