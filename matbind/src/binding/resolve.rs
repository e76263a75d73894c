//! Full bound-material resolution, including collection bindings.
//!
//! At every level of a prim's ancestor chain, the first collection binding
//! (in relationship-name order) whose collection contains the prim is that
//! level's own binding; otherwise the level's direct binding is. Levels are
//! folded top-down with [`combine`]. When a specific purpose resolves nothing
//! the `allPurpose` bindings are used.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::api::{BindingSource, MaterialBindingApi};
use super::query::combine;
use super::tokens::Purpose;
use crate::path::{PathSet, ScenePath};
use crate::stage::{compute_membership_query, MembershipQuery, SceneGraph};

/// Identifies one binding relationship: its owner and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationshipKey {
    /// Owning prim.
    pub owner: ScenePath,
    /// Relationship name.
    pub name: String,
}

impl RelationshipKey {
    /// Creates a key.
    #[must_use]
    pub fn new(owner: ScenePath, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl From<&BindingSource> for RelationshipKey {
    fn from(source: &BindingSource) -> Self {
        Self::new(source.owner.clone(), source.relationship.clone())
    }
}

impl fmt::Display for RelationshipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Prims bound through one collection binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHit {
    /// The bound collection.
    pub collection: ScenePath,
    /// The queried prims it binds.
    pub prims: PathSet,
}

/// The bindings currently deciding the material of a set of prims.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentBindings {
    /// Direct bindings, each listed once with every prim it decides.
    pub direct: BTreeMap<RelationshipKey, PathSet>,
    /// Collection bindings, each listed once with every prim it decides.
    pub collections: BTreeMap<RelationshipKey, CollectionHit>,
}

impl CurrentBindings {
    /// Returns `true` if no queried prim has a bound material.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.collections.is_empty()
    }

    /// Number of distinct relationships found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.direct.len() + self.collections.len()
    }
}

/// Resolves bound materials, sharing lookups across many prims.
///
/// Authored bindings are read once per prim and purpose, and each
/// collection's membership query is built once, however many prims are
/// resolved through it. The resolver borrows the graph, so it must not
/// outlive an edit.
#[derive(Debug)]
pub struct BindingResolver<'a, G: SceneGraph + ?Sized> {
    graph: &'a G,
    direct: HashMap<(ScenePath, Purpose), Option<BindingSource>>,
    collection_bindings: HashMap<(ScenePath, Purpose), Vec<BindingSource>>,
    queries: HashMap<ScenePath, Option<MembershipQuery>>,
}

impl<'a, G: SceneGraph + ?Sized> BindingResolver<'a, G> {
    /// Creates a resolver over `graph`.
    #[must_use]
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            direct: HashMap::new(),
            collection_bindings: HashMap::new(),
            queries: HashMap::new(),
        }
    }

    /// The binding that decides `prim`'s material for `purpose`.
    pub fn bound_material(&mut self, prim: &ScenePath, purpose: Purpose) -> Option<BindingSource> {
        if !self.graph.is_valid() || prim.is_root() || !self.graph.has_prim(prim) {
            return None;
        }
        match self.resolve(prim, purpose) {
            None if purpose != Purpose::AllPurpose => self.resolve(prim, Purpose::AllPurpose),
            found => found,
        }
    }

    fn resolve(&mut self, prim: &ScenePath, purpose: Purpose) -> Option<BindingSource> {
        let levels: Vec<ScenePath> = std::iter::once(prim.clone())
            .chain(prim.ancestors())
            .collect();
        let mut bound = None;
        for level in levels.iter().rev() {
            let own = match self.collection_binding(level, prim, purpose) {
                Some(binding) => Some(binding),
                None => self.direct_binding(level, purpose),
            };
            bound = combine(bound, own);
        }
        bound
    }

    fn direct_binding(&mut self, level: &ScenePath, purpose: Purpose) -> Option<BindingSource> {
        let graph = self.graph;
        self.direct
            .entry((level.clone(), purpose))
            .or_insert_with(|| graph.direct_binding(level, purpose))
            .clone()
    }

    fn collection_binding(
        &mut self,
        level: &ScenePath,
        prim: &ScenePath,
        purpose: Purpose,
    ) -> Option<BindingSource> {
        let graph = self.graph;
        let bindings = self
            .collection_bindings
            .entry((level.clone(), purpose))
            .or_insert_with(|| graph.collection_bindings(level, purpose));

        for binding in bindings.iter() {
            let (Some(collection), Some(_)) = (binding.collection(), binding.material()) else {
                log::debug!(
                    "ignoring malformed collection binding {}",
                    RelationshipKey::from(binding)
                );
                continue;
            };
            let query = self
                .queries
                .entry(collection.clone())
                .or_insert_with(|| compute_membership_query(graph, collection));
            match query {
                Some(query) if query.is_path_included(prim) => return Some(binding.clone()),
                Some(_) => {}
                None => log::debug!("collection {collection} bound by {} is missing", binding.owner),
            }
        }
        None
    }
}

/// The binding that decides `prim`'s material for `purpose`, if any.
///
/// # Examples
///
/// ```
/// use matbind::binding::{compute_bound_material, Purpose};
/// use matbind::path::ScenePath;
/// use matbind::stage::{ExpansionRule, Relationship, SceneGraph, Stage};
///
/// let p = |s: &str| ScenePath::parse(s).unwrap();
/// let mut stage = Stage::new();
/// stage.define_prim(&p("/World/X"), "Mesh").unwrap();
/// stage
///     .define_collection(&p("/World"), "geoSet", ExpansionRule::ExpandPrims)
///     .unwrap()
///     .include_path(p("/World/X"));
/// stage
///     .author_relationship(
///         &p("/World"),
///         Relationship::new(
///             "material:binding:collection:geoSet",
///             vec![p("/World.collection:geoSet"), p("/Materials/M")],
///         ),
///     )
///     .unwrap();
///
/// let bound = compute_bound_material(&stage, &p("/World/X"), Purpose::Full).unwrap();
/// assert_eq!(bound.material(), Some(&p("/Materials/M")));
/// assert!(!bound.is_direct());
/// ```
pub fn compute_bound_material<G: SceneGraph + ?Sized>(
    graph: &G,
    prim: &ScenePath,
    purpose: Purpose,
) -> Option<BindingSource> {
    BindingResolver::new(graph).bound_material(prim, purpose)
}

/// Resolves every prim in `prims` and groups them by deciding relationship.
///
/// One resolver is shared across the batch, so a relationship or collection
/// that decides many prims is read once and reported once.
pub fn discover_current_bindings<G: SceneGraph + ?Sized>(
    graph: &G,
    prims: &PathSet,
    purpose: Purpose,
) -> CurrentBindings {
    let mut resolver = BindingResolver::new(graph);
    let mut current = CurrentBindings::default();

    for prim in prims {
        let Some(source) = resolver.bound_material(prim, purpose) else {
            continue;
        };
        let key = RelationshipKey::from(&source);
        match source.collection() {
            None => {
                current.direct.entry(key).or_default().insert(prim.clone());
            }
            Some(collection) => {
                current
                    .collections
                    .entry(key)
                    .or_insert_with(|| CollectionHit {
                        collection: collection.clone(),
                        prims: PathSet::new(),
                    })
                    .prims
                    .insert(prim.clone());
            }
        }
    }

    log::debug!(
        "found {} direct and {} collection binding(s) for {} prim(s) ({purpose})",
        current.direct.len(),
        current.collections.len(),
        prims.len()
    );
    current
}
