//! Effective direct-binding resolution.
//!
//! A prim's effective direct binding is the fold, from the topmost ancestor
//! down to the prim, of each level's own authored binding under [`combine`]:
//! a level's own binding replaces what it inherits unless the inherited one is
//! `strongerThanDescendants` and the own one is not.

use super::api::{BindingSource, MaterialBindingApi};
use super::cache::BindingCache;
use super::tokens::Purpose;
use crate::path::{PathSet, ScenePath};
use crate::stage::SceneGraph;

/// The direct binding authored on exactly `prim` for `purpose`.
///
/// Returns `None` when the relationship is absent or blocked, when `prim` is
/// not a prim path, or when the stage is no longer valid.
pub fn authored_direct_binding<G: SceneGraph + ?Sized>(
    graph: &G,
    prim: &ScenePath,
    purpose: Purpose,
) -> Option<BindingSource> {
    if !graph.is_valid() || prim.is_root() || !prim.is_prim_path() {
        return None;
    }
    graph.direct_binding(prim, purpose)
}

/// Cascades one level: `inherited` from the parent, `own` authored here.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use matbind::binding::{combine, BindingSource, Strength};
/// use matbind::path::ScenePath;
///
/// let binding = |owner: &str, strength| BindingSource {
///     owner: ScenePath::parse(owner).unwrap(),
///     relationship: "material:binding".into(),
///     targets: vec![ScenePath::parse("/M").unwrap()],
///     strength,
///     custom_data: BTreeMap::new(),
/// };
///
/// let strong = binding("/A", Strength::StrongerThanDescendants);
/// let own = binding("/A/B", Strength::FallbackStrength);
/// assert_eq!(combine(Some(strong.clone()), Some(own.clone())), Some(strong));
/// assert_eq!(combine(None, Some(own.clone())), Some(own));
/// ```
#[must_use]
pub fn combine(
    inherited: Option<BindingSource>,
    own: Option<BindingSource>,
) -> Option<BindingSource> {
    match (inherited, own) {
        (None, own) => own,
        (inherited, None) => inherited,
        (Some(inherited), Some(own)) => {
            if inherited.strength.is_stronger() && !own.strength.is_stronger() {
                Some(inherited)
            } else {
                Some(own)
            }
        }
    }
}

/// The effective direct binding of `prim` for `purpose`.
///
/// Walks up from `prim` (the pseudo-root excluded) until it reaches an
/// ancestor already in `cache`, then resolves the unresolved levels top-down,
/// storing each in the cache. A prim in `barrier` contributes no binding of
/// its own, so a binding being removed from it never reaches the prims below.
///
/// Missing prims and invalid stages resolve to `None` and are not cached.
pub fn effective_direct_binding<G: SceneGraph + ?Sized>(
    graph: &G,
    prim: &ScenePath,
    purpose: Purpose,
    barrier: &PathSet,
    cache: &mut BindingCache,
) -> Option<BindingSource> {
    if !graph.is_valid() || prim.is_root() || !prim.is_prim_path() || !graph.has_prim(prim) {
        return None;
    }
    debug_assert_eq!(cache.purpose(), purpose, "cache used across purposes");

    let mut unresolved = Vec::new();
    let mut inherited = None;
    for level in std::iter::once(prim.clone()).chain(prim.ancestors()) {
        if let Some(cached) = cache.lookup(&level) {
            inherited = cached.cloned();
            break;
        }
        unresolved.push(level);
    }

    for level in unresolved.into_iter().rev() {
        let own = if barrier.contains(&level) {
            None
        } else {
            authored_direct_binding(graph, &level, purpose)
        };
        inherited = combine(inherited, own);
        cache.store(level, inherited.clone());
    }
    inherited
}

/// A graph, purpose, barrier and cache bundled for repeated lookups.
///
/// # Examples
///
/// ```
/// use matbind::binding::{BindingQuery, Purpose};
/// use matbind::path::ScenePath;
/// use matbind::stage::{Relationship, SceneGraph, Stage};
///
/// let p = |s: &str| ScenePath::parse(s).unwrap();
/// let mut stage = Stage::new();
/// stage.define_prim(&p("/World/A"), "Mesh").unwrap();
/// stage
///     .author_relationship(&p("/World"), Relationship::new("material:binding", vec![p("/M")]))
///     .unwrap();
///
/// let mut query = BindingQuery::new(&stage, Purpose::AllPurpose);
/// assert_eq!(query.effective(&p("/World/A")).unwrap().owner, p("/World"));
/// assert!(query.authored(&p("/World/A")).is_none());
/// ```
#[derive(Debug)]
pub struct BindingQuery<'a, G: SceneGraph + ?Sized> {
    graph: &'a G,
    purpose: Purpose,
    barrier: PathSet,
    cache: BindingCache,
}

impl<'a, G: SceneGraph + ?Sized> BindingQuery<'a, G> {
    /// Creates a query with an empty barrier and a fresh cache.
    #[must_use]
    pub fn new(graph: &'a G, purpose: Purpose) -> Self {
        Self {
            graph,
            purpose,
            barrier: PathSet::new(),
            cache: BindingCache::new(purpose),
        }
    }

    /// Sets the barrier and discards anything resolved so far.
    #[must_use]
    pub fn with_barrier(mut self, barrier: PathSet) -> Self {
        self.barrier = barrier;
        self.cache.clear();
        self
    }

    /// The purpose being resolved.
    #[must_use]
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// See [`authored_direct_binding`].
    #[must_use]
    pub fn authored(&self, prim: &ScenePath) -> Option<BindingSource> {
        authored_direct_binding(self.graph, prim, self.purpose)
    }

    /// See [`effective_direct_binding`].
    pub fn effective(&mut self, prim: &ScenePath) -> Option<BindingSource> {
        effective_direct_binding(self.graph, prim, self.purpose, &self.barrier, &mut self.cache)
    }

    /// Gives back the cache.
    #[must_use]
    pub fn into_cache(self) -> BindingCache {
        self.cache
    }
}
