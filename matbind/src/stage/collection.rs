//! Collections and membership queries.
//!
//! A collection is a named, prim-scoped set of include and exclude rules.
//! Membership is answered by a [`MembershipQuery`] built once from those
//! rules: testing a path only walks that path's own ancestors through the
//! rule map, never the scene tree.

use std::collections::{BTreeMap, BTreeSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::SceneGraph;
use crate::binding::tokens::COLLECTION_NAMESPACE;
use crate::path::ScenePath;

/// How far an include rule reaches below the included path.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum ExpansionRule {
    /// Only the explicitly included paths are members.
    #[serde(rename = "explicitOnly")]
    #[value(name = "explicitOnly")]
    ExplicitOnly,
    /// Included paths and all prims beneath them are members.
    #[default]
    #[serde(rename = "expandPrims")]
    #[value(name = "expandPrims")]
    ExpandPrims,
    /// Like `expandPrims`, and properties of member prims are members too.
    #[serde(rename = "expandPrimsAndProperties")]
    #[value(name = "expandPrimsAndProperties")]
    ExpandPrimsAndProperties,
}

/// A named set of include/exclude rules owned by a prim.
///
/// # Examples
///
/// ```
/// use matbind::path::ScenePath;
/// use matbind::stage::{Collection, ExpansionRule};
///
/// let x = ScenePath::parse("/World/X").unwrap();
/// let mut geo = Collection::new("geoSet", ExpansionRule::ExpandPrims);
/// geo.include_path(x.clone());
///
/// assert!(geo.local_membership_query().is_path_included(&x));
/// assert!(geo.exclude_path(&x));
/// assert!(!geo.exclude_path(&x));
/// assert!(!geo.local_membership_query().is_path_included(&x));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Collection {
    /// Collection name (the part after `collection:`).
    pub name: String,

    /// Included paths. Never contains `/`; see `include_root`.
    #[serde(default)]
    pub includes: Vec<ScenePath>,

    /// Excluded paths.
    #[serde(default)]
    pub excludes: Vec<ScenePath>,

    /// Expansion rule for includes.
    #[serde(default)]
    pub expansion: ExpansionRule,

    /// Whether the whole stage is included.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_root: bool,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>, expansion: ExpansionRule) -> Self {
        Self {
            name: name.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            expansion,
            include_root: false,
        }
    }

    /// Adds a path to the includes, removing any matching exclude.
    ///
    /// Including `/` sets `include_root` instead. Returns `true` if anything
    /// changed.
    pub fn include_path(&mut self, path: ScenePath) -> bool {
        let before = self.excludes.len();
        self.excludes.retain(|p| *p != path);
        let mut changed = before != self.excludes.len();

        if path.is_root() {
            changed |= !self.include_root;
            self.include_root = true;
        } else if !self.includes.contains(&path) {
            self.includes.push(path);
            changed = true;
        }
        changed
    }

    /// Removes `path` from the collection's membership.
    ///
    /// The path is dropped from the includes, and an exclude is added only if
    /// the path would otherwise still be a member. Excluding a path twice, or
    /// one that was never a member, changes nothing. Returns `true` if
    /// anything changed.
    pub fn exclude_path(&mut self, path: &ScenePath) -> bool {
        if path.is_root() {
            let changed = self.include_root;
            self.include_root = false;
            return changed;
        }

        let before = self.includes.len();
        self.includes.retain(|p| p != path);
        let mut changed = before != self.includes.len();

        // Nested collections may still bring the path in; exclude defensively.
        let still_member = self.local_membership_query().is_path_included(path)
            || self.includes.iter().any(is_collection_path);
        if still_member && !self.excludes.contains(path) {
            self.excludes.push(path.clone());
            changed = true;
        }
        changed
    }

    /// A membership query over this collection's own rules.
    ///
    /// Includes that target other collections are ignored; use
    /// [`compute_membership_query`] to flatten them.
    #[must_use]
    pub fn local_membership_query(&self) -> MembershipQuery {
        let mut rules = BTreeMap::new();
        for path in self.includes.iter().filter(|p| !is_collection_path(p)) {
            rules.insert(path.clone(), Rule::Include);
        }
        for path in &self.excludes {
            rules.insert(path.clone(), Rule::Exclude);
        }
        MembershipQuery {
            rules,
            expansion: self.expansion,
            include_root: self.include_root,
            nested: Vec::new(),
        }
    }
}

/// Returns `true` if `path` names a collection property.
#[must_use]
pub fn is_collection_path(path: &ScenePath) -> bool {
    path.property_name()
        .and_then(|name| name.split_once(':'))
        .is_some_and(|(namespace, _)| namespace == COLLECTION_NAMESPACE)
}

/// Splits `/Prim.collection:name` into the owning prim and the name.
#[must_use]
pub fn split_collection_path(path: &ScenePath) -> Option<(ScenePath, &str)> {
    let (namespace, name) = path.property_name()?.split_once(':')?;
    (namespace == COLLECTION_NAMESPACE).then(|| (path.prim_path(), name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Include,
    Exclude,
}

/// Pre-resolved membership rules for one collection.
///
/// Nested collection includes are flattened into `nested` when the query is
/// built, so answering a query never recurses through the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipQuery {
    rules: BTreeMap<ScenePath, Rule>,
    expansion: ExpansionRule,
    include_root: bool,
    nested: Vec<MembershipQuery>,
}

impl MembershipQuery {
    /// Returns `true` if `path` is a member.
    #[must_use]
    pub fn is_path_included(&self, path: &ScenePath) -> bool {
        match self.local_decision(path) {
            Some(Rule::Include) => true,
            Some(Rule::Exclude) => false,
            None => self.nested.iter().any(|query| query.is_path_included(path)),
        }
    }

    fn local_decision(&self, path: &ScenePath) -> Option<Rule> {
        if let Some(rule) = self.rules.get(path) {
            return Some(*rule);
        }
        for ancestor in path.ancestors() {
            match self.rules.get(&ancestor) {
                Some(Rule::Exclude) => return Some(Rule::Exclude),
                Some(Rule::Include) => {
                    return self.reaches(path, &ancestor).then_some(Rule::Include);
                }
                None => {}
            }
        }
        (self.include_root && self.reaches(path, &ScenePath::root())).then_some(Rule::Include)
    }

    // Whether an include on `from` expands down to `path`.
    fn reaches(&self, path: &ScenePath, from: &ScenePath) -> bool {
        match self.expansion {
            ExpansionRule::ExplicitOnly => path == from,
            ExpansionRule::ExpandPrims => path.is_prim_path(),
            ExpansionRule::ExpandPrimsAndProperties => true,
        }
    }
}

/// Builds the flattened membership query for the collection at `path`.
///
/// Includes of other collections are resolved recursively; a collection that
/// is reached a second time contributes nothing, so include cycles terminate.
/// Returns `None` if `path` does not name a collection.
pub fn compute_membership_query<G: SceneGraph + ?Sized>(
    graph: &G,
    path: &ScenePath,
) -> Option<MembershipQuery> {
    let mut visited = BTreeSet::new();
    build_query(graph, path, &mut visited)
}

fn build_query<G: SceneGraph + ?Sized>(
    graph: &G,
    path: &ScenePath,
    visited: &mut BTreeSet<ScenePath>,
) -> Option<MembershipQuery> {
    if !visited.insert(path.clone()) {
        return None;
    }
    let collection = graph.collection(path)?;
    let mut query = collection.local_membership_query();
    let nested: Vec<ScenePath> = collection
        .includes
        .iter()
        .filter(|p| is_collection_path(p))
        .cloned()
        .collect();
    for nested_path in nested {
        match build_query(graph, &nested_path, visited) {
            Some(nested_query) => query.nested.push(nested_query),
            None => log::debug!("skipping nested collection {nested_path} (missing or cyclic)"),
        }
    }
    Some(query)
}
