//! Ordered path sets with hierarchy queries.

use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ScenePath;

/// An ordered set of scene paths.
///
/// Iteration follows the natural [`ScenePath`] order, so parents are visited
/// before their descendants and results are reproducible run to run.
///
/// # Examples
///
/// ```
/// use matbind::path::{PathSet, ScenePath};
///
/// let mut set = PathSet::new();
/// set.insert(ScenePath::parse("/World/A").unwrap());
/// set.insert(ScenePath::parse("/World/A").unwrap());
/// assert_eq!(set.len(), 1);
///
/// let child = ScenePath::parse("/World/A/B").unwrap();
/// assert!(set.contains_ancestor_of(&child));
/// assert!(set.covers(&child));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSet {
    paths: BTreeSet<ScenePath>,
}

impl PathSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a path, returning `true` if it was not already present.
    pub fn insert(&mut self, path: ScenePath) -> bool {
        self.paths.insert(path)
    }

    /// Removes a path, returning `true` if it was present.
    pub fn remove(&mut self, path: &ScenePath) -> bool {
        self.paths.remove(path)
    }

    /// Returns `true` if the path is a member.
    #[must_use]
    pub fn contains(&self, path: &ScenePath) -> bool {
        self.paths.contains(path)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates members in natural path order.
    pub fn iter(&self) -> btree_set::Iter<'_, ScenePath> {
        self.paths.iter()
    }

    /// Returns `true` if some member is a strict ancestor of `path`.
    #[must_use]
    pub fn contains_ancestor_of(&self, path: &ScenePath) -> bool {
        path.ancestors().any(|ancestor| self.contains(&ancestor))
            || (!path.is_root() && self.contains(&ScenePath::root()))
    }

    /// Returns `true` if some member is a strict descendant of `path`.
    #[must_use]
    pub fn contains_descendant_of(&self, path: &ScenePath) -> bool {
        // Descendants sort directly after their ancestor, so the first member
        // greater than `path` decides.
        self.paths
            .range(path.clone()..)
            .find(|candidate| *candidate != path)
            .is_some_and(|candidate| path.is_ancestor_of(candidate))
    }

    /// Returns `true` if `path` or one of its ancestors is a member.
    #[must_use]
    pub fn covers(&self, path: &ScenePath) -> bool {
        self.contains(path) || self.contains_ancestor_of(path)
    }

    /// The members that have no ancestor in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::{PathSet, ScenePath};
    ///
    /// let set: PathSet = ["/A", "/A/B", "/C"]
    ///     .into_iter()
    ///     .map(|p| ScenePath::parse(p).unwrap())
    ///     .collect();
    /// let roots: Vec<String> = set.minimal().iter().map(ToString::to_string).collect();
    /// assert_eq!(roots, vec!["/A", "/C"]);
    /// ```
    #[must_use]
    pub fn minimal(&self) -> PathSet {
        self.iter()
            .filter(|path| !self.contains_ancestor_of(path))
            .cloned()
            .collect()
    }

    /// The deepest prim path that is an ancestor of, or equal to, every member.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn common_ancestor(&self) -> Option<ScenePath> {
        let mut iter = self.iter();
        let first = iter.next()?.prim_path();
        Some(iter.fold(first, |acc, path| ScenePath::common_ancestor(&acc, path)))
    }
}

impl FromIterator<ScenePath> for PathSet {
    fn from_iter<I: IntoIterator<Item = ScenePath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl Extend<ScenePath> for PathSet {
    fn extend<I: IntoIterator<Item = ScenePath>>(&mut self, iter: I) {
        self.paths.extend(iter);
    }
}

impl IntoIterator for PathSet {
    type Item = ScenePath;
    type IntoIter = btree_set::IntoIter<ScenePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a ScenePath;
    type IntoIter = btree_set::Iter<'a, ScenePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
