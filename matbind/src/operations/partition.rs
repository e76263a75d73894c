//! Splitting a selection into the prims being unbound and their ancestors.

use crate::path::{PathSet, ScenePath};

/// The two sets an unbind works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// The explicitly selected prims.
    pub leaf_set: PathSet,
    /// Every strict ancestor of a leaf that is not itself a leaf. The
    /// pseudo-root is never included.
    pub ancestor_set: PathSet,
}

impl Partition {
    /// Every prim a transfer reads from: ancestors and leaves.
    #[must_use]
    pub fn sources(&self) -> PathSet {
        self.ancestor_set
            .iter()
            .chain(self.leaf_set.iter())
            .cloned()
            .collect()
    }

    /// Returns `true` if `path` is in either set.
    #[must_use]
    pub fn contains(&self, path: &ScenePath) -> bool {
        self.leaf_set.contains(path) || self.ancestor_set.contains(path)
    }
}

/// Partitions `selection` into leaves and ancestors.
///
/// The upward walk from each leaf stops at the first ancestor that is already
/// a leaf or was already visited, so shared ancestry is walked once.
///
/// # Examples
///
/// ```
/// use matbind::operations::partition;
/// use matbind::path::{PathSet, ScenePath};
///
/// let p = |s: &str| ScenePath::parse(s).unwrap();
/// let selection: PathSet = [p("/World/A/B"), p("/World/A/C")].into_iter().collect();
/// let parts = partition(&selection);
///
/// assert_eq!(parts.leaf_set.len(), 2);
/// assert!(parts.ancestor_set.contains(&p("/World/A")));
/// assert!(parts.ancestor_set.contains(&p("/World")));
/// ```
#[must_use]
pub fn partition(selection: &PathSet) -> Partition {
    let mut ancestor_set = PathSet::new();
    for leaf in selection {
        for ancestor in leaf.ancestors() {
            if ancestor.is_root() || selection.contains(&ancestor) {
                break;
            }
            if !ancestor_set.insert(ancestor) {
                break;
            }
        }
    }
    Partition {
        leaf_set: selection.clone(),
        ancestor_set,
    }
}

/// `owner` and every prim strictly between it and `target`.
///
/// Empty unless `owner` is a strict ancestor of `target`.
#[must_use]
pub fn ancestors_between(owner: &ScenePath, target: &ScenePath) -> Vec<ScenePath> {
    if !owner.is_ancestor_of(target) || owner.is_root() {
        return Vec::new();
    }
    let mut between: Vec<ScenePath> = target
        .ancestors()
        .take_while(|ancestor| ancestor != owner)
        .collect();
    between.push(owner.clone());
    between.reverse();
    between
}
