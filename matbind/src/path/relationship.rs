//! Path relationship checking.
//!
//! Determines how two scene paths relate in the prim hierarchy.

use super::ScenePath;

/// Relationship between two scene paths.
///
/// # Examples
///
/// ```
/// use matbind::path::{PathRelationship, ScenePath};
///
/// let parent = ScenePath::parse("/World").unwrap();
/// let child = ScenePath::parse("/World/Geo").unwrap();
///
/// assert_eq!(
///     PathRelationship::between(&parent, &child),
///     PathRelationship::Ancestor
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first path is a strict ancestor of the second.
    Ancestor,

    /// The first path is a strict descendant of the second.
    Descendant,

    /// The paths are equal.
    Same,

    /// Neither path is beneath the other; they live on different branches.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::{PathRelationship, ScenePath};
    ///
    /// let a = ScenePath::parse("/a").unwrap();
    /// let ab = ScenePath::parse("/a/b").unwrap();
    /// let b = ScenePath::parse("/b").unwrap();
    ///
    /// assert_eq!(PathRelationship::between(&ab, &a), PathRelationship::Descendant);
    /// assert_eq!(PathRelationship::between(&a, &a), PathRelationship::Same);
    /// assert_eq!(PathRelationship::between(&a, &b), PathRelationship::Unrelated);
    /// ```
    #[must_use]
    pub fn between(path1: &ScenePath, path2: &ScenePath) -> Self {
        if path1 == path2 {
            Self::Same
        } else if path1.is_ancestor_of(path2) {
            Self::Ancestor
        } else if path2.is_ancestor_of(path1) {
            Self::Descendant
        } else {
            Self::Unrelated
        }
    }

    /// Returns `true` for `Ancestor`, `Descendant`, or `Same`.
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Ancestor | Self::Descendant | Self::Same)
    }

    /// Check if `path` is `scope` or lies beneath it.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::{PathRelationship, ScenePath};
    ///
    /// let scope = ScenePath::parse("/World").unwrap();
    /// let prim = ScenePath::parse("/World/Geo").unwrap();
    ///
    /// assert!(PathRelationship::is_within(&prim, &scope));
    /// assert!(PathRelationship::is_within(&scope, &scope));
    /// assert!(!PathRelationship::is_within(&scope, &prim));
    /// ```
    #[must_use]
    pub fn is_within(path: &ScenePath, scope: &ScenePath) -> bool {
        matches!(Self::between(path, scope), Self::Descendant | Self::Same)
    }

    /// Get a human-readable description of the relationship.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ancestor => "ancestor",
            Self::Descendant => "descendant",
            Self::Same => "same",
            Self::Unrelated => "unrelated",
        }
    }
}
