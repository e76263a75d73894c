//! Per-purpose memoization of resolved direct bindings.

use std::collections::HashMap;

use super::api::BindingSource;
use super::tokens::Purpose;
use crate::path::ScenePath;

/// Resolved direct bindings keyed by prim path, for one purpose.
///
/// An entry records the effective binding of that prim (`None` when nothing
/// applies). Entries are only ever added; a second store for the same path
/// must carry the same value.
///
/// # Examples
///
/// ```
/// use matbind::binding::{BindingCache, Purpose};
/// use matbind::path::ScenePath;
///
/// let mut cache = BindingCache::new(Purpose::Full);
/// let world = ScenePath::parse("/World").unwrap();
/// assert_eq!(cache.lookup(&world), None);
///
/// cache.store(world.clone(), None);
/// assert_eq!(cache.lookup(&world), Some(None));
/// ```
#[derive(Debug, Clone)]
pub struct BindingCache {
    purpose: Purpose,
    entries: HashMap<ScenePath, Option<BindingSource>>,
}

impl BindingCache {
    /// Creates an empty cache for `purpose`.
    #[must_use]
    pub fn new(purpose: Purpose) -> Self {
        Self {
            purpose,
            entries: HashMap::new(),
        }
    }

    /// The purpose this cache was created for.
    #[must_use]
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// The cached entry for `path`.
    ///
    /// The outer `Option` tells whether the path has been resolved; the inner
    /// one is the resolved binding.
    #[must_use]
    pub fn lookup(&self, path: &ScenePath) -> Option<Option<&BindingSource>> {
        self.entries.get(path).map(Option::as_ref)
    }

    /// Records the resolved binding for `path`.
    ///
    /// Storing the same value again is a no-op. Storing a different value for
    /// a path that is already resolved is a bug in the caller: it trips a
    /// debug assertion, and release builds keep the first value.
    pub fn store(&mut self, path: ScenePath, binding: Option<BindingSource>) {
        if let Some(existing) = self.entries.get(&path) {
            debug_assert!(
                *existing == binding,
                "conflicting cache entry for {path}: {existing:?} vs {binding:?}"
            );
            return;
        }
        self.entries.insert(path, binding);
    }

    /// Number of resolved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
