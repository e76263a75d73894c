//! Material binding resolution.
//!
//! A prim's material is decided by binding relationships authored on the
//! prim or any of its ancestors. This module reads those relationships and
//! resolves them:
//!
//! - [`tokens`]: purposes, strengths and relationship naming.
//! - [`api`]: the binding view over a [`SceneGraph`](crate::stage::SceneGraph).
//! - [`query`]: effective *direct* binding with strength cascading.
//! - [`cache`]: per-purpose memoization of resolved ancestors.
//! - [`resolve`]: full resolution including collection bindings, and the
//!   batched discovery the iterative unbind relies on.
//!
//! # Examples
//!
//! ```
//! use matbind::binding::{effective_direct_binding, BindingCache, Purpose, Strength};
//! use matbind::path::{PathSet, ScenePath};
//! use matbind::stage::{Relationship, SceneGraph, Stage};
//!
//! let p = |s: &str| ScenePath::parse(s).unwrap();
//! let mut stage = Stage::new();
//! stage.define_prim(&p("/World/A/B"), "Mesh").unwrap();
//! stage
//!     .author_relationship(
//!         &p("/World"),
//!         Relationship::new("material:binding", vec![p("/M1")])
//!             .with_strength(Strength::StrongerThanDescendants),
//!     )
//!     .unwrap();
//! stage
//!     .author_relationship(&p("/World/A"), Relationship::new("material:binding", vec![p("/M2")]))
//!     .unwrap();
//!
//! let mut cache = BindingCache::new(Purpose::AllPurpose);
//! let bound = effective_direct_binding(
//!     &stage,
//!     &p("/World/A/B"),
//!     Purpose::AllPurpose,
//!     &PathSet::new(),
//!     &mut cache,
//! )
//! .unwrap();
//! assert_eq!(bound.material(), Some(&p("/M1")));
//! ```

pub mod api;
pub mod cache;
pub mod query;
pub mod resolve;
pub mod tokens;

#[cfg(test)]
mod proptests;

pub use api::{material_id_hint, BindingSource, MaterialBindingApi};
pub use cache::BindingCache;
pub use query::{authored_direct_binding, combine, effective_direct_binding, BindingQuery};
pub use resolve::{
    compute_bound_material, discover_current_bindings, BindingResolver, CollectionHit,
    CurrentBindings, RelationshipKey,
};
pub use tokens::{BindingKind, Purpose, Strength};
