//! Scene paths and ordered path sets.
//!
//! Every prim, relationship target and collection in a stage is addressed by
//! a [`ScenePath`]: an absolute, slash-separated list of prim names with an
//! optional property part (`/World/Geo.collection:geoSet`).
//!
//! [`PathSet`] is the ordered set the binding algorithms iterate. Iteration
//! always follows the natural path order, so an operation given the same
//! inputs touches prims in the same order on every run.
//!
//! # Path Relationships
//!
//! ```
//! use matbind::path::{PathRelationship, ScenePath};
//!
//! let world = ScenePath::parse("/World").unwrap();
//! let geo = ScenePath::parse("/World/Geo").unwrap();
//!
//! assert_eq!(PathRelationship::between(&world, &geo), PathRelationship::Ancestor);
//! assert!(world.is_ancestor_of(&geo));
//! ```

pub mod relationship;
pub mod set;
pub mod types;

#[cfg(test)]
mod proptests;

pub use relationship::PathRelationship;
pub use set::PathSet;
pub use types::ScenePath;
