#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # matbind
//!
//! A library for resolving and editing material bindings on hierarchical
//! scene graphs.
//!
//! A prim's material comes from binding relationships authored on it or on
//! its ancestors, either directly or through a collection, each with a
//! strength and a purpose. This library resolves those bindings, binds new
//! materials, and unbinds any subset of the hierarchy while every prim
//! outside that subset keeps the material it had.
//!
//! ## Core Types
//!
//! - [`ScenePath`] and [`PathSet`]: prim and property paths
//! - [`Stage`] and [`SceneGraph`]: the scene graph the algorithms edit
//! - [`Purpose`] and [`Strength`]: binding tokens
//! - [`bind`], [`unbind_all`] and [`unbind`]: the editing operations
//! - [`Diagnostics`]: per-path problems reported by an operation
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use matbind::{compute_bound_material, unbind_all, Diagnostics, PathSet, Purpose};
//! use matbind::{ScenePath, Stage, Strength, UnbindOptions};
//! use matbind::stage::{Relationship, SceneGraph};
//!
//! let p = |s: &str| ScenePath::parse(s).unwrap();
//! let mut stage = Stage::new();
//! stage.define_prim(&p("/World/A/B"), "Mesh").unwrap();
//! stage.define_prim(&p("/Materials/M1"), "Material").unwrap();
//! stage
//!     .author_relationship(
//!         &p("/World"),
//!         Relationship::new("material:binding", vec![p("/Materials/M1")])
//!             .with_strength(Strength::StrongerThanDescendants),
//!     )
//!     .unwrap();
//!
//! let selection: PathSet = [p("/World/A")].into_iter().collect();
//! let mut diagnostics = Diagnostics::new();
//! unbind_all(&mut stage, &selection, &UnbindOptions::new(), &mut diagnostics).unwrap();
//!
//! // B keeps its look through an authored copy of the /World binding
//! let bound = compute_bound_material(&stage, &p("/World/A/B"), Purpose::Full).unwrap();
//! assert_eq!(bound.owner, p("/World/A/B"));
//! assert_eq!(bound.material(), Some(&p("/Materials/M1")));
//! ```

pub mod binding;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod operations;
pub mod output;
pub mod path;
pub mod stage;

// Re-export key types at crate root for convenience
pub use binding::{compute_bound_material, BindingSource, Purpose, Strength};
pub use config::{Config, ConfigBuilder};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    bind, unbind, unbind_all, BindMethod, BindOptions, BindReport, UnbindOptions, UnbindReport,
};
pub use output::{OutputFormat, OutputFormatter};
pub use path::{PathRelationship, PathSet, ScenePath};
pub use stage::{SceneGraph, Stage};
