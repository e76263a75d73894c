//! Output formatting for resolved bindings and operation reports.
//!
//! This module renders what the CLI prints: one [`BindingRow`] per queried
//! prim, and the [`UnbindReport`]/[`BindReport`] of an edit, in a
//! human-readable layout, JSON, or YAML.

mod formatters;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::binding::{BindingResolver, Purpose, Strength};
use crate::operations::{BindReport, UnbindReport};
use crate::path::{PathSet, ScenePath};
use crate::stage::SceneGraph;
use crate::Result;

pub use formatters::{HumanFormatter, JsonFormatter, YamlFormatter};

/// Trait for rendering binding data into an output format.
pub trait OutputFormatter {
    /// Formats the resolved binding of each queried prim.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_rows(&self, rows: &[BindingRow]) -> Result<String>;

    /// Formats the report of an unbind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_unbind(&self, report: &UnbindReport) -> Result<String>;

    /// Formats the report of a bind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_bind(&self, report: &BindReport) -> Result<String>;
}

/// Available output formats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text for terminals.
    #[default]
    Human,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl OutputFormat {
    /// Create a formatter for this output format.
    #[must_use]
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter),
            Self::Json => Box::new(JsonFormatter),
            Self::Yaml => Box::new(YamlFormatter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// The resolved material of one prim and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRow {
    /// The queried prim.
    pub prim: ScenePath,
    /// The bound material, if any.
    pub material: Option<ScenePath>,
    /// The prim owning the deciding relationship.
    pub owner: Option<ScenePath>,
    /// The deciding relationship's name.
    pub relationship: Option<String>,
    /// The deciding relationship's strength.
    pub strength: Option<Strength>,
}

impl BindingRow {
    /// A row for a prim with no bound material.
    #[must_use]
    pub fn unbound(prim: ScenePath) -> Self {
        Self {
            prim,
            material: None,
            owner: None,
            relationship: None,
            strength: None,
        }
    }
}

/// Resolves `prims` for `purpose` into one row each, in path order.
pub fn binding_rows<G: SceneGraph + ?Sized>(
    graph: &G,
    prims: &PathSet,
    purpose: Purpose,
) -> Vec<BindingRow> {
    let mut resolver = BindingResolver::new(graph);
    prims
        .iter()
        .map(|prim| match resolver.bound_material(prim, purpose) {
            Some(source) => BindingRow {
                prim: prim.clone(),
                material: source.material().cloned(),
                owner: Some(source.owner.clone()),
                relationship: Some(source.relationship.clone()),
                strength: Some(source.strength),
            },
            None => BindingRow::unbound(prim.clone()),
        })
        .collect()
}
