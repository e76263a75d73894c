//! Binding a material to a selection.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::selection::valid_targets;
use crate::binding::tokens::{collection_api_schema, COLLECTION_NAMESPACE, MATERIAL_TYPE};
use crate::binding::{material_id_hint, MaterialBindingApi, Purpose, RelationshipKey, Strength};
use crate::config::{Config, DEFAULT_MATERIAL_ID_KEY};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::path::{PathSet, ScenePath};
use crate::stage::{ExpansionRule, Relationship, SceneGraph};

/// How the material is attached.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BindMethod {
    /// A direct binding on every selected prim.
    #[default]
    Direct,
    /// One collection binding covering the selection.
    Collection,
}

impl fmt::Display for BindMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Options for a bind operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// The material prim to bind.
    pub material: ScenePath,

    /// Direct or collection binding.
    pub method: BindMethod,

    /// `bindMaterialAs` strength of the authored relationship.
    pub strength: Strength,

    /// Purpose the binding applies to.
    pub purpose: Purpose,

    /// Collection name (collection method). Defaults to the material's name.
    pub collection_name: Option<String>,

    /// Prim owning the collection and its binding (collection method).
    /// Defaults to the nearest prim above the whole selection.
    pub binding_prim: Option<ScenePath>,

    /// Binding name, the last component of the relationship name
    /// (collection method). Defaults to the collection name.
    pub binding_name: Option<String>,

    /// Expansion rule for a newly created collection.
    pub expansion_rule: ExpansionRule,

    /// Custom-data key of the material-id hint.
    pub material_id_key: String,
}

impl BindOptions {
    /// Creates options binding `material` directly, with default strength
    /// and `allPurpose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::binding::Strength;
    /// use matbind::operations::{BindMethod, BindOptions};
    /// use matbind::path::ScenePath;
    ///
    /// let options = BindOptions::new(ScenePath::parse("/Materials/Red").unwrap())
    ///     .with_method(BindMethod::Collection)
    ///     .with_strength(Strength::StrongerThanDescendants);
    /// assert_eq!(options.method, BindMethod::Collection);
    /// assert!(options.binding_prim.is_none());
    /// ```
    #[must_use]
    pub fn new(material: ScenePath) -> Self {
        Self {
            material,
            method: BindMethod::Direct,
            strength: Strength::default(),
            purpose: Purpose::default(),
            collection_name: None,
            binding_prim: None,
            binding_name: None,
            expansion_rule: ExpansionRule::default(),
            material_id_key: DEFAULT_MATERIAL_ID_KEY.to_string(),
        }
    }

    /// Creates options whose defaults come from `config`.
    #[must_use]
    pub fn from_config(material: ScenePath, config: &Config) -> Self {
        Self::new(material)
            .with_strength(config.strength())
            .with_purpose(config.purpose())
            .with_expansion_rule(config.collection_expansion())
            .with_material_id_key(config.material_id_key())
    }

    /// Sets the binding method.
    #[must_use]
    pub const fn with_method(mut self, method: BindMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the strength.
    #[must_use]
    pub const fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the purpose.
    #[must_use]
    pub const fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Sets the collection name.
    #[must_use]
    pub fn with_collection_name(mut self, name: Option<String>) -> Self {
        self.collection_name = name;
        self
    }

    /// Sets the binding prim.
    #[must_use]
    pub fn with_binding_prim(mut self, prim: Option<ScenePath>) -> Self {
        self.binding_prim = prim;
        self
    }

    /// Sets the binding name.
    #[must_use]
    pub fn with_binding_name(mut self, name: Option<String>) -> Self {
        self.binding_name = name;
        self
    }

    /// Sets the expansion rule for new collections.
    #[must_use]
    pub const fn with_expansion_rule(mut self, rule: ExpansionRule) -> Self {
        self.expansion_rule = rule;
        self
    }

    /// Sets the material-id custom-data key.
    #[must_use]
    pub fn with_material_id_key(mut self, key: impl Into<String>) -> Self {
        self.material_id_key = key.into();
        self
    }
}

/// What a bind did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindReport {
    /// `false` if anything could not be bound.
    pub success: bool,
    /// The method used.
    pub method: BindMethod,
    /// The bound material.
    pub material: ScenePath,
    /// Prims now bound to the material.
    pub bound: Vec<ScenePath>,
    /// Relationships authored.
    pub relationships: Vec<RelationshipKey>,
    /// The collection used, for the collection method.
    pub collection: Option<ScenePath>,
}

impl BindReport {
    fn new(options: &BindOptions) -> Self {
        Self {
            success: true,
            method: options.method,
            material: options.material.clone(),
            bound: Vec::new(),
            relationships: Vec::new(),
            collection: None,
        }
    }
}

/// Binds `options.material` to every prim in `selection`.
///
/// A missing material, or a prim that is not a `Material`, is reported as an
/// error and nothing is authored. Selected paths that are not prims are
/// warned about and skipped. When the material prim carries a material-id
/// hint under `options.material_id_key`, it is copied onto every authored
/// relationship.
///
/// # Errors
///
/// Returns [`Error::InvalidStage`] if the graph is no longer valid.
///
/// # Examples
///
/// ```
/// use matbind::binding::{compute_bound_material, Purpose};
/// use matbind::diagnostics::Diagnostics;
/// use matbind::operations::{bind, BindOptions};
/// use matbind::path::{PathSet, ScenePath};
/// use matbind::stage::Stage;
///
/// let p = |s: &str| ScenePath::parse(s).unwrap();
/// let mut stage = Stage::new();
/// stage.define_prim(&p("/World/Teapot"), "Mesh").unwrap();
/// stage.define_prim(&p("/Materials/Red"), "Material").unwrap();
///
/// let selection: PathSet = [p("/World/Teapot")].into_iter().collect();
/// let mut diagnostics = Diagnostics::new();
/// let options = BindOptions::new(p("/Materials/Red"));
/// let report = bind(&mut stage, &selection, &options, &mut diagnostics).unwrap();
///
/// assert!(report.success);
/// let bound = compute_bound_material(&stage, &p("/World/Teapot"), Purpose::Full).unwrap();
/// assert_eq!(bound.material(), Some(&p("/Materials/Red")));
/// ```
pub fn bind<G: SceneGraph + ?Sized>(
    graph: &mut G,
    selection: &PathSet,
    options: &BindOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<BindReport> {
    if !graph.is_valid() {
        return Err(Error::InvalidStage);
    }
    let mut report = BindReport::new(options);

    if let Err(e) = check_material(&*graph, &options.material) {
        report.success = false;
        sink.report(Diagnostic::error(&options.material, e.to_string()));
        return Ok(report);
    }

    let targets = valid_targets(&*graph, selection, sink);
    if targets.is_empty() {
        return Ok(report);
    }
    let hint = material_id_hint(&*graph, &options.material, &options.material_id_key);

    match options.method {
        BindMethod::Direct => bind_direct(graph, &targets, options, hint.as_deref(), &mut report, sink),
        BindMethod::Collection => {
            match bind_collection(graph, &targets, options, hint.as_deref()) {
                Ok((collection, key)) => {
                    report.bound = targets.into_iter().collect();
                    report.relationships.push(key);
                    report.collection = Some(collection);
                }
                Err(e) => {
                    report.success = false;
                    let path = e.path().cloned().unwrap_or_else(|| options.material.clone());
                    sink.report(Diagnostic::error(&path, e.to_string()));
                }
            }
        }
    }
    Ok(report)
}

fn check_material<G: SceneGraph + ?Sized>(graph: &G, material: &ScenePath) -> Result<()> {
    match graph.type_name(material) {
        None => Err(Error::InvalidMaterial {
            path: material.clone(),
            reason: "no such prim".into(),
        }),
        Some(MATERIAL_TYPE) => Ok(()),
        Some(other) => Err(Error::InvalidMaterial {
            path: material.clone(),
            reason: format!("prim type is '{other}', not '{MATERIAL_TYPE}'"),
        }),
    }
}

fn binding_relationship(
    name: String,
    targets: Vec<ScenePath>,
    options: &BindOptions,
    hint: Option<&str>,
) -> Relationship {
    let relationship = Relationship::new(name, targets).with_strength(options.strength);
    match hint {
        Some(id) => relationship.with_custom_data(options.material_id_key.clone(), id),
        None => relationship,
    }
}

fn bind_direct<G: SceneGraph + ?Sized>(
    graph: &mut G,
    targets: &PathSet,
    options: &BindOptions,
    hint: Option<&str>,
    report: &mut BindReport,
    sink: &mut dyn DiagnosticSink,
) {
    let name = options.purpose.direct_binding_name();
    for target in targets {
        let relationship = binding_relationship(
            name.clone(),
            vec![options.material.clone()],
            options,
            hint,
        );
        match graph.author_binding(target, relationship) {
            Ok(()) => {
                log::debug!("bound {target} to {}", options.material);
                report.bound.push(target.clone());
                report
                    .relationships
                    .push(RelationshipKey::new(target.clone(), name.clone()));
            }
            Err(e) => {
                report.success = false;
                sink.report(Diagnostic::error(target, e.to_string()));
            }
        }
    }
}

/// The prim that owns the collection when none was given: the nearest prim
/// above every target. A target is never its own binding prim.
fn default_binding_prim(targets: &PathSet) -> Result<ScenePath> {
    let prim = match targets.common_ancestor() {
        Some(common) if targets.contains(&common) => common.parent(),
        other => other,
    };
    match prim {
        Some(prim) if !prim.is_root() => Ok(prim),
        _ => Err(Error::BindingFailed {
            path: ScenePath::root(),
            reason: "the selection shares no ancestor below '/'; choose a binding prim".into(),
        }),
    }
}

fn bind_collection<G: SceneGraph + ?Sized>(
    graph: &mut G,
    targets: &PathSet,
    options: &BindOptions,
    hint: Option<&str>,
) -> Result<(ScenePath, RelationshipKey)> {
    let binding_prim = match &options.binding_prim {
        Some(prim) => prim.clone(),
        None => default_binding_prim(targets)?,
    };
    if !graph.has_prim(&binding_prim) {
        return Err(Error::PrimNotFound { path: binding_prim });
    }

    let collection_name = match &options.collection_name {
        Some(name) => name.clone(),
        None => options
            .material
            .name()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidMaterial {
                path: options.material.clone(),
                reason: "cannot name a collection after it".into(),
            })?,
    };
    let binding_name = options.binding_name.as_deref().unwrap_or(&collection_name);
    let collection_path =
        binding_prim.with_property(&format!("{COLLECTION_NAMESPACE}:{collection_name}"))?;

    let collection =
        graph.define_collection(&binding_prim, &collection_name, options.expansion_rule)?;
    for target in targets {
        collection.include_path(target.clone());
    }
    graph.apply_schema(&binding_prim, &collection_api_schema(&collection_name))?;

    let name = options.purpose.collection_binding_name(binding_name);
    let relationship = binding_relationship(
        name.clone(),
        vec![collection_path.clone(), options.material.clone()],
        options,
        hint,
    );
    graph.author_binding(&binding_prim, relationship)?;
    log::debug!(
        "bound {} prim(s) to {} through {collection_path}",
        targets.len(),
        options.material
    );
    Ok((collection_path, RelationshipKey::new(binding_prim, name)))
}
