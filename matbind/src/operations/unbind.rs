//! Unbinding a selection while keeping everything else looking the same.
//!
//! Two entry points:
//!
//! - [`unbind_all`] clears every purpose in one pass: partition, transfer,
//!   block, then strip the selection from its binding collections.
//! - [`unbind`] works for one purpose, repeatedly asking what still binds the
//!   selection and removing it, until nothing does or the cycle limit is hit.
//!
//! Both only abort on an invalid stage. Anything else is reported to the
//! sink, and `success` in the returned [`UnbindReport`] is cleared when an
//! edit fails.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::collection::{exclude_from_collection, remove_from_binding_collections, Exclusion};
use super::partition::{partition, Partition};
use super::selection::valid_targets;
use super::transfer::{find_and_transfer, transfer_from, SourceRole, Transfer};
use crate::binding::{
    authored_direct_binding, discover_current_bindings, BindingCache, BindingKind,
    CurrentBindings, Purpose, RelationshipKey,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::path::{PathSet, ScenePath};
use crate::stage::{Relationship, SceneGraph};

/// Options for [`unbind_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbindOptions {
    /// Purposes to clear, in order.
    pub purposes: Vec<Purpose>,
    /// Also block `strongerThanDescendants` bindings on ancestors.
    pub block_stronger_ancestors: bool,
}

impl Default for UnbindOptions {
    fn default() -> Self {
        Self {
            purposes: Purpose::ALL.to_vec(),
            block_stronger_ancestors: false,
        }
    }
}

impl UnbindOptions {
    /// Options clearing every purpose and keeping stronger ancestor bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the purposes to clear.
    #[must_use]
    pub fn with_purposes(mut self, purposes: Vec<Purpose>) -> Self {
        self.purposes = purposes;
        self
    }

    /// Sets the `block_stronger_ancestors` flag.
    #[must_use]
    pub const fn with_block_stronger_ancestors(mut self, block: bool) -> Self {
        self.block_stronger_ancestors = block;
        self
    }
}

/// What an unbind did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnbindReport {
    /// `false` if any block or collection edit failed.
    pub success: bool,
    /// Resolve/block cycles run.
    pub cycles: u32,
    /// Purposes whose bindings were edited.
    pub purposes: Vec<Purpose>,
    /// Relationships blocked, in the order they were blocked.
    pub blocked: Vec<RelationshipKey>,
    /// Bindings copied onto children.
    pub transferred: Vec<Transfer>,
    /// Collection exclusions.
    pub excluded: Vec<Exclusion>,
}

impl Default for UnbindReport {
    fn default() -> Self {
        Self {
            success: true,
            cycles: 0,
            purposes: Vec::new(),
            blocked: Vec::new(),
            transferred: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

impl UnbindReport {
    /// Returns `true` if nothing was edited.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.blocked.is_empty() && self.transferred.is_empty() && self.excluded.is_empty()
    }

    fn note_purpose(&mut self, purpose: Purpose) {
        if !self.purposes.contains(&purpose) {
            self.purposes.push(purpose);
        }
    }

    fn block<G: SceneGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        key: &RelationshipKey,
        sink: &mut dyn DiagnosticSink,
    ) {
        let already_blocked = graph
            .relationship(&key.owner, &key.name)
            .is_some_and(Relationship::is_blocked);
        if already_blocked {
            return;
        }
        match graph.block_relationship(&key.owner, &key.name) {
            Ok(()) => {
                log::debug!("blocked {key}");
                if !self.blocked.contains(key) {
                    self.blocked.push(key.clone());
                }
            }
            Err(e) => {
                self.success = false;
                sink.report(Diagnostic::error(&key.owner, format!("cannot block {key}: {e}")));
            }
        }
    }
}

/// Removes the material bindings of `selection` for every purpose in
/// `options`.
///
/// Per purpose, with a fresh cache: each prim left untouched below the
/// selection or its ancestors is given an authored copy of the binding it
/// inherited; the direct bindings on the selection are blocked, as are those
/// on its ancestors unless they are `strongerThanDescendants` (see
/// [`UnbindOptions::block_stronger_ancestors`]); finally each selected prim is
/// excluded from every collection bound on it or above it.
///
/// # Errors
///
/// Returns [`Error::InvalidStage`] if the graph is no longer valid.
///
/// # Examples
///
/// ```
/// use matbind::binding::{authored_direct_binding, Purpose};
/// use matbind::diagnostics::Diagnostics;
/// use matbind::operations::{unbind_all, UnbindOptions};
/// use matbind::path::{PathSet, ScenePath};
/// use matbind::stage::{Relationship, SceneGraph, Stage};
///
/// let p = |s: &str| ScenePath::parse(s).unwrap();
/// let mut stage = Stage::new();
/// stage.define_prim(&p("/World/A/B"), "Mesh").unwrap();
/// stage
///     .author_relationship(&p("/World/A"), Relationship::new("material:binding", vec![p("/M")]))
///     .unwrap();
///
/// let selection: PathSet = [p("/World/A")].into_iter().collect();
/// let mut diagnostics = Diagnostics::new();
/// let report = unbind_all(&mut stage, &selection, &UnbindOptions::new(), &mut diagnostics).unwrap();
///
/// assert!(report.success);
/// assert!(authored_direct_binding(&stage, &p("/World/A"), Purpose::AllPurpose).is_none());
/// ```
pub fn unbind_all<G: SceneGraph + ?Sized>(
    graph: &mut G,
    selection: &PathSet,
    options: &UnbindOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<UnbindReport> {
    if !graph.is_valid() {
        return Err(Error::InvalidStage);
    }
    let targets = valid_targets(&*graph, selection, sink);
    let mut report = UnbindReport::default();
    if targets.is_empty() {
        return Ok(report);
    }

    let parts = partition(&targets);
    log::debug!(
        "unbinding {} prim(s) below {} ancestor(s)",
        parts.leaf_set.len(),
        parts.ancestor_set.len()
    );

    for &purpose in &options.purposes {
        let mut cache = BindingCache::new(purpose);
        let outcome = find_and_transfer(
            graph,
            &parts.leaf_set,
            &parts.ancestor_set,
            purpose,
            &mut cache,
            sink,
        );
        report.transferred.extend(outcome.transferred);

        for candidate in outcome.to_block {
            if candidate.role == SourceRole::Ancestor
                && candidate.strength.is_stronger()
                && !options.block_stronger_ancestors
            {
                log::debug!("keeping stronger ancestor binding {}", candidate.key);
                continue;
            }
            report.block(graph, &candidate.key, sink);
        }

        for leaf in &parts.leaf_set {
            let strip = remove_from_binding_collections(graph, leaf, purpose, sink);
            report.success &= strip.success;
            report.excluded.extend(strip.excluded);
        }
        report.note_purpose(purpose);
    }
    report.cycles = 1;
    Ok(report)
}

/// Removes whatever binds `selection` for `purpose`, up to `unbind_limit`
/// times.
///
/// Each cycle asks which relationships currently decide the selection's
/// material (falling back to `allPurpose` like resolution does). Direct
/// bindings found on ancestors are transferred away from untouched children
/// and then blocked, along with every selected prim's own binding; prims bound
/// through a collection are excluded from it. The loop stops as soon as
/// nothing binds the selection. If bindings remain once the limit is reached
/// they are reported as warnings.
///
/// # Errors
///
/// Returns [`Error::InvalidStage`] if the graph is no longer valid.
pub fn unbind<G: SceneGraph + ?Sized>(
    graph: &mut G,
    selection: &PathSet,
    purpose: Purpose,
    unbind_limit: u32,
    sink: &mut dyn DiagnosticSink,
) -> Result<UnbindReport> {
    if !graph.is_valid() {
        return Err(Error::InvalidStage);
    }
    let targets = valid_targets(&*graph, selection, sink);
    let mut report = UnbindReport::default();
    if targets.is_empty() {
        return Ok(report);
    }

    let parts = partition(&targets);
    while report.cycles < unbind_limit {
        let current = discover_current_bindings(&*graph, &targets, purpose);
        if current.is_empty() {
            break;
        }
        report.cycles += 1;
        log::debug!(
            "unbind cycle {}: {} relationship(s) bind the selection",
            report.cycles,
            current.len()
        );
        run_cycle(graph, &parts, purpose, &current, &mut report, sink);
    }

    if report.cycles == unbind_limit {
        let remaining = discover_current_bindings(&*graph, &targets, purpose);
        for key in remaining.direct.keys().chain(remaining.collections.keys()) {
            sink.report(Diagnostic::warning(
                &key.owner,
                format!("{key} still binds the selection after {unbind_limit} cycle(s)"),
            ));
        }
    }
    Ok(report)
}

/// The members of `parts.ancestor_set` that are `owners` or lie below one.
fn ancestors_below(parts: &Partition, owners: &[&ScenePath]) -> PathSet {
    parts
        .ancestor_set
        .iter()
        .filter(|ancestor| owners.iter().any(|owner| ancestor.has_prefix(owner)))
        .cloned()
        .collect()
}

fn run_cycle<G: SceneGraph + ?Sized>(
    graph: &mut G,
    parts: &Partition,
    purpose: Purpose,
    current: &CurrentBindings,
    report: &mut UnbindReport,
    sink: &mut dyn DiagnosticSink,
) {
    // A fallback hit means the allPurpose relationships are the ones edited.
    // Sources are the selection's ancestors at or below an owner being
    // blocked; no ancestor of the selection ever receives a copy.
    let mut owners: BTreeMap<Purpose, Vec<&ScenePath>> = BTreeMap::new();
    owners.entry(purpose).or_default();
    for key in current.direct.keys() {
        let Some(kind) = BindingKind::classify(&key.name) else {
            continue;
        };
        owners.entry(kind.purpose()).or_default().push(&key.owner);
    }
    let sources: BTreeMap<Purpose, PathSet> = owners
        .into_iter()
        .map(|(edited, owners)| (edited, ancestors_below(parts, &owners)))
        .collect();

    for (&edited, sources) in &sources {
        let mut cache = BindingCache::new(edited);
        let outcome = transfer_from(
            graph,
            &parts.leaf_set,
            sources,
            &parts.ancestor_set,
            edited,
            &mut cache,
            sink,
        );
        report.transferred.extend(outcome.transferred);
        report.note_purpose(edited);
    }

    let mut to_block: BTreeSet<RelationshipKey> = current.direct.keys().cloned().collect();
    for leaf in &parts.leaf_set {
        if let Some(own) = authored_direct_binding(&*graph, leaf, purpose) {
            to_block.insert(RelationshipKey::from(&own));
        }
    }
    for key in &to_block {
        report.block(graph, key, sink);
    }

    for (key, hit) in &current.collections {
        for prim in &hit.prims {
            match exclude_from_collection(graph, &hit.collection, prim) {
                Ok(true) => report.excluded.push(Exclusion {
                    collection: hit.collection.clone(),
                    prim: prim.clone(),
                }),
                Ok(false) => log::debug!("{prim} already excluded from {}", hit.collection),
                Err(e) => {
                    report.success = false;
                    sink.report(Diagnostic::error(prim, format!("{key}: {e}")));
                }
            }
        }
    }
}

/// Removes `selection`'s bindings for one purpose using [`unbind_all`].
///
/// A convenience over [`UnbindOptions::with_purposes`].
///
/// # Errors
///
/// Returns [`Error::InvalidStage`] if the graph is no longer valid.
pub fn unbind_purpose<G: SceneGraph + ?Sized>(
    graph: &mut G,
    selection: &PathSet,
    purpose: Purpose,
    sink: &mut dyn DiagnosticSink,
) -> Result<UnbindReport> {
    unbind_all(
        graph,
        selection,
        &UnbindOptions::new().with_purposes(vec![purpose]),
        sink,
    )
}
