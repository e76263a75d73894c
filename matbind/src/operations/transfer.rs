//! Pushing inherited bindings down before the bindings above are blocked.
//!
//! When an ancestor's direct binding is blocked, every child that was
//! inheriting through it would silently lose its look. The transfer gives
//! each such child an authored copy of the binding it was resolving to.
//!
//! The work is split the same way as other edits in this crate: a planning
//! pass that only reads the graph, then an execution pass that authors the
//! planned copies. No effective binding is computed after a write.

use serde::Serialize;

use crate::binding::{
    authored_direct_binding, effective_direct_binding, BindingCache, BindingSource,
    MaterialBindingApi, Purpose, RelationshipKey, Strength,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::path::{PathSet, ScenePath};
use crate::stage::SceneGraph;

/// Why a relationship is scheduled for blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    /// Owned by an ancestor of a selected prim.
    Ancestor,
    /// Owned by a selected prim.
    Leaf,
}

/// An authored direct binding the caller should block after the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCandidate {
    /// The relationship.
    pub key: RelationshipKey,
    /// Whether its owner is a leaf or an ancestor.
    pub role: SourceRole,
    /// Its authored strength.
    pub strength: Strength,
}

/// One authored copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    /// Owner of the binding that was copied.
    pub from: ScenePath,
    /// The child that received the copy.
    pub to: ScenePath,
    /// Name of the authored relationship.
    pub relationship: String,
    /// The material the copy binds.
    pub material: Option<ScenePath>,
}

/// What [`find_and_transfer`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Bindings owned by the leaf and ancestor sets, each listed once.
    pub to_block: Vec<BlockCandidate>,
    /// Copies that were authored.
    pub transferred: Vec<Transfer>,
}

struct PlannedCopy {
    child: ScenePath,
    binding: BindingSource,
}

/// Copies each source's effective binding onto its untouched children.
///
/// Sources are the members of `ancestor_set` and `leaf_set`, visited in path
/// order. For a source with an effective binding `E` (resolved with
/// `leaf_set` as the barrier), each child outside both sets receives `E` as
/// its own direct binding for `purpose`, unless the child already authors a
/// binding that would still win over `E`. A child that cannot be edited is
/// reported as a warning and skipped.
///
/// `cache` must belong to `purpose` and must only have been filled with the
/// same barrier.
pub fn find_and_transfer<G: SceneGraph + ?Sized>(
    graph: &mut G,
    leaf_set: &PathSet,
    ancestor_set: &PathSet,
    purpose: Purpose,
    cache: &mut BindingCache,
    sink: &mut dyn DiagnosticSink,
) -> TransferOutcome {
    transfer_from(graph, leaf_set, ancestor_set, ancestor_set, purpose, cache, sink)
}

/// [`find_and_transfer`] reading only from `sources` (a subset of
/// `ancestor_set`) and the leaves.
///
/// Children in `ancestor_set` still never receive copies, whether or not
/// they are sources.
pub(crate) fn transfer_from<G: SceneGraph + ?Sized>(
    graph: &mut G,
    leaf_set: &PathSet,
    sources: &PathSet,
    ancestor_set: &PathSet,
    purpose: Purpose,
    cache: &mut BindingCache,
    sink: &mut dyn DiagnosticSink,
) -> TransferOutcome {
    let mut outcome = TransferOutcome::default();
    let mut plan = Vec::new();

    let sources = sources.iter().chain(leaf_set.iter()).cloned().collect::<PathSet>();
    for source in &sources {
        if let Some(authored) = authored_direct_binding(&*graph, source, purpose) {
            outcome.to_block.push(BlockCandidate {
                key: RelationshipKey::from(&authored),
                role: if leaf_set.contains(source) {
                    SourceRole::Leaf
                } else {
                    SourceRole::Ancestor
                },
                strength: authored.strength,
            });
        }

        let Some(effective) = effective_direct_binding(&*graph, source, purpose, leaf_set, cache)
        else {
            continue;
        };

        for child in graph.children(source) {
            if leaf_set.contains(&child) || ancestor_set.contains(&child) {
                continue;
            }
            if let Some(own) = authored_direct_binding(&*graph, &child, purpose) {
                if !effective.strength.is_stronger() || own.strength.is_stronger() {
                    log::debug!("{child} keeps its own binding {}", own.relationship);
                    continue;
                }
            }
            plan.push(PlannedCopy {
                child,
                binding: effective.clone(),
            });
        }
    }

    let name = purpose.direct_binding_name();
    for PlannedCopy { child, binding } in plan {
        match graph.author_binding(&child, binding.to_relationship(&name)) {
            Ok(()) => {
                log::debug!("transferred {} from {} to {child}", name, binding.owner);
                outcome.transferred.push(Transfer {
                    from: binding.owner.clone(),
                    to: child,
                    relationship: name.clone(),
                    material: binding.material().cloned(),
                });
            }
            Err(e) => sink.report(Diagnostic::warning(
                &child,
                format!("binding not transferred: {e}"),
            )),
        }
    }

    outcome
}
