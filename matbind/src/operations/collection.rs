//! Removing prims from the collections that bind them.

use serde::Serialize;

use crate::binding::{MaterialBindingApi, Purpose, RelationshipKey};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::path::ScenePath;
use crate::stage::SceneGraph;

/// A prim excluded from a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    /// The collection edited.
    pub collection: ScenePath,
    /// The prim no longer a member.
    pub prim: ScenePath,
}

/// What [`remove_from_binding_collections`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    /// `false` if any bound collection could not be edited.
    pub success: bool,
    /// Collections that actually changed.
    pub excluded: Vec<Exclusion>,
}

impl Default for StripOutcome {
    fn default() -> Self {
        Self {
            success: true,
            excluded: Vec::new(),
        }
    }
}

/// Excludes `prim` from the collection at `collection`.
///
/// Returns `true` if the collection changed; excluding a path that is not a
/// member is a successful no-op.
///
/// # Errors
///
/// Returns [`Error::CollectionNotFound`] if no collection exists there.
pub fn exclude_from_collection<G: SceneGraph + ?Sized>(
    graph: &mut G,
    collection: &ScenePath,
    prim: &ScenePath,
) -> Result<bool> {
    let target = graph
        .collection_mut(collection)
        .ok_or_else(|| Error::CollectionNotFound {
            path: collection.clone(),
        })?;
    Ok(target.exclude_path(prim))
}

/// Strips `prim` from every collection bound on it or its ancestors.
///
/// Collection bindings for `purpose` are looked up on `prim` and each
/// ancestor; each bound collection excludes `prim`. A binding whose
/// collection is missing is reported as an error and the rest continue.
pub fn remove_from_binding_collections<G: SceneGraph + ?Sized>(
    graph: &mut G,
    prim: &ScenePath,
    purpose: Purpose,
    sink: &mut dyn DiagnosticSink,
) -> StripOutcome {
    let mut outcome = StripOutcome::default();
    if prim.is_root() {
        return outcome;
    }

    let levels: Vec<ScenePath> = std::iter::once(prim.clone())
        .chain(prim.ancestors())
        .collect();
    let bindings: Vec<_> = levels
        .iter()
        .flat_map(|level| graph.collection_bindings(level, purpose))
        .collect();

    for binding in bindings {
        let Some(collection) = binding.collection().cloned() else {
            continue;
        };
        match exclude_from_collection(graph, &collection, prim) {
            Ok(true) => {
                log::debug!("excluded {prim} from {collection}");
                outcome.excluded.push(Exclusion {
                    collection,
                    prim: prim.clone(),
                });
            }
            Ok(false) => {}
            Err(e) => {
                outcome.success = false;
                sink.report(Diagnostic::error(
                    prim,
                    format!("{} is stale: {e}", RelationshipKey::from(&binding)),
                ));
            }
        }
    }
    outcome
}
