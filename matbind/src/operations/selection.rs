//! Turning user-supplied paths into a set of editable prims.

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::path::{PathSet, ScenePath};
use crate::stage::SceneGraph;

/// Parses selection strings into a path set, reporting the ones that fail.
///
/// Duplicates collapse; the result iterates in path order.
pub fn parse_selection<'a>(
    paths: impl IntoIterator<Item = &'a str>,
    sink: &mut dyn DiagnosticSink,
) -> PathSet {
    let mut selection = PathSet::new();
    for text in paths {
        match ScenePath::parse(text) {
            Ok(path) => {
                selection.insert(path);
            }
            Err(e) => sink.report(Diagnostic {
                severity: Severity::Warning,
                path: None,
                message: e.to_string(),
            }),
        }
    }
    selection
}

/// The members of `selection` that name existing prims.
///
/// The pseudo-root, property paths and missing prims are reported as
/// warnings and left out.
pub fn valid_targets<G: SceneGraph + ?Sized>(
    graph: &G,
    selection: &PathSet,
    sink: &mut dyn DiagnosticSink,
) -> PathSet {
    let mut targets = PathSet::new();
    for path in selection {
        if path.is_root() || !path.is_prim_path() {
            sink.report(Diagnostic::warning(path, "not a prim path, skipped"));
        } else if !graph.has_prim(path) {
            sink.report(Diagnostic::warning(path, "no such prim, skipped"));
        } else {
            targets.insert(path.clone());
        }
    }
    targets
}
