//! Editing operations: binding and unbinding materials.
//!
//! Every operation takes the graph by `&mut`, which is the exclusive write
//! access it needs for its whole duration, and a
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) that receives the
//! per-path problems it skipped over. Only an invalid stage aborts an
//! operation; the returned report says whether every edit succeeded.
//!
//! Unbinding is built from smaller steps that are public for callers who
//! need them on their own:
//!
//! 1. [`partition`] splits the selection into leaves and ancestors.
//! 2. [`find_and_transfer`] plans and authors copies of inherited bindings
//!    on the children that must keep their look.
//! 3. The orchestrators block the relationships the transfer returned.
//! 4. [`remove_from_binding_collections`] strips leaves from the collections
//!    binding them.
//!
//! # Examples
//!
//! ```
//! use matbind::binding::{compute_bound_material, Purpose};
//! use matbind::diagnostics::Diagnostics;
//! use matbind::operations::{bind, unbind, BindMethod, BindOptions};
//! use matbind::path::{PathSet, ScenePath};
//! use matbind::stage::Stage;
//!
//! let p = |s: &str| ScenePath::parse(s).unwrap();
//! let mut stage = Stage::new();
//! stage.define_prim(&p("/World/X"), "Mesh").unwrap();
//! stage.define_prim(&p("/World/Y"), "Mesh").unwrap();
//! stage.define_prim(&p("/Materials/M"), "Material").unwrap();
//! let mut diagnostics = Diagnostics::new();
//!
//! let both: PathSet = [p("/World/X"), p("/World/Y")].into_iter().collect();
//! let options = BindOptions::new(p("/Materials/M")).with_method(BindMethod::Collection);
//! bind(&mut stage, &both, &options, &mut diagnostics).unwrap();
//!
//! let x: PathSet = [p("/World/X")].into_iter().collect();
//! unbind(&mut stage, &x, Purpose::AllPurpose, 10, &mut diagnostics).unwrap();
//!
//! assert!(compute_bound_material(&stage, &p("/World/X"), Purpose::AllPurpose).is_none());
//! assert!(compute_bound_material(&stage, &p("/World/Y"), Purpose::AllPurpose).is_some());
//! ```

pub mod bind;
pub mod collection;
pub mod partition;
pub mod selection;
pub mod transfer;
pub mod unbind;

#[cfg(test)]
mod proptests;

pub use bind::{bind, BindMethod, BindOptions, BindReport};
pub use collection::{
    exclude_from_collection, remove_from_binding_collections, Exclusion, StripOutcome,
};
pub use partition::{ancestors_between, partition, Partition};
pub use selection::{parse_selection, valid_targets};
pub use transfer::{find_and_transfer, BlockCandidate, SourceRole, Transfer, TransferOutcome};
pub use unbind::{unbind, unbind_all, unbind_purpose, UnbindOptions, UnbindReport};
