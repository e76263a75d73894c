//! Property-based tests for the unbind operations.
//!
//! These focus on the guarantees callers rely on: untouched prims keep their
//! look, exclusion is idempotent, and the iterative unbind terminates.

use super::{partition, unbind, unbind_all, UnbindOptions};
use crate::binding::{
    authored_direct_binding, discover_current_bindings, effective_direct_binding, BindingCache,
    Purpose, Strength,
};
use crate::diagnostics::Diagnostics;
use crate::path::{PathSet, ScenePath};
use crate::stage::test_util::{arb_mixed_stage, arb_stage, path, world_prims};
use crate::stage::{Collection, ExpansionRule, Stage};
use proptest::prelude::*;

// A stage together with one to three of its /World prims
fn stage_and_selection() -> impl Strategy<Value = (Stage, PathSet)> {
    with_selection(arb_stage())
}

fn with_selection(stages: impl Strategy<Value = Stage>) -> impl Strategy<Value = (Stage, PathSet)> {
    stages.prop_flat_map(|stage| {
        let prims = world_prims(&stage);
        let most = prims.len().min(3);
        (
            Just(stage),
            prop::sample::subsequence(prims, 1..=most)
                .prop_map(|picked| picked.into_iter().collect::<PathSet>()),
        )
    })
}

fn look(
    stage: &Stage,
    prim: &ScenePath,
    purpose: Purpose,
    barrier: &PathSet,
) -> Option<(ScenePath, Strength)> {
    let mut cache = BindingCache::new(purpose);
    effective_direct_binding(stage, prim, purpose, barrier, &mut cache)
        .and_then(|b| Some((b.material()?.clone(), b.strength)))
}

fn pool_path() -> impl Strategy<Value = ScenePath> {
    prop::sample::select(vec![
        "/World",
        "/World/A",
        "/World/A/B",
        "/World/C",
        "/World/C/D",
        "/Other",
    ])
    .prop_map(path)
}

fn collection_strategy() -> impl Strategy<Value = Collection> {
    (
        prop::collection::vec(pool_path(), 0..4),
        prop::collection::vec(pool_path(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(includes, excludes, include_root)| {
            let mut collection = Collection::new("geo", ExpansionRule::ExpandPrims);
            for include in includes {
                collection.include_path(include);
            }
            for exclude in excludes {
                collection.exclude_path(&exclude);
            }
            collection.include_root = include_root;
            collection
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Prims outside the selection and its ancestors resolve to the same
    // material and strength before and after unbinding, with the selection's
    // own bindings set aside
    #[test]
    fn unbind_all_preserves_untouched_looks(
        (stage, selection) in stage_and_selection(),
        block_stronger in any::<bool>(),
    ) {
        let parts = partition(&selection);
        let prims = world_prims(&stage);
        let before: Vec<_> = prims
            .iter()
            .map(|prim| look(&stage, prim, Purpose::AllPurpose, &parts.leaf_set))
            .collect();

        let mut edited = stage.clone();
        let mut diagnostics = Diagnostics::new();
        let options = UnbindOptions::new().with_block_stronger_ancestors(block_stronger);
        let report = unbind_all(&mut edited, &selection, &options, &mut diagnostics).unwrap();
        prop_assert!(report.success);

        for (prim, expected) in prims.iter().zip(before) {
            if parts.contains(prim) {
                continue;
            }
            prop_assert_eq!(
                look(&edited, prim, Purpose::AllPurpose, &PathSet::new()),
                expected,
                "{}",
                prim
            );
        }
    }

    // The same holds for the iterative unbind, for the requested purpose and
    // the allPurpose bindings it falls back to
    #[test]
    fn unbind_preserves_untouched_looks(
        (stage, selection) in with_selection(arb_mixed_stage()),
        purpose in prop::sample::select(Purpose::ALL.to_vec()),
    ) {
        let parts = partition(&selection);
        let prims = world_prims(&stage);
        let mut checked = vec![Purpose::AllPurpose];
        if purpose != Purpose::AllPurpose {
            checked.push(purpose);
        }
        let before: Vec<_> = checked
            .iter()
            .map(|&edited| {
                prims
                    .iter()
                    .map(|prim| look(&stage, prim, edited, &parts.leaf_set))
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut edited_stage = stage.clone();
        let mut diagnostics = Diagnostics::new();
        let report = unbind(&mut edited_stage, &selection, purpose, 64, &mut diagnostics).unwrap();
        prop_assert!(report.success);
        prop_assert!(report.cycles < 64);
        prop_assert!(discover_current_bindings(&edited_stage, &selection, purpose).is_empty());

        for (&edited, looks) in checked.iter().zip(before) {
            for (prim, expected) in prims.iter().zip(looks) {
                if parts.contains(prim) {
                    continue;
                }
                prop_assert_eq!(
                    look(&edited_stage, prim, edited, &PathSet::new()),
                    expected,
                    "{} ({})",
                    prim,
                    edited
                );
            }
        }
    }

    // Selected prims carry no authored binding afterwards
    #[test]
    fn unbind_all_clears_selection(
        (stage, selection) in stage_and_selection(),
    ) {
        let mut edited = stage;
        let mut diagnostics = Diagnostics::new();
        unbind_all(&mut edited, &selection, &UnbindOptions::new(), &mut diagnostics).unwrap();
        for prim in &selection {
            prop_assert!(
                authored_direct_binding(&edited, prim, Purpose::AllPurpose).is_none()
            );
        }
    }

    // The iterative unbind never runs more cycles than allowed, and with
    // enough cycles leaves nothing binding the selection
    #[test]
    fn unbind_respects_limit(
        (stage, selection) in stage_and_selection(),
        limit in 1u32..4,
    ) {
        let mut limited = stage.clone();
        let mut diagnostics = Diagnostics::new();
        let report = unbind(&mut limited, &selection, Purpose::AllPurpose, limit, &mut diagnostics)
            .unwrap();
        prop_assert!(report.cycles <= limit);

        let mut full = stage;
        let report = unbind(&mut full, &selection, Purpose::AllPurpose, 64, &mut diagnostics)
            .unwrap();
        prop_assert!(report.cycles < 64);
        prop_assert!(discover_current_bindings(&full, &selection, Purpose::AllPurpose).is_empty());
    }

    // Excluding a path twice leaves the collection as excluding it once
    #[test]
    fn exclude_is_idempotent(
        collection in collection_strategy(),
        target in pool_path(),
    ) {
        let mut once = collection;
        once.exclude_path(&target);
        let mut twice = once.clone();
        prop_assert!(!twice.exclude_path(&target));
        prop_assert_eq!(&twice, &once);
        prop_assert!(!once.local_membership_query().is_path_included(&target));
    }
}
