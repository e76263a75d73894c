//! Property-based tests for binding resolution and the binding cache.

use super::{
    compute_bound_material, effective_direct_binding, BindingCache, BindingSource, Purpose,
};
use crate::path::{PathSet, ScenePath};
use crate::stage::test_util::{arb_stage, world_prims};
use crate::stage::Stage;
use proptest::prelude::*;

fn fresh(stage: &Stage, prim: &ScenePath, barrier: &PathSet) -> Option<BindingSource> {
    let mut cache = BindingCache::new(Purpose::AllPurpose);
    effective_direct_binding(stage, prim, Purpose::AllPurpose, barrier, &mut cache)
}

fn barrier_from(prims: &[ScenePath], mask: &[bool]) -> PathSet {
    prims
        .iter()
        .zip(mask.iter().chain(std::iter::repeat(&false)))
        .filter(|(_, selected)| **selected)
        .map(|(prim, _)| prim.clone())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // A populated cache agrees with a walk from an empty cache, whatever
    // order the prims were resolved in
    #[test]
    fn cache_matches_fresh_walk(
        stage in arb_stage(),
        mask in prop::collection::vec(any::<bool>(), 0..32),
        top_down in any::<bool>(),
    ) {
        let mut prims = world_prims(&stage);
        let barrier = barrier_from(&prims, &mask);
        if !top_down {
            prims.reverse();
        }

        let mut cache = BindingCache::new(Purpose::AllPurpose);
        for prim in &prims {
            let shared = effective_direct_binding(
                &stage,
                prim,
                Purpose::AllPurpose,
                &barrier,
                &mut cache,
            );
            prop_assert_eq!(&shared, &fresh(&stage, prim, &barrier));
        }
        for prim in &prims {
            prop_assert_eq!(
                cache.lookup(prim).flatten().cloned(),
                fresh(&stage, prim, &barrier)
            );
        }
    }

    // With no collections, full resolution is direct resolution
    #[test]
    fn bound_material_matches_direct(stage in arb_stage()) {
        let barrier = PathSet::new();
        for prim in world_prims(&stage) {
            prop_assert_eq!(
                compute_bound_material(&stage, &prim, Purpose::AllPurpose),
                fresh(&stage, &prim, &barrier)
            );
        }
    }

    // The resolved binding is always authored on the prim or an ancestor
    #[test]
    fn resolved_owner_is_on_chain(stage in arb_stage()) {
        let barrier = PathSet::new();
        for prim in world_prims(&stage) {
            if let Some(source) = fresh(&stage, &prim, &barrier) {
                prop_assert!(source.owner == prim || source.owner.is_ancestor_of(&prim));
                prop_assert!(!source.targets.is_empty());
            }
        }
    }
}
