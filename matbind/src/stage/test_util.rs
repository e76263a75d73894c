//! Shared helpers for unit and property tests.

use proptest::prelude::*;

use super::{Relationship, SceneGraph, Stage};
use crate::binding::{Purpose, Strength};
use crate::path::ScenePath;

const NAMES: [&str; 3] = ["A", "B", "C"];
const STRENGTHS: [Strength; 3] = [
    Strength::FallbackStrength,
    Strength::StrongerThanDescendants,
    Strength::WeakerThanDescendants,
];

/// Parses a path, panicking on bad input.
#[must_use]
pub fn path(text: &str) -> ScenePath {
    ScenePath::parse(text).unwrap()
}

/// Authors a direct binding on `prim` for `purpose`.
pub fn bind_direct(
    stage: &mut Stage,
    prim: &ScenePath,
    material: &ScenePath,
    purpose: Purpose,
    strength: Strength,
) {
    stage
        .author_relationship(
            prim,
            Relationship::new(purpose.direct_binding_name(), vec![material.clone()])
                .with_strength(strength),
        )
        .unwrap();
}

/// Every prim under `/World`, in path order.
#[must_use]
pub fn world_prims(stage: &Stage) -> Vec<ScenePath> {
    let world = path("/World");
    stage.subtree(&world).map(|prim| prim.path().clone()).collect()
}

/// A random `/World` hierarchy with random direct bindings to
/// `/Materials/M0..M3`.
pub fn arb_stage() -> impl Strategy<Value = Stage> {
    arb_stage_for(&[Purpose::AllPurpose])
}

/// Like [`arb_stage`], with each binding authored for a random purpose.
pub fn arb_mixed_stage() -> impl Strategy<Value = Stage> {
    arb_stage_for(&Purpose::ALL)
}

fn arb_stage_for(purposes: &'static [Purpose]) -> impl Strategy<Value = Stage> {
    let entry = (
        prop::collection::vec(0..NAMES.len(), 0..4),
        prop::option::of((0usize..4, 0..STRENGTHS.len(), prop::sample::select(purposes))),
    );
    prop::collection::vec(entry, 1..24).prop_map(|entries| {
        let mut stage = Stage::new();
        for index in 0..4 {
            stage
                .define_prim(&path(&format!("/Materials/M{index}")), "Material")
                .unwrap();
        }
        for (segments, binding) in entries {
            let prim = segments
                .iter()
                .try_fold(path("/World"), |parent, index| parent.child(NAMES[*index]))
                .unwrap();
            stage.define_prim(&prim, "Xform").unwrap();
            if let Some((material, strength, purpose)) = binding {
                bind_direct(
                    &mut stage,
                    &prim,
                    &path(&format!("/Materials/M{material}")),
                    purpose,
                    STRENGTHS[strength],
                );
            }
        }
        stage
    })
}
