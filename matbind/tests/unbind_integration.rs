//! Integration tests for unbinding.
//!
//! Each test builds a small stage, runs one of the unbind entry points and
//! checks both what changed and what must not have.

mod common;

use common::{authored, bound, p, set, StageFixture};
use matbind::binding::{effective_direct_binding, BindingCache, Purpose, Strength};
use matbind::diagnostics::{Diagnostics, Severity};
use matbind::operations::{unbind, unbind_all, UnbindOptions};
use matbind::path::PathSet;
use matbind::stage::SceneGraph;
use matbind::Error;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_stronger_ancestor_reaches_past_unbound_prim() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/A/B"])
        .with_material("/Materials/M1")
        .with_material("/Materials/M2")
        .strength(Strength::StrongerThanDescendants)
        .with_binding("/World", "/Materials/M1")
        .strength(Strength::FallbackStrength)
        .with_binding("/World/A", "/Materials/M2")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report =
        unbind_all(&mut stage, &set(&["/World/A"]), &UnbindOptions::new(), &mut diagnostics)
            .unwrap();

    assert!(report.success);
    assert!(diagnostics.is_empty());
    assert_eq!(authored(&stage, "/World/A", Purpose::AllPurpose), None);
    assert_eq!(
        authored(&stage, "/World/A/B", Purpose::AllPurpose),
        Some(p("/Materials/M1"))
    );
    assert_eq!(authored(&stage, "/World", Purpose::AllPurpose), Some(p("/Materials/M1")));
}

#[test]
fn test_collection_member_unbound_alone() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/X", "/World/Y"])
        .with_material("/Materials/M")
        .with_collection_binding("/World", "geoSet", &["/World/X", "/World/Y"], "/Materials/M")
        .build();
    let y_before = bound(&stage, "/World/Y", Purpose::Full);

    let mut diagnostics = Diagnostics::new();
    let report = unbind_all(&mut stage, &set(&["/World/X"]), &UnbindOptions::new(), &mut diagnostics)
        .unwrap();

    assert!(report.success);
    let geo = stage.collection(&p("/World.collection:geoSet")).unwrap();
    assert!(geo.excludes.contains(&p("/World/X")) || !geo.includes.contains(&p("/World/X")));
    assert!(geo.includes.contains(&p("/World/Y")));
    assert_eq!(bound(&stage, "/World/X", Purpose::Full), None);
    assert_eq!(bound(&stage, "/World/Y", Purpose::Full), y_before);
}

// ============================================================================
// Properties on fixed stages
// ============================================================================

#[test]
fn test_strength_precedence_regardless_of_order() {
    let stage = StageFixture::new()
        .with_prims(&["/A/B/C/Leaf"])
        .with_material("/Materials/X")
        .with_material("/Materials/Y")
        .with_binding("/A", "/Materials/X")
        .strength(Strength::StrongerThanDescendants)
        .with_binding("/A/B", "/Materials/Y")
        .build();

    let orders: [&[&str]; 2] = [
        &["/A", "/A/B", "/A/B/C", "/A/B/C/Leaf"],
        &["/A/B/C/Leaf", "/A/B/C", "/A/B", "/A"],
    ];
    for order in orders {
        let mut cache = BindingCache::new(Purpose::AllPurpose);
        for prim in order {
            effective_direct_binding(
                &stage,
                &p(prim),
                Purpose::AllPurpose,
                &PathSet::new(),
                &mut cache,
            );
        }
        let leaf = cache.lookup(&p("/A/B/C/Leaf")).flatten().cloned();
        assert_eq!(leaf.and_then(|b| b.material().cloned()), Some(p("/Materials/Y")));
    }
}

#[test]
fn test_leaf_barrier_non_leak() {
    let mut stage = StageFixture::new()
        .with_prims(&["/A/B/C"])
        .with_material("/Materials/X")
        .with_binding("/A", "/Materials/X")
        .build();

    let mut diagnostics = Diagnostics::new();
    unbind_all(&mut stage, &set(&["/A/B"]), &UnbindOptions::new(), &mut diagnostics).unwrap();

    assert_eq!(authored(&stage, "/A/B/C", Purpose::AllPurpose), Some(p("/Materials/X")));
    assert_eq!(authored(&stage, "/A/B", Purpose::AllPurpose), None);
}

#[test]
fn test_siblings_keep_their_look() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/A/B", "/World/A/C/D", "/World/E"])
        .with_material("/Materials/M1")
        .with_material("/Materials/M2")
        .with_binding("/World", "/Materials/M1")
        .with_binding("/World/A", "/Materials/M2")
        .with_binding("/World/E", "/Materials/M2")
        .build();
    let prims = ["/World/A/C", "/World/A/C/D", "/World/E"];
    let before: Vec<_> = prims
        .iter()
        .map(|prim| bound(&stage, prim, Purpose::Full))
        .collect();

    let mut diagnostics = Diagnostics::new();
    unbind_all(&mut stage, &set(&["/World/A/B"]), &UnbindOptions::new(), &mut diagnostics)
        .unwrap();

    let after: Vec<_> = prims
        .iter()
        .map(|prim| bound(&stage, prim, Purpose::Full))
        .collect();
    assert_eq!(before, after);
    assert_eq!(bound(&stage, "/World/A/B", Purpose::Full), None);
}

#[test]
fn test_unbind_all_covers_every_purpose() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/A"])
        .with_material("/Materials/M")
        .with_binding("/World/A", "/Materials/M")
        .purpose(Purpose::Full)
        .with_binding("/World/A", "/Materials/M")
        .purpose(Purpose::Preview)
        .with_binding("/World/A", "/Materials/M")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report =
        unbind_all(&mut stage, &set(&["/World/A"]), &UnbindOptions::new(), &mut diagnostics)
            .unwrap();

    assert_eq!(report.blocked.len(), 3);
    for purpose in Purpose::ALL {
        assert_eq!(bound(&stage, "/World/A", purpose), None, "{purpose}");
    }
}

// ============================================================================
// Iterative unbind
// ============================================================================

#[test]
fn test_iterative_unbind_clears_direct_and_collection() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/X", "/World/Y"])
        .with_material("/Materials/M")
        .with_material("/Materials/Own")
        .with_collection_binding("/World", "geoSet", &["/World/X", "/World/Y"], "/Materials/M")
        .with_binding("/World/X", "/Materials/Own")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report = unbind(&mut stage, &set(&["/World/X"]), Purpose::Full, 10, &mut diagnostics)
        .unwrap();

    assert!(report.success);
    assert_eq!(report.cycles, 2);
    assert_eq!(bound(&stage, "/World/X", Purpose::Full), None);
    assert_eq!(bound(&stage, "/World/Y", Purpose::Full), Some(p("/Materials/M")));
    assert_eq!(report.excluded.len(), 1);
}

#[test]
fn test_iterative_unbind_is_bounded() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/X"])
        .with_material("/Materials/M")
        .with_material("/Materials/Own")
        .with_collection_binding("/World", "geoSet", &["/World/X"], "/Materials/M")
        .with_binding("/World/X", "/Materials/Own")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report = unbind(&mut stage, &set(&["/World/X"]), Purpose::AllPurpose, 1, &mut diagnostics)
        .unwrap();

    assert_eq!(report.cycles, 1);
    assert_eq!(bound(&stage, "/World/X", Purpose::AllPurpose), Some(p("/Materials/M")));
    let warnings: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("after 1 cycle(s)"));
}

#[test]
fn test_iterative_unbind_transfers_from_ancestor() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/A/B", "/World/A/C", "/World/D"])
        .with_material("/Materials/M")
        .purpose(Purpose::Full)
        .with_binding("/World", "/Materials/M")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report = unbind(&mut stage, &set(&["/World/A/B"]), Purpose::Full, 10, &mut diagnostics)
        .unwrap();

    assert_eq!(report.cycles, 1);
    assert_eq!(bound(&stage, "/World/A/B", Purpose::Full), None);
    assert_eq!(authored(&stage, "/World/A/C", Purpose::Full), Some(p("/Materials/M")));
    assert_eq!(authored(&stage, "/World/D", Purpose::Full), Some(p("/Materials/M")));
    assert_eq!(authored(&stage, "/World", Purpose::Full), None);
}

// ============================================================================
// Errors and diagnostics
// ============================================================================

#[test]
fn test_expired_stage_is_fatal() {
    let mut stage = StageFixture::new().with_prims(&["/World/A"]).build();
    stage.expire();
    let mut diagnostics = Diagnostics::new();
    let err = unbind_all(&mut stage, &set(&["/World/A"]), &UnbindOptions::new(), &mut diagnostics)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidStage));
}

#[test]
fn test_missing_prims_do_not_stop_the_batch() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/A"])
        .with_material("/Materials/M")
        .with_binding("/World/A", "/Materials/M")
        .build();

    let mut diagnostics = Diagnostics::new();
    let report = unbind_all(
        &mut stage,
        &set(&["/World/Gone", "/World/A", "/World/A.size"]),
        &UnbindOptions::new(),
        &mut diagnostics,
    )
    .unwrap();

    assert!(report.success);
    assert_eq!(diagnostics.len(), 2);
    assert!(!diagnostics.has_errors());
    assert_eq!(authored(&stage, "/World/A", Purpose::AllPurpose), None);
}

#[test]
fn test_stale_collection_binding_is_partial_failure() {
    let mut stage = StageFixture::new()
        .with_prims(&["/World/X"])
        .with_material("/Materials/M")
        .build();
    stage
        .author_relationship(
            &p("/World"),
            matbind::stage::Relationship::new(
                "material:binding:collection:ghost",
                vec![p("/World.collection:ghost"), p("/Materials/M")],
            ),
        )
        .unwrap();

    let mut diagnostics = Diagnostics::new();
    let report =
        unbind_all(&mut stage, &set(&["/World/X"]), &UnbindOptions::new(), &mut diagnostics)
            .unwrap();

    assert!(!report.success);
    assert!(diagnostics.has_errors());
}
