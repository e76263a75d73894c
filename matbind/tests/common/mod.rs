//! Common test utilities for integration tests.
//!
//! This module provides a fixture builder for stages and small helpers for
//! asserting on bindings.

use matbind::binding::{authored_direct_binding, compute_bound_material, Purpose, Strength};
use matbind::path::{PathSet, ScenePath};
use matbind::stage::{ExpansionRule, Relationship, SceneGraph, Stage};

/// Parses a path, panicking on bad input.
#[allow(dead_code)]
pub fn p(text: &str) -> ScenePath {
    ScenePath::parse(text).unwrap()
}

/// Builds a path set from strings.
#[allow(dead_code)]
pub fn set(paths: &[&str]) -> PathSet {
    paths.iter().map(|s| p(s)).collect()
}

/// The material `prim` resolves to, including collection bindings.
#[allow(dead_code)]
pub fn bound(stage: &Stage, prim: &str, purpose: Purpose) -> Option<ScenePath> {
    compute_bound_material(stage, &p(prim), purpose).and_then(|b| b.material().cloned())
}

/// The material `prim` itself authors a direct binding to.
#[allow(dead_code)]
pub fn authored(stage: &Stage, prim: &str, purpose: Purpose) -> Option<ScenePath> {
    authored_direct_binding(stage, &p(prim), purpose).and_then(|b| b.material().cloned())
}

/// Builder for test stages with sensible defaults.
///
/// # Examples
///
/// ```no_run
/// # use common::StageFixture;
/// let stage = StageFixture::new()
///     .with_prims(&["/World/A/B"])
///     .with_material("/Materials/M1")
///     .with_binding("/World", "/Materials/M1")
///     .build();
/// ```
#[allow(dead_code)]
pub struct StageFixture {
    stage: Stage,
    purpose: Purpose,
    strength: Strength,
}

#[allow(dead_code)]
impl StageFixture {
    /// Creates an empty fixture authoring `allPurpose`, fallback bindings.
    pub fn new() -> Self {
        Self {
            stage: Stage::new(),
            purpose: Purpose::AllPurpose,
            strength: Strength::FallbackStrength,
        }
    }

    /// Defines `Mesh` prims (and their ancestors).
    pub fn with_prims(mut self, paths: &[&str]) -> Self {
        for path in paths {
            self.stage.define_prim(&p(path), "Mesh").unwrap();
        }
        self
    }

    /// Defines a `Material` prim.
    pub fn with_material(mut self, path: &str) -> Self {
        self.stage.define_prim(&p(path), "Material").unwrap();
        self
    }

    /// Defines a `Material` prim carrying a material-id hint.
    pub fn with_material_id(mut self, path: &str, id: &str) -> Self {
        self.stage
            .define_prim(&p(path), "Material")
            .unwrap()
            .set_custom_data("materialId", id);
        self
    }

    /// Purpose of the bindings authored next.
    pub fn purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Strength of the bindings authored next.
    pub fn strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Authors a direct binding.
    pub fn with_binding(mut self, prim: &str, material: &str) -> Self {
        self.stage
            .author_relationship(
                &p(prim),
                Relationship::new(self.purpose.direct_binding_name(), vec![p(material)])
                    .with_strength(self.strength),
            )
            .unwrap();
        self
    }

    /// Defines collection `name` on `owner` including `members`, bound to
    /// `material`.
    pub fn with_collection_binding(
        mut self,
        owner: &str,
        name: &str,
        members: &[&str],
        material: &str,
    ) -> Self {
        let owner = p(owner);
        let collection = self
            .stage
            .define_collection(&owner, name, ExpansionRule::ExpandPrims)
            .unwrap();
        for member in members {
            collection.include_path(p(member));
        }
        let collection_path = owner.with_property(&format!("collection:{name}")).unwrap();
        self.stage
            .author_relationship(
                &owner,
                Relationship::new(
                    self.purpose.collection_binding_name(name),
                    vec![collection_path, p(material)],
                )
                .with_strength(self.strength),
            )
            .unwrap();
        self
    }

    /// Finishes the stage.
    pub fn build(self) -> Stage {
        self.stage
    }
}
