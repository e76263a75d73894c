//! The material-binding view of a scene graph.
//!
//! [`MaterialBindingApi`] is implemented for every
//! [`SceneGraph`](crate::stage::SceneGraph), so the algorithms never deal with
//! relationship naming or schema bookkeeping directly.

use std::collections::BTreeMap;

use super::tokens::{BindingKind, Purpose, Strength, MATERIAL_BINDING_API};
use crate::error::{Error, Result};
use crate::path::ScenePath;
use crate::stage::{Relationship, SceneGraph};

/// A snapshot of one authored, unblocked binding relationship.
///
/// This is what the resolver returns and what the cache stores: enough to
/// identify the relationship and to author an equivalent copy elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSource {
    /// The prim that owns the relationship.
    pub owner: ScenePath,
    /// The relationship name.
    pub relationship: String,
    /// The relationship targets. A collection binding targets
    /// `[collection, material]`.
    pub targets: Vec<ScenePath>,
    /// The `bindMaterialAs` strength.
    pub strength: Strength,
    /// Custom data carried by the relationship (material-id hint).
    pub custom_data: BTreeMap<String, String>,
}

impl BindingSource {
    /// Captures `relationship` as authored on `owner`.
    #[must_use]
    pub fn from_relationship(owner: ScenePath, relationship: &Relationship) -> Self {
        Self {
            owner,
            relationship: relationship.name.clone(),
            targets: relationship.targets.clone(),
            strength: relationship.strength,
            custom_data: relationship.custom_data.clone(),
        }
    }

    /// How the relationship binds, as told by its name.
    #[must_use]
    pub fn kind(&self) -> Option<BindingKind> {
        BindingKind::classify(&self.relationship)
    }

    /// Returns `true` for a direct binding.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_direct())
    }

    /// The bound material path.
    #[must_use]
    pub fn material(&self) -> Option<&ScenePath> {
        if self.is_direct() {
            self.targets.first()
        } else {
            self.targets.get(1)
        }
    }

    /// The targeted collection, for a collection binding.
    #[must_use]
    pub fn collection(&self) -> Option<&ScenePath> {
        if self.is_direct() {
            None
        } else {
            self.targets.first()
        }
    }

    /// The relationship's property path (`/Owner.material:binding`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the owner is the pseudo-root.
    pub fn relationship_path(&self) -> Result<ScenePath> {
        self.owner.with_property(&self.relationship)
    }

    /// A relationship with the same targets, strength and custom data,
    /// under `name`.
    #[must_use]
    pub fn to_relationship(&self, name: &str) -> Relationship {
        Relationship {
            name: name.to_string(),
            targets: self.targets.clone(),
            strength: self.strength,
            custom_data: self.custom_data.clone(),
        }
    }
}

/// Binding accessors over a scene graph.
pub trait MaterialBindingApi {
    /// The direct binding authored on `prim` for `purpose`.
    ///
    /// Absent and blocked relationships both yield `None`.
    fn direct_binding(&self, prim: &ScenePath, purpose: Purpose) -> Option<BindingSource>;

    /// Unblocked collection bindings authored on `prim` for `purpose`,
    /// ordered by relationship name.
    fn collection_bindings(&self, prim: &ScenePath, purpose: Purpose) -> Vec<BindingSource>;

    /// Applies `MaterialBindingAPI` to `prim` and authors `relationship`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BindingFailed`] if the relationship targets `prim`
    /// itself, or any error from the underlying edits.
    fn author_binding(&mut self, prim: &ScenePath, relationship: Relationship) -> Result<()>;
}

impl<G: SceneGraph + ?Sized> MaterialBindingApi for G {
    fn direct_binding(&self, prim: &ScenePath, purpose: Purpose) -> Option<BindingSource> {
        let relationship = self.relationship(prim, &purpose.direct_binding_name())?;
        (!relationship.is_blocked())
            .then(|| BindingSource::from_relationship(prim.clone(), relationship))
    }

    fn collection_bindings(&self, prim: &ScenePath, purpose: Purpose) -> Vec<BindingSource> {
        self.relationship_names(prim)
            .into_iter()
            .filter(|name| {
                matches!(
                    BindingKind::classify(name),
                    Some(BindingKind::Collection { purpose: p, .. }) if p == purpose
                )
            })
            .filter_map(|name| self.relationship(prim, &name))
            .filter(|relationship| !relationship.is_blocked())
            .map(|relationship| BindingSource::from_relationship(prim.clone(), relationship))
            .collect()
    }

    fn author_binding(&mut self, prim: &ScenePath, relationship: Relationship) -> Result<()> {
        if relationship.targets.iter().any(|target| target == prim) {
            return Err(Error::BindingFailed {
                path: prim.clone(),
                reason: format!("{} cannot target its own prim", relationship.name),
            });
        }
        self.apply_schema(prim, MATERIAL_BINDING_API)?;
        self.author_relationship(prim, relationship)
    }
}

/// The material-id hint stored under `key` on the material prim, if any.
pub fn material_id_hint<G: SceneGraph + ?Sized>(
    graph: &G,
    material: &ScenePath,
    key: &str,
) -> Option<String> {
    graph.custom_data(material, key).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    fn stage() -> Stage {
        let mut stage = Stage::new();
        stage.define_prim(&p("/World/Geo"), "Mesh").unwrap();
        stage.define_prim(&p("/Materials/M"), "Material").unwrap();
        stage
    }

    #[test]
    fn test_direct_binding_ignores_blocked() {
        let mut stage = stage();
        let world = p("/World");
        stage
            .author_relationship(&world, Relationship::blocked("material:binding"))
            .unwrap();
        assert!(stage.direct_binding(&world, Purpose::AllPurpose).is_none());

        stage
            .author_relationship(
                &world,
                Relationship::new("material:binding:preview", vec![p("/Materials/M")]),
            )
            .unwrap();
        let preview = stage.direct_binding(&world, Purpose::Preview).unwrap();
        assert_eq!(preview.material(), Some(&p("/Materials/M")));
        assert!(stage.direct_binding(&world, Purpose::Full).is_none());
    }

    #[test]
    fn test_collection_bindings_filtered_by_purpose() {
        let mut stage = stage();
        let world = p("/World");
        let targets = vec![p("/World.collection:geo"), p("/Materials/M")];
        stage
            .author_relationship(
                &world,
                Relationship::new("material:binding:collection:geo", targets.clone()),
            )
            .unwrap();
        stage
            .author_relationship(
                &world,
                Relationship::new("material:binding:collection:full:geo", targets),
            )
            .unwrap();

        let all = stage.collection_bindings(&world, Purpose::AllPurpose);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].collection(), Some(&p("/World.collection:geo")));
        assert_eq!(all[0].material(), Some(&p("/Materials/M")));
        assert_eq!(stage.collection_bindings(&world, Purpose::Full).len(), 1);
        assert!(stage.collection_bindings(&world, Purpose::Preview).is_empty());
    }

    #[test]
    fn test_author_binding_applies_schema() {
        let mut stage = stage();
        let geo = p("/World/Geo");
        stage
            .author_binding(
                &geo,
                Relationship::new("material:binding", vec![p("/Materials/M")]),
            )
            .unwrap();
        assert!(stage.prim(&geo).unwrap().has_api_schema(MATERIAL_BINDING_API));
    }

    #[test]
    fn test_author_binding_rejects_self_target() {
        let mut stage = stage();
        let geo = p("/World/Geo");
        let err = stage
            .author_binding(&geo, Relationship::new("material:binding", vec![geo.clone()]))
            .unwrap_err();
        assert!(matches!(err, Error::BindingFailed { .. }));
        assert!(!stage.prim(&geo).unwrap().has_api_schema(MATERIAL_BINDING_API));
    }

    #[test]
    fn test_material_id_hint() {
        let mut stage = stage();
        let material = p("/Materials/M");
        assert_eq!(material_id_hint(&stage, &material, "materialId"), None);
        stage
            .prim_mut(&material)
            .unwrap()
            .set_custom_data("materialId", "17");
        assert_eq!(
            material_id_hint(&stage, &material, "materialId").as_deref(),
            Some("17")
        );
    }
}
