//! Stage documents: a YAML/JSON description of a stage.
//!
//! This is not a USD layer format. It is the minimal data needed to build a
//! [`Stage`] for the binding tools: prims with their types, relationships,
//! collections, applied schemas and custom data.
//!
//! ```yaml
//! prims:
//!   - path: /World
//!     type: Xform
//!     relationships:
//!       - name: material:binding
//!         targets: [/Materials/M1]
//!         strength: strongerThanDescendants
//!   - path: /Materials/M1
//!     type: Material
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Collection, Relationship, Stage};
use crate::error::{Error, Result};
use crate::path::ScenePath;

/// A whole stage as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDocument {
    /// Prims in any order; missing ancestors are created as typeless prims.
    #[serde(default)]
    pub prims: Vec<PrimDocument>,
}

/// One prim in a [`StageDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimDocument {
    /// Prim path.
    pub path: ScenePath,

    /// Schema type name.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,

    /// Active flag.
    #[serde(default = "default_active", skip_serializing_if = "is_active")]
    pub active: bool,

    /// Applied API schemas.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_schemas: Vec<String>,

    /// Authored relationships.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Collections owned by the prim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<CollectionDocument>,

    /// Custom data entries.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: BTreeMap<String, String>,
}

/// Serialized form of a collection; identical to [`Collection`].
pub type CollectionDocument = Collection;

fn default_active() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_active(active: &bool) -> bool {
    *active
}

impl StageDocument {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StageDocument`] on malformed YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(Error::StageDocument)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StageDocument`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::StageDocument)
    }

    /// Serializes as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Stage {
    /// Builds a stage from a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a prim is listed twice, a prim is
    /// placed at `/` or a property path, or a collection includes `/` (use
    /// `include_root` for that).
    pub fn from_document(document: &StageDocument) -> Result<Self> {
        let mut stage = Stage::new();
        let mut seen = BTreeMap::new();

        for prim_doc in &document.prims {
            if prim_doc.path.is_root() || prim_doc.path.is_property_path() {
                return Err(Error::Validation {
                    field: "prims.path".into(),
                    message: format!("'{}' is not a prim path", prim_doc.path),
                });
            }
            if seen.insert(prim_doc.path.clone(), ()).is_some() {
                return Err(Error::Validation {
                    field: "prims.path".into(),
                    message: format!("prim '{}' is listed more than once", prim_doc.path),
                });
            }

            let prim = stage.define_prim(&prim_doc.path, &prim_doc.type_name)?;
            prim.set_active(prim_doc.active);
            for schema in &prim_doc.api_schemas {
                prim.apply_api_schema(schema);
            }
            for relationship in &prim_doc.relationships {
                prim.set_relationship(relationship.clone());
            }
            for (key, value) in &prim_doc.custom_data {
                prim.set_custom_data(key.clone(), value.clone());
            }
            for collection in &prim_doc.collections {
                if collection.includes.iter().any(ScenePath::is_root) {
                    return Err(Error::Validation {
                        field: "collections.includes".into(),
                        message: format!(
                            "collection '{}' on {} includes '/'; set include_root instead",
                            collection.name, prim_doc.path
                        ),
                    });
                }
                prim.insert_collection(collection.clone());
            }
        }

        Ok(stage)
    }

    /// Captures the stage as a document, prims in path order.
    ///
    /// Typeless prims with nothing authored on them are omitted; they are
    /// recreated from their descendants' paths on load.
    #[must_use]
    pub fn to_document(&self) -> StageDocument {
        let prims = self
            .prims()
            .filter(|prim| {
                !prim.type_name().is_empty()
                    || !prim.is_active()
                    || !prim.applied_schemas().is_empty()
                    || prim.relationships().next().is_some()
                    || prim.collections().next().is_some()
                    || !prim.custom_data_map().is_empty()
                    || prim.child_names().is_empty()
            })
            .map(|prim| PrimDocument {
                path: prim.path().clone(),
                type_name: prim.type_name().to_string(),
                active: prim.is_active(),
                api_schemas: prim.applied_schemas().to_vec(),
                relationships: prim.relationships().cloned().collect(),
                collections: prim.collections().cloned().collect(),
                custom_data: prim.custom_data_map().clone(),
            })
            .collect();
        StageDocument { prims }
    }

    /// Loads a stage document from disk; `.json` files are read as JSON,
    /// everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let document = if is_json(path) {
            StageDocument::from_json(&text)?
        } else {
            StageDocument::from_yaml(&text)?
        };
        log::debug!(
            "loaded {} prim(s) from {}",
            document.prims.len(),
            path.display()
        );
        Self::from_document(&document)
    }

    /// Writes the stage as a document, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = self.to_document();
        let text = if is_json(path) {
            document.to_json()?
        } else {
            document.to_yaml()?
        };
        fs::write(path, text)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
