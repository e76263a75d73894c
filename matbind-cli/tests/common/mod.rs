//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Stage document fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The `/World/A/B` scenario: a stronger binding on `/World` and a fallback
/// one on `/World/A`.
#[allow(dead_code)]
pub const CASCADE_STAGE: &str = r"
prims:
  - path: /World
    type: Xform
    relationships:
      - name: material:binding
        targets: [/Materials/M1]
        strength: strongerThanDescendants
  - path: /World/A
    type: Xform
    relationships:
      - name: material:binding
        targets: [/Materials/M2]
  - path: /World/A/B
    type: Mesh
  - path: /Materials/M1
    type: Material
  - path: /Materials/M2
    type: Material
";

/// Two meshes sharing a collection binding on `/World`.
#[allow(dead_code)]
pub const COLLECTION_STAGE: &str = r"
prims:
  - path: /World
    type: Xform
    relationships:
      - name: material:binding:collection:geoSet
        targets:
          - /World.collection:geoSet
          - /Materials/M
    collections:
      - name: geoSet
        includes: [/World/X, /World/Y]
        expansion: expandPrims
  - path: /World/X
    type: Mesh
  - path: /World/Y
    type: Mesh
  - path: /Materials/M
    type: Material
";

/// Unbound geometry and a tagged material.
#[allow(dead_code)]
pub const PLAIN_STAGE: &str = r"
prims:
  - path: /World/Geo/X
    type: Mesh
  - path: /World/Geo/Y
    type: Mesh
  - path: /World/Z
    type: Mesh
  - path: /Materials/Red
    type: Material
    custom_data:
      materialId: red-01
";

const ENV_VARS: [&str; 9] = [
    "MATBIND_CONFIG",
    "MATBIND_STAGE",
    "MATBIND_LOG_MODE",
    "MATBIND_DEFAULT_PURPOSE",
    "MATBIND_DEFAULT_STRENGTH",
    "MATBIND_UNBIND_LIMIT",
    "MATBIND_COLLECTION_EXPANSION",
    "MATBIND_MATERIAL_ID_KEY",
    "MATBIND_OUTPUT_FORMAT",
];

/// Test environment with an isolated working and home directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// A command running in the temp directory, with `HOME` pointing there
    /// and no `MATBIND_*` variables inherited.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("matbind").expect("Failed to find matbind binary");
        cmd.current_dir(&self.temp_path).env("HOME", &self.temp_path);
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the temp directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Read a file under the temp directory.
    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("Failed to read test file")
    }

    /// Run `show` for one prim and return its JSON row.
    pub fn show_row(&self, stage: &Path, prim: &str, purpose: &str) -> serde_json::Value {
        let output = self
            .command()
            .arg("show")
            .arg("--stage")
            .arg(stage)
            .arg("--purpose")
            .arg(purpose)
            .arg("--format")
            .arg("json")
            .arg(prim)
            .output()
            .expect("Failed to run show command");

        assert!(
            output.status.success(),
            "show failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let rows: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("show did not print JSON");
        rows[0].clone()
    }

    /// The material `prim` resolves to, as printed by `show`.
    pub fn material_of(&self, stage: &Path, prim: &str, purpose: &str) -> Option<String> {
        self.show_row(stage, prim, purpose)["material"]
            .as_str()
            .map(str::to_string)
    }
}
