//! Error types for the matbind library.
//!
//! Only a small part of what can go wrong during a bind or unbind is fatal.
//! Per-prim and per-relationship failures are reported through a
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) and folded into the
//! operation's success flag; the variants here are what escapes as `Err`.

use thiserror::Error;

use crate::path::ScenePath;

/// Result type alias for operations that may fail with a matbind error.
///
/// # Examples
///
/// ```
/// use matbind::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the matbind library.
#[derive(Debug, Error)]
pub enum Error {
    /// The stage handle is no longer valid.
    #[error("invalid stage: the stage handle has expired")]
    InvalidStage,

    /// A path string could not be parsed, or was used where it is not allowed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No prim exists at the given path.
    #[error("no prim at {path}")]
    PrimNotFound {
        /// The path that did not resolve.
        path: ScenePath,
    },

    /// A material path does not resolve to a material prim.
    #[error("invalid material {path}: {reason}")]
    InvalidMaterial {
        /// The material path.
        path: ScenePath,
        /// Why it is not usable as a material.
        reason: String,
    },

    /// Authoring a binding relationship failed.
    #[error("cannot bind {path}: {reason}")]
    BindingFailed {
        /// The prim whose binding could not be authored.
        path: ScenePath,
        /// Details about the failure.
        reason: String,
    },

    /// A collection path did not resolve to a collection.
    #[error("no collection at {path}")]
    CollectionNotFound {
        /// The collection path.
        path: ScenePath,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A YAML configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A YAML stage document could not be parsed or written.
    #[error("stage document error: {0}")]
    StageDocument(#[source] serde_yaml::Error),

    /// A JSON stage document could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the scene path this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&ScenePath> {
        match self {
            Self::PrimNotFound { path }
            | Self::InvalidMaterial { path, .. }
            | Self::BindingFailed { path, .. }
            | Self::CollectionNotFound { path } => Some(path),
            _ => None,
        }
    }
}
