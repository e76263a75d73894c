//! Per-path warnings and errors raised while editing bindings.
//!
//! Operations never abort on a single bad prim or relationship. They report
//! it to the [`DiagnosticSink`] passed in by the caller and carry on; the
//! operation's `success` flag tells whether anything went wrong.

use std::fmt;

use crate::path::ScenePath;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Something was skipped; the result is still what the caller asked for.
    Warning,
    /// An edit failed; the operation reports partial failure.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// The prim, relationship or collection concerned.
    pub path: Option<ScenePath>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a warning about `path`.
    #[must_use]
    pub fn warning(path: &ScenePath, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: Some(path.clone()),
            message: message.into(),
        }
    }

    /// Creates an error about `path`.
    #[must_use]
    pub fn error(path: &ScenePath, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: Some(path.clone()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Receives diagnostics from binding operations.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in order and echoes them to the `log` facade.
///
/// # Examples
///
/// ```
/// use matbind::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
/// use matbind::path::ScenePath;
///
/// let mut diagnostics = Diagnostics::new();
/// let path = ScenePath::parse("/World/Missing").unwrap();
/// diagnostics.report(Diagnostic::warning(&path, "no such prim"));
///
/// assert_eq!(diagnostics.len(), 1);
/// assert!(!diagnostics.has_errors());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
        self.entries.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
