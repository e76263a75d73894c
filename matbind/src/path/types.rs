//! The [`ScenePath`] value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An absolute hierarchical path to a prim or to a property of a prim.
///
/// Paths compare lexicographically on their prim segments first and their
/// property part second, so a parent always sorts before its children.
///
/// # Examples
///
/// ```
/// use matbind::path::ScenePath;
///
/// let path = ScenePath::parse("/World/Geo").unwrap();
/// assert_eq!(path.name(), Some("Geo"));
/// assert_eq!(path.parent().unwrap().to_string(), "/World");
///
/// let collection = path.with_property("collection:geoSet").unwrap();
/// assert_eq!(collection.to_string(), "/World/Geo.collection:geoSet");
/// assert_eq!(collection.prim_path(), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScenePath {
    segments: Vec<String>,
    property: Option<String>,
}

impl ScenePath {
    /// The absolute root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            property: None,
        }
    }

    /// Parses a path from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the text is not absolute, contains an
    /// empty or non-identifier segment, or carries a property on the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::ScenePath;
    ///
    /// assert!(ScenePath::parse("/").unwrap().is_root());
    /// assert!(ScenePath::parse("/World/A").is_ok());
    /// assert!(ScenePath::parse("World").is_err());
    /// assert!(ScenePath::parse("/World//A").is_err());
    /// assert!(ScenePath::parse("/1World").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };

        let body = text
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must be absolute"))?;

        let (prim_part, property) = match body.split_once('.') {
            Some((prim, prop)) => (prim, Some(prop)),
            None => (body, None),
        };

        let segments: Vec<String> = if prim_part.is_empty() {
            Vec::new()
        } else {
            prim_part
                .split('/')
                .map(|segment| {
                    if is_identifier(segment) {
                        Ok(segment.to_string())
                    } else if segment.is_empty() {
                        Err(invalid("empty path segment"))
                    } else {
                        Err(invalid(&format!("'{segment}' is not a valid prim name")))
                    }
                })
                .collect::<Result<_>>()?
        };

        let property = match property {
            None => None,
            Some(_) if segments.is_empty() => {
                return Err(invalid("the root prim has no properties"));
            }
            Some(prop) if is_property_name(prop) => Some(prop.to_string()),
            Some(prop) => {
                return Err(invalid(&format!("'{prop}' is not a valid property name")));
            }
        };

        Ok(Self { segments, property })
    }

    /// Returns `true` for the absolute root `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty() && self.property.is_none()
    }

    /// Returns `true` if this path names a prim rather than a property.
    #[must_use]
    pub fn is_prim_path(&self) -> bool {
        self.property.is_none()
    }

    /// Returns `true` if this path names a property of a prim.
    #[must_use]
    pub fn is_property_path(&self) -> bool {
        self.property.is_some()
    }

    /// The last prim name, or `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The property name, if this is a property path.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Number of prim segments below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The owning prim of a property path, or the path itself for a prim path.
    #[must_use]
    pub fn prim_path(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            property: None,
        }
    }

    /// The parent path.
    ///
    /// A property path's parent is its owning prim. The root has no parent.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.property.is_some() {
            return Some(self.prim_path());
        }
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            property: None,
        })
    }

    /// Appends a prim name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if this is a property path or `name` is
    /// not a valid prim name.
    pub fn child(&self, name: &str) -> Result<Self> {
        if self.property.is_some() || !is_identifier(name) {
            return Err(Error::InvalidPath {
                path: format!("{self}/{name}"),
                reason: "cannot append a prim name here".into(),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self {
            segments,
            property: None,
        })
    }

    /// Returns the property path `self.name` on this prim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for the root, for a path that already has
    /// a property, or for an invalid property name.
    pub fn with_property(&self, name: &str) -> Result<Self> {
        if self.segments.is_empty() || self.property.is_some() || !is_property_name(name) {
            return Err(Error::InvalidPath {
                path: format!("{self}.{name}"),
                reason: "cannot attach this property here".into(),
            });
        }
        Ok(Self {
            segments: self.segments.clone(),
            property: Some(name.to_string()),
        })
    }

    /// Strict prim ancestors, nearest first, excluding the root.
    ///
    /// For a property path the owning prim comes first.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::ScenePath;
    ///
    /// let path = ScenePath::parse("/A/B/C").unwrap();
    /// let names: Vec<String> = path.ancestors().map(|p| p.to_string()).collect();
    /// assert_eq!(names, vec!["/A/B", "/A"]);
    /// ```
    pub fn ancestors(&self) -> impl Iterator<Item = ScenePath> + '_ {
        let own = usize::from(self.property.is_some());
        (1..self.segments.len() + own).rev().map(move |len| Self {
            segments: self.segments[..len].to_vec(),
            property: None,
        })
    }

    /// Returns `true` if `other` lies strictly beneath this prim.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        if self.property.is_some() || !other.segments.starts_with(&self.segments) {
            return false;
        }
        other.segments.len() > self.segments.len() || other.property.is_some()
    }

    /// Returns `true` if this path lies strictly beneath `other`.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        other.is_ancestor_of(self)
    }

    /// Returns `true` if `prefix` equals this path or is an ancestor of it.
    #[must_use]
    pub fn has_prefix(&self, prefix: &Self) -> bool {
        self == prefix || prefix.is_ancestor_of(self)
    }

    /// The deepest prim path that is an ancestor of, or equal to, both inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::path::ScenePath;
    ///
    /// let a = ScenePath::parse("/World/Geo/A").unwrap();
    /// let b = ScenePath::parse("/World/Geo/B").unwrap();
    /// assert_eq!(ScenePath::common_ancestor(&a, &b).to_string(), "/World/Geo");
    /// ```
    #[must_use]
    pub fn common_ancestor(a: &Self, b: &Self) -> Self {
        let shared = a
            .segments
            .iter()
            .zip(&b.segments)
            .take_while(|(x, y)| x == y)
            .count();
        Self {
            segments: a.segments[..shared].to_vec(),
            property: None,
        }
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("/")?;
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        if let Some(property) = &self.property {
            write!(f, ".{property}")?;
        }
        Ok(())
    }
}

impl FromStr for ScenePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScenePath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for ScenePath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ScenePath> for String {
    fn from(path: ScenePath) -> Self {
        path.to_string()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_property_name(name: &str) -> bool {
    name.split(':').all(is_identifier)
}
