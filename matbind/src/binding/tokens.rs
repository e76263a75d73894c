//! Binding purposes, strengths and relationship naming.
//!
//! Direct bindings live on `material:binding[:<purpose>]`. Collection
//! bindings live on `material:binding:collection[:<purpose>]:<name>` and
//! target `[collection, material]`. The two are told apart by the number of
//! `:`-separated name components.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix shared by every material binding relationship.
pub const BINDING_PREFIX: &str = "material:binding";

/// Prefix shared by every collection binding relationship.
pub const COLLECTION_BINDING_PREFIX: &str = "material:binding:collection";

/// Schema applied to prims that carry material bindings.
pub const MATERIAL_BINDING_API: &str = "MaterialBindingAPI";

/// Prefix of the multiple-apply collection schema.
pub const COLLECTION_API_PREFIX: &str = "CollectionAPI";

/// Namespace of collection properties (`/Prim.collection:<name>`).
pub const COLLECTION_NAMESPACE: &str = "collection";

/// Type name of material prims.
pub const MATERIAL_TYPE: &str = "Material";

/// Name components at or below which a binding relationship is direct.
pub const MAX_DIRECT_BINDING_COMPONENTS: usize = 3;

/// The view of material bindings being edited or queried.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Purpose {
    /// Bindings that apply to every purpose.
    #[default]
    #[serde(rename = "allPurpose")]
    #[value(name = "allPurpose", alias = "all")]
    AllPurpose,
    /// Final-quality render bindings.
    #[serde(rename = "full")]
    #[value(name = "full")]
    Full,
    /// Interactive preview bindings.
    #[serde(rename = "preview")]
    #[value(name = "preview")]
    Preview,
}

impl Purpose {
    /// Every purpose, in the order unbind-all processes them.
    pub const ALL: [Purpose; 3] = [Purpose::AllPurpose, Purpose::Full, Purpose::Preview];

    /// The purpose token as written in relationship names (`""` for all).
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::AllPurpose => "",
            Self::Full => "full",
            Self::Preview => "preview",
        }
    }

    /// Name of the direct binding relationship for this purpose.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::binding::Purpose;
    ///
    /// assert_eq!(Purpose::AllPurpose.direct_binding_name(), "material:binding");
    /// assert_eq!(Purpose::Preview.direct_binding_name(), "material:binding:preview");
    /// ```
    #[must_use]
    pub fn direct_binding_name(self) -> String {
        match self {
            Self::AllPurpose => BINDING_PREFIX.to_string(),
            other => format!("{BINDING_PREFIX}:{}", other.token()),
        }
    }

    /// Name of a collection binding relationship for this purpose.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::binding::Purpose;
    ///
    /// assert_eq!(
    ///     Purpose::AllPurpose.collection_binding_name("geo"),
    ///     "material:binding:collection:geo"
    /// );
    /// assert_eq!(
    ///     Purpose::Full.collection_binding_name("geo"),
    ///     "material:binding:collection:full:geo"
    /// );
    /// ```
    #[must_use]
    pub fn collection_binding_name(self, binding_name: &str) -> String {
        match self {
            Self::AllPurpose => format!("{COLLECTION_BINDING_PREFIX}:{binding_name}"),
            other => format!("{COLLECTION_BINDING_PREFIX}:{}:{binding_name}", other.token()),
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "" | "allPurpose" | "all" => Some(Self::AllPurpose),
            "full" => Some(Self::Full),
            "preview" => Some(Self::Preview),
            _ => None,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPurpose => f.write_str("allPurpose"),
            other => f.write_str(other.token()),
        }
    }
}

impl FromStr for Purpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| Error::Validation {
            field: "purpose".into(),
            message: format!("unknown purpose '{s}' (expected allPurpose, full or preview)"),
        })
    }
}

/// Override priority of a binding relative to bindings further down the tree.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Strength {
    /// The usual behaviour: a descendant's own binding wins.
    #[default]
    #[serde(rename = "fallbackStrength", alias = "default")]
    #[value(name = "fallbackStrength", alias = "default")]
    FallbackStrength,
    /// This binding overrides bindings authored on descendants.
    #[serde(rename = "strongerThanDescendants")]
    #[value(name = "strongerThanDescendants", alias = "stronger")]
    StrongerThanDescendants,
    /// Explicitly weaker than descendants; resolves like the fallback.
    #[serde(rename = "weakerThanDescendants")]
    #[value(name = "weakerThanDescendants", alias = "weaker")]
    WeakerThanDescendants,
}

impl Strength {
    /// Returns `true` for `strongerThanDescendants`.
    #[must_use]
    pub fn is_stronger(self) -> bool {
        self == Self::StrongerThanDescendants
    }

    /// The metadata token.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::FallbackStrength => "fallbackStrength",
            Self::StrongerThanDescendants => "strongerThanDescendants",
            Self::WeakerThanDescendants => "weakerThanDescendants",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Strength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fallbackStrength" | "default" => Ok(Self::FallbackStrength),
            "strongerThanDescendants" | "stronger" => Ok(Self::StrongerThanDescendants),
            "weakerThanDescendants" | "weaker" => Ok(Self::WeakerThanDescendants),
            _ => Err(Error::Validation {
                field: "strength".into(),
                message: format!("unknown strength '{s}'"),
            }),
        }
    }
}

/// How a binding relationship reaches its material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// `material:binding[:purpose]`.
    Direct {
        /// Purpose encoded in the name.
        purpose: Purpose,
    },
    /// `material:binding:collection[:purpose]:<name>`.
    Collection {
        /// Purpose encoded in the name.
        purpose: Purpose,
        /// The binding name (last component).
        binding_name: String,
    },
}

impl BindingKind {
    /// Classifies a relationship name, or returns `None` for non-binding names.
    ///
    /// # Examples
    ///
    /// ```
    /// use matbind::binding::{BindingKind, Purpose};
    ///
    /// assert_eq!(
    ///     BindingKind::classify("material:binding:full"),
    ///     Some(BindingKind::Direct { purpose: Purpose::Full })
    /// );
    /// assert!(matches!(
    ///     BindingKind::classify("material:binding:collection:geo"),
    ///     Some(BindingKind::Collection { purpose: Purpose::AllPurpose, .. })
    /// ));
    /// assert_eq!(BindingKind::classify("proxyPrim"), None);
    /// ```
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        if name != BINDING_PREFIX && !name.starts_with("material:binding:") {
            return None;
        }
        let components: Vec<&str> = name.split(':').collect();
        if components.len() <= MAX_DIRECT_BINDING_COMPONENTS {
            let purpose = Purpose::from_token(components.get(2).copied().unwrap_or(""))?;
            return Some(Self::Direct { purpose });
        }
        if components[2] != COLLECTION_NAMESPACE {
            return None;
        }
        match &components[3..] {
            [binding_name] => Some(Self::Collection {
                purpose: Purpose::AllPurpose,
                binding_name: (*binding_name).to_string(),
            }),
            [purpose, binding_name] => Some(Self::Collection {
                purpose: Purpose::from_token(purpose)?,
                binding_name: (*binding_name).to_string(),
            }),
            _ => None,
        }
    }

    /// The purpose encoded in the name.
    #[must_use]
    pub fn purpose(&self) -> Purpose {
        match self {
            Self::Direct { purpose } | Self::Collection { purpose, .. } => *purpose,
        }
    }

    /// Returns `true` for a direct binding.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }
}

/// Returns `true` if `name` is a direct binding relationship name.
#[must_use]
pub fn is_direct_binding_name(name: &str) -> bool {
    BindingKind::classify(name).is_some_and(|kind| kind.is_direct())
}

/// The multiple-apply schema name for a collection.
#[must_use]
pub fn collection_api_schema(collection_name: &str) -> String {
    format!("{COLLECTION_API_PREFIX}:{collection_name}")
}
