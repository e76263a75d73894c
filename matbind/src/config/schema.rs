//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::binding::{Purpose, Strength};
use crate::output::OutputFormat;
use crate::stage::ExpansionRule;

/// Default cap on resolve/block cycles for the iterative unbind.
pub const DEFAULT_UNBIND_LIMIT: u32 = 10;

/// Default custom data key carrying the material-id hint.
pub const DEFAULT_MATERIAL_ID_KEY: &str = "materialId";

/// Complete configuration structure.
///
/// Every field is optional so that sources can be layered; the accessor
/// methods supply the built-in defaults.
///
/// # Examples
///
/// ```
/// use matbind::binding::Purpose;
/// use matbind::config::Config;
///
/// let config: Config = serde_yaml::from_str("default_purpose: preview\nunbind_limit: 3\n").unwrap();
/// assert_eq!(config.purpose(), Purpose::Preview);
/// assert_eq!(config.unbind_limit(), 3);
/// assert_eq!(config.material_id_key(), "materialId");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Purpose used when a command does not name one.
    pub default_purpose: Option<Purpose>,

    /// Strength used by `bind` when none is given.
    pub default_strength: Option<Strength>,

    /// Maximum resolve/block cycles for the iterative unbind.
    pub unbind_limit: Option<u32>,

    /// Expansion rule for collections created by `bind`.
    pub collection_expansion: Option<ExpansionRule>,

    /// Custom data key holding the material-id hint.
    pub material_id_key: Option<String>,

    /// Output format for reports.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The configured default purpose.
    #[must_use]
    pub fn purpose(&self) -> Purpose {
        self.default_purpose.unwrap_or_default()
    }

    /// The configured default strength.
    #[must_use]
    pub fn strength(&self) -> Strength {
        self.default_strength.unwrap_or_default()
    }

    /// The configured unbind cycle limit.
    #[must_use]
    pub fn unbind_limit(&self) -> u32 {
        self.unbind_limit.unwrap_or(DEFAULT_UNBIND_LIMIT)
    }

    /// The configured collection expansion rule.
    #[must_use]
    pub fn collection_expansion(&self) -> ExpansionRule {
        self.collection_expansion.unwrap_or_default()
    }

    /// The configured material-id key.
    #[must_use]
    pub fn material_id_key(&self) -> &str {
        self.material_id_key
            .as_deref()
            .unwrap_or(DEFAULT_MATERIAL_ID_KEY)
    }

    /// The configured output format.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.purpose(), Purpose::AllPurpose);
        assert_eq!(config.strength(), Strength::FallbackStrength);
        assert_eq!(config.unbind_limit(), DEFAULT_UNBIND_LIMIT);
        assert_eq!(config.collection_expansion(), ExpansionRule::ExpandPrims);
        assert_eq!(config.material_id_key(), DEFAULT_MATERIAL_ID_KEY);
        assert_eq!(config.output_format(), OutputFormat::Human);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
default_purpose: full
default_strength: strongerThanDescendants
unbind_limit: 4
collection_expansion: explicitOnly
material_id_key: hdaId
output_format: json
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.purpose(), Purpose::Full);
        assert_eq!(config.strength(), Strength::StrongerThanDescendants);
        assert_eq!(config.unbind_limit(), 4);
        assert_eq!(config.collection_expansion(), ExpansionRule::ExplicitOnly);
        assert_eq!(config.material_id_key(), "hdaId");
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("port_min: 5000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("default_purpose: render\n");
        assert!(result.is_err());
    }
}
