//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use matbind::config::{Config, ConfigMerger};
///
/// let low = Config { unbind_limit: Some(2), ..Default::default() };
/// let high = Config { unbind_limit: Some(5), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.unbind_limit, Some(5));
/// ```
#[derive(Debug)]
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.default_purpose.is_some() {
            target.default_purpose = source.default_purpose;
        }
        if source.default_strength.is_some() {
            target.default_strength = source.default_strength;
        }
        if source.unbind_limit.is_some() {
            target.unbind_limit = source.unbind_limit;
        }
        if source.collection_expansion.is_some() {
            target.collection_expansion = source.collection_expansion;
        }
        if source.material_id_key.is_some() {
            target.material_id_key.clone_from(&source.material_id_key);
        }
        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }
    }
}
