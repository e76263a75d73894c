//! Environment variable handling for configuration overrides.
//!
//! Every `MATBIND_*` variable overrides the matching field from the
//! configuration files.

use std::env;
use std::str::FromStr;

use clap::ValueEnum;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// `default_purpose` override.
pub const ENV_DEFAULT_PURPOSE: &str = "MATBIND_DEFAULT_PURPOSE";
/// `default_strength` override.
pub const ENV_DEFAULT_STRENGTH: &str = "MATBIND_DEFAULT_STRENGTH";
/// `unbind_limit` override.
pub const ENV_UNBIND_LIMIT: &str = "MATBIND_UNBIND_LIMIT";
/// `collection_expansion` override.
pub const ENV_COLLECTION_EXPANSION: &str = "MATBIND_COLLECTION_EXPANSION";
/// `material_id_key` override.
pub const ENV_MATERIAL_ID_KEY: &str = "MATBIND_MATERIAL_ID_KEY";
/// `output_format` override.
pub const ENV_OUTPUT_FORMAT: &str = "MATBIND_OUTPUT_FORMAT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use matbind::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
#[derive(Debug)]
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every `MATBIND_*` override to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable if a value does not
    /// parse.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(ENV_DEFAULT_PURPOSE) {
            config.default_purpose = Some(Self::parse_token(ENV_DEFAULT_PURPOSE, &val)?);
        }

        if let Ok(val) = env::var(ENV_DEFAULT_STRENGTH) {
            config.default_strength = Some(Self::parse_token(ENV_DEFAULT_STRENGTH, &val)?);
        }

        if let Ok(val) = env::var(ENV_UNBIND_LIMIT) {
            config.unbind_limit = Some(val.trim().parse().map_err(|_| Error::Validation {
                field: ENV_UNBIND_LIMIT.into(),
                message: "Must be a positive integer".into(),
            })?);
        }

        if let Ok(val) = env::var(ENV_COLLECTION_EXPANSION) {
            config.collection_expansion = Some(Self::parse_value(ENV_COLLECTION_EXPANSION, &val)?);
        }

        if let Ok(val) = env::var(ENV_MATERIAL_ID_KEY) {
            config.material_id_key = Some(val);
        }

        if let Ok(val) = env::var(ENV_OUTPUT_FORMAT) {
            config.output_format = Some(Self::parse_value(ENV_OUTPUT_FORMAT, &val)?);
        }

        Ok(())
    }

    fn parse_token<T: FromStr>(var: &str, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| Error::Validation {
            field: var.into(),
            message: format!("unrecognised value '{value}'"),
        })
    }

    fn parse_value<T: ValueEnum>(var: &str, value: &str) -> Result<T> {
        T::from_str(value.trim(), true).map_err(|message| Error::Validation {
            field: var.into(),
            message,
        })
    }
}
