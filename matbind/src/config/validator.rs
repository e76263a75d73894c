//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use matbind::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { unbind_limit: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `unbind_limit` is zero or
    /// `material_id_key` is empty or contains whitespace.
    pub fn validate(config: &Config) -> Result<()> {
        if config.unbind_limit == Some(0) {
            return Err(Error::Validation {
                field: "unbind_limit".into(),
                message: "Unbind limit must be greater than 0".into(),
            });
        }

        if let Some(ref key) = config.material_id_key {
            Self::validate_key("material_id_key", key)?;
        }

        Ok(())
    }

    fn validate_key(field: &str, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty".into(),
            });
        }
        if key.chars().any(char::is_whitespace) {
            return Err(Error::Validation {
                field: field.into(),
                message: format!("'{key}' must not contain whitespace"),
            });
        }
        Ok(())
    }
}
