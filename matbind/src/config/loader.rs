//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// File name searched for when walking up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "matbind.yaml";

/// Directory under the home directory holding the user config.
pub const USER_CONFIG_DIR: &str = ".matbind";

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from the user, project and explicit files.
///
/// # Examples
///
/// ```no_run
/// use matbind::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(Path::new("."), None, None).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Discovers and loads every configuration file, lowest precedence first.
    ///
    /// 1. User config at `~/.matbind/config.yaml`, or `{user_dir}/config.yaml`
    ///    when `user_dir` is given (precedence 1)
    /// 2. The nearest `matbind.yaml` at or above `working_dir` (precedence 2)
    /// 3. `explicit`, which must exist (precedence 3)
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed, or if
    /// `explicit` does not exist.
    pub fn load_all(
        working_dir: &Path,
        user_dir: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        if let Some(user_config) = Self::load_user_config(user_dir)? {
            sources.push(user_config);
        }

        if let Some(project_config) = Self::discover_project_config(working_dir)? {
            sources.push(project_config);
        }

        if let Some(path) = explicit {
            let config = Self::load_file(path)?;
            sources.push(ConfigSource {
                path: path.to_path_buf(),
                precedence: 3,
                config,
            });
        }

        sources.sort_by_key(|s| s.precedence);
        for source in &sources {
            log::debug!("using configuration {}", source.path.display());
        }
        Ok(sources)
    }

    fn load_user_config(user_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let config_path = match user_dir {
            Some(dir) => dir.join("config.yaml"),
            None => match Self::user_config_path() {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&config_path)?;
        Ok(Some(ConfigSource {
            path: config_path,
            precedence: 1,
            config,
        }))
    }

    /// Finds the nearest `matbind.yaml` at or above `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file found cannot be read or parsed.
    pub fn discover_project_config(start_dir: &Path) -> Result<Option<ConfigSource>> {
        let mut current = start_dir.to_path_buf();
        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load_file(&candidate)?;
                return Ok(Some(ConfigSource {
                    path: candidate,
                    precedence: 2,
                    config,
                }));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Loads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the file cannot be read and
    /// [`Error::Configuration`] if the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.display().to_string(),
            reason: format!("failed to read configuration file: {e}"),
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// `~/.matbind/config.yaml`, if a home directory is known.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(USER_CONFIG_DIR).join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load_file(Path::new("/nonexistent/path/matbind.yaml"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.yaml");
        fs::write(&config_path, "unbind_limit: [not, a, number]").unwrap();
        assert!(matches!(
            ConfigLoader::load_file(&config_path),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILE),
            "unbind_limit: 2\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = ConfigLoader::discover_project_config(&nested)
            .unwrap()
            .unwrap();
        assert_eq!(found.config.unbind_limit, Some(2));
        assert_eq!(found.precedence, 2);
    }

    #[test]
    fn test_load_all_orders_by_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let user_dir = temp_dir.path().join("user");
        fs::create_dir_all(&user_dir).unwrap();
        fs::write(user_dir.join("config.yaml"), "unbind_limit: 1\n").unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(PROJECT_CONFIG_FILE), "unbind_limit: 2\n").unwrap();
        let explicit = temp_dir.path().join("explicit.yaml");
        fs::write(&explicit, "unbind_limit: 3\n").unwrap();

        let sources =
            ConfigLoader::load_all(&project, Some(&user_dir), Some(&explicit)).unwrap();
        let limits: Vec<Option<u32>> = sources.iter().map(|s| s.config.unbind_limit).collect();
        assert_eq!(limits, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.yaml");
        assert!(ConfigLoader::load_all(temp_dir.path(), Some(temp_dir.path()), Some(&missing))
            .is_err());
    }
}
