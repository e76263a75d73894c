//! Configuration system for matbind.
//!
//! Defaults for purpose, strength, the unbind cycle limit, the collection
//! expansion rule, the material-id key and the output format can be set in
//! YAML files or the environment.
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`MATBIND_*`)
//! 3. An explicit file (`--config` / `MATBIND_CONFIG`)
//! 4. Project config (`matbind.yaml`, nearest at or above the working directory)
//! 5. User config (`~/.matbind/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use matbind::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/path/to/shot"))
//!     .build()
//!     .unwrap();
//! println!("unbind limit: {}", config.unbind_limit());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, DEFAULT_MATERIAL_ID_KEY, DEFAULT_UNBIND_LIMIT};
pub use validator::ConfigValidator;
