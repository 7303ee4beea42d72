//! # nest-config
//!
//! Layered configuration loading for cssnest using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CSSNEST_*` prefix, `__` as separator)
//! 2. An explicit file passed to [`NestConfig::load_from`]
//! 3. Project-level `.cssnest.toml`
//! 4. User-level `~/.config/cssnest/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CSSNEST_FORMAT__INDENT_SIZE` -> `format.indent_size`,
//! `CSSNEST_VARIABLES__MIN_OCCURRENCES` -> `variables.min_occurrences`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use nest_config::NestConfig;
//!
//! let config = NestConfig::load().expect("config");
//! if config.variables.enabled {
//!     println!("variable prefix: {}", config.variables.prefix);
//! }
//! ```

mod error;
mod format;
mod nesting;
mod optimize;
mod variables;

pub use error::ConfigError;
pub use format::{FormatConfig, IndentType};
pub use nesting::NestingConfig;
pub use optimize::OptimizeConfig;
pub use variables::VariableConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest indent width accepted by [`NestConfig::validate`].
pub const MAX_INDENT_SIZE: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NestConfig {
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub nesting: NestingConfig,
    #[serde(default)]
    pub optimize: OptimizeConfig,
    #[serde(default)]
    pub variables: VariableConfig,
}

impl NestConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`CSSNEST_*` prefix)
    /// 2. `.cssnest.toml` (project-local)
    /// 3. `~/.config/cssnest/config.toml` (user-global)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with an explicit TOML file layered above the
    /// project file and below the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }
        Self::base_figment()
            .merge(Toml::file(path))
            .merge(Self::env_provider())
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Self::base_figment().merge(Self::env_provider())
    }

    /// Defaults plus the user-global and project-local files.
    fn base_figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cssnest.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    fn env_provider() -> Env {
        Env::prefixed("CSSNEST_").split("__")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cssnest").join("config.toml"))
    }

    /// Reject values the converter cannot render sensibly.
    ///
    /// `convert` itself never calls this; out-of-range values are used as-is
    /// there. The CLI validates after applying flags.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.format.indent_size > MAX_INDENT_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "format.indent_size".to_string(),
                reason: format!(
                    "{} exceeds the maximum of {MAX_INDENT_SIZE}",
                    self.format.indent_size
                ),
            });
        }
        if self.variables.enabled && self.variables.prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "variables.prefix".to_string(),
                reason: "must not be empty while variable extraction is enabled".to_string(),
            });
        }
        Ok(())
    }
}
