//! # cxxdoc-config
//!
//! Layered configuration loading for cxxdoc using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CXXDOC_*` prefix, `__` as separator)
//! 2. Project-level `.cxxdoc/config.toml`
//! 3. User-level `~/.config/cxxdoc/config.toml`
//! 4. Built-in defaults
//!
//! `CXXDOC_PARSER__ALLOW_PARTIAL=true` maps to `parser.allow_partial`.
//!
//! # Usage
//!
//! ```no_run
//! use cxxdoc_config::CxxdocConfig;
//!
//! let config = CxxdocConfig::load().expect("config");
//! if config.parser.allow_partial {
//!     println!("building around syntax errors");
//! }
//! ```

mod error;
mod parser;

pub use error::ConfigError;
pub use parser::ParserConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative location of the project config file.
const PROJECT_CONFIG: &str = ".cxxdoc/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CxxdocConfig {
    #[serde(default)]
    pub parser: ParserConfig,
}

impl CxxdocConfig {
    /// Load and validate configuration rooted at the current directory.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load and validate configuration for the project rooted at `project_dir`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load_from(project_dir: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_dir).extract()?;
        config.parser.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the provider chain rooted at the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the provider chain for the project rooted at `project_dir`.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    #[must_use]
    pub fn figment_for(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_dir.join(PROJECT_CONFIG);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CXXDOC_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cxxdoc").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_builds_without_files() {
        let config: CxxdocConfig = CxxdocConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.parser.max_reported_diagnostics, 16);
        assert!(!config.parser.allow_partial);
    }
}
