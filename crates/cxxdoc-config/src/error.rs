//! Errors raised while loading or validating cxxdoc configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML source or `CXXDOC_*` variable could not be extracted.
    #[error("Failed to load cxxdoc configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A field parsed but holds a value the parser cannot use.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
