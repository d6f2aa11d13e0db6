//! Entity-tree construction settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_true() -> bool {
    true
}

/// Default cap on diagnostics carried by a front-end failure.
const fn default_max_reported_diagnostics() -> usize {
    16
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Build around scope-level syntax errors instead of failing the unit.
    #[serde(default)]
    pub allow_partial: bool,

    /// Record a warning when `override`/`final` is written but no virtual
    /// base member matches.
    #[serde(default = "default_true")]
    pub report_override_mismatch: bool,

    /// Destructors without an exception specification are `noexcept(true)`.
    #[serde(default = "default_true")]
    pub implicit_destructor_noexcept: bool,

    /// Upper bound on diagnostics listed in a front-end failure.
    #[serde(default = "default_max_reported_diagnostics")]
    pub max_reported_diagnostics: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_partial: false,
            report_override_mismatch: default_true(),
            implicit_destructor_noexcept: default_true(),
            max_reported_diagnostics: default_max_reported_diagnostics(),
        }
    }
}

impl ParserConfig {
    /// Reject values the builder cannot work with.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reported_diagnostics == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_reported_diagnostics".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
