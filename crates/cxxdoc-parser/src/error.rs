//! Parser error types for cxxdoc-parser.

use cxxdoc_core::Diagnostic;

/// Errors that can occur while building the entity tree of a translation unit.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Unbalanced or unlexable tokens inside a declaration.
    #[error("Parse error at byte {offset}: {message}")]
    Parse { message: String, offset: usize },

    /// The front end could not produce a usable cursor tree.
    #[error("Front end failed to parse {unit} ({} diagnostics)", .diagnostics.len())]
    FrontEnd {
        unit: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// Two siblings ended up with the same unique name.
    #[error("Name collision in {scope}: {unique_name}")]
    NameCollision { scope: String, unique_name: String },

    /// A construct the entity model does not represent.
    ///
    /// Recoverable: recorded as a warning on the unit and skipped.
    #[error("Unsupported construct at line {line}: {construct}")]
    UnsupportedConstruct { construct: String, line: u32 },

    #[error(transparent)]
    Config(#[from] cxxdoc_config::ConfigError),
}
