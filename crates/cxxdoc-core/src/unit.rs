//! Result of building one translation unit.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::Severity;
use crate::tree::EntityTree;

/// A message recorded while building a translation unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based source line, when one applies.
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
        }
    }

    pub fn error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}: line {line}: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// One parsed compilation input with its frozen entity tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TranslationUnit {
    pub name: String,
    pub tree: EntityTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslationUnit {
    /// Diagnostics at warning level or above.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_includes_line() {
        let d = Diagnostic::warning("no virtual base member matches", Some(12));
        assert_eq!(
            d.to_string(),
            "warning: line 12: no virtual base member matches"
        );
        assert_eq!(Diagnostic::error("boom", None).to_string(), "error: boom");
    }
}
