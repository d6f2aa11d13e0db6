//! Small closed vocabularies shared by the entity model.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for the spelling used in C++ source where one exists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Member access level, used both for access-specifier markers and base classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Parse the C++ keyword spelling.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClassKey
// ---------------------------------------------------------------------------

/// The keyword a class-like type was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

impl ClassKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }

    /// Access applied to members and bases when none is written.
    #[must_use]
    pub const fn default_access(self) -> Access {
        match self {
            Self::Class => Access::Private,
            Self::Struct | Self::Union => Access::Public,
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DefinitionKind
// ---------------------------------------------------------------------------

/// How a function-like entity is (or is not) defined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// No body: `void f();`
    #[default]
    Declaration,
    /// A body, function-try-block, or constructor initializer list plus body.
    Normal,
    /// `= default`
    Defaulted,
    /// `= delete`
    Deleted,
    /// `= 0`
    Pure,
}

impl DefinitionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Normal => "normal",
            Self::Defaulted => "defaulted",
            Self::Deleted => "deleted",
            Self::Pure => "pure",
        }
    }

    /// Whether this is anything but a plain declaration.
    #[must_use]
    pub const fn is_definition(self) -> bool {
        !matches!(self, Self::Declaration)
    }

    /// A body, `= default` or `= delete`: at most one per function.
    ///
    /// `= 0` does not count; a pure virtual may still be defined out of line.
    #[must_use]
    pub const fn provides_body(self) -> bool {
        matches!(self, Self::Normal | Self::Defaulted | Self::Deleted)
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RefQualifier
// ---------------------------------------------------------------------------

/// Ref-qualifier of a member function (`&` / `&&`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RefQualifier {
    #[default]
    None,
    Lvalue,
    Rvalue,
}

impl RefQualifier {
    /// Source spelling; empty for [`RefQualifier::None`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lvalue => "&",
            Self::Rvalue => "&&",
        }
    }
}

// ---------------------------------------------------------------------------
// VirtualKind
// ---------------------------------------------------------------------------

/// Relation of a member function to virtual dispatch.
///
/// `pure` and `final` are carried as flags on
/// [`Virtuality`](crate::entities::Virtuality) since they combine with
/// `New` and `Overridden`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum VirtualKind {
    #[default]
    None,
    /// Introduces a new virtual function.
    New,
    /// Overrides a virtual function of a (transitive) base class.
    Overridden,
    /// Static member function.
    Static,
}

impl VirtualKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::New => "new",
            Self::Overridden => "overridden",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for VirtualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a diagnostic recorded while building a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_keywords_roundtrip() {
        for access in [Access::Public, Access::Protected, Access::Private] {
            assert_eq!(Access::from_keyword(access.as_str()), Some(access));
        }
        assert_eq!(Access::from_keyword("friend"), None);
    }

    #[test]
    fn struct_defaults_to_public() {
        assert_eq!(ClassKey::Struct.default_access(), Access::Public);
        assert_eq!(ClassKey::Union.default_access(), Access::Public);
        assert_eq!(ClassKey::Class.default_access(), Access::Private);
    }

    #[test]
    fn definition_kind_serializes_snake_case() {
        let json = serde_json::to_string(&DefinitionKind::Defaulted).unwrap();
        assert_eq!(json, "\"defaulted\"");
        assert!(DefinitionKind::Pure.is_definition());
        assert!(!DefinitionKind::Declaration.is_definition());
        assert!(DefinitionKind::Deleted.provides_body());
        assert!(!DefinitionKind::Pure.provides_body());
    }

    #[test]
    fn ref_qualifier_spelling() {
        assert_eq!(RefQualifier::None.as_str(), "");
        assert_eq!(RefQualifier::Lvalue.as_str(), "&");
        assert_eq!(RefQualifier::Rvalue.as_str(), "&&");
    }
}
