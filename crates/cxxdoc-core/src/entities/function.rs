use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DefinitionKind, RefQualifier, VirtualKind};

/// One function parameter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Parameter {
    /// Declared name, if any. Never part of the signature.
    pub name: Option<String>,
    /// Canonical type text, e.g. `const char *`.
    pub ty: String,
    /// Default argument exactly as written, e.g. `(j(), 0)`.
    pub default_value: Option<String>,
}

/// Exception specification of a function-like entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NoexceptSpec {
    /// `"true"`, `"false"`, or the raw condition of `noexcept(<expr>)`.
    pub expression: String,
    /// Whether a `noexcept`/`throw` token is physically present.
    pub is_explicit: bool,
}

impl NoexceptSpec {
    #[must_use]
    pub fn implicit(value: bool) -> Self {
        Self {
            expression: value.to_string(),
            is_explicit: false,
        }
    }
}

/// Attributes shared by every function-like entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FunctionSignature {
    pub parameters: Vec<Parameter>,
    /// Return type for functions, target type for conversion operators,
    /// empty for constructors and destructors.
    pub return_type: String,
    /// `(` + canonical parameter types + `)` + member qualifier suffix.
    pub signature: String,
    pub is_variadic: bool,
    pub is_constexpr: bool,
    pub noexcept: NoexceptSpec,
    pub definition: DefinitionKind,
}

impl FunctionSignature {
    /// True for both `()` and `(void)`; `parameters` still tells them apart.
    #[must_use]
    pub fn takes_no_arguments(&self) -> bool {
        !self.is_variadic
            && match self.parameters.as_slice() {
                [] => true,
                [only] => only.ty == "void" && only.name.is_none(),
                _ => false,
            }
    }
}

/// cv-qualifiers of a member function.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct CvQualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
}

/// cv- and ref-qualifiers of a member function.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct MemberQualifiers {
    pub cv: CvQualifiers,
    pub ref_qualifier: RefQualifier,
}

impl MemberQualifiers {
    /// Signature suffix, e.g. ` const volatile &&`.
    #[must_use]
    pub fn suffix(&self) -> String {
        let mut out = String::new();
        if self.cv.is_const {
            out.push_str(" const");
        }
        if self.cv.is_volatile {
            out.push_str(" volatile");
        }
        if self.ref_qualifier != RefQualifier::None {
            out.push(' ');
            out.push_str(self.ref_qualifier.as_str());
        }
        out
    }
}

/// Virtual classification of a member-like entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Virtuality {
    pub kind: VirtualKind,
    pub is_pure: bool,
    pub is_final: bool,
}

impl Virtuality {
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(self.kind, VirtualKind::New | VirtualKind::Overridden)
    }

    #[must_use]
    pub const fn is_overridden(&self) -> bool {
        matches!(self.kind, VirtualKind::Overridden)
    }
}

/// A namespace-scope function.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Function {
    pub signature: FunctionSignature,
}

/// A non-special member function.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MemberFunction {
    pub signature: FunctionSignature,
    pub qualifiers: MemberQualifiers,
    pub virtuality: Virtuality,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Constructor {
    pub signature: FunctionSignature,
    pub is_explicit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Destructor {
    pub signature: FunctionSignature,
    pub virtuality: Virtuality,
}

/// `operator T()`; `signature.return_type` holds the target type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConversionOp {
    pub signature: FunctionSignature,
    pub qualifiers: MemberQualifiers,
    pub virtuality: Virtuality,
    pub is_explicit: bool,
}

impl ConversionOp {
    #[must_use]
    pub fn target_type(&self) -> &str {
        &self.signature.return_type
    }
}
