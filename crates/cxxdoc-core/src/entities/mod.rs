//! The semantic entity model.
//!
//! An [`Entity`] is a node of the per-translation-unit tree. Its [`EntityKind`]
//! is a closed tagged union: consumers pattern-match on it instead of
//! downcasting. Function-like kinds share a [`FunctionSignature`]; member-like
//! kinds add [`MemberQualifiers`] and a [`Virtuality`].

mod class;
mod function;
mod variable;

pub use class::{BaseClass, Class};
pub use function::{
    Constructor, ConversionOp, CvQualifiers, Destructor, Function, FunctionSignature,
    MemberFunction, MemberQualifiers, NoexceptSpec, Parameter, Virtuality,
};
pub use variable::{Enum, Enumerator, Variable};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Access;
use crate::tree::EntityId;

/// Where an entity was declared.
///
/// Opaque to this crate; the comment matcher uses the byte range to find the
/// documentation comment that belongs to the entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceLocation {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based.
    pub start_line: u32,
    /// 1-based.
    pub end_line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Namespace { is_inline: bool },
    Class(Class),
    Function(Function),
    MemberFunction(MemberFunction),
    Constructor(Constructor),
    Destructor(Destructor),
    ConversionOp(ConversionOp),
    Variable(Variable),
    Enum(Enum),
    TypeAlias { target: String },
    AccessSpecifier { access: Access },
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Namespace { .. } => "namespace",
            Self::Class(_) => "class",
            Self::Function(_) => "function",
            Self::MemberFunction(_) => "member_function",
            Self::Constructor(_) => "constructor",
            Self::Destructor(_) => "destructor",
            Self::ConversionOp(_) => "conversion_op",
            Self::Variable(_) => "variable",
            Self::Enum(_) => "enum",
            Self::TypeAlias { .. } => "type_alias",
            Self::AccessSpecifier { .. } => "access_specifier",
        }
    }
}

/// One node of the entity tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Entity {
    /// Unqualified name: `k`, `operator=`, `operator const char &`, `~a`.
    pub name: String,
    /// Scope-qualified name, e.g. `base::k`.
    pub full_name: String,
    /// `full_name` immediately followed by the signature.
    pub unique_name: String,
    pub location: SourceLocation,
    /// Template parameter list as written, e.g. `<typename T>`.
    pub template_parameters: Option<String>,
    pub parent: Option<EntityId>,
    /// Members in declaration order.
    pub children: Vec<EntityId>,
    pub kind: EntityKind,
}

impl Entity {
    /// The shared function-like attributes, if this is a function-like entity.
    #[must_use]
    pub const fn function(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            EntityKind::Function(f) => Some(&f.signature),
            EntityKind::MemberFunction(f) => Some(&f.signature),
            EntityKind::Constructor(f) => Some(&f.signature),
            EntityKind::Destructor(f) => Some(&f.signature),
            EntityKind::ConversionOp(f) => Some(&f.signature),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionSignature> {
        match &mut self.kind {
            EntityKind::Function(f) => Some(&mut f.signature),
            EntityKind::MemberFunction(f) => Some(&mut f.signature),
            EntityKind::Constructor(f) => Some(&mut f.signature),
            EntityKind::Destructor(f) => Some(&mut f.signature),
            EntityKind::ConversionOp(f) => Some(&mut f.signature),
            _ => None,
        }
    }

    /// Signature string; empty for non-functions.
    #[must_use]
    pub fn signature(&self) -> &str {
        self.function().map_or("", |f| f.signature.as_str())
    }

    #[must_use]
    pub const fn qualifiers(&self) -> Option<&MemberQualifiers> {
        match &self.kind {
            EntityKind::MemberFunction(f) => Some(&f.qualifiers),
            EntityKind::ConversionOp(f) => Some(&f.qualifiers),
            _ => None,
        }
    }

    /// Virtual classification; `None` for entities that cannot be virtual.
    #[must_use]
    pub const fn virtuality(&self) -> Option<&Virtuality> {
        match &self.kind {
            EntityKind::MemberFunction(f) => Some(&f.virtuality),
            EntityKind::Destructor(f) => Some(&f.virtuality),
            EntityKind::ConversionOp(f) => Some(&f.virtuality),
            _ => None,
        }
    }

    pub fn virtuality_mut(&mut self) -> Option<&mut Virtuality> {
        match &mut self.kind {
            EntityKind::MemberFunction(f) => Some(&mut f.virtuality),
            EntityKind::Destructor(f) => Some(&mut f.virtuality),
            EntityKind::ConversionOp(f) => Some(&mut f.virtuality),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_function_like(&self) -> bool {
        self.function().is_some()
    }

    #[must_use]
    pub const fn as_class(&self) -> Option<&Class> {
        match &self.kind {
            EntityKind::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this entity takes part in unique-name collision checks.
    ///
    /// Access-specifier markers repeat legitimately and anonymous entities
    /// have no name to collide on.
    #[must_use]
    pub fn has_unique_name(&self) -> bool {
        !matches!(self.kind, EntityKind::AccessSpecifier { .. }) && !self.name.is_empty()
    }
}
