//! First-pass qualifier scan over the tokens after a parameter list.
//!
//! Sets the cv- and ref-qualifiers of member functions and collects the
//! textual hints (`virtual`, `static`, `override`, `final`, `= 0`) that the
//! virtual resolver uses as corroboration.

use cxxdoc_core::entities::MemberQualifiers;
use cxxdoc_core::enums::{DefinitionKind, RefQualifier};

use crate::frontend::{CursorHints, FunctionShape};
use crate::tokens::{Token, TokenKind, matching_close};
use crate::type_name::Specifiers;

/// Corroborating keyword signals of a member-like declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Hints {
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_pure: bool,
}

impl Hints {
    /// Union of two sets of hints, e.g. a declaration and its definition.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            is_virtual: self.is_virtual || other.is_virtual,
            is_static: self.is_static || other.is_static,
            is_override: self.is_override || other.is_override,
            is_final: self.is_final || other.is_final,
            is_pure: self.is_pure || other.is_pure,
        }
    }

    /// Combine token-level findings with the cursor's hint flags.
    #[must_use]
    pub const fn collect(
        specifiers: &Specifiers,
        suffix: &SuffixScan,
        tail: &TailScan,
        cursor: &CursorHints,
        shape: &FunctionShape,
    ) -> Self {
        Self {
            is_virtual: specifiers.is_virtual || cursor.is_virtual,
            is_static: specifiers.is_static,
            is_override: suffix.has_override || tail.has_override || shape.has_override,
            is_final: suffix.has_final || tail.has_final || shape.has_final,
            is_pure: matches!(tail.definition, Some(DefinitionKind::Pure)) || cursor.is_pure,
        }
    }
}

/// What the tokens between `)` and the end of the function declarator say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixScan {
    pub qualifiers: MemberQualifiers,
    pub has_override: bool,
    pub has_final: bool,
    /// Index of the `->` introducing a trailing return type.
    pub arrow: Option<usize>,
}

/// Scan the function declarator suffix (attributes already removed).
///
/// Parenthesized groups such as `noexcept(...)` are skipped whole; a
/// trailing return type ends the qualifier section.
#[must_use]
pub fn scan_suffix(suffix: &[Token<'_>]) -> SuffixScan {
    let mut scan = SuffixScan::default();
    let mut i = 0;
    while i < suffix.len() {
        let token = suffix[i];
        match token.kind {
            TokenKind::Arrow if scan.arrow.is_none() => scan.arrow = Some(i),
            TokenKind::Amp if scan.arrow.is_none() => {
                scan.qualifiers.ref_qualifier = RefQualifier::Lvalue;
            }
            TokenKind::AmpAmp if scan.arrow.is_none() => {
                scan.qualifiers.ref_qualifier = RefQualifier::Rvalue;
            }
            TokenKind::Ident => match token.text {
                "const" if scan.arrow.is_none() => scan.qualifiers.cv.is_const = true,
                "volatile" if scan.arrow.is_none() => scan.qualifiers.cv.is_volatile = true,
                "override" => scan.has_override = true,
                "final" => scan.has_final = true,
                _ => {}
            },
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                if let Some(close) = matching_close(suffix, i) {
                    i = close;
                }
            }
            _ => {}
        }
        i += 1;
    }
    scan
}

/// What follows the declarator: `= 0`, `= delete`, `= default`, a body,
/// or a constructor initializer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailScan {
    pub definition: Option<DefinitionKind>,
    pub has_override: bool,
    pub has_final: bool,
}

/// Scan the tokens after a function declarator (attributes already removed).
///
/// `override`/`final` show up here when tree-sitter closed the declarator early.
#[must_use]
pub fn scan_tail(tail: &[Token<'_>]) -> TailScan {
    let mut scan = TailScan::default();
    let mut i = 0;
    while let Some(token) = tail.get(i) {
        match token.kind {
            TokenKind::Ident if token.text == "override" => scan.has_override = true,
            TokenKind::Ident if token.text == "final" => scan.has_final = true,
            TokenKind::Ident if token.text == "try" => {
                scan.definition = Some(DefinitionKind::Normal);
                break;
            }
            TokenKind::Assign => {
                scan.definition = tail.get(i + 1).and_then(|next| match next.text {
                    "0" => Some(DefinitionKind::Pure),
                    "delete" => Some(DefinitionKind::Deleted),
                    "default" => Some(DefinitionKind::Defaulted),
                    _ => None,
                });
                break;
            }
            TokenKind::LBrace | TokenKind::Colon => {
                scan.definition = Some(DefinitionKind::Normal);
                break;
            }
            _ => {}
        }
        i += 1;
    }
    scan
}

/// Qualifiers that count for a signature: free functions have none.
#[must_use]
pub fn member_qualifiers(scan: &SuffixScan, is_member: bool) -> MemberQualifiers {
    if is_member {
        scan.qualifiers
    } else {
        MemberQualifiers::default()
    }
}
