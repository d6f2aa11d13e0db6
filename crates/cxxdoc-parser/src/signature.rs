//! Function signature extraction.
//!
//! A function declaration is cut into token runs by the declarator shape:
//!
//! ```text
//! virtual const char & f   (int a, ...)   const noexcept  = 0 ;
//! |---- prefix ----|       |- params --|  |-- suffix --|  |tail|
//! ```
//!
//! Declarators that wrap the function (`int (*f())(char)`) add a
//! `pre_name` run before the name and a `post` run after the suffix; both
//! belong to the return type.

use std::ops::Range;

use cxxdoc_core::entities::{FunctionSignature, MemberQualifiers, NoexceptSpec, Parameter};
use cxxdoc_core::enums::DefinitionKind;

use crate::error::ParserError;
use crate::frontend::{CursorHints, DeclaratorShape, FunctionShape, ParamShape, Terminal};
use crate::qualifiers::{Hints, member_qualifiers, scan_suffix, scan_tail};
use crate::tokens::{
    Token, TokenKind, find_top_level, matching_close, strip_attributes, verbatim, within,
};
use crate::type_name::{Specifiers, canonical, compact, operator_symbol, split_specifiers};

/// Tokens and ranges of one declarator within its declaration.
#[derive(Debug, Clone)]
pub struct DeclaratorInput<'a, 's> {
    pub source: &'s str,
    /// Tokens of the whole declaration head.
    pub tokens: &'a [Token<'s>],
    /// Specifiers and type shared by every declarator.
    pub prefix: Range<usize>,
    /// End of this declarator's piece (next declarator or end of head).
    pub piece_end: usize,
}

impl<'s> DeclaratorInput<'_, 's> {
    /// Tokens starting inside `range`, attributes removed.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Vec<Token<'s>> {
        strip_attributes(within(self.tokens, range))
    }
}

/// How the enclosing scope sees the function.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionContext {
    pub is_member: bool,
    pub has_body: bool,
    pub implicit_destructor_noexcept: bool,
    pub cursor: CursorHints,
}

/// Everything the builder needs to create a function-like entity.
#[derive(Debug, Clone)]
pub struct ExtractedFunction {
    pub name: String,
    pub signature: FunctionSignature,
    pub qualifiers: MemberQualifiers,
    pub specifiers: Specifiers,
    pub hints: Hints,
}

/// Extract the name, signature and hints of one function declarator.
///
/// # Errors
/// Returns [`ParserError::Parse`] if the declarator has no name.
pub fn extract(
    input: &DeclaratorInput<'_, '_>,
    declarator: &DeclaratorShape,
    function: &FunctionShape,
    context: &FunctionContext,
) -> Result<ExtractedFunction, ParserError> {
    let name_shape = declarator.name.as_ref().ok_or_else(|| ParserError::Parse {
        message: "function declarator without a name".into(),
        offset: declarator.range.start,
    })?;

    let prefix = input.slice(input.prefix.clone());
    let (type_tokens, specifiers) = split_specifiers(&prefix);
    let suffix = input.slice(function.params_range.end..function.declarator_end);
    let tail = input.slice(declarator.outer.end..input.piece_end);

    let suffix_scan = scan_suffix(&suffix);
    let tail_scan = scan_tail(&tail);
    let qualifiers = member_qualifiers(&suffix_scan, context.is_member);
    let qualifier_end = suffix_scan.arrow.unwrap_or(suffix.len());

    let is_destructor = matches!(name_shape.terminal, Terminal::Destructor(_));
    let (name, return_type) = match &name_shape.terminal {
        Terminal::Identifier(name) => (name.clone(), None),
        Terminal::Destructor(class) => (format!("~{class}"), Some(String::new())),
        Terminal::Operator(range) => {
            let symbol = input.slice(range.clone());
            (
                format!("operator{}", operator_symbol(symbol.get(1..).unwrap_or_default())),
                None,
            )
        }
        Terminal::Conversion(range) => {
            let target = canonical(&input.slice(range.clone()));
            (format!("operator {target}"), Some(target))
        }
        Terminal::StructuredBinding => {
            return Err(ParserError::Parse {
                message: "structured binding used as a function name".into(),
                offset: name_shape.range.start,
            });
        }
    };

    let return_type = return_type.unwrap_or_else(|| match suffix_scan.arrow {
        Some(arrow) => trailing_return_type(&suffix[arrow + 1..]),
        None => {
            let mut spelled = type_tokens.clone();
            spelled.extend(input.slice(declarator.outer.start..name_shape.range.start));
            spelled.extend(input.slice(function.declarator_end..declarator.outer.end));
            compact(&spelled)
        }
    });

    let noexcept = exception_spec(input.source, &suffix[..qualifier_end]).unwrap_or_else(|| {
        NoexceptSpec::implicit(is_destructor && context.implicit_destructor_noexcept)
    });

    let parameters: Vec<Parameter> = function
        .params
        .iter()
        .map(|param| parameter(input, param))
        .collect();

    let definition = if context.has_body {
        DefinitionKind::Normal
    } else {
        tail_scan.definition.unwrap_or_else(|| cursor_definition(&context.cursor))
    };

    let signature = render_signature(&parameters, function.is_variadic, &qualifiers);
    let hints = Hints::collect(&specifiers, &suffix_scan, &tail_scan, &context.cursor, function);

    Ok(ExtractedFunction {
        name,
        signature: FunctionSignature {
            parameters,
            return_type,
            signature,
            is_variadic: function.is_variadic,
            is_constexpr: specifiers.is_constexpr,
            noexcept,
            definition,
        },
        qualifiers,
        specifiers,
        hints,
    })
}

const fn cursor_definition(cursor: &CursorHints) -> DefinitionKind {
    if cursor.is_pure {
        DefinitionKind::Pure
    } else if cursor.is_deleted {
        DefinitionKind::Deleted
    } else if cursor.is_defaulted {
        DefinitionKind::Defaulted
    } else {
        DefinitionKind::Declaration
    }
}

/// `(` + canonical parameter types + `)` + qualifier suffix.
///
/// A lone unnamed `void` parameter renders as `()`.
#[must_use]
pub fn render_signature(
    parameters: &[Parameter],
    is_variadic: bool,
    qualifiers: &MemberQualifiers,
) -> String {
    let types: Vec<&str> = match parameters {
        [only] if only.ty == "void" && only.name.is_none() && !is_variadic => Vec::new(),
        _ => parameters.iter().map(|p| p.ty.as_str()).collect(),
    };
    let mut out = format!("({}", types.join(","));
    if is_variadic {
        if !types.is_empty() {
            out.push(',');
        }
        out.push_str("...");
    }
    out.push(')');
    out.push_str(&qualifiers.suffix());
    out
}

fn parameter(input: &DeclaratorInput<'_, '_>, param: &ParamShape) -> Parameter {
    let tokens = input.slice(param.range.clone());
    let (declared, default_value) = match find_top_level(&tokens, TokenKind::Assign) {
        Some(assign) => {
            let value = verbatim(input.source, &tokens[assign + 1..]);
            (&tokens[..assign], (!value.is_empty()).then(|| value.to_string()))
        }
        None => (&tokens[..], None),
    };
    let ty: Vec<Token<'_>> = declared
        .iter()
        .filter(|t| !param.name.as_ref().is_some_and(|n| n.contains(&t.offset)))
        .filter(|t| !t.is_ident("register"))
        .copied()
        .collect();
    Parameter {
        name: param
            .name
            .as_ref()
            .and_then(|n| input.source.get(n.clone()))
            .map(str::to_string),
        ty: canonical(&ty),
        default_value,
    }
}

/// The trailing return type after `->`, without virt-specifiers or a
/// trailing requires-clause.
fn trailing_return_type(tokens: &[Token<'_>]) -> String {
    let mut end = tokens
        .iter()
        .position(|t| t.is_ident("requires"))
        .unwrap_or(tokens.len());
    while end > 0 && (tokens[end - 1].is_ident("override") || tokens[end - 1].is_ident("final")) {
        end -= 1;
    }
    compact(&tokens[..end])
}

/// `noexcept`, `noexcept(expr)`, `throw()` or `throw(types)`.
///
/// A condition other than a bare `true`/`false` is kept as written.
fn exception_spec(source: &str, tokens: &[Token<'_>]) -> Option<NoexceptSpec> {
    let (i, keyword) = tokens
        .iter()
        .enumerate()
        .find(|(_, t)| t.is_ident("noexcept") || t.is_ident("throw"))?;
    let group = tokens
        .get(i + 1)
        .filter(|t| t.kind == TokenKind::LParen)
        .and_then(|_| matching_close(tokens, i + 1))
        .map(|close| &tokens[i + 2..close]);

    let expression = match (keyword.text, group) {
        ("noexcept", None) => "true".to_string(),
        ("noexcept", Some([t])) if t.is_ident("true") || t.is_ident("false") => t.text.to_string(),
        ("noexcept", Some(inner)) => verbatim(source, inner).to_string(),
        (_, None | Some([])) => "true".to_string(),
        (_, Some(_)) => "false".to_string(),
    };
    Some(NoexceptSpec {
        expression,
        is_explicit: true,
    })
}
