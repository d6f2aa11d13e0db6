//! Rendering of type spellings from tokens.
//!
//! Two spellings are produced:
//! - **compact**: a space only between two words (`int*`, `const char&&`,
//!   `int(*)(volatile char&&)`). Used for return types.
//! - **canonical**: clang-style (`const char *`, `int (*)(int)`,
//!   `std::map<int, int>`). Used for parameter, variable and conversion
//!   target types, and therefore for signatures.

use crate::tokens::{Token, TokenKind, matching_close, tokenize};

/// Declaration specifiers that are not part of a type.
pub const DECL_SPECIFIERS: &[&str] = &[
    "virtual",
    "static",
    "inline",
    "constexpr",
    "consteval",
    "constinit",
    "explicit",
    "friend",
    "extern",
    "mutable",
    "thread_local",
    "register",
    "typedef",
    "__inline",
    "__forceinline",
];

/// Specifier flags pulled out of a declaration prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Specifiers {
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_constexpr: bool,
    pub is_explicit: bool,
    pub is_mutable: bool,
    pub is_friend: bool,
}

/// Split specifier keywords (and their argument groups, as in
/// `explicit(cond)` or `extern "C"`) off a declaration prefix.
#[must_use]
pub fn split_specifiers<'s>(tokens: &[Token<'s>]) -> (Vec<Token<'s>>, Specifiers) {
    let mut specs = Specifiers::default();
    let mut rest = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token.kind != TokenKind::Ident || !DECL_SPECIFIERS.contains(&token.text) {
            rest.push(token);
            i += 1;
            continue;
        }
        match token.text {
            "virtual" => specs.is_virtual = true,
            "static" => specs.is_static = true,
            "constexpr" | "consteval" => specs.is_constexpr = true,
            "mutable" => specs.is_mutable = true,
            "friend" => specs.is_friend = true,
            "explicit" => {
                specs.is_explicit = true;
                if tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::LParen)
                    && let Some(close) = matching_close(tokens, i + 1)
                {
                    let cond = &tokens[i + 2..close];
                    specs.is_explicit = !(cond.len() == 1 && cond[0].is_ident("false"));
                    i = close;
                }
            }
            "extern" => {
                if tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::String) {
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    (rest, specs)
}

/// Compact spelling: a space only between two words.
#[must_use]
pub fn compact(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token<'_>> = None;
    for token in tokens {
        if prev.is_some_and(|p| p.is_word() && token.is_word()) {
            out.push(' ');
        }
        out.push_str(token.text);
        prev = Some(token);
    }
    out
}

/// Canonical, clang-style spelling.
#[must_use]
pub fn canonical(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && space_before(tokens[i - 1], *token, tokens.get(i + 1)) {
            out.push(' ');
        }
        out.push_str(token.text);
    }
    out
}

fn space_before(prev: Token<'_>, token: Token<'_>, next: Option<&Token<'_>>) -> bool {
    let ends_type = prev.is_word() || prev.kind == TokenKind::Gt;
    match token.kind {
        _ if prev.kind == TokenKind::Comma => true,
        _ if prev.is_word() && token.is_word() => true,
        TokenKind::Star | TokenKind::Amp | TokenKind::AmpAmp => {
            ends_type || prev.kind == TokenKind::RParen
        }
        TokenKind::LParen => ends_type && next.is_some_and(Token::is_ptr_op),
        TokenKind::LBracket => ends_type,
        _ => prev.kind == TokenKind::Gt && token.is_word(),
    }
}

/// Spelling of an operator function's symbol, e.g. `=`, `()`, ` new[]`.
///
/// The result is appended directly to `operator`.
#[must_use]
pub fn operator_symbol(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token<'_>> = None;
    for token in tokens {
        let word_pair = prev.is_some_and(|p| p.kind == TokenKind::Ident)
            && token.kind == TokenKind::Ident;
        if word_pair || (prev.is_none() && token.kind == TokenKind::Ident) {
            out.push(' ');
        }
        out.push_str(token.text);
        prev = Some(token);
    }
    out
}

/// Remove every `<...>` group: `ns::base<int>::inner` becomes `ns::base::inner`.
#[must_use]
pub fn strip_template_args(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Kinds of the innermost template parameter list, names and defaults
/// dropped: `<class T, int N = 2>` gives `["typename", "int"]`.
///
/// Redeclarations of one template agree on these even when they rename
/// parameters or write `class` for `typename`.
#[must_use]
pub fn template_parameter_kinds(parameters: &str) -> Vec<String> {
    let tokens = tokenize(parameters, 0..parameters.len());
    let mut inner: &[Token<'_>] = &[];
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Lt => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            TokenKind::Gt if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    inner = &tokens[start..i];
                }
            }
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                i = matching_close(&tokens, i).unwrap_or(i);
            }
            _ => {}
        }
        i += 1;
    }
    split_template_parameters(inner)
        .into_iter()
        .map(template_parameter_kind)
        .collect()
}

fn split_template_parameters<'t, 's>(tokens: &'t [Token<'s>]) -> Vec<&'t [Token<'s>]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => depth = depth.saturating_sub(1),
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                i = matching_close(tokens, i).unwrap_or(i);
            }
            TokenKind::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

fn template_parameter_kind(parameter: &[Token<'_>]) -> String {
    let declared = parameter
        .iter()
        .position(|t| t.kind == TokenKind::Assign)
        .map_or(parameter, |assign| &parameter[..assign]);
    let pack = if declared.iter().any(|t| t.kind == TokenKind::Ellipsis) {
        "..."
    } else {
        ""
    };
    match declared.first() {
        Some(t) if t.is_ident("typename") || t.is_ident("class") => format!("typename{pack}"),
        Some(t) if t.is_ident("template") => format!("template{pack}"),
        _ => {
            let mut kind: Vec<Token<'_>> = declared
                .iter()
                .filter(|t| t.kind != TokenKind::Ellipsis)
                .copied()
                .collect();
            if let [.., before, last] = kind.as_slice() {
                if last.kind == TokenKind::Ident && before.kind != TokenKind::ColonColon {
                    kind.pop();
                }
            }
            format!("{}{pack}", canonical(&kind))
        }
    }
}
