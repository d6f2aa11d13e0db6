//! Logos-based lexer over declaration text.
//!
//! The cursor tree decides where declarations, declarators and parameter
//! lists begin and end; everything finer (specifiers, qualifiers, exception
//! specifications, type spelling) is read from tokens. Tokens borrow from the
//! translation unit source and carry absolute byte offsets, so any run of
//! tokens maps back to a verbatim source slice.

use logos::{Lexer, Logos, Skip};
use std::ops::Range;

use crate::error::ParserError;

/// A token with its kind, text, and absolute byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    pub offset: usize,
}

impl Token<'_> {
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Identifiers, keywords and literals: tokens that need a space between them.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Ident | TokenKind::Number | TokenKind::String | TokenKind::Char
        )
    }

    #[must_use]
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    /// `*`, `&` or `&&`.
    #[must_use]
    pub const fn is_ptr_op(&self) -> bool {
        matches!(self.kind, TokenKind::Star | TokenKind::Amp | TokenKind::AmpAmp)
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\\\r?\n")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    /// Never produced: the callback skips to the closing `*/`.
    #[token("/*", block_comment)]
    Comment,

    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*")]
    Ident,

    #[regex(r"[0-9]([0-9A-Za-z_.]|'[0-9A-Za-z])*")]
    #[regex(r"\.[0-9][0-9A-Za-z_.]*")]
    Number,

    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\.)*""#)]
    #[regex(r#"(u8|u|U|L)?R"[^ ()\\\t\r\n"]*\("#, raw_string)]
    String,

    #[regex(r"(u8|u|U|L)?'([^'\\\n]|\\.)+'")]
    Char,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("=")]
    Assign,
    #[token("~")]
    Tilde,

    // No `>>` token: nested template argument lists close
    // one `>` at a time.
    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("^")]
    #[token("|")]
    #[token("!")]
    #[token("?")]
    #[token(".")]
    #[token("#")]
    #[token("##")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("<=>")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("^=")]
    #[token("|=")]
    #[token("&=")]
    #[token("<<")]
    #[token("<<=")]
    #[token("||")]
    #[token("++")]
    #[token("--")]
    #[token("->*")]
    #[token(".*")]
    Punct,

    /// Any byte sequence the lexer does not recognise.
    Unknown,
}

/// Consume a block comment up to and including `*/`.
///
/// An unterminated comment runs to the end of the input.
fn block_comment(lex: &mut Lexer<'_, TokenKind>) -> Skip {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    Skip
}

/// Extend a raw string opener `R"delim(` through its `)delim"` terminator.
fn raw_string(lex: &mut Lexer<'_, TokenKind>) -> bool {
    let opener = lex.slice();
    let Some(quote) = opener.find('"') else {
        return false;
    };
    let delimiter = &opener[quote + 1..opener.len() - 1];
    let terminator = format!("){delimiter}\"");
    match lex.remainder().find(&terminator) {
        Some(end) => {
            lex.bump(end + terminator.len());
            true
        }
        None => false,
    }
}

/// Lex `source[range]`, keeping absolute offsets.
#[must_use]
pub fn tokenize(source: &str, range: Range<usize>) -> Vec<Token<'_>> {
    let base = range.start;
    let Some(text) = source.get(range) else {
        return Vec::new();
    };
    let mut lexer = TokenKind::lexer(text);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        tokens.push(Token {
            kind: result.unwrap_or(TokenKind::Unknown),
            text: lexer.slice(),
            offset: base + span.start,
        });
    }
    tokens
}

/// The tokens whose start lies inside `range`.
#[must_use]
pub fn within<'t, 's>(tokens: &'t [Token<'s>], range: Range<usize>) -> &'t [Token<'s>] {
    let lo = tokens.partition_point(|t| t.offset < range.start);
    let hi = tokens.partition_point(|t| t.offset < range.end);
    &tokens[lo..hi.max(lo)]
}

/// Verbatim source text spanned by `tokens`, comments and spacing included.
#[must_use]
pub fn verbatim<'s>(source: &'s str, tokens: &[Token<'_>]) -> &'s str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => source.get(first.offset..last.end()).unwrap_or_default(),
        _ => "",
    }
}

const fn closer(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        TokenKind::LBrace => Some(TokenKind::RBrace),
        _ => None,
    }
}

/// Index of the token closing the group opened at `open`.
///
/// Only `()`, `[]` and `{}` are tracked; angle brackets are ambiguous at
/// the token level and are left to the cursor tree.
#[must_use]
pub fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    closer(tokens.get(open)?.kind)?;
    let mut stack = Vec::new();
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if let Some(close) = closer(token.kind) {
            stack.push(close);
        } else if matches!(
            token.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        ) {
            if stack.pop() != Some(token.kind) {
                return None;
            }
            if stack.is_empty() {
                return Some(i);
            }
        }
    }
    None
}

/// Reject unbalanced delimiters and unlexable input.
///
/// # Errors
/// Returns [`ParserError::Parse`] pointing at the first offending token.
pub fn check_balanced(tokens: &[Token<'_>]) -> Result<(), ParserError> {
    let mut stack: Vec<(TokenKind, usize)> = Vec::new();
    for token in tokens {
        if token.kind == TokenKind::Unknown {
            return Err(ParserError::Parse {
                message: format!("unexpected character sequence `{}`", token.text),
                offset: token.offset,
            });
        }
        if let Some(close) = closer(token.kind) {
            stack.push((close, token.offset));
        } else if matches!(
            token.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        ) {
            match stack.pop() {
                Some((expected, _)) if expected == token.kind => {}
                _ => {
                    return Err(ParserError::Parse {
                        message: format!("unbalanced `{}`", token.text),
                        offset: token.offset,
                    });
                }
            }
        }
    }
    match stack.pop() {
        Some((_, offset)) => Err(ParserError::Parse {
            message: "unclosed delimiter".into(),
            offset,
        }),
        None => Ok(()),
    }
}

/// Drop attribute syntax: `[[...]]`, `__attribute__((...))`,
/// `__declspec(...)` and `alignas(...)`.
#[must_use]
pub fn strip_attributes<'s>(tokens: &[Token<'s>]) -> Vec<Token<'s>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some(end) = attribute_end(tokens, i) {
            i = end + 1;
            continue;
        }
        out.push(tokens[i]);
        i += 1;
    }
    out
}

/// If an attribute starts at `i`, the index of its last token.
fn attribute_end(tokens: &[Token<'_>], i: usize) -> Option<usize> {
    let token = tokens[i];
    let next = tokens.get(i + 1)?;
    match token.kind {
        TokenKind::LBracket if next.kind == TokenKind::LBracket => matching_close(tokens, i),
        TokenKind::Ident
            if matches!(
                token.text,
                "__attribute__" | "__attribute" | "__declspec" | "alignas"
            ) && next.kind == TokenKind::LParen =>
        {
            matching_close(tokens, i + 1)
        }
        _ => None,
    }
}

/// True if the tokens hold nothing but attributes and the given keywords.
#[must_use]
pub fn only_specifiers(tokens: &[Token<'_>], keywords: &[&str]) -> bool {
    strip_attributes(tokens)
        .iter()
        .all(|t| t.kind == TokenKind::Ident && keywords.contains(&t.text))
}

/// Index of the first token of `kind` outside any `()`/`[]`/`{}` group.
#[must_use]
pub fn find_top_level(tokens: &[Token<'_>], kind: TokenKind) -> Option<usize> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == kind {
            return Some(i);
        }
        if closer(tokens[i].kind).is_some() {
            i = matching_close(tokens, i)?;
        }
        i += 1;
    }
    None
}
