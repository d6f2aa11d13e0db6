//! ast-grep front end: cursor kinds, syntax diagnostics and declarator shapes.
//!
//! tree-sitter-cpp is reliable about where a declaration starts and ends and
//! about the nesting of declarators, but it occasionally misparses attribute
//! syntax inside them. Everything here is therefore expressed as byte ranges
//! into the source; the token layer reads the details from those ranges.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, Doc, Node};
use ast_grep_language::{LanguageExt, SupportLang};
use std::borrow::Cow;
use std::ops::Range;

use cxxdoc_core::Diagnostic;
use cxxdoc_core::enums::ClassKey;

use crate::tokens::{TokenKind, matching_close, only_specifiers, tokenize};
use crate::type_name::DECL_SPECIFIERS;

/// The concrete AST tree type returned by [`parse_source`].
pub type AstTree = AstGrep<StrDoc<SupportLang>>;

/// Parse C++ source into an ast-grep tree.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    SupportLang::Cpp.ast_grep(source)
}

/// Blank out `__attribute__((...))` and `__declspec(...)`.
///
/// tree-sitter-cpp splits a declaration in two at a GNU attribute in
/// declarator position. The token layer drops attributes anyway, so they are
/// replaced by spaces before parsing; byte offsets and lines are unchanged.
/// Directive lines are left alone so a `#define` keeps its body.
#[must_use]
pub fn mask_vendor_attributes(source: &str) -> Cow<'_, str> {
    let tokens = tokenize(source, 0..source.len());
    let mut directives = DirectiveLines::new(source);
    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let is_vendor = token.kind == TokenKind::Ident
            && matches!(token.text, "__attribute__" | "__attribute" | "__declspec");
        if is_vendor
            && !directives.contains(token.offset)
            && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::LParen)
            && let Some(close) = matching_close(&tokens, i + 1)
        {
            spans.push(token.offset..tokens[close].end());
            i = close;
        }
        i += 1;
    }
    if spans.is_empty() {
        return Cow::Borrowed(source);
    }
    let mut bytes = source.as_bytes().to_vec();
    for span in spans {
        for byte in &mut bytes[span] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    String::from_utf8(bytes).map_or(Cow::Borrowed(source), Cow::Owned)
}

/// Answers whether an offset sits on a preprocessor directive line.
///
/// Queries must come in non-decreasing offset order; each byte of the
/// source is scanned for line breaks at most once.
struct DirectiveLines<'s> {
    source: &'s str,
    scanned: usize,
    line_start: usize,
}

impl<'s> DirectiveLines<'s> {
    const fn new(source: &'s str) -> Self {
        Self {
            source,
            scanned: 0,
            line_start: 0,
        }
    }

    fn contains(&mut self, offset: usize) -> bool {
        let Some(gap) = self.source.get(self.scanned..offset) else {
            return false;
        };
        if let Some(newline) = gap.rfind('\n') {
            self.line_start = self.scanned + newline + 1;
        }
        self.scanned = offset;
        self.source
            .get(self.line_start..offset)
            .is_some_and(|line| line.trim_start().starts_with('#'))
    }
}

/// 1-based line of the node start.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn start_line<D: Doc>(node: &Node<D>) -> u32 {
    node.start_pos().line() as u32 + 1
}

/// 1-based line of the node end.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn end_line<D: Doc>(node: &Node<D>) -> u32 {
    node.end_pos().line() as u32 + 1
}

// ---------------------------------------------------------------------------
// Cursor kinds
// ---------------------------------------------------------------------------

/// What the builder does with a scope-level cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Namespace,
    Class(ClassKey),
    Enum,
    FunctionDefinition,
    /// `declaration` and `field_declaration`.
    Declaration,
    Template,
    Alias,
    Typedef,
    AccessSpecifier,
    /// `extern "C"` blocks and preprocessor conditionals.
    Transparent,
    /// Friends, `static_assert`, using-declarations, namespace aliases,
    /// explicit instantiations, comments and directives.
    Skipped,
    Error,
    Unsupported,
}

impl CursorKind {
    #[must_use]
    pub fn of<D: Doc>(node: &Node<D>) -> Self {
        match node.kind().as_ref() {
            "namespace_definition" => Self::Namespace,
            "class_specifier" => Self::Class(ClassKey::Class),
            "struct_specifier" => Self::Class(ClassKey::Struct),
            "union_specifier" => Self::Class(ClassKey::Union),
            "enum_specifier" => Self::Enum,
            "function_definition" => Self::FunctionDefinition,
            "declaration" | "field_declaration" => Self::Declaration,
            "template_declaration" => Self::Template,
            "alias_declaration" => Self::Alias,
            "type_definition" => Self::Typedef,
            "access_specifier" => Self::AccessSpecifier,
            "linkage_specification" | "preproc_if" | "preproc_ifdef" | "preproc_else"
            | "preproc_elif" | "preproc_elifdef" => Self::Transparent,
            "friend_declaration"
            | "static_assert_declaration"
            | "using_declaration"
            | "namespace_alias_definition"
            | "template_instantiation"
            | "concept_definition"
            | "comment"
            | "preproc_include"
            | "preproc_def"
            | "preproc_function_def"
            | "preproc_call" => Self::Skipped,
            "ERROR" => Self::Error,
            _ => Self::Unsupported,
        }
    }
}

/// Node kinds whose children are declarations in source order.
fn is_scope_kind(kind: &str) -> bool {
    matches!(
        kind,
        "translation_unit"
            | "declaration_list"
            | "field_declaration_list"
            | "preproc_if"
            | "preproc_ifdef"
            | "preproc_else"
            | "preproc_elif"
            | "preproc_elifdef"
    )
}

/// Children of a transparent cursor that hold declarations.
///
/// The condition or macro name of a preprocessor block is left out.
#[must_use]
pub fn transparent_children<'r, D: Doc>(node: &Node<'r, D>) -> Vec<Node<'r, D>> {
    if node.kind().as_ref() == "linkage_specification" {
        return match node.field("body") {
            Some(body) if body.kind().as_ref() == "declaration_list" => {
                body.children().collect()
            }
            Some(body) => vec![body],
            None => Vec::new(),
        };
    }
    let excluded: Vec<Range<usize>> = ["name", "condition"]
        .iter()
        .filter_map(|field| node.field(field))
        .map(|n| n.range())
        .collect();
    node.children()
        .filter(|c| !excluded.contains(&c.range()))
        .collect()
}

/// An ERROR cursor made only of declaration specifiers and attributes,
/// such as the `virtual [[]]` tree-sitter splits off `virtual [[]] ~foo()`.
#[must_use]
pub fn is_specifier_prefix<D: Doc>(node: &Node<D>, source: &str) -> bool {
    node.kind().as_ref() == "ERROR" && only_specifiers(&tokenize(source, node.range()), DECL_SPECIFIERS)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Scope-level syntax errors and missing tokens.
///
/// ERROR cursors nested inside a declaration are tolerated: they come from
/// attribute syntax the grammar does not know, which the token layer skips.
/// So are zero-width named nodes inside a declaration, such as the type
/// recovery invents for a `= {}` default argument. Missing punctuation is
/// always reported.
#[must_use]
pub fn syntax_diagnostics<D: Doc>(root: &Node<D>, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if root.kind().as_ref() == "ERROR" {
        let stray = stray_children(root).into_iter().next().unwrap_or_else(|| root.clone());
        diagnostics.push(Diagnostic::error(
            format!("unexpected `{}`", excerpt(&stray.text())),
            Some(start_line(&stray)),
        ));
    }
    let mut stack = vec![(root.clone(), false)];
    while let Some((node, in_scope)) = stack.pop() {
        let kind = node.kind();
        let is_leaf = node.children().next().is_none();
        if kind.as_ref() == "ERROR" && in_scope && !is_specifier_prefix(&node, source) {
            diagnostics.push(Diagnostic::error(
                format!("unexpected `{}`", excerpt(&node.text())),
                Some(start_line(&node)),
            ));
        } else if is_leaf
            && node.range().is_empty()
            && (in_scope || !node.is_named())
            && kind.as_ref() != "translation_unit"
            && !is_deleted_definition(&node)
        {
            diagnostics.push(Diagnostic::error(
                format!("missing `{kind}`"),
                Some(start_line(&node)),
            ));
        }
        let scope = is_scope_kind(kind.as_ref());
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|c| (c, scope)));
    }
    diagnostics
}

/// Named children of an ERROR root that are not declarations.
///
/// When the grammar cannot recover, the whole unit becomes one ERROR node
/// holding the complete declarations next to the stray tokens.
#[must_use]
pub fn stray_children<'r, D: Doc>(root: &Node<'r, D>) -> Vec<Node<'r, D>> {
    root.children()
        .filter(|c| c.is_named() && CursorKind::of(c) == CursorKind::Unsupported)
        .collect()
}

/// `void f() = delete;` at namespace scope parses as an initializer with a
/// `delete` expression missing its operand.
fn is_deleted_definition<D: Doc>(node: &Node<D>) -> bool {
    node.parent()
        .is_some_and(|p| p.kind().as_ref() == "delete_expression")
}

fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() > 40 {
        format!("{}...", line.chars().take(40).collect::<String>())
    } else {
        line.to_string()
    }
}

// ---------------------------------------------------------------------------
// Declarators
// ---------------------------------------------------------------------------

/// Declarator kinds that wrap another declarator.
const WRAPPERS: &[&str] = &[
    "init_declarator",
    "function_declarator",
    "pointer_declarator",
    "reference_declarator",
    "array_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
    "variadic_declarator",
    "abstract_function_declarator",
    "abstract_pointer_declarator",
    "abstract_reference_declarator",
    "abstract_array_declarator",
    "abstract_parenthesized_declarator",
];

/// Declarator kinds that name the declared entity.
const TERMINALS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "qualified_identifier",
    "operator_name",
    "destructor_name",
    "operator_cast",
    "template_function",
    "structured_binding_declarator",
];

fn is_declarator_kind(kind: &str) -> bool {
    WRAPPERS.contains(&kind) || TERMINALS.contains(&kind)
}

/// The declarator cursors of a declaration, in source order.
///
/// Named children after the type that are declarator kinds; a value
/// following `=` (as in `int a = b, c;` at class scope) is not one.
#[must_use]
pub fn declarators<'r, D: Doc>(decl: &Node<'r, D>) -> Vec<Node<'r, D>> {
    let type_end = decl.field("type").map_or(0, |t| t.range().end);
    let mut out = Vec::new();
    let mut after_assign = false;
    for child in decl.children() {
        if child.range().start < type_end {
            continue;
        }
        if !child.is_named() {
            after_assign = child.kind().as_ref() == "=";
            continue;
        }
        if !after_assign && is_declarator_kind(&child.kind()) {
            out.push(child);
        }
        after_assign = false;
    }
    out
}

fn inner_declarator<'r, D: Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    node.field("declarator").or_else(|| {
        node.children()
            .find(|c| c.is_named() && is_declarator_kind(&c.kind()))
    })
}

/// Wrappers from the outermost declarator down to the terminal.
fn declarator_path<'r, D: Doc>(top: Node<'r, D>) -> Vec<Node<'r, D>> {
    let mut path = Vec::new();
    let mut current = Some(top);
    while let Some(node) = current {
        current = if WRAPPERS.contains(&node.kind().as_ref()) {
            inner_declarator(&node)
        } else {
            None
        };
        path.push(node);
    }
    path
}

/// The innermost name of a declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Identifier(String),
    /// Range of the `operator` keyword and its symbol.
    Operator(Range<usize>),
    /// Class name without the `~`.
    Destructor(String),
    /// Range of the conversion target type.
    Conversion(Range<usize>),
    StructuredBinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameShape {
    /// Whole name including any written qualifier.
    pub range: Range<usize>,
    /// Written qualifier, template arguments dropped; `""` first for `::x`.
    pub scope: Vec<String>,
    pub terminal: Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamShape {
    pub range: Range<usize>,
    pub name: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionShape {
    /// Parameter list including the parentheses.
    pub params_range: Range<usize>,
    pub params: Vec<ParamShape>,
    pub is_variadic: bool,
    /// End of the function declarator: qualifiers, exception specification
    /// and trailing return type lie between `params_range.end` and here.
    pub declarator_end: usize,
    pub has_override: bool,
    pub has_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaratorShape {
    pub range: Range<usize>,
    /// The declarator without an `init_declarator` wrapper.
    pub outer: Range<usize>,
    pub name: Option<NameShape>,
    pub function: Option<FunctionShape>,
}

impl DeclaratorShape {
    #[must_use]
    pub fn of<D: Doc>(top: &Node<D>) -> Self {
        let path = declarator_path(top.clone());
        let outer = path
            .iter()
            .find(|n| n.kind().as_ref() != "init_declarator")
            .map_or_else(|| top.range(), Node::range);
        let terminal = path
            .last()
            .filter(|n| TERMINALS.contains(&n.kind().as_ref()));
        let name = terminal.map(name_shape);

        let function = match terminal.and_then(conversion_cast) {
            Some(cast) => cast
                .field("declarator")
                .and_then(|d| {
                    declarator_path(d)
                        .into_iter()
                        .find(|n| n.kind().as_ref() == "abstract_function_declarator")
                })
                .and_then(|afd| function_shape(&afd)),
            None => enclosing_function(&path).and_then(|fd| function_shape(&fd)),
        };

        Self {
            range: top.range(),
            outer,
            name,
            function,
        }
    }
}

/// The function declarator directly around the name, looking through
/// parentheses and attributes only. `(*fp)(int)` is a pointer, not a function.
fn enclosing_function<'r, D: Doc>(path: &[Node<'r, D>]) -> Option<Node<'r, D>> {
    let (_, wrappers) = path.split_last()?;
    wrappers
        .iter()
        .rev()
        .find(|n| {
            !matches!(
                n.kind().as_ref(),
                "parenthesized_declarator" | "attributed_declarator"
            )
        })
        .filter(|n| n.kind().as_ref() == "function_declarator")
        .cloned()
}

/// The `operator_cast` a terminal names, directly or behind a qualifier.
fn conversion_cast<'r, D: Doc>(terminal: &Node<'r, D>) -> Option<Node<'r, D>> {
    let mut node = terminal.clone();
    while node.kind().as_ref() == "qualified_identifier" {
        node = node.field("name")?;
    }
    (node.kind().as_ref() == "operator_cast").then_some(node)
}

fn name_shape<D: Doc>(terminal: &Node<D>) -> NameShape {
    let mut scope = Vec::new();
    let mut node = terminal.clone();
    while node.kind().as_ref() == "qualified_identifier" {
        scope.push(node.field("scope").map_or_else(String::new, |s| scope_name(&s)));
        match node.field("name") {
            Some(inner) => node = inner,
            None => break,
        }
    }
    let terminal_kind = match node.kind().as_ref() {
        "destructor_name" => Terminal::Destructor(
            node.text().trim_start_matches('~').trim().to_string(),
        ),
        "operator_name" => Terminal::Operator(node.range()),
        "operator_cast" => {
            let cast_start = node.range().start + "operator".len();
            let target_end = node
                .field("declarator")
                .and_then(|d| {
                    declarator_path(d)
                        .into_iter()
                        .find(|n| n.kind().as_ref() == "abstract_function_declarator")
                })
                .map_or(node.range().end, |afd| afd.range().start);
            Terminal::Conversion(cast_start..target_end.max(cast_start))
        }
        "template_function" => Terminal::Identifier(
            node.field("name")
                .map_or_else(|| node.text().to_string(), |n| n.text().to_string()),
        ),
        "structured_binding_declarator" => Terminal::StructuredBinding,
        _ => Terminal::Identifier(node.text().to_string()),
    };
    NameShape {
        range: terminal.range(),
        scope,
        terminal: terminal_kind,
    }
}

fn scope_name<D: Doc>(scope: &Node<D>) -> String {
    match scope.kind().as_ref() {
        "template_type" => scope
            .field("name")
            .map_or_else(|| scope.text().to_string(), |n| n.text().to_string()),
        _ => crate::type_name::strip_template_args(&scope.text()),
    }
}

fn function_shape<D: Doc>(declarator: &Node<D>) -> Option<FunctionShape> {
    let list = declarator.field("parameters")?;
    let mut params: Vec<ParamShape> = Vec::new();
    let mut is_variadic = false;
    for child in list.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "(" | ")" | "," | "comment" => {}
            "..." => is_variadic = true,
            "ERROR" => match params.last_mut() {
                Some(last) => last.range.end = child.range().end,
                None => params.push(ParamShape {
                    range: child.range(),
                    name: None,
                }),
            },
            _ if child.is_named() => params.push(param_shape(&child)),
            _ => {}
        }
    }
    let specifiers: Vec<String> = declarator
        .children()
        .filter(|c| c.kind().as_ref() == "virtual_specifier")
        .map(|c| c.text().to_string())
        .collect();
    Some(FunctionShape {
        params_range: list.range(),
        params,
        is_variadic,
        declarator_end: declarator.range().end,
        has_override: specifiers.iter().any(|s| s == "override"),
        has_final: specifiers.iter().any(|s| s == "final"),
    })
}

fn param_shape<D: Doc>(param: &Node<D>) -> ParamShape {
    let name = param
        .field("declarator")
        .map(declarator_path)
        .and_then(|path| path.last().cloned())
        .filter(|n| matches!(n.kind().as_ref(), "identifier" | "field_identifier"))
        .map(|n| n.range());
    ParamShape {
        range: param.range(),
        name,
    }
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

/// Best-effort flags read off the cursor tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CursorHints {
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_defaulted: bool,
    pub is_deleted: bool,
}

/// Declaration-level hints: the `virtual` keyword and the definition clauses.
#[must_use]
pub fn cursor_hints<D: Doc>(decl: &Node<D>) -> CursorHints {
    let mut hints = CursorHints::default();
    let mut after_assign = false;
    for child in decl.children() {
        match child.kind().as_ref() {
            "virtual" => hints.is_virtual = true,
            "pure_virtual_clause" => hints.is_pure = true,
            "default_method_clause" => hints.is_defaulted = true,
            "delete_method_clause" => hints.is_deleted = true,
            "=" => {
                after_assign = true;
                continue;
            }
            "number_literal" if after_assign && child.text().as_ref() == "0" => {
                hints.is_pure = true;
            }
            _ => {}
        }
        after_assign = false;
    }
    hints
}
