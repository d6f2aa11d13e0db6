//! Simple declarations: functions, variables and type aliases.

use ast_grep_core::{Doc, Node};
use std::ops::Range;

use cxxdoc_core::entities::{
    Constructor, ConversionOp, Destructor, Function, MemberFunction, Variable, Virtuality,
};
use cxxdoc_core::{EntityId, EntityKind};

use super::{Builder, Pending};
use crate::error::ParserError;
use crate::frontend::{
    CursorHints, CursorKind, DeclaratorShape, FunctionShape, Terminal, cursor_hints, declarators,
    start_line,
};
use crate::signature::{self, DeclaratorInput, ExtractedFunction, FunctionContext};
use crate::tokens::{Token, TokenKind, check_balanced, strip_attributes, tokenize, verbatim, within};
use crate::type_name::{Specifiers, canonical, split_specifiers, strip_template_args};
use crate::unique_name::join_scope;

/// Tokens of a declaration head plus the byte ranges of an embedded class
/// or enum body, which belong to that entity and not to the declared type.
struct Head<'s> {
    tokens: Vec<Token<'s>>,
    start: usize,
    end: usize,
    excluded: Vec<Range<usize>>,
}

impl Head<'_> {
    fn keeps(&self, token: &Token<'_>) -> bool {
        !self.excluded.iter().any(|r| r.contains(&token.offset))
    }
}

impl<'s> Builder<'s> {
    /// Tokenize the head of a declaration (everything before a function body)
    /// and emit any class or enum defined in its type.
    fn head<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        pending: &Pending,
        has_declarators: bool,
    ) -> Result<Head<'s>, ParserError> {
        let start = pending.prefix.unwrap_or_else(|| node.range().start);
        let end = function_body(node).map_or_else(|| node.range().end, |b| b.range().start);
        let tokens = tokenize(self.source, start..end);
        check_balanced(&tokens)?;

        let mut excluded = Vec::new();
        if let Some(ty) = node.field("type") {
            let body = ty.field("body");
            let emitted = match CursorKind::of(&ty) {
                CursorKind::Class(key) if body.is_some() || !has_declarators => {
                    self.class(scope, &ty, key, pending)?.is_some()
                }
                CursorKind::Enum if body.is_some() || !has_declarators => {
                    self.enumeration(scope, &ty, pending)?.is_some()
                }
                _ => false,
            };
            if emitted {
                excluded.extend(body.map(|b| b.range()));
                excluded.extend(
                    ty.children()
                        .filter(|c| c.kind().as_ref() == "base_class_clause")
                        .map(|c| c.range()),
                );
            }
        }
        Ok(Head {
            tokens,
            start,
            end,
            excluded,
        })
    }

    pub(super) fn declaration<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        pending: &Pending,
    ) -> Result<(), ParserError> {
        let declarators = declarators(node);
        let head = self.head(scope, node, pending, !declarators.is_empty())?;
        let Some(first) = declarators.first() else {
            return Ok(());
        };
        let has_body = function_body(node).is_some();
        let cursor = cursor_hints(node);
        let prefix = head.start..first.range().start;

        for (i, declarator) in declarators.iter().enumerate() {
            let input = DeclaratorInput {
                source: self.source,
                tokens: &head.tokens,
                prefix: prefix.clone(),
                piece_end: declarators.get(i + 1).map_or(head.end, |next| next.range().start),
            };
            let shape = DeclaratorShape::of(declarator);
            let line = start_line(declarator);
            match (&shape.name, &shape.function) {
                (None, _) => tracing::debug!(line, "declarator without a name"),
                (Some(name), _) if name.terminal == Terminal::StructuredBinding => {
                    self.unsupported("structured binding declaration", line);
                }
                (Some(_), Some(function)) => {
                    let declared = Declared {
                        node,
                        shape: &shape,
                        pending,
                    };
                    self.function(scope, &declared, &input, function, has_body, cursor)?;
                }
                (Some(_), None) => {
                    let declared = Declared {
                        node,
                        shape: &shape,
                        pending,
                    };
                    self.variable(scope, &declared, &input, &head);
                }
            }
        }
        Ok(())
    }

    fn function<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        declared: &Declared<'_, '_, D>,
        input: &DeclaratorInput<'_, '_>,
        function: &FunctionShape,
        has_body: bool,
        cursor: CursorHints,
    ) -> Result<(), ParserError> {
        let Some(name_shape) = &declared.shape.name else {
            return Ok(());
        };
        let (target, written) =
            self.qualified_target(scope, &name_shape.scope, start_line(declared.node));
        let class_name = self.member_class(target).map(strip_template_args);
        let context = FunctionContext {
            is_member: class_name.is_some(),
            has_body,
            implicit_destructor_noexcept: self.config.implicit_destructor_noexcept,
            cursor,
        };
        let ExtractedFunction {
            name,
            signature,
            qualifiers,
            specifiers,
            hints,
        } = signature::extract(input, declared.shape, function, &context)?;
        if specifiers.is_friend {
            return Ok(());
        }

        let virtuality = Virtuality::default();
        let kind = match (class_name, &name_shape.terminal) {
            (None, _) => EntityKind::Function(Function { signature }),
            (Some(_), Terminal::Destructor(_)) => {
                EntityKind::Destructor(Destructor {
                    signature,
                    virtuality,
                })
            }
            (Some(_), Terminal::Conversion(_)) => EntityKind::ConversionOp(ConversionOp {
                signature,
                qualifiers,
                virtuality,
                is_explicit: specifiers.is_explicit,
            }),
            (Some(class), Terminal::Identifier(ident)) if strip_template_args(ident) == class => {
                EntityKind::Constructor(Constructor {
                    signature,
                    is_explicit: specifiers.is_explicit,
                })
            }
            (Some(_), _) => EntityKind::MemberFunction(MemberFunction {
                signature,
                qualifiers,
                virtuality,
            }),
        };
        let name = match written {
            Some(qualifier) => join_scope(&qualifier, &name),
            None => name,
        };
        let entity = Self::entity(name, kind, declared.node, declared.pending);
        let id = self.add(target, entity);
        self.add_hints(id, hints);
        Ok(())
    }

    fn variable<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        declared: &Declared<'_, '_, D>,
        input: &DeclaratorInput<'_, '_>,
        head: &Head<'_>,
    ) {
        let Some(name_shape) = &declared.shape.name else {
            return;
        };
        let Terminal::Identifier(name) = &name_shape.terminal else {
            self.unsupported("variable without an identifier", start_line(declared.node));
            return;
        };
        let (target, written) =
            self.qualified_target(scope, &name_shape.scope, start_line(declared.node));
        let (ty, specifiers) = declared_type(input, declared.shape, head);
        if specifiers.is_friend {
            return;
        }
        let tail = input.slice(declared.shape.outer.end..input.piece_end);
        let variable = Variable {
            ty,
            initializer: initializer(self.source, &tail),
            is_static: specifiers.is_static,
            is_constexpr: specifiers.is_constexpr,
            is_mutable: specifiers.is_mutable,
        };
        let name = match written {
            Some(qualifier) => join_scope(&qualifier, name),
            None => name.clone(),
        };
        let entity = Self::entity(name, EntityKind::Variable(variable), declared.node, declared.pending);
        self.add(target, entity);
    }

    /// `typedef` declarations: one alias per declarator.
    pub(super) fn typedef<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        pending: &Pending,
    ) -> Result<(), ParserError> {
        let declarators = declarators(node);
        let head = self.head(scope, node, pending, !declarators.is_empty())?;
        let Some(first) = declarators.first() else {
            return Ok(());
        };
        let prefix = head.start..first.range().start;
        for (i, declarator) in declarators.iter().enumerate() {
            let input = DeclaratorInput {
                source: self.source,
                tokens: &head.tokens,
                prefix: prefix.clone(),
                piece_end: declarators.get(i + 1).map_or(head.end, |next| next.range().start),
            };
            let shape = DeclaratorShape::of(declarator);
            let Some(Terminal::Identifier(name)) = shape.name.as_ref().map(|n| &n.terminal) else {
                self.unsupported("typedef without a name", start_line(declarator));
                continue;
            };
            let (target, _) = declared_type(&input, &shape, &head);
            let entity = Self::entity(name.clone(), EntityKind::TypeAlias { target }, node, pending);
            self.add(scope, entity);
        }
        Ok(())
    }

    /// `using name = type;`
    pub(super) fn alias<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        pending: &Pending,
    ) {
        let Some(name) = node.field("name") else {
            return;
        };
        let target = node
            .field("type")
            .map(|ty| canonical(&strip_attributes(&tokenize(self.source, ty.range()))))
            .unwrap_or_default();
        let entity = Self::entity(
            name.text().to_string(),
            EntityKind::TypeAlias { target },
            node,
            pending,
        );
        self.add(scope, entity);
    }
}

/// A declarator together with the declaration it belongs to.
struct Declared<'n, 'r, D: Doc> {
    node: &'n Node<'r, D>,
    shape: &'n DeclaratorShape,
    pending: &'n Pending,
}

fn function_body<'r, D: Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    node.field("body")
        .filter(|b| matches!(b.kind().as_ref(), "compound_statement" | "try_statement"))
}

/// Canonical type of a variable or typedef declarator: the shared
/// specifiers plus whatever the declarator adds around the name.
fn declared_type(
    input: &DeclaratorInput<'_, '_>,
    shape: &DeclaratorShape,
    head: &Head<'_>,
) -> (String, Specifiers) {
    let prefix: Vec<Token<'_>> = input
        .slice(input.prefix.clone())
        .into_iter()
        .filter(|t| head.keeps(t))
        .collect();
    let (mut ty, specifiers) = split_specifiers(&prefix);
    let name = shape.name.as_ref().map_or(0..0, |n| n.range.clone());
    ty.extend(
        strip_attributes(within(input.tokens, shape.outer.clone()))
            .into_iter()
            .filter(|t| !name.contains(&t.offset)),
    );
    (canonical(&ty), specifiers)
}

/// `= value`, `{...}` or `(...)` after a variable declarator, as written.
fn initializer(source: &str, tail: &[Token<'_>]) -> Option<String> {
    let end = tail
        .iter()
        .rposition(|t| !matches!(t.kind, TokenKind::Comma | TokenKind::Semi))
        .map_or(0, |i| i + 1);
    let tail = &tail[..end];
    let value = match tail.first()?.kind {
        TokenKind::Assign => verbatim(source, &tail[1..]),
        TokenKind::LBrace | TokenKind::LParen => verbatim(source, tail),
        _ => return None,
    };
    (!value.is_empty()).then(|| value.to_string())
}
