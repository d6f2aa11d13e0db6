//! Namespaces, classes, enums, templates and access specifiers.

use ast_grep_core::{Doc, Node};

use cxxdoc_core::entities::{BaseClass, Class, Enum, Enumerator};
use cxxdoc_core::enums::{Access, ClassKey};
use cxxdoc_core::{EntityId, EntityKind};

use super::{Builder, Pending};
use crate::error::ParserError;
use crate::frontend::{CursorKind, start_line};
use crate::lookup::split_path;
use crate::tokens::{strip_attributes, tokenize};
use crate::type_name::compact;

impl Builder<'_> {
    /// Compact spelling of the source under `node`, attributes removed.
    pub(super) fn spelling<D: Doc>(&self, node: &Node<'_, D>) -> String {
        compact(&strip_attributes(&tokenize(self.source, node.range())))
    }

    pub(super) fn namespace<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
    ) -> Result<(), ParserError> {
        let is_inline = node.children().any(|c| c.kind().as_ref() == "inline");
        // `namespace a::inline b` declares two namespaces.
        let names: Vec<(String, bool)> = match node.field("name") {
            Some(name) if name.kind().as_ref() == "nested_namespace_specifier" => name
                .text()
                .split("::")
                .map(|piece| {
                    let piece = piece.trim();
                    piece
                        .strip_prefix("inline")
                        .filter(|rest| rest.starts_with(char::is_whitespace))
                        .map_or((piece.to_string(), false), |rest| {
                            (rest.trim().to_string(), true)
                        })
                })
                .collect(),
            Some(name) => vec![(name.text().to_string(), is_inline)],
            None => vec![(String::new(), is_inline)],
        };

        let mut current = scope;
        for (name, is_inline) in names {
            let entity = Self::entity(
                name,
                EntityKind::Namespace { is_inline },
                node,
                &Pending::default(),
            );
            current = Some(self.add(current, entity));
        }
        match node.field("body") {
            Some(body) => self.build_scope(current, body.children().collect()),
            None => Ok(()),
        }
    }

    /// A class, struct or union specifier; `None` for an anonymous one
    /// without a body.
    pub(super) fn class<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        key: ClassKey,
        pending: &Pending,
    ) -> Result<Option<EntityId>, ParserError> {
        let body = node.field("body");
        let (target, name) = self.specifier_name(scope, node);
        if name.is_empty() && body.is_none() {
            return Ok(None);
        }
        let bases = node
            .children()
            .find(|c| c.kind().as_ref() == "base_class_clause")
            .map(|clause| self.base_classes(&clause, key))
            .unwrap_or_default();
        let is_final = node
            .children()
            .any(|c| c.kind().as_ref() == "virtual_specifier" && c.text().as_ref() == "final");

        let class = Class {
            key,
            bases,
            is_final,
            is_definition: body.is_some(),
        };
        let entity = Self::entity(name, EntityKind::Class(class), node, pending);
        let id = self.add(target, entity);
        if let Some(body) = body {
            self.build_scope(Some(id), body.children().collect())?;
        }
        Ok(Some(id))
    }

    fn base_classes<D: Doc>(&self, clause: &Node<'_, D>, key: ClassKey) -> Vec<BaseClass> {
        let mut bases = Vec::new();
        let mut access = None;
        let mut is_virtual = false;
        for child in clause.children() {
            match child.kind().as_ref() {
                "," => {
                    access = None;
                    is_virtual = false;
                }
                "virtual" => is_virtual = true,
                "access_specifier" => access = Access::from_keyword(child.text().trim()),
                "comment" | "attribute_declaration" => {}
                _ if child.is_named() => bases.push(BaseClass {
                    name: self.spelling(&child),
                    access: access.unwrap_or_else(|| key.default_access()),
                    is_virtual,
                }),
                _ => {}
            }
        }
        bases
    }

    pub(super) fn enumeration<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        pending: &Pending,
    ) -> Result<Option<EntityId>, ParserError> {
        let body = node.field("body");
        let (target, name) = self.specifier_name(scope, node);
        if name.is_empty() && body.is_none() {
            return Ok(None);
        }
        let enumerators = body
            .iter()
            .flat_map(|list| list.children())
            .filter(|c| c.kind().as_ref() == "enumerator")
            .map(|e| Enumerator {
                name: e.field("name").map(|n| n.text().to_string()).unwrap_or_default(),
                value: e.field("value").map(|v| v.text().to_string()),
            })
            .collect();
        let data = Enum {
            is_scoped: node
                .children()
                .any(|c| matches!(c.kind().as_ref(), "class" | "struct")),
            underlying_type: node.field("base").map(|b| self.spelling(&b)),
            enumerators,
            is_definition: body.is_some(),
        };
        let entity = Self::entity(name, EntityKind::Enum(data), node, pending);
        Ok(Some(self.add(target, entity)))
    }

    /// Target scope and name of a class or enum specifier.
    ///
    /// `struct ns::foo {}` is placed into `ns`; a specialization keeps its
    /// template arguments in the name (`foo<int>`).
    fn specifier_name<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
    ) -> (Option<EntityId>, String) {
        let Some(name) = node.field("name") else {
            return (scope, String::new());
        };
        if name.kind().as_ref() != "qualified_identifier" {
            return (scope, self.spelling(&name));
        }
        let mut path = split_path(&name.text());
        let last = name
            .field("name")
            .map(|n| {
                let mut inner = n;
                while inner.kind().as_ref() == "qualified_identifier" {
                    match inner.field("name") {
                        Some(next) => inner = next,
                        None => break,
                    }
                }
                self.spelling(&inner)
            })
            .unwrap_or_else(|| path.last().cloned().unwrap_or_default());
        path.pop();
        match self.qualified_target(scope, &path, start_line(node)) {
            (target, None) => (target, last),
            (target, Some(written)) => (target, format!("{written}::{last}")),
        }
    }

    pub(super) fn template<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        mut pending: Pending,
    ) -> Result<(), ParserError> {
        pending.starting_at(node.range().start, start_line(node));
        let parameters = node.field("parameters").map(|p| p.text().to_string());
        pending.template = match (pending.template.take(), parameters) {
            (Some(outer), Some(inner)) => Some(format!("{outer} {inner}")),
            (outer, inner) => outer.or(inner),
        };
        let inner = node
            .children()
            .filter(|c| {
                c.is_named()
                    && !matches!(
                        c.kind().as_ref(),
                        "template_parameter_list" | "requires_clause" | "comment"
                    )
            })
            .last();
        match inner {
            Some(inner) => {
                let kind = CursorKind::of(&inner);
                self.visit(scope, &inner, kind, pending)
            }
            None => Ok(()),
        }
    }

    pub(super) fn access_specifier<D: Doc>(&mut self, scope: Option<EntityId>, node: &Node<'_, D>) {
        let Some(access) = Access::from_keyword(node.text().trim()) else {
            tracing::debug!(text = %node.text(), "unknown access specifier");
            return;
        };
        let entity = Self::entity(
            access.as_str(),
            EntityKind::AccessSpecifier { access },
            node,
            &Pending::default(),
        );
        self.arena.alloc(entity, scope);
    }
}
