//! Entity tree builder.
//!
//! Walks the scope-level cursors of a translation unit in source order and
//! turns each into zero or more entities:
//!
//! - `scope`: namespaces, classes, enums, templates and access specifiers
//! - `declaration`: functions, variables and type aliases
//!
//! Redeclarations merge into the entity created first (same kind, name and
//! signature under the same parent). A second definition, or a template
//! head with different parameter kinds, is kept as a separate sibling and
//! surfaces as a name collision. Once the walk is complete, the virtual
//! resolver and the unique name assigner run over the whole arena.

mod declaration;
mod scope;

use ast_grep_core::{Doc, Node};
use std::collections::HashMap;
use std::mem;

use cxxdoc_config::ParserConfig;
use cxxdoc_core::entities::{Entity, SourceLocation};
use cxxdoc_core::{Diagnostic, EntityArena, EntityId, EntityKind, TranslationUnit};

use crate::error::ParserError;
use crate::frontend::{
    CursorKind, end_line, is_specifier_prefix, start_line, stray_children, transparent_children,
};
use crate::lookup::resolve_scope;
use crate::qualifiers::Hints;
use crate::type_name::template_parameter_kinds;
use crate::unique_name;
use crate::virtuals::Resolver;

/// Context handed from a wrapper cursor to the declaration it wraps.
#[derive(Debug, Clone, Default)]
struct Pending {
    /// Start of a specifier-only ERROR cursor that belongs to the next declaration.
    prefix: Option<usize>,
    /// Start byte and line of the entity, when it begins before its cursor.
    location: Option<(usize, u32)>,
    /// `template <...>` parameter lists, outermost first.
    template: Option<String>,
}

impl Pending {
    fn starting_at(&mut self, start: usize, line: u32) {
        if self.location.is_none() {
            self.location = Some((start, line));
        }
    }
}

pub struct Builder<'s> {
    source: &'s str,
    config: &'s ParserConfig,
    arena: EntityArena,
    hints: HashMap<EntityId, Hints>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> Builder<'s> {
    #[must_use]
    pub fn new(source: &'s str, config: &'s ParserConfig, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            source,
            config,
            arena: EntityArena::new(),
            hints: HashMap::new(),
            diagnostics,
        }
    }

    /// Build entities for every declaration below the translation unit root.
    ///
    /// # Errors
    /// Returns [`ParserError::Parse`] for declarations with malformed tokens.
    pub fn build<D: Doc>(&mut self, root: &Node<D>) -> Result<(), ParserError> {
        let mut children: Vec<_> = root.children().collect();
        if root.kind().as_ref() == "ERROR" {
            let stray: Vec<_> = stray_children(root).iter().map(Node::range).collect();
            children.retain(|c| !stray.contains(&c.range()));
        }
        self.build_scope(None, children)
    }

    /// Resolve virtuality and unique names, then freeze the tree.
    ///
    /// # Errors
    /// Returns [`ParserError::NameCollision`] if two siblings share a unique name.
    pub fn finish(mut self, unit: &str) -> Result<TranslationUnit, ParserError> {
        let warnings = Resolver::new(
            &mut self.arena,
            &self.hints,
            self.config.report_override_mismatch,
        )
        .run();
        self.diagnostics.extend(warnings);
        unique_name::assign(&mut self.arena)?;
        tracing::debug!(
            unit,
            entities = self.arena.len(),
            diagnostics = self.diagnostics.len(),
            "entity tree built"
        );
        Ok(TranslationUnit {
            name: unit.to_string(),
            tree: self.arena.freeze(),
            diagnostics: self.diagnostics,
        })
    }

    fn build_scope<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        children: Vec<Node<'_, D>>,
    ) -> Result<(), ParserError> {
        let mut pending = Pending::default();
        for child in children {
            if !child.is_named() || child.kind().as_ref() == "comment" {
                continue;
            }
            match CursorKind::of(&child) {
                CursorKind::Error if is_specifier_prefix(&child, self.source) => {
                    let start = child.range().start;
                    pending.prefix.get_or_insert(start);
                    pending.starting_at(start, start_line(&child));
                }
                CursorKind::Error => {
                    tracing::debug!(line = start_line(&child), "skipping unparsed region");
                    pending = Pending::default();
                }
                kind => self.visit(scope, &child, kind, mem::take(&mut pending))?,
            }
        }
        if let Some((_, line)) = pending.location {
            self.unsupported("declaration specifiers without a declaration", line);
        }
        Ok(())
    }

    fn visit<D: Doc>(
        &mut self,
        scope: Option<EntityId>,
        node: &Node<'_, D>,
        kind: CursorKind,
        pending: Pending,
    ) -> Result<(), ParserError> {
        match kind {
            CursorKind::Namespace => self.namespace(scope, node),
            CursorKind::Class(key) => self.class(scope, node, key, &pending).map(drop),
            CursorKind::Enum => self.enumeration(scope, node, &pending).map(drop),
            CursorKind::FunctionDefinition | CursorKind::Declaration => {
                self.declaration(scope, node, &pending)
            }
            CursorKind::Template => self.template(scope, node, pending),
            CursorKind::Alias => {
                self.alias(scope, node, &pending);
                Ok(())
            }
            CursorKind::Typedef => self.typedef(scope, node, &pending),
            CursorKind::AccessSpecifier => {
                self.access_specifier(scope, node);
                Ok(())
            }
            CursorKind::Transparent => self.build_scope(scope, transparent_children(node)),
            CursorKind::Skipped => {
                tracing::trace!(kind = %node.kind(), line = start_line(node), "skipping cursor");
                Ok(())
            }
            CursorKind::Error => Ok(()),
            CursorKind::Unsupported => {
                self.unsupported(node.kind().as_ref(), start_line(node));
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    fn entity<D: Doc>(
        name: impl Into<String>,
        kind: EntityKind,
        node: &Node<'_, D>,
        pending: &Pending,
    ) -> Entity {
        let (start_byte, line) = pending
            .location
            .unwrap_or_else(|| (node.range().start, start_line(node)));
        Entity {
            name: name.into(),
            full_name: String::new(),
            unique_name: String::new(),
            location: SourceLocation {
                start_byte,
                end_byte: node.range().end,
                start_line: line,
                end_line: end_line(node),
            },
            template_parameters: pending.template.clone(),
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Add `entity` under `scope`, or merge it into an earlier declaration.
    fn add(&mut self, scope: Option<EntityId>, entity: Entity) -> EntityId {
        match self.redeclared(scope, &entity) {
            Some(existing) => {
                self.merge(existing, entity);
                existing
            }
            None => self.arena.alloc(entity, scope),
        }
    }

    fn redeclared(&self, scope: Option<EntityId>, entity: &Entity) -> Option<EntityId> {
        let is_namespace = matches!(entity.kind, EntityKind::Namespace { .. });
        if !entity.has_unique_name() && !is_namespace {
            return None;
        }
        self.arena.children(scope).iter().copied().find(|id| {
            let other = self.arena.get(*id);
            other.name == entity.name
                && other.signature() == entity.signature()
                && mem::discriminant(&other.kind) == mem::discriminant(&entity.kind)
                && !conflicts(other, entity)
        })
    }

    fn merge(&mut self, id: EntityId, incoming: Entity) {
        let existing = self.arena.get_mut(id);
        if existing.template_parameters.is_none() {
            existing.template_parameters = incoming.template_parameters.clone();
        }
        if let (Some(new), Some(old)) = (incoming.function(), existing.function_mut()) {
            if new.definition.is_definition() && !old.definition.is_definition() {
                old.definition = new.definition;
            }
            return;
        }
        match (&mut existing.kind, incoming.kind) {
            (EntityKind::Class(old), EntityKind::Class(new)) if new.is_definition => {
                *old = new;
                existing.location = incoming.location;
            }
            (EntityKind::Enum(old), EntityKind::Enum(new)) if new.is_definition => {
                *old = new;
                existing.location = incoming.location;
            }
            (EntityKind::Variable(old), EntityKind::Variable(new)) => {
                if new.initializer.is_some() {
                    old.initializer = new.initializer;
                }
                old.is_static |= new.is_static;
                old.is_constexpr |= new.is_constexpr;
            }
            _ => {}
        }
    }

    fn add_hints(&mut self, id: EntityId, hints: Hints) {
        let entry = self.hints.entry(id).or_default();
        *entry = entry.merge(hints);
    }

    // -----------------------------------------------------------------------
    // Scopes and diagnostics
    // -----------------------------------------------------------------------

    /// The scope a written qualifier names, looked up from `scope` outwards.
    ///
    /// When nothing matches, the entity stays in `scope` and keeps the
    /// qualifier as part of its name (returned as the second element).
    fn qualified_target(
        &mut self,
        scope: Option<EntityId>,
        qualifier: &[String],
        line: u32,
    ) -> (Option<EntityId>, Option<String>) {
        if qualifier.is_empty() {
            return (scope, None);
        }
        if let Some(target) = resolve_scope(&self.arena, scope, qualifier) {
            return (target, None);
        }
        let written = qualifier.join("::");
        tracing::warn!(qualifier = %written, line, "unresolved qualifier");
        self.diagnostics.push(Diagnostic::warning(
            format!("cannot resolve qualifier `{written}`"),
            Some(line),
        ));
        (scope, Some(written))
    }

    fn member_class(&self, scope: Option<EntityId>) -> Option<&str> {
        let entity = self.arena.get(scope?);
        entity.as_class().map(|_| entity.name.as_str())
    }

    fn unsupported(&mut self, construct: &str, line: u32) {
        let err = ParserError::UnsupportedConstruct {
            construct: construct.to_string(),
            line,
        };
        tracing::warn!(%err, "skipping construct");
        self.diagnostics
            .push(Diagnostic::warning(err.to_string(), Some(line)));
    }
}

/// Two definitions of one entity, or two templates with different
/// parameter lists: kept apart so the unique name assigner reports them.
fn conflicts(existing: &Entity, incoming: &Entity) -> bool {
    let both_defined = match (&existing.kind, &incoming.kind) {
        (EntityKind::Class(old), EntityKind::Class(new)) => old.is_definition && new.is_definition,
        (EntityKind::Enum(old), EntityKind::Enum(new)) => old.is_definition && new.is_definition,
        _ => existing
            .function()
            .zip(incoming.function())
            .is_some_and(|(old, new)| old.definition.provides_body() && new.definition.provides_body()),
    };
    let heads_differ = match (&existing.template_parameters, &incoming.template_parameters) {
        (Some(old), Some(new)) => template_parameter_kinds(old) != template_parameter_kinds(new),
        _ => false,
    };
    both_defined || heads_differ
}
