//! Second pass: virtual classification of member-like entities.
//!
//! Runs after the whole tree is built, so base classes declared anywhere in
//! the unit are available. Classes are resolved bases-first; a member is
//! `Overridden` if a virtual member with the same name, parameter types and
//! qualifiers exists in any transitive base. Signature matching decides;
//! the written `override`/`final` only corroborate it.

use std::collections::{HashMap, HashSet};

use cxxdoc_core::entities::{Entity, MemberQualifiers, Virtuality};
use cxxdoc_core::enums::VirtualKind;
use cxxdoc_core::{Diagnostic, EntityArena, EntityId, EntityKind};

use crate::lookup::resolve_class;
use crate::qualifiers::Hints;

/// What two members must share for one to override the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum OverrideKey {
    Destructor,
    Member {
        name: String,
        parameters: String,
        qualifiers: MemberQualifiers,
    },
}

impl OverrideKey {
    fn of(entity: &Entity) -> Option<Self> {
        let (signature, qualifiers) = match &entity.kind {
            EntityKind::Destructor(_) => return Some(Self::Destructor),
            EntityKind::MemberFunction(f) => (&f.signature, f.qualifiers),
            EntityKind::ConversionOp(f) => (&f.signature, f.qualifiers),
            _ => return None,
        };
        let parameters = signature
            .signature
            .strip_suffix(qualifiers.suffix().as_str())
            .unwrap_or(&signature.signature)
            .to_string();
        Some(Self::Member {
            name: entity.name.clone(),
            parameters,
            qualifiers,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InProgress,
    Done,
}

pub struct Resolver<'a> {
    arena: &'a mut EntityArena,
    hints: &'a HashMap<EntityId, Hints>,
    report_mismatch: bool,
    state: HashMap<EntityId, State>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        arena: &'a mut EntityArena,
        hints: &'a HashMap<EntityId, Hints>,
        report_mismatch: bool,
    ) -> Self {
        Self {
            arena,
            hints,
            report_mismatch,
            state: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Classify every member of every class; returns mismatch warnings.
    pub fn run(mut self) -> Vec<Diagnostic> {
        let classes: Vec<EntityId> = self
            .arena
            .ids()
            .filter(|id| self.arena.get(*id).as_class().is_some())
            .collect();
        for class in classes {
            self.resolve(class);
        }
        self.diagnostics
    }

    fn resolve(&mut self, class: EntityId) {
        if self.state.contains_key(&class) {
            return;
        }
        self.state.insert(class, State::InProgress);

        let direct = self.direct_bases(class);
        for base in &direct {
            if self.state.get(base) == Some(&State::InProgress) {
                tracing::warn!(class = %self.arena.get(class).name, "cyclic base class chain");
                continue;
            }
            self.resolve(*base);
        }

        let inherited = self.inherited_virtuals(class);
        let members: Vec<EntityId> = self.arena.get(class).children.clone();
        for member in members {
            self.classify(member, &inherited);
        }
        self.state.insert(class, State::Done);
    }

    fn direct_bases(&self, class: EntityId) -> Vec<EntityId> {
        let entity = self.arena.get(class);
        let Some(data) = entity.as_class() else {
            return Vec::new();
        };
        data.bases
            .iter()
            .filter_map(|base| {
                let found = resolve_class(self.arena, entity.parent, &base.name);
                if found.is_none() {
                    tracing::debug!(class = %entity.name, base = %base.name, "base class not in unit");
                }
                found
            })
            .filter(|id| *id != class)
            .collect()
    }

    /// Keys of the virtual members of all transitive bases, depth-first in
    /// declaration order.
    fn inherited_virtuals(&self, class: EntityId) -> HashSet<OverrideKey> {
        let mut keys = HashSet::new();
        let mut visited = HashSet::from([class]);
        let mut stack: Vec<EntityId> = self.direct_bases(class).into_iter().rev().collect();
        while let Some(base) = stack.pop() {
            if !visited.insert(base) {
                continue;
            }
            for member in &self.arena.get(base).children {
                let entity = self.arena.get(*member);
                if entity.virtuality().is_some_and(Virtuality::is_virtual)
                    && let Some(key) = OverrideKey::of(entity)
                {
                    keys.insert(key);
                }
            }
            stack.extend(self.direct_bases(base).into_iter().rev());
        }
        keys
    }

    fn classify(&mut self, member: EntityId, inherited: &HashSet<OverrideKey>) {
        let Some(key) = OverrideKey::of(self.arena.get(member)) else {
            return;
        };
        let hints = self.hints.get(&member).copied().unwrap_or_default();
        let matched = inherited.contains(&key);

        let kind = if matched {
            VirtualKind::Overridden
        } else if hints.is_virtual || hints.is_pure {
            VirtualKind::New
        } else if hints.is_static {
            VirtualKind::Static
        } else {
            VirtualKind::None
        };
        let is_virtual = matches!(kind, VirtualKind::New | VirtualKind::Overridden);

        let entity = self.arena.get_mut(member);
        if let Some(virtuality) = entity.virtuality_mut() {
            *virtuality = Virtuality {
                kind,
                is_pure: is_virtual && hints.is_pure,
                is_final: is_virtual && hints.is_final,
            };
        }

        let unsupported_override = hints.is_override && !matched;
        let unsupported_final = hints.is_final && !is_virtual;
        if self.report_mismatch && (unsupported_override || unsupported_final) {
            let keyword = if unsupported_override { "override" } else { "final" };
            let message = format!(
                "`{}` is marked {keyword} but overrides no virtual base member",
                entity.name
            );
            tracing::warn!(member = %entity.name, keyword, "virt-specifier without a virtual base");
            self.diagnostics
                .push(Diagnostic::warning(message, Some(entity.location.start_line)));
        }
    }
}
