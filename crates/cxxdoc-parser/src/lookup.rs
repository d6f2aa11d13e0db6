//! Name lookup of namespaces and classes by written qualifier.
//!
//! Used for out-of-class definitions (`void foo::bar() {}`) and for base
//! class names. Lookup starts in the given scope and moves outwards; members
//! of anonymous and inline namespaces are visible in the enclosing scope.

use cxxdoc_core::{EntityArena, EntityId, EntityKind};

use crate::type_name::strip_template_args;

/// Split a written name such as `::ns::base<int>` into `["", "ns", "base"]`.
#[must_use]
pub fn split_path(name: &str) -> Vec<String> {
    strip_template_args(name)
        .split("::")
        .map(str::to_string)
        .collect()
}

/// The scope named by `path`, searched from `from` outwards.
///
/// A leading empty component anchors the search at the global scope.
/// Returns `None` if nothing matches; `Some(None)` is the global scope.
#[must_use]
pub fn resolve_scope(
    arena: &EntityArena,
    from: Option<EntityId>,
    path: &[String],
) -> Option<Option<EntityId>> {
    if let Some((first, rest)) = path.split_first()
        && first.is_empty()
    {
        return descend(arena, None, rest);
    }
    let mut current = from;
    loop {
        if let Some(found) = descend(arena, current, path) {
            return Some(found);
        }
        current = arena.get(current?).parent;
    }
}

/// The class named by `name`, searched from `from` outwards.
#[must_use]
pub fn resolve_class(arena: &EntityArena, from: Option<EntityId>, name: &str) -> Option<EntityId> {
    resolve_scope(arena, from, &split_path(name))
        .flatten()
        .filter(|id| arena.get(*id).as_class().is_some())
}

fn descend(
    arena: &EntityArena,
    start: Option<EntityId>,
    path: &[String],
) -> Option<Option<EntityId>> {
    let mut current = start;
    for component in path {
        current = Some(find_scope(arena, current, component)?);
    }
    Some(current)
}

/// A namespace or class called `name` directly inside `scope`.
fn find_scope(arena: &EntityArena, scope: Option<EntityId>, name: &str) -> Option<EntityId> {
    let children = arena.children(scope);
    children
        .iter()
        .copied()
        .find(|id| {
            let entity = arena.get(*id);
            let is_scope = matches!(entity.kind, EntityKind::Namespace { .. } | EntityKind::Class(_));
            is_scope && !entity.name.is_empty() && strip_template_args(&entity.name) == name
        })
        .or_else(|| {
            children
                .iter()
                .copied()
                .filter(|id| is_transparent_namespace(arena, *id))
                .find_map(|id| find_scope(arena, Some(id), name))
        })
}

fn is_transparent_namespace(arena: &EntityArena, id: EntityId) -> bool {
    let entity = arena.get(id);
    matches!(entity.kind, EntityKind::Namespace { is_inline } if is_inline || entity.name.is_empty())
}
