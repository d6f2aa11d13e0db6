//! Scope-qualified and unique names.
//!
//! `full_name` joins the names of all enclosing scopes with `::`, skipping
//! anonymous namespaces and classes. `unique_name` is `full_name` directly
//! followed by the signature, so overloads differ and everything else keeps
//! its full name.

use std::collections::HashSet;

use cxxdoc_core::{EntityArena, EntityId};

use crate::error::ParserError;

/// `prefix::name`, dropping whichever side is empty.
#[must_use]
pub fn join_scope(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}::{name}"),
    }
}

/// Recompute `full_name` and `unique_name` of every entity, top-down, and
/// reject siblings that share a unique name.
///
/// # Errors
/// Returns [`ParserError::NameCollision`] for the first duplicate found.
pub fn assign(arena: &mut EntityArena) -> Result<(), ParserError> {
    let mut stack: Vec<(Option<EntityId>, String)> = vec![(None, String::new())];
    while let Some((scope, prefix)) = stack.pop() {
        let children = arena.children(scope).to_vec();
        let mut seen = HashSet::with_capacity(children.len());
        for id in children.iter().rev() {
            let entity = arena.get_mut(*id);
            entity.full_name = join_scope(&prefix, &entity.name);
            entity.unique_name = format!("{}{}", entity.full_name, entity.signature());
            if entity.has_unique_name() && !seen.insert(entity.unique_name.clone()) {
                return Err(ParserError::NameCollision {
                    scope: if prefix.is_empty() {
                        "global scope".to_string()
                    } else {
                        prefix
                    },
                    unique_name: entity.unique_name.clone(),
                });
            }
            stack.push((Some(*id), entity.full_name.clone()));
        }
    }
    Ok(())
}
