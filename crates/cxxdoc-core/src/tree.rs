//! Arena storage for the entity tree.
//!
//! Entities live in a flat arena and refer to each other through stable
//! [`EntityId`] handles. Parents own their children (a strict tree); base
//! classes and overrides are never stored as handles, they are looked up by
//! name once the structure is complete.
//!
//! Construction goes through the mutable [`EntityArena`]; [`EntityArena::freeze`]
//! turns it into the read-only [`EntityTree`] handed to consumers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Entity;

/// Stable handle of an entity inside one tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mutable arena used while a translation unit is being built.
#[derive(Debug, Clone, Default)]
pub struct EntityArena {
    entities: Vec<Entity>,
    roots: Vec<EntityId>,
}

impl EntityArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entity` as the last child of `parent` (or as a root).
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` entities.
    pub fn alloc(&mut self, mut entity: Entity, parent: Option<EntityId>) -> EntityId {
        let id = EntityId(u32::try_from(self.entities.len()).expect("entity arena overflow"));
        entity.parent = parent;
        self.entities.push(entity);
        match parent {
            Some(p) => self.entities[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    /// Children of `parent`, or the roots for `None`.
    #[must_use]
    pub fn children(&self, parent: Option<EntityId>) -> &[EntityId] {
        match parent {
            Some(p) => &self.entities[p.index()].children,
            None => &self.roots,
        }
    }

    /// All handles in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + use<> {
        let len = u32::try_from(self.entities.len()).unwrap_or(u32::MAX);
        (0..len).map(EntityId)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn freeze(self) -> EntityTree {
        EntityTree {
            entities: self.entities,
            roots: self.roots,
        }
    }
}

/// Read-only entity tree of one translation unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntityTree {
    entities: Vec<Entity>,
    roots: Vec<EntityId>,
}

impl EntityTree {
    /// Top-level entities in source order.
    #[must_use]
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
        self.get(id).children.iter().map(|c| self.get(*c))
    }

    #[must_use]
    pub fn parent(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).parent.map(|p| self.get(p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Pre-order, source-ordered traversal.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: self.roots.iter().rev().map(|id| (*id, 0)).collect(),
        }
    }

    /// Call `f` for every entity, parents before children, in source order.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&Entity),
    {
        for (_, entity, _) in self.iter() {
            f(entity);
        }
    }

    /// Like [`visit`](Self::visit) but with the nesting depth and the
    /// option to skip a subtree by returning [`Walk::SkipChildren`].
    pub fn walk<F>(&self, mut f: F)
    where
        F: FnMut(&Entity, usize) -> Walk,
    {
        fn go<F: FnMut(&Entity, usize) -> Walk>(
            tree: &EntityTree,
            ids: &[EntityId],
            depth: usize,
            f: &mut F,
        ) {
            for id in ids {
                let entity = tree.get(*id);
                if f(entity, depth) == Walk::Continue {
                    go(tree, &entity.children, depth + 1, f);
                }
            }
        }
        go(self, &self.roots, 0, &mut f);
    }

    /// First entity (pre-order) with the given unique name.
    #[must_use]
    pub fn find(&self, unique_name: &str) -> Option<&Entity> {
        self.iter()
            .map(|(_, e, _)| e)
            .find(|e| e.unique_name == unique_name)
    }

    /// Handle of the first entity (pre-order) with the given unique name.
    #[must_use]
    pub fn find_id(&self, unique_name: &str) -> Option<EntityId> {
        self.iter()
            .find(|(_, e, _)| e.unique_name == unique_name)
            .map(|(id, _, _)| id)
    }
}

/// Return value of a [`EntityTree::walk`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

/// Pre-order iterator yielding `(id, entity, depth)`.
pub struct Iter<'t> {
    tree: &'t EntityTree,
    stack: Vec<(EntityId, usize)>,
}

impl<'t> Iterator for Iter<'t> {
    type Item = (EntityId, &'t Entity, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let entity = self.tree.get(id);
        self.stack
            .extend(entity.children.iter().rev().map(|c| (*c, depth + 1)));
        Some((id, entity, depth))
    }
}
