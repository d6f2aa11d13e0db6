//! # cxxdoc-core
//!
//! Semantic model of a C++ translation unit, shared by every cxxdoc crate:
//! - Entity tagged union (namespaces, classes, functions, variables, enums, aliases)
//! - Function signature, member qualifier and virtual classification types
//! - Arena-backed entity tree with stable handles and read-only traversal
//! - Translation-unit result with diagnostics
//!
//! All types derive `Serialize`, `Deserialize` and `JsonSchema` so a built tree
//! can be handed to an external renderer as JSON.

pub mod entities;
pub mod enums;
pub mod tree;
pub mod unit;

pub use entities::{Entity, EntityKind};
pub use tree::{EntityArena, EntityId, EntityTree};
pub use unit::{Diagnostic, TranslationUnit};
