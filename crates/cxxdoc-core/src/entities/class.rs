use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Access, ClassKey};

/// A base-class reference as written in the base clause.
///
/// The base is looked up by name once the whole tree exists; no handle is
/// captured here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BaseClass {
    /// Spelling of the base, e.g. `ns::base<int>`.
    pub name: String,
    pub access: Access,
    pub is_virtual: bool,
}

/// A class, struct or union. Members are the owning entity's children.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Class {
    pub key: ClassKey,
    pub bases: Vec<BaseClass>,
    pub is_final: bool,
    /// False for a forward declaration that was never completed.
    pub is_definition: bool,
}
