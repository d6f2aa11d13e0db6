use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A namespace-scope variable or a data member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Variable {
    /// Canonical type text.
    pub ty: String,
    /// Initializer as written: `4` for `= 4`, `{4}` or `(4)` for direct forms.
    pub initializer: Option<String>,
    pub is_static: bool,
    pub is_constexpr: bool,
    pub is_mutable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    /// Explicit value as written.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Enum {
    /// `enum class` / `enum struct`.
    pub is_scoped: bool,
    pub underlying_type: Option<String>,
    pub enumerators: Vec<Enumerator>,
    pub is_definition: bool,
}
