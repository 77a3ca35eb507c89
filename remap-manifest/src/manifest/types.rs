//! The `[types.*]` tables.

use indexmap::IndexMap;
use serde::Deserialize;

use super::TypeExpr;

/// What a declared type is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Fields are constructor parameters.
    Data,
    /// Fields are settable properties.
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeDef {
    pub kind: TypeKind,

    /// Field name to type expression, in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, TypeExpr>,

    /// Fields that have a default value
    #[serde(default)]
    pub defaults: Vec<String>,

    #[serde(default)]
    pub supertypes: Vec<String>,

    /// Generic parameter names
    #[serde(default)]
    pub params: Vec<String>,

    /// Enum entries
    #[serde(default)]
    pub entries: Vec<String>,
}
