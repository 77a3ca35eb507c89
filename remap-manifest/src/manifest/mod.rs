//! Manifest types and parsing for remap.toml files.

mod file;
mod mapper;
mod parse;
mod type_expr;
mod types;
mod validate;

use indexmap::IndexMap;
use serde::Deserialize;

pub use file::RemapToml;
pub use mapper::{EnumMappingDef, FactoryDef, FieldMappingDef, FunctionDef, HelperDef, MapperDef};
pub use parse::parse_manifest;
pub use type_expr::TypeExpr;
pub use types::{TypeDef, TypeKind};
pub use validate::ParseContext;

/// Root manifest for remap.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub project: ProjectConfig,

    /// Types mapped between, by name
    #[serde(default)]
    pub types: IndexMap<String, TypeDef>,

    /// Mappers to generate
    #[serde(default)]
    pub mappers: IndexMap<String, MapperDef>,

    /// Hand-written mappers other mappers may include
    #[serde(default)]
    pub helpers: IndexMap<String, HelperDef>,

    #[serde(default)]
    pub factories: IndexMap<String, FactoryDef>,
}

/// The `[project]` table
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

impl Manifest {
    /// Number of functions declared across all mappers.
    pub fn function_count(&self) -> usize {
        self.mappers.values().map(|m| m.functions.len()).sum()
    }
}
