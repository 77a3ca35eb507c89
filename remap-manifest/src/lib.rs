// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Parsing and validation of `remap.toml`.
//!
//! The manifest is the declarative description of the types a project maps
//! between and the mappers to generate. Parsing keeps table order, so the
//! generated output follows the order things are written in.

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    EnumMappingDef, FactoryDef, FieldMappingDef, FunctionDef, HelperDef, Manifest, MapperDef,
    ParseContext, ProjectConfig, RemapToml, TypeDef, TypeExpr, TypeKind, parse_manifest,
};
