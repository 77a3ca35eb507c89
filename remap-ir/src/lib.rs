//! Intermediate representation for the remap mapper generator.
//!
//! This crate holds the semantic type model the resolution engine works
//! against, and the mapper declarations it resolves.
//!
//! # Architecture
//!
//! ```text
//! remap.toml → remap-manifest (parsing) → remap-ir (types + declarations) → codegen
//! ```
//!
//! The engine never inspects declarations directly. It asks a [`TypeModel`]
//! for members, assignability and capability probes, and [`TypeEnvironment`]
//! is the table-backed implementation built from the manifest.

mod decl;
mod model;
mod types;

pub use decl::{
    CheckSeverity, Declarations, Directive, EnumDirective, EnumNaming, FactoryDecl, FactoryStyle,
    FieldDirective, FieldRule, FunctionDecl, InjectionStyle, MapperDecl, MapperDefaults,
    MapperShape, MappingOption, NullabilityPolicy,
};
pub use model::{BUILTIN_TYPES, TypeEnvironment, TypeModel};
pub use types::{CollectionShape, DeclKind, Member, MemberStrategy, TypeDecl, TypeRef};
