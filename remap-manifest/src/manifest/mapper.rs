//! The `[mappers.*]`, `[helpers.*]` and `[factories.*]` tables.

use indexmap::IndexMap;
use remap_ir::{
    CheckSeverity, EnumNaming, FactoryStyle, InjectionStyle, MapperShape, MappingOption,
    NullabilityPolicy,
};
use serde::Deserialize;

use super::TypeExpr;

/// A mapper to generate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MapperDef {
    #[serde(default)]
    pub shape: MapperShape,

    /// Mappers whose declared functions this one may call
    #[serde(default)]
    pub includes: Vec<String>,

    /// Extra `use` paths for the generated file
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub injection: InjectionStyle,

    /// Scope name, only with `injection = "scoped"`
    pub scope: Option<String>,

    #[serde(default)]
    pub nullability: NullabilityPolicy,

    #[serde(default)]
    pub enum_compliance: CheckSeverity,

    #[serde(default)]
    pub enum_source_naming: EnumNaming,

    #[serde(default)]
    pub enum_target_naming: EnumNaming,

    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

/// A hand-written mapper. Its functions are callable but never generated.
#[derive(Debug, Clone, Deserialize)]
pub struct HelperDef {
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

/// A `[[mappers.X.functions]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionDef {
    pub name: String,

    /// Parameter name to type, in declaration order
    #[serde(default)]
    pub params: IndexMap<String, TypeExpr>,

    pub returns: Option<TypeExpr>,

    /// The body is written by hand
    #[serde(default)]
    pub implemented: bool,

    #[serde(default)]
    pub mappings: Vec<FieldMappingDef>,

    #[serde(default)]
    pub enum_mappings: Vec<EnumMappingDef>,
}

/// A field override, `{ target = "...", source = "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldMappingDef {
    /// Target member; unset applies to every member without its own entry
    pub target: Option<String>,
    /// Dotted source path
    pub source: Option<String>,
    /// Verbatim expression
    pub expression: Option<String>,
    pub nullability: Option<NullabilityPolicy>,
    #[serde(default)]
    pub inherit: bool,
    #[serde(default)]
    pub options: Vec<MappingOption>,
}

/// An enum entry override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnumMappingDef {
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_naming: Option<EnumNaming>,
    pub target_naming: Option<EnumNaming>,
    pub compliance: Option<CheckSeverity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactoryDef {
    #[serde(default)]
    pub mappers: Vec<String>,
    #[serde(default)]
    pub style: FactoryStyle,
}
