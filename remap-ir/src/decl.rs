//! Mapper, function and factory declarations.

use indexmap::IndexMap;
use remap_core::CaseConvention;
use serde::{Deserialize, Serialize};

use crate::{Member, TypeEnvironment, TypeRef};

/// Everything the engine needs for one generation pass.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub types: TypeEnvironment,
    /// Annotated mappers, in declaration order.
    pub mappers: IndexMap<String, MapperDecl>,
    /// Hand-written mappers that may be included but are never emitted.
    pub helpers: IndexMap<String, MapperDecl>,
    pub factories: Vec<FactoryDecl>,
}

/// The declaration shape of a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapperShape {
    #[default]
    Interface,
    Abstract,
    Open,
    Final,
}

impl MapperShape {
    /// Only declarations an implementation can be derived from may be mappers.
    pub fn is_extensible(&self) -> bool {
        !matches!(self, MapperShape::Final)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapperShape::Interface => "interface",
            MapperShape::Abstract => "abstract",
            MapperShape::Open => "open",
            MapperShape::Final => "final",
        }
    }
}

/// How a generated mapper is handed to the rest of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionStyle {
    #[default]
    None,
    Constructor,
    Scoped,
}

/// What to do when a nullable source feeds a non-null target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullabilityPolicy {
    /// Refuse to generate.
    #[default]
    Fail,
    /// Unwrap unconditionally.
    Unwrap,
    /// Raise a descriptive error at runtime.
    Raise,
}

/// Severity of an unmapped enum entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckSeverity {
    #[default]
    Error,
    Warning,
    Ignore,
}

/// Enum naming policy; `None` disables conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumNaming {
    #[default]
    None,
    UpperSnake,
    LowerSnake,
    UpperCamel,
    LowerCamel,
}

impl EnumNaming {
    pub fn convention(&self) -> Option<CaseConvention> {
        match self {
            EnumNaming::None => None,
            EnumNaming::UpperSnake => Some(CaseConvention::UpperSnake),
            EnumNaming::LowerSnake => Some(CaseConvention::LowerSnake),
            EnumNaming::UpperCamel => Some(CaseConvention::UpperCamel),
            EnumNaming::LowerCamel => Some(CaseConvention::LowerCamel),
        }
    }
}

/// Per-field null conversions that take precedence over the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingOption {
    NullBooleanToFalse,
    NullStringToEmpty,
}

/// Mapper-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapperDefaults {
    pub nullability: NullabilityPolicy,
    pub enum_compliance: CheckSeverity,
    pub enum_source_naming: EnumNaming,
    pub enum_target_naming: EnumNaming,
}

/// A declared mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperDecl {
    pub name: String,
    pub shape: MapperShape,
    /// Names of mappers whose declared functions may be called.
    pub includes: Vec<String>,
    pub imports: Vec<String>,
    pub injection: InjectionStyle,
    pub scope: Option<String>,
    pub defaults: MapperDefaults,
    pub functions: Vec<FunctionDecl>,
}

impl MapperDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: MapperShape::default(),
            includes: Vec::new(),
            imports: Vec::new(),
            injection: InjectionStyle::default(),
            scope: None,
            defaults: MapperDefaults::default(),
            functions: Vec::new(),
        }
    }

    pub fn include(mut self, name: impl Into<String>) -> Self {
        self.includes.push(name.into());
        self
    }

    pub fn function(mut self, function: FunctionDecl) -> Self {
        self.functions.push(function);
        self
    }
}

/// A function declared on a mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Member>,
    pub returns: Option<TypeRef>,
    /// A body is supplied by hand.
    pub implemented: bool,
    pub directives: Vec<Directive>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            implemented: false,
            directives: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Member::new(name, ty));
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn implemented(mut self) -> Self {
        self.implemented = true;
        self
    }

    pub fn directive(mut self, directive: impl Into<Directive>) -> Self {
        self.directives.push(directive.into());
        self
    }
}

/// An override attached to a mapping function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Field(FieldDirective),
    Enum(EnumDirective),
}

impl From<FieldDirective> for Directive {
    fn from(directive: FieldDirective) -> Self {
        Directive::Field(directive)
    }
}

impl From<EnumDirective> for Directive {
    fn from(directive: EnumDirective) -> Self {
        Directive::Enum(directive)
    }
}

/// How a target member gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Verbatim expression text.
    Expression(String),
    /// Dotted source path.
    Source(String),
    /// Only options and nullability are overridden.
    Options,
}

/// Override for one target member, or for every member when `target` is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDirective {
    pub target: Option<String>,
    pub rule: FieldRule,
    pub nullability: Option<NullabilityPolicy>,
    /// Passed down to functions synthesized on behalf of this one.
    pub inherit: bool,
    pub options: Vec<MappingOption>,
}

impl FieldDirective {
    fn with_rule(target: Option<String>, rule: FieldRule) -> Self {
        Self {
            target,
            rule,
            nullability: None,
            inherit: false,
            options: Vec::new(),
        }
    }

    pub fn source(target: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_rule(Some(target.into()), FieldRule::Source(path.into()))
    }

    pub fn expression(target: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::with_rule(Some(target.into()), FieldRule::Expression(expression.into()))
    }

    pub fn options(target: impl Into<String>) -> Self {
        Self::with_rule(Some(target.into()), FieldRule::Options)
    }

    pub fn catch_all() -> Self {
        Self::with_rule(None, FieldRule::Options)
    }

    pub fn nullability(mut self, policy: NullabilityPolicy) -> Self {
        self.nullability = Some(policy);
        self
    }

    pub fn option(mut self, option: MappingOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn inherited(mut self) -> Self {
        self.inherit = true;
        self
    }
}

/// Override for enum entry dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumDirective {
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_naming: Option<EnumNaming>,
    pub target_naming: Option<EnumNaming>,
    pub compliance: Option<CheckSeverity>,
}

impl EnumDirective {
    pub fn entry(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// The entry unmatched inputs fall back to.
    pub fn fallback(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn naming(mut self, source: EnumNaming, target: EnumNaming) -> Self {
        self.source_naming = Some(source);
        self.target_naming = Some(target);
        self
    }

    pub fn compliance(mut self, severity: CheckSeverity) -> Self {
        self.compliance = Some(severity);
        self
    }

    /// Neither side set: function-wide settings.
    pub fn is_function_level(&self) -> bool {
        self.source.is_none() && self.target.is_none()
    }

    /// Only the target set: the fallback entry.
    pub fn is_fallback(&self) -> bool {
        self.source.is_none() && self.target.is_some()
    }
}

/// How a factory hands out implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactoryStyle {
    /// One accessor per mapper on a factory type.
    #[default]
    Simple,
    /// Free provider functions taking dependencies as arguments.
    Module,
}

/// A factory over a list of annotated mappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryDecl {
    pub name: String,
    pub style: FactoryStyle,
    pub mappers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_directive_roles() {
        assert!(EnumDirective::default().is_function_level());
        assert!(EnumDirective::fallback("Unknown").is_fallback());
        let entry = EnumDirective::entry("THIRD", "Second");
        assert!(!entry.is_fallback());
        assert!(!entry.is_function_level());
    }

    #[test]
    fn test_enum_naming_convention() {
        assert_eq!(EnumNaming::None.convention(), None);
        assert_eq!(
            EnumNaming::UpperCamel.convention(),
            Some(CaseConvention::UpperCamel)
        );
    }

    #[test]
    fn test_shape_extensible() {
        assert!(MapperShape::Interface.is_extensible());
        assert!(MapperShape::Open.is_extensible());
        assert!(!MapperShape::Final.is_extensible());
    }

    #[test]
    fn test_function_builder() {
        let function = FunctionDecl::new("map")
            .param("dto", TypeRef::named("Dto"))
            .returns(TypeRef::named("Model"))
            .directive(FieldDirective::source("nestedId", "dto.nestedID"));
        assert_eq!(function.params[0].name, "dto");
        assert!(!function.implemented);
        assert!(matches!(
            &function.directives[0],
            Directive::Field(FieldDirective { rule: FieldRule::Source(path), .. }) if path == "dto.nestedID"
        ));
    }
}
