//! Lower phase - turns the manifest into IR declarations.

use eyre::Result;
use remap_ir::{
    DeclKind, Declarations, Directive, EnumDirective, FactoryDecl, FieldDirective, FieldRule,
    FunctionDecl, MapperDecl, MapperDefaults, Member, TypeDecl,
};
use remap_manifest::{
    EnumMappingDef, FieldMappingDef, FunctionDef, HelperDef, Manifest, MapperDef, TypeDef, TypeKind,
};

use crate::pipeline::{CompilationContext, Phase};

pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn description(&self) -> &'static str {
        "Transform the manifest into mapper declarations"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        ctx.declarations = Some(lower_manifest(&ctx.manifest));
        Ok(())
    }
}

/// Lower a manifest into declarations, keeping manifest order.
pub fn lower_manifest(manifest: &Manifest) -> Declarations {
    let mut decls = Declarations::default();

    for (name, ty) in &manifest.types {
        decls.types.insert(lower_type(name, ty));
    }
    for (name, mapper) in &manifest.mappers {
        decls.mappers.insert(name.clone(), lower_mapper(name, mapper));
    }
    for (name, helper) in &manifest.helpers {
        decls.helpers.insert(name.clone(), lower_helper(name, helper));
    }
    decls.factories = manifest
        .factories
        .iter()
        .map(|(name, factory)| FactoryDecl {
            name: name.clone(),
            style: factory.style,
            mappers: factory.mappers.clone(),
        })
        .collect();

    decls
}

fn lower_type(name: &str, ty: &TypeDef) -> TypeDecl {
    let kind = match ty.kind {
        TypeKind::Data => DeclKind::Data,
        TypeKind::Class => DeclKind::Class,
        TypeKind::Interface => DeclKind::Interface,
        TypeKind::Enum => DeclKind::Enum,
    };
    let mut decl = TypeDecl::new(name, kind)
        .params(ty.params.iter().cloned())
        .entries(ty.entries.iter().cloned());
    decl.supertypes = ty.supertypes.clone();
    decl.fields = ty
        .fields
        .iter()
        .map(|(field, expr)| {
            let member = Member::new(field.clone(), expr.type_ref().clone());
            if ty.defaults.contains(field) {
                member.defaulted()
            } else {
                member
            }
        })
        .collect();
    decl
}

fn lower_mapper(name: &str, mapper: &MapperDef) -> MapperDecl {
    MapperDecl {
        name: name.into(),
        shape: mapper.shape,
        includes: mapper.includes.clone(),
        imports: mapper.imports.clone(),
        injection: mapper.injection,
        scope: mapper.scope.clone(),
        defaults: MapperDefaults {
            nullability: mapper.nullability,
            enum_compliance: mapper.enum_compliance,
            enum_source_naming: mapper.enum_source_naming,
            enum_target_naming: mapper.enum_target_naming,
        },
        functions: mapper.functions.iter().map(lower_function).collect(),
    }
}

/// Helpers are hand-written: every function is implemented.
fn lower_helper(name: &str, helper: &HelperDef) -> MapperDecl {
    let mut decl = MapperDecl::new(name);
    decl.functions = helper
        .functions
        .iter()
        .map(|function| lower_function(function).implemented())
        .collect();
    decl
}

fn lower_function(function: &FunctionDef) -> FunctionDecl {
    let mut decl = FunctionDecl::new(&function.name);
    for (param, expr) in &function.params {
        decl = decl.param(param.clone(), expr.type_ref().clone());
    }
    if let Some(returns) = &function.returns {
        decl = decl.returns(returns.type_ref().clone());
    }
    decl.implemented = function.implemented;
    decl.directives = function
        .mappings
        .iter()
        .map(lower_field_mapping)
        .chain(function.enum_mappings.iter().map(lower_enum_mapping))
        .collect();
    decl
}

fn lower_field_mapping(mapping: &FieldMappingDef) -> Directive {
    let rule = match (&mapping.expression, &mapping.source) {
        (Some(expression), _) => FieldRule::Expression(expression.clone()),
        (None, Some(source)) => FieldRule::Source(source.clone()),
        (None, None) => FieldRule::Options,
    };
    Directive::Field(FieldDirective {
        target: mapping.target.clone(),
        rule,
        nullability: mapping.nullability,
        inherit: mapping.inherit,
        options: mapping.options.clone(),
    })
}

fn lower_enum_mapping(mapping: &EnumMappingDef) -> Directive {
    Directive::Enum(EnumDirective {
        source: mapping.source.clone(),
        target: mapping.target.clone(),
        source_naming: mapping.source_naming,
        target_naming: mapping.target_naming,
        compliance: mapping.compliance,
    })
}

#[cfg(test)]
mod tests {
    use remap_ir::{MappingOption, NullabilityPolicy, TypeModel, TypeRef};

    use super::*;

    fn manifest() -> Manifest {
        toml::from_str(
            r#"
            [project]
            name = "test"

            [types.Model]
            kind = "class"
            fields = { id = "Long", tags = "List<String>?" }
            defaults = ["tags"]

            [types.Status]
            kind = "enum"
            entries = ["Active", "Unknown"]

            [mappers.SampleMapper]
            nullability = "unwrap"
            includes = ["DateUtils"]

            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto", extra = "Long" }
            returns = "Model"
            mappings = [
                { target = "id", source = "dto.identifier" },
                { options = ["null-string-to-empty"], inherit = true },
            ]
            enum-mappings = [{ target = "Unknown" }]

            [[helpers.DateUtils.functions]]
            name = "parse"
            params = { text = "String" }
            returns = "Long"

            [factories.Mappers]
            mappers = ["SampleMapper"]
            style = "module"
        "#,
        )
        .expect("Failed to parse test manifest")
    }

    #[test]
    fn test_lower_phase() {
        let mut ctx = CompilationContext::new(manifest());
        assert!(ctx.declarations.is_none());

        LowerPhase.run(&mut ctx).expect("lower should succeed");

        let decls = ctx.declarations.as_ref().unwrap();
        assert_eq!(decls.mappers.len(), 1);
        assert_eq!(decls.helpers.len(), 1);
        assert_eq!(decls.factories[0].mappers, vec!["SampleMapper"]);
    }

    #[test]
    fn test_lower_types() {
        let decls = lower_manifest(&manifest());
        let model = decls.types.declaration("Model").unwrap();
        assert_eq!(model.kind, DeclKind::Class);
        assert!(!model.fields[0].has_default);
        assert!(model.fields[1].has_default);
        assert_eq!(
            model.fields[1].ty,
            TypeRef::generic("List", vec![TypeRef::named("String")]).optional()
        );
        assert!(decls.types.is_enum(&TypeRef::named("Status")));
    }

    #[test]
    fn test_lower_functions_and_directives() {
        let decls = lower_manifest(&manifest());
        let mapper = &decls.mappers["SampleMapper"];
        assert_eq!(mapper.defaults.nullability, NullabilityPolicy::Unwrap);

        let function = &mapper.functions[0];
        let params: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["dto", "extra"]);
        assert_eq!(
            function.directives,
            vec![
                FieldDirective::source("id", "dto.identifier").into(),
                FieldDirective::catch_all()
                    .option(MappingOption::NullStringToEmpty)
                    .inherited()
                    .into(),
                EnumDirective::fallback("Unknown").into(),
            ]
        );
    }

    #[test]
    fn test_helpers_are_implemented() {
        let decls = lower_manifest(&manifest());
        assert!(decls.helpers["DateUtils"].functions.iter().all(|f| f.implemented));
    }
}
