//! Manifest parsing from files and strings.

use std::{collections::HashSet, path::Path, str::FromStr};

use remap_ir::{BUILTIN_TYPES, InjectionStyle};

use super::{FunctionDef, Manifest, TypeDef, TypeExpr, TypeKind, validate::ParseContext};
use crate::{Error, Result, error::SourceContext};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "remap.toml")
    }
}

impl Manifest {
    /// Parse a remap.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a remap.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, &ParseContext::new(content, filename))?;
    Ok(manifest)
}

/// Names a type expression may refer to.
struct KnownTypes<'m> {
    names: HashSet<&'m str>,
}

impl<'m> KnownTypes<'m> {
    fn new(manifest: &'m Manifest) -> Self {
        let mut names: HashSet<&str> = BUILTIN_TYPES.iter().copied().collect();
        names.extend(manifest.types.keys().map(String::as_str));
        Self { names }
    }

    fn check(&self, expr: &TypeExpr, params: &[String], ctx: &ParseContext, kind: &str) -> Result<()> {
        for name in expr.names() {
            if !self.names.contains(name) && !params.iter().any(|p| p == name) {
                return ctx.unknown_type(name, kind);
            }
        }
        Ok(())
    }
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &Manifest, ctx: &ParseContext) -> Result<()> {
    let known = KnownTypes::new(manifest);

    for (name, ty) in &manifest.types {
        ctx.validate_name(name, "type")?;
        validate_type(name, ty, &ctx.push(name), &known)?;
    }

    for (name, mapper) in &manifest.mappers {
        ctx.validate_name(name, "mapper")?;
        let mapper_ctx = ctx.push(name);

        match (mapper.injection, &mapper.scope) {
            (InjectionStyle::Scoped, None) => {
                return mapper_ctx.fail(
                    format!("mapper '{name}' uses scoped injection but sets no scope"),
                    name,
                );
            }
            (InjectionStyle::None | InjectionStyle::Constructor, Some(scope)) => {
                return mapper_ctx.fail(
                    format!("scope '{scope}' is only used with injection = \"scoped\""),
                    scope,
                );
            }
            _ => {}
        }

        for function in &mapper.functions {
            validate_function(function, &mapper_ctx, &known)?;
        }
    }

    for (name, helper) in &manifest.helpers {
        ctx.validate_name(name, "helper")?;
        if manifest.mappers.contains_key(name) {
            return ctx.fail(
                format!("'{name}' is declared both as a mapper and as a helper"),
                name,
            );
        }
        let helper_ctx = ctx.push(name);
        for function in &helper.functions {
            validate_function(function, &helper_ctx, &known)?;
        }
    }

    for name in manifest.factories.keys() {
        ctx.validate_name(name, "factory")?;
    }

    Ok(())
}

fn validate_type(name: &str, ty: &TypeDef, ctx: &ParseContext, known: &KnownTypes) -> Result<()> {
    for param in &ty.params {
        ctx.validate_name(param, "type parameter")?;
    }

    for (field, expr) in &ty.fields {
        ctx.validate_name(field, "field")?;
        known.check(expr, &ty.params, &ctx.push(field), "field type")?;
    }

    for default in &ty.defaults {
        if !ty.fields.contains_key(default) {
            return ctx.fail(
                format!("default '{default}' is not a field of '{name}'"),
                default,
            );
        }
    }

    for supertype in &ty.supertypes {
        if !known.names.contains(supertype.as_str()) {
            return ctx.unknown_type(supertype, "supertypes");
        }
    }

    match ty.kind {
        TypeKind::Enum => {
            if ty.entries.is_empty() {
                return ctx.fail(format!("enum '{name}' declares no entries"), name);
            }
            if !ty.fields.is_empty() {
                return ctx.fail(format!("enum '{name}' cannot declare fields"), name);
            }
            for entry in &ty.entries {
                ctx.validate_name(entry, "enum entry")?;
            }
        }
        _ if !ty.entries.is_empty() => {
            return ctx.fail(format!("only enums declare entries, '{name}' is not one"), name);
        }
        _ => {}
    }

    Ok(())
}

fn validate_function(function: &FunctionDef, ctx: &ParseContext, known: &KnownTypes) -> Result<()> {
    ctx.validate_name(&function.name, "function")?;
    let fn_ctx = ctx.push(&function.name);

    for (param, expr) in &function.params {
        fn_ctx.validate_name(param, "parameter")?;
        known.check(expr, &[], &fn_ctx, "parameter type")?;
    }
    if let Some(returns) = &function.returns {
        known.check(returns, &[], &fn_ctx, "return type")?;
    }

    for mapping in &function.mappings {
        let target = mapping.target.as_deref().unwrap_or("*");
        if mapping.source.is_some() && mapping.expression.is_some() {
            return fn_ctx.fail(
                format!("mapping for '{target}' sets both source and expression"),
                target,
            );
        }
        if mapping.target.is_none() && (mapping.source.is_some() || mapping.expression.is_some()) {
            return fn_ctx.fail(
                format!(
                    "mapping without a target in '{}' may only set nullability and options",
                    fn_ctx.path_string()
                ),
                &function.name,
            );
        }
    }

    Ok(())
}
