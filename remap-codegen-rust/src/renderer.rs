//! Rust-specific rendering of generated function bodies.
//!
//! Expressions render to strings; multi-line ones (struct literals, matches)
//! carry their own relative indentation and are re-indented by
//! [`CodeBuilder::push_lines`] when placed.

use remap_codegen::{
    builder::{CodeBuilder, Expr, FunctionSpec, NullFallback, Pattern, Statement, Visibility},
    language::TypeMapper,
};
use remap_ir::CollectionShape;

use crate::RustTypeMapper;

const INDENT: &str = "    ";

/// Rust language renderer.
///
/// Nullable values are `Option`s, collections are `Vec`s (or `HashSet`s),
/// and calls to other mapping functions go through `self`:
///
/// ```
/// use remap_codegen::builder::{Expr, NullFallback};
/// use remap_codegen_rust::RustRenderer;
///
/// let expr = Expr::fallback(Expr::path(["dto", "name"]), NullFallback::ForceUnwrap);
/// assert_eq!(RustRenderer::new().render_expr(&expr), "dto.name.unwrap()");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RustRenderer {
    types: RustTypeMapper,
}

impl RustRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a function. Functions implementing a trait method carry no
    /// visibility of their own.
    pub fn render_function(&self, builder: &mut CodeBuilder, function: &FunctionSpec, in_trait: bool) {
        if let Some(doc) = &function.doc {
            builder.push_rust_doc(doc);
        }
        let vis = if !in_trait && function.visibility == Visibility::Public {
            "pub "
        } else {
            ""
        };
        let params: Vec<String> = std::iter::once("&self".to_string())
            .chain(
                function
                    .params
                    .iter()
                    .map(|p| format!("{}: {}", p.name, self.types.map_ref(&p.ty))),
            )
            .collect();
        let returns = match self.types.map_ref(&function.return_type).as_str() {
            "()" => String::new(),
            ty => format!(" -> {ty}"),
        };

        builder.push_line(&format!(
            "{vis}fn {}({}){returns} {{",
            function.name,
            params.join(", ")
        ));
        builder.push_indent();
        self.render_body(builder, &function.body);
        builder.push_dedent();
        builder.push_line("}");
    }

    /// Render a function body; a trailing `return` becomes the tail expression.
    pub fn render_body(&self, builder: &mut CodeBuilder, body: &[Statement]) {
        for (i, statement) in body.iter().enumerate() {
            match statement {
                Statement::Return(value) if i + 1 == body.len() => {
                    builder.push_lines(&self.render_expr(value));
                }
                _ => self.render_statement(builder, statement),
            }
        }
    }

    pub fn render_statement(&self, builder: &mut CodeBuilder, statement: &Statement) {
        match statement {
            Statement::Let {
                name,
                value,
                mutable,
            } => {
                let mutability = if *mutable { "mut " } else { "" };
                builder.push_lines(&format!(
                    "let {mutability}{name} = {};",
                    self.render_expr(value)
                ));
            }
            Statement::Return(value) => {
                builder.push_lines(&format!("return {};", self.render_expr(value)));
            }
            Statement::Expr(value) => {
                builder.push_lines(&format!("{};", self.render_expr(value)));
            }
            Statement::If { condition, then } => {
                builder.push_line(&format!("if {} {{", self.render_expr(condition)));
                self.render_nested(builder, then);
            }
            Statement::For {
                binding,
                iter,
                body,
            } => {
                builder.push_line(&format!("for {binding} in {} {{", self.render_expr(iter)));
                self.render_nested(builder, body);
            }
            Statement::NullGuard { name, on_null } => {
                builder
                    .push_line(&format!("let Some({name}) = {name} else {{"))
                    .push_indent()
                    .push_lines(&format!("return {};", self.render_expr(on_null)))
                    .push_dedent()
                    .push_line("};");
            }
        }
    }

    fn render_nested(&self, builder: &mut CodeBuilder, body: &[Statement]) {
        builder.push_indent();
        for statement in body {
            self.render_statement(builder, statement);
        }
        builder.push_dedent();
        builder.push_line("}");
    }

    pub fn render_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Null => "None".to_string(),
            Expr::Bool(value) => value.to_string(),
            Expr::Str(value) => format!("{value:?}"),
            Expr::Ident(name) | Expr::Raw(name) => name.clone(),
            Expr::Path(segments) => segments.join("."),
            Expr::Present(inner) => format!("Some({})", self.render_expr(inner)),
            Expr::Call {
                receiver,
                function,
                args,
            } => {
                let args: Vec<String> = args.iter().map(|a| self.render_expr(a)).collect();
                match receiver {
                    Some(field) => format!("self.{field}.{function}({})", args.join(", ")),
                    None => format!("self.{function}({})", args.join(", ")),
                }
            }
            Expr::Construct {
                ty,
                fields,
                fill_defaults,
            } => {
                if fields.is_empty() && !fill_defaults {
                    return format!("{} {{}}", ty.simple_name());
                }
                let mut lines = vec![format!("{} {{", ty.simple_name())];
                for field in fields {
                    match &field.value {
                        Expr::Ident(name) if *name == field.name => {
                            lines.push(format!("{INDENT}{name},"));
                        }
                        value => lines.push(format!(
                            "{INDENT}{}: {},",
                            field.name,
                            indent_tail(&self.render_expr(value))
                        )),
                    }
                }
                if *fill_defaults {
                    lines.push(format!("{INDENT}..Default::default()"));
                }
                lines.push("}".to_string());
                lines.join("\n")
            }
            Expr::NullSafe {
                subject,
                binding,
                body,
                flatten,
            } => {
                let combinator = if *flatten { "and_then" } else { "map" };
                format!(
                    "{}.{combinator}(|{binding}| {})",
                    self.render_expr(subject),
                    self.render_expr(body)
                )
            }
            Expr::Fallback { value, fallback } => {
                let value = self.render_expr(value);
                match fallback {
                    NullFallback::False => format!("{value}.unwrap_or(false)"),
                    NullFallback::EmptyString => format!("{value}.unwrap_or_default()"),
                    NullFallback::ForceUnwrap => format!("{value}.unwrap()"),
                    NullFallback::Raise { source, target } => {
                        let message =
                            format!("cannot assign null source `{source}` to non-null target `{target}`");
                        format!("{value}.expect({message:?})")
                    }
                }
            }
            Expr::EnumEntry { ty, entry } => format!("{}::{entry}", ty.simple_name()),
            Expr::Match { subject, arms } => {
                let mut subject = self.render_expr(subject);
                if arms
                    .iter()
                    .any(|arm| matches!(arm.pattern, Pattern::Literal(_)))
                {
                    subject.push_str(".as_str()");
                }
                let mut lines = vec![format!("match {subject} {{")];
                for arm in arms {
                    lines.push(format!(
                        "{INDENT}{} => {},",
                        render_pattern(&arm.pattern),
                        indent_tail(&self.render_expr(&arm.value))
                    ));
                }
                lines.push("}".to_string());
                lines.join("\n")
            }
            Expr::IsEmpty(value) => format!("{}.is_empty()", self.render_expr(value)),
            Expr::Len(value) => format!("{}.len()", self.render_expr(value)),
            Expr::NewBuffer { capacity } => match capacity {
                Some(capacity) => format!("Vec::with_capacity({})", self.render_expr(capacity)),
                None => "Vec::new()".to_string(),
            },
            Expr::Extend { buffer, items } => {
                format!("{buffer}.extend({})", self.render_expr(items))
            }
            Expr::Push { buffer, value } => format!("{buffer}.push({})", self.render_expr(value)),
            Expr::Collect { buffer, shape } => match shape {
                CollectionShape::Set => format!("{buffer}.into_iter().collect()"),
                _ => buffer.clone(),
            },
            Expr::EmptyCollection(shape) => match shape {
                CollectionShape::Set => "std::collections::HashSet::new()".to_string(),
                _ => "Vec::new()".to_string(),
            },
        }
    }
}

fn render_pattern(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Wildcard => "_".to_string(),
        Pattern::Literal(value) => format!("{value:?}"),
        Pattern::EnumEntry { ty, entry } => format!("{}::{entry}", ty.simple_name()),
    }
}

/// Indent every line but the first, for values nested one level deeper.
fn indent_tail(text: &str) -> String {
    text.replace('\n', &format!("\n{INDENT}"))
}

#[cfg(test)]
mod tests {
    use remap_codegen::builder::{FieldInit, MatchArm, ParamSpec};
    use remap_ir::TypeRef;

    use super::*;

    fn render(function: &FunctionSpec, in_trait: bool) -> String {
        let mut builder = CodeBuilder::rust();
        RustRenderer::new().render_function(&mut builder, function, in_trait);
        builder.build()
    }

    #[test]
    fn test_construct_with_shorthand_and_defaults() {
        let expr = Expr::Construct {
            ty: TypeRef::named("com.example.Model"),
            fields: vec![
                FieldInit::new("id", Expr::path(["dto", "id"])),
                FieldInit::new("name", Expr::ident("name")),
            ],
            fill_defaults: true,
        };
        assert_eq!(
            RustRenderer::new().render_expr(&expr),
            "Model {\n    id: dto.id,\n    name,\n    ..Default::default()\n}"
        );
    }

    #[test]
    fn test_null_safe_call() {
        let call = Expr::call_on("inner_mapper", "map", vec![Expr::ident("it")]);
        let renderer = RustRenderer::new();
        assert_eq!(
            renderer.render_expr(&Expr::null_safe(
                Expr::path(["dto", "nested"]),
                "it",
                call.clone(),
                false
            )),
            "dto.nested.map(|it| self.inner_mapper.map(it))"
        );
        assert_eq!(
            renderer.render_expr(&Expr::null_safe(Expr::ident("a"), "it", call, true)),
            "a.and_then(|it| self.inner_mapper.map(it))"
        );
    }

    #[test]
    fn test_fallbacks() {
        let renderer = RustRenderer::new();
        let value = || Expr::path(["dto", "flag"]);
        assert_eq!(
            renderer.render_expr(&Expr::fallback(value(), NullFallback::False)),
            "dto.flag.unwrap_or(false)"
        );
        assert_eq!(
            renderer.render_expr(&Expr::fallback(value(), NullFallback::EmptyString)),
            "dto.flag.unwrap_or_default()"
        );
        assert_eq!(
            renderer.render_expr(&Expr::fallback(
                value(),
                NullFallback::Raise {
                    source: "dto.flag".into(),
                    target: "flag".into(),
                }
            )),
            "dto.flag.expect(\"cannot assign null source `dto.flag` to non-null target `flag`\")"
        );
    }

    #[test]
    fn test_string_match_uses_as_str() {
        let status = TypeRef::named("Status");
        let expr = Expr::match_(
            Expr::ident("value"),
            vec![
                MatchArm::new(
                    Pattern::Literal("ONE_SAMPLE".into()),
                    Expr::enum_entry(status.clone(), "OneSample"),
                ),
                MatchArm::new(Pattern::Wildcard, Expr::enum_entry(status, "Unknown")),
            ],
        );
        assert_eq!(
            RustRenderer::new().render_expr(&expr),
            "match value.as_str() {\n    \"ONE_SAMPLE\" => Status::OneSample,\n    _ => Status::Unknown,\n}"
        );
    }

    #[test]
    fn test_iterable_body() {
        let list = |name: &str| TypeRef::generic("List", vec![TypeRef::named(name)]);
        let function = FunctionSpec::new("map_dto_list", list("Model"))
            .doc("Maps `List<Dto>` to `List<Model>`.")
            .params([ParamSpec::new("items", list("Dto").optional())])
            .statements([
                Statement::null_guard("items", Expr::EmptyCollection(CollectionShape::List)),
                Statement::if_(
                    Expr::IsEmpty(Box::new(Expr::ident("items"))),
                    vec![Statement::return_(Expr::EmptyCollection(CollectionShape::List))],
                ),
                Statement::let_mut(
                    "result",
                    Expr::NewBuffer {
                        capacity: Some(Box::new(Expr::Len(Box::new(Expr::ident("items"))))),
                    },
                ),
                Statement::for_(
                    "item",
                    Expr::ident("items"),
                    vec![Statement::expr(Expr::Push {
                        buffer: "result".into(),
                        value: Box::new(Expr::call("map_dto", vec![Expr::ident("item")])),
                    })],
                ),
                Statement::return_(Expr::Collect {
                    buffer: "result".into(),
                    shape: CollectionShape::List,
                }),
            ])
            .private();

        assert_eq!(
            render(&function, false),
            "/// Maps `List<Dto>` to `List<Model>`.
fn map_dto_list(&self, items: Option<Vec<Dto>>) -> Vec<Model> {
    let Some(items) = items else {
        return Vec::new();
    };
    if items.is_empty() {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        result.push(self.map_dto(item));
    }
    result
}
"
        );
    }

    #[test]
    fn test_trait_method_has_no_visibility() {
        let function = FunctionSpec::new("map", TypeRef::named("Model").optional())
            .params([ParamSpec::new("dto", TypeRef::named("Dto").optional())])
            .statements([
                Statement::null_guard("dto", Expr::Null),
                Statement::return_(Expr::present(Expr::Construct {
                    ty: TypeRef::named("Model"),
                    fields: vec![FieldInit::new("id", Expr::path(["dto", "id"]))],
                    fill_defaults: false,
                })),
            ])
            .override_();

        assert_eq!(
            render(&function, true),
            "fn map(&self, dto: Option<Dto>) -> Option<Model> {
    let Some(dto) = dto else {
        return None;
    };
    Some(Model {
        id: dto.id,
    })
}
"
        );
    }
}
