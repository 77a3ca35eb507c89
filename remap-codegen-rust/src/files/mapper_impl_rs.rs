use remap_codegen::builder::{CodeBuilder, MapperSpec};
use remap_core::to_snake_case;
use remap_ir::InjectionStyle;

use super::{RustSource, shared, simple_name};
use crate::RustRenderer;

/// `<mapper>_impl.rs`: the implementation struct of one mapper.
///
/// Synthesized functions go into an inherent impl, declared ones into the
/// trait impl. Includes are held as `Arc<dyn Trait>` fields set by `new`.
pub struct MapperImplRs<'a> {
    mapper: &'a MapperSpec,
    renderer: RustRenderer,
}

impl<'a> MapperImplRs<'a> {
    pub fn new(mapper: &'a MapperSpec) -> Self {
        Self {
            mapper,
            renderer: RustRenderer::new(),
        }
    }

    /// Module name of the file.
    pub fn module(&self) -> String {
        format!("{}_impl", to_snake_case(simple_name(&self.mapper.name)))
    }

    fn render_struct(&self, builder: &mut CodeBuilder) {
        let mapper = self.mapper;
        builder.push_rust_doc(&format!(
            "Generated implementation of [`{}`].",
            simple_name(&mapper.name)
        ));
        match (mapper.injection, &mapper.scope) {
            (InjectionStyle::None, _) => {}
            (InjectionStyle::Constructor, _) => {
                builder.push_rust_doc("\nDependencies are passed to [`Self::new`].");
            }
            (InjectionStyle::Scoped, Some(scope)) => {
                builder.push_rust_doc(&format!("\nOne instance per `{scope}`."));
            }
            (InjectionStyle::Scoped, None) => {
                builder.push_rust_doc("\nOne instance per scope.");
            }
        }

        if mapper.includes.is_empty() {
            builder
                .push_line("#[derive(Debug, Default, Clone, Copy)]")
                .push_line(&format!("pub struct {};", mapper.implementation));
            return;
        }
        builder
            .push_line("#[derive(Clone)]")
            .push_line(&format!("pub struct {} {{", mapper.implementation))
            .push_indent();
        for include in &mapper.includes {
            builder.push_line(&format!("{}: {},", include.field, shared(&include.mapper)));
        }
        builder.push_dedent().push_line("}");
    }

    fn render_constructor(&self, builder: &mut CodeBuilder) {
        let includes = &self.mapper.includes;
        if includes.is_empty() {
            builder
                .push_line("pub fn new() -> Self {")
                .push_indent()
                .push_line("Self")
                .push_dedent()
                .push_line("}");
            return;
        }
        let params: Vec<String> = includes
            .iter()
            .map(|i| format!("{}: {}", i.field, shared(&i.mapper)))
            .collect();
        builder
            .push_line(&format!("pub fn new({}) -> Self {{", params.join(", ")))
            .push_indent()
            .push_line("Self {")
            .push_indent();
        for include in includes {
            builder.push_line(&format!("{},", include.field));
        }
        builder
            .push_dedent()
            .push_line("}")
            .push_dedent()
            .push_line("}");
    }
}

impl RustSource for MapperImplRs<'_> {
    fn path(&self) -> String {
        format!("{}.rs", self.module())
    }

    fn render(&self) -> String {
        let mapper = self.mapper;
        let mut builder = CodeBuilder::rust();

        if !mapper.includes.is_empty() {
            builder.push_line("use std::sync::Arc;").push_blank();
        }
        builder.push_line("use super::*;");
        for import in &mapper.imports {
            builder.push_line(&format!("use {};", import.trim_end_matches(';')));
        }
        builder.push_blank();

        self.render_struct(&mut builder);
        builder.push_blank();

        builder
            .push_line(&format!("impl {} {{", mapper.implementation))
            .push_indent();
        self.render_constructor(&mut builder);
        for function in mapper.functions.iter().filter(|f| !f.is_override) {
            builder.push_blank();
            self.renderer.render_function(&mut builder, function, false);
        }
        builder.push_dedent().push_line("}").push_blank();

        let trait_name = simple_name(&mapper.name);
        let declared: Vec<_> = mapper.functions.iter().filter(|f| f.is_override).collect();
        if declared.is_empty() {
            builder.push_line(&format!(
                "impl {trait_name} for {} {{}}",
                mapper.implementation
            ));
            return builder.build();
        }
        builder
            .push_line(&format!("impl {trait_name} for {} {{", mapper.implementation))
            .push_indent();
        for (i, function) in declared.into_iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            self.renderer.render_function(&mut builder, function, true);
        }
        builder.push_dedent().push_line("}");
        builder.build()
    }
}
