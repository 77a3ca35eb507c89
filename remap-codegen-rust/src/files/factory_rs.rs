use remap_codegen::builder::{CodeBuilder, FactoryEntry, FactorySpec};
use remap_core::to_snake_case;
use remap_ir::FactoryStyle;

use super::{RustSource, shared, simple_name};

/// `<factory>.rs`: hands out the implementations of a set of mappers.
///
/// The simple style is a struct with one accessor per mapper; mappers that
/// are not generated are passed to its `new`. The module style is a list of
/// `provide_*` functions taking every dependency as an argument.
pub struct FactoryRs<'a> {
    factory: &'a FactorySpec,
}

impl<'a> FactoryRs<'a> {
    pub fn new(factory: &'a FactorySpec) -> Self {
        Self { factory }
    }

    pub fn module(&self) -> String {
        to_snake_case(&self.factory.name)
    }

    pub fn style(&self) -> FactoryStyle {
        self.factory.style
    }

    fn render_simple(&self, builder: &mut CodeBuilder) {
        let name = &self.factory.name;
        let external = self.factory.external_dependencies();

        builder.push_rust_doc("Hands out the generated mappers.");
        if external.is_empty() {
            builder
                .push_line("#[derive(Debug, Default, Clone, Copy)]")
                .push_line(&format!("pub struct {name};"));
        } else {
            builder
                .push_line("#[derive(Clone)]")
                .push_line(&format!("pub struct {name} {{"))
                .push_indent();
            for dep in &external {
                builder.push_line(&format!("{}: {},", dep.field, shared(&dep.mapper)));
            }
            builder.push_dedent().push_line("}");
        }
        builder.push_blank();

        builder.push_line(&format!("impl {name} {{")).push_indent();
        if external.is_empty() {
            builder
                .push_line("pub fn new() -> Self {")
                .push_indent()
                .push_line("Self")
                .push_dedent()
                .push_line("}");
        } else {
            let params: Vec<String> = external
                .iter()
                .map(|d| format!("{}: {}", d.field, shared(&d.mapper)))
                .collect();
            let fields: Vec<&str> = external.iter().map(|d| d.field.as_str()).collect();
            builder
                .push_line(&format!("pub fn new({}) -> Self {{", params.join(", ")))
                .push_indent()
                .push_line(&format!("Self {{ {} }}", fields.join(", ")))
                .push_dedent()
                .push_line("}");
        }

        for entry in &self.factory.entries {
            let args: Vec<String> = entry
                .dependencies
                .iter()
                .map(|dep| {
                    if dep.generated {
                        format!("self.{}()", accessor(&dep.mapper))
                    } else {
                        format!("self.{}.clone()", dep.field)
                    }
                })
                .collect();
            builder
                .push_blank()
                .push_line(&format!(
                    "pub fn {}(&self) -> {} {{",
                    accessor(&entry.mapper),
                    shared(&entry.mapper)
                ))
                .push_indent()
                .push_line(&format!(
                    "Arc::new({}::new({}))",
                    entry.implementation,
                    args.join(", ")
                ))
                .push_dedent()
                .push_line("}");
        }
        builder.push_dedent().push_line("}");
    }

    fn render_module(&self, builder: &mut CodeBuilder) {
        for (i, entry) in self.factory.entries.iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            render_provider(builder, entry);
        }
    }
}

fn render_provider(builder: &mut CodeBuilder, entry: &FactoryEntry) {
    let params: Vec<String> = entry
        .dependencies
        .iter()
        .map(|d| format!("{}: {}", d.field, shared(&d.mapper)))
        .collect();
    let args: Vec<&str> = entry.dependencies.iter().map(|d| d.field.as_str()).collect();
    builder
        .push_line(&format!(
            "pub fn provide_{}({}) -> {} {{",
            accessor(&entry.mapper),
            params.join(", "),
            entry.implementation
        ))
        .push_indent()
        .push_line(&format!("{}::new({})", entry.implementation, args.join(", ")))
        .push_dedent()
        .push_line("}");
}

fn accessor(mapper: &str) -> String {
    to_snake_case(simple_name(mapper))
}

impl RustSource for FactoryRs<'_> {
    fn path(&self) -> String {
        format!("{}.rs", self.module())
    }

    fn render(&self) -> String {
        let mut builder = CodeBuilder::rust();
        let needs_arc = match self.factory.style {
            FactoryStyle::Simple => !self.factory.entries.is_empty(),
            FactoryStyle::Module => self
                .factory
                .entries
                .iter()
                .any(|e| !e.dependencies.is_empty()),
        };
        if needs_arc {
            builder.push_line("use std::sync::Arc;").push_blank();
        }
        builder.push_line("use super::*;").push_blank();

        match self.factory.style {
            FactoryStyle::Simple => self.render_simple(&mut builder),
            FactoryStyle::Module => self.render_module(&mut builder),
        }
        builder.build()
    }
}
