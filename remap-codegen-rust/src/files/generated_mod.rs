use remap_codegen::builder::GeneratedOutput;
use remap_ir::FactoryStyle;

use super::{FactoryRs, MapperImplRs, RustSource};

/// The `mod.rs` declaring every generated file and re-exporting the
/// implementations.
///
/// Generated files see the parent module's items through `use super::*`.
pub struct GeneratedMod<'a> {
    output: &'a GeneratedOutput,
}

impl<'a> GeneratedMod<'a> {
    pub fn new(output: &'a GeneratedOutput) -> Self {
        Self { output }
    }
}

impl RustSource for GeneratedMod<'_> {
    fn path(&self) -> String {
        "mod.rs".to_string()
    }

    fn render(&self) -> String {
        let mut modules = Vec::new();
        let mut exports = Vec::new();

        for mapper in &self.output.mappers {
            let module = MapperImplRs::new(mapper).module();
            modules.push(format!("mod {module};"));
            exports.push(format!("pub use {module}::{};", mapper.implementation));
        }
        for factory in &self.output.factories {
            let file = FactoryRs::new(factory);
            let module = file.module();
            match file.style() {
                FactoryStyle::Simple => {
                    modules.push(format!("mod {module};"));
                    exports.push(format!("pub use {module}::{};", factory.name));
                }
                FactoryStyle::Module => modules.push(format!("pub mod {module};")),
            }
        }

        let mut lines = vec!["use super::*;".to_string()];
        if !modules.is_empty() {
            lines.push(String::new());
            lines.extend(modules);
        }
        if !exports.is_empty() {
            lines.push(String::new());
            lines.extend(exports);
        }
        lines.join("\n") + "\n"
    }
}
