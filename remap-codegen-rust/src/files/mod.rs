//! Rendered source files.

mod factory_rs;
mod generated_mod;
mod mapper_impl_rs;

pub use factory_rs::FactoryRs;
pub use generated_mod::GeneratedMod;
pub use mapper_impl_rs::MapperImplRs;
use remap_core::OutputFile;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by remap. Do not edit.";

/// A Rust source file rendered from the generated output.
pub trait RustSource {
    /// Path relative to the output directory.
    fn path(&self) -> String;

    /// Content without the header.
    fn render(&self) -> String;

    fn output_file(&self) -> OutputFile {
        OutputFile::new(self.path(), self.render()).with_header(GENERATED_HEADER)
    }
}

/// `Arc<dyn Mapper>`, the handle mappers hold their includes by.
fn shared(mapper: &str) -> String {
    format!("Arc<dyn {}>", simple_name(mapper))
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
