//! Rust code generator for remap.
//!
//! Renders the [`GeneratedOutput`](remap_codegen::builder::GeneratedOutput)
//! of a generation pass as Rust source: one `<mapper>_impl.rs` per mapper,
//! one file per factory and a `mod.rs` tying them together.

mod files;
mod generator;
mod renderer;
mod type_mapper;

pub use files::GENERATED_HEADER;
pub use generator::Generator;
pub use remap_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile, TypeMapper};
pub use renderer::RustRenderer;
pub use type_mapper::RustTypeMapper;
