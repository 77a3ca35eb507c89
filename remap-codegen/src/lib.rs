//! Mapping resolution and code generation for remap.
//!
//! Given the declarations lowered from a manifest, the engine decides how to
//! build every target value from its sources and emits a language-agnostic
//! function model that language crates (e.g. `remap-codegen-rust`) render.
//!
//! # Module Organization
//!
//! - [`builder`] - Output model (FunctionSpec, Statement, Expr, MapperSpec, CodeBuilder)
//! - [`engine`] - Mapper registry, resolution, mapping kinds and the emission driver
//! - [`language`] - Language-specific abstractions (LanguageCodegen, PreviewFile)
//! - [`pipeline`] - Validate → lower → generate phases with diagnostics
//! - [`testing`] - Test utilities (feature-gated)

pub mod builder;
pub mod engine;
pub mod language;
pub mod pipeline;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
