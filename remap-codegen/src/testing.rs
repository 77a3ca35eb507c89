//! Test utilities for generators.
//!
//! Only available with the `testing` feature or during tests.

use eyre::{Result, eyre};
use remap_ir::Declarations;
use remap_manifest::{Manifest, parse_manifest};

use crate::{
    engine::{self, Emission},
    pipeline::{CompilationContext, Pipeline, phases::lower_manifest},
};

/// Parse and validate a manifest held in a string.
pub fn manifest(content: &str) -> Result<Manifest> {
    parse_manifest(content, "remap.toml").map_err(|e| eyre!("{e}"))
}

pub fn declarations(content: &str) -> Result<Declarations> {
    Ok(lower_manifest(&manifest(content)?))
}

/// Run the engine directly, bypassing the lints.
pub fn emit(content: &str) -> Result<Emission> {
    engine::emit(&declarations(content)?)
}

/// Run the full pipeline.
pub fn run(content: &str) -> Result<CompilationContext> {
    Pipeline::new().run(manifest(content)?)
}
