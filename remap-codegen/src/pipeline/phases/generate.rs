//! Generate phase - runs the resolution engine.

use eyre::{Result, eyre};

use crate::{
    engine,
    pipeline::{CompilationContext, Phase},
};

/// Resolves every mapper and records the generated output.
///
/// Mapping errors are recorded as diagnostics; the mappers they affect are
/// left out of the output.
pub struct GeneratePhase;

impl Phase for GeneratePhase {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn description(&self) -> &'static str {
        "Resolve mappings and build function bodies"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let decls = ctx
            .declarations
            .as_ref()
            .ok_or_else(|| eyre!("declarations not set - did LowerPhase run?"))?;
        let emission = engine::emit(decls)?;
        ctx.diagnostics.extend(emission.diagnostics);
        ctx.output = Some(emission.output);
        Ok(())
    }
}
