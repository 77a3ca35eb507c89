//! Hooks around pipeline phases.

use eyre::Result;

use super::CompilationContext;

/// Receives callbacks before and after each phase.
///
/// ```ignore
/// struct ReportPlugin;
///
/// impl Plugin for ReportPlugin {
///     fn name(&self) -> &'static str { "report" }
///
///     fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
///         eprintln!("{phase}: {} diagnostic(s)", ctx.diagnostics.len());
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return an error to abort the pipeline.
    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }

    /// Called after a phase completes successfully.
    /// Return an error to abort the pipeline.
    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }
}
