//! Pipeline orchestrator.

use eyre::Result;
use remap_manifest::Manifest;
use tracing::debug;

use super::{
    CompilationContext, Phase, Plugin,
    phases::{GeneratePhase, LowerPhase, ValidatePhase},
};

/// Runs the built-in phases (validate, lower, generate), then any user
/// phases, calling plugin hooks before and after each one.
///
/// ```ignore
/// let ctx = Pipeline::new()
///     .plugin(MyPlugin::new())
///     .phase(MyCustomPhase)
///     .run(manifest)?;
/// ```
pub struct Pipeline {
    validate: ValidatePhase,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            validate: ValidatePhase::new(),
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Replace the default lint set.
    pub fn validate(mut self, validate: ValidatePhase) -> Self {
        self.validate = validate;
        self
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run every phase on `manifest`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation reports errors, or if any phase fails
    /// fatally. Mapping errors found while generating are diagnostics, not
    /// failures.
    pub fn run(&self, manifest: Manifest) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(manifest);

        self.run_phase(&self.validate, &mut ctx)?;
        self.run_phase(&LowerPhase, &mut ctx)?;
        self.run_phase(&GeneratePhase, &mut ctx)?;
        for phase in &self.phases {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }

        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        debug!(phase = phase_name, "running phase");

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MarkerPhase;

    impl Phase for MarkerPhase {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn description(&self) -> &'static str {
            "Leave a note"
        }

        fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
            ctx.add_info("marker", "ran last");
            Ok(())
        }
    }

    fn manifest() -> Manifest {
        toml::from_str(
            r#"
            [project]
            name = "test"

            [types.Dto]
            kind = "data"
            fields = { id = "Long" }

            [types.Model]
            kind = "data"
            fields = { id = "Long" }

            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto" }
            returns = "Model"
        "#,
        )
        .expect("Failed to parse test manifest")
    }

    #[test]
    fn test_pipeline_runs_phases() {
        let ctx = Pipeline::new().run(manifest()).expect("pipeline should succeed");

        assert!(ctx.declarations.is_some());
        let output = ctx.output.as_ref().expect("output");
        assert_eq!(output.mappers.len(), 1);
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let pipeline = Pipeline::new().plugin(plugin).phase(MarkerPhase);
        let ctx = pipeline.run(manifest()).expect("pipeline should succeed");

        // 3 built-in phases + 1 user phase
        assert_eq!(before_count.load(Ordering::SeqCst), 4);
        assert_eq!(after_count.load(Ordering::SeqCst), 4);
        assert_eq!(
            ctx.diagnostics.last().map(|d| d.message.as_str()),
            Some("ran last")
        );
    }
}
