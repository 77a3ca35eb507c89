//! Validate phase - runs lints on the manifest.

mod lint;
pub mod lints;

use eyre::{Result, bail};
pub use lint::{Lint, LintInfo};
pub use lints::{
    DuplicateFunctionLint, EnumNamingPairLint, FunctionReturnLint, MapperShapeLint,
    SelfIncludeLint,
};
use remap_manifest::Manifest;

use crate::pipeline::{CompilationContext, Diagnostic, Phase};

/// Phase that validates the manifest using configurable lints.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// Create a validate phase with the default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![
                Box::new(MapperShapeLint),
                Box::new(FunctionReturnLint),
                Box::new(DuplicateFunctionLint),
                Box::new(SelfIncludeLint),
                Box::new(EnumNamingPairLint),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { lints: Vec::new() }
    }

    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    pub fn lint_names(&self) -> Vec<&'static str> {
        self.lints.iter().map(|l| l.name()).collect()
    }

    pub fn lint_info(&self) -> Vec<LintInfo> {
        self.lints.iter().map(|l| l.info()).collect()
    }

    /// Run every lint without failing, for callers that report the findings themselves.
    pub fn check(&self, manifest: &Manifest) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for lint in &self.lints {
            lint.check(manifest, &mut diagnostics);
        }
        diagnostics
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check mapper declarations and collect diagnostics"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let diagnostics = self.check(&ctx.manifest);
        ctx.diagnostics.extend(diagnostics);

        // Warnings are allowed
        if ctx.has_errors() {
            bail!("Validation failed with {} error(s)", ctx.error_count());
        }

        Ok(())
    }
}
