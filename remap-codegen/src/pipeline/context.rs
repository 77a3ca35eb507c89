//! State threaded through the pipeline phases.

use remap_ir::Declarations;
use remap_manifest::Manifest;

use super::diagnostic::{Diagnostic, Severity};
use crate::builder::GeneratedOutput;

#[derive(Debug)]
pub struct CompilationContext {
    pub manifest: Manifest,
    /// Populated by `LowerPhase`.
    pub declarations: Option<Declarations>,
    /// Populated by `GeneratePhase`; holds every mapper that generated cleanly.
    pub output: Option<GeneratedOutput>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            declarations: None,
            output: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        toml::from_str(
            r#"
            [project]
            name = "test"
        "#,
        )
        .expect("Failed to parse test manifest")
    }

    #[test]
    fn test_context_creation() {
        let ctx = CompilationContext::new(manifest());
        assert!(ctx.declarations.is_none());
        assert!(ctx.output.is_none());
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_context_diagnostics() {
        let mut ctx = CompilationContext::new(manifest());
        ctx.add_error("test", "test error");
        ctx.add_warning("test", "test warning");
        ctx.add_info("test", "note");

        assert!(ctx.has_errors());
        assert!(ctx.has_warnings());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warning_count(), 1);
    }
}
