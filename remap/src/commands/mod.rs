mod check;
mod completions;
mod generate;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::{Context, Result};
use generate::GenerateCommand;
use remap_codegen::pipeline::{
    CompilationContext, Diagnostic, Pipeline, Severity, phases::ValidatePhase,
};
use remap_manifest::Manifest;
use tracing::info;

use crate::logging;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for remap_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "remap")]
#[command(version)]
#[command(about = "Generate object mappers from TOML definitions")]
pub(crate) struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        logging::init(self.verbose);

        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate mapper implementations from remap.toml
    Generate(GenerateCommand),

    /// Validate remap.toml and resolve every mapping without writing files
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// What running the pipeline on a manifest produced.
pub(crate) enum Outcome {
    /// The lints found errors; nothing was generated.
    Rejected(Vec<Diagnostic>),
    Compiled(CompilationContext),
}

/// Lint the manifest, then run the full pipeline if the lints pass.
pub(crate) fn compile(manifest: Manifest) -> Result<Outcome> {
    let lints = ValidatePhase::new().check(&manifest);
    if lints.iter().any(|d| d.severity.is_error()) {
        return Ok(Outcome::Rejected(lints));
    }
    Pipeline::new()
        .run(manifest)
        .wrap_err("Generation failed")
        .map(Outcome::Compiled)
}

/// Print errors and warnings to stderr; info diagnostics go to the log.
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        if diag.severity == Severity::Info {
            info!(location = diag.location.as_deref(), "{}", diag.message);
            continue;
        }
        eprintln!("{}: {}", diag.severity, diag.message);
        if let Some(loc) = &diag.location {
            eprintln!("  --> {loc}");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use remap_manifest::parse_manifest;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_rejects_lint_errors() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [mappers.SampleMapper]
            shape = "final"
            "#,
            "remap.toml",
        )
        .unwrap();

        let Outcome::Rejected(diagnostics) = compile(manifest).unwrap() else {
            panic!("final mapper should be rejected");
        };
        assert_eq!(
            diagnostics[0].message,
            "mapper 'SampleMapper' is final and cannot be implemented"
        );
    }

    #[test]
    fn test_compile_generates() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [types.Dto]
            kind = "data"
            fields = { id = "Long" }

            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto" }
            returns = "Dto"
            "#,
            "remap.toml",
        )
        .unwrap();

        let Outcome::Compiled(ctx) = compile(manifest).unwrap() else {
            panic!("manifest should compile");
        };
        assert!(!ctx.has_errors());
        assert_eq!(ctx.output.unwrap().function_count(), 1);
    }
}
