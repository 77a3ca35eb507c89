use std::path::PathBuf;

use clap::{Args, ValueEnum};
use eyre::{Context, Result};
use remap_codegen::pipeline::Diagnostic;
use remap_manifest::RemapToml;

use super::{Outcome, UnwrapOrExit, compile, print_diagnostics};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    /// The diagnostics as a JSON array
    Json,
}

#[derive(Args)]
pub struct CheckCommand {
    /// Path to remap.toml (defaults to ./remap.toml)
    #[arg(short, long, default_value = "remap.toml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let remap_toml = RemapToml::open(&self.config).unwrap_or_exit();
        let manifest = remap_toml.manifest().clone();

        let ctx = match compile(manifest.clone())? {
            Outcome::Rejected(diagnostics) => {
                self.report(&diagnostics)?;
                std::process::exit(1);
            }
            Outcome::Compiled(ctx) => ctx,
        };
        self.report(&ctx.diagnostics)?;
        if ctx.has_errors() {
            std::process::exit(1);
        }

        if let Format::Json = self.format {
            return Ok(());
        }
        if ctx.has_warnings() {
            println!();
        }
        println!("✓ {} is valid\n", self.config.display());

        println!("  {}", manifest.project.name);
        if let Some(desc) = &manifest.project.description {
            println!("  {desc}\n");
        } else {
            println!();
        }

        let output = ctx.output.unwrap_or_default();
        let functions = output.function_count();
        let synthesized = output
            .mappers
            .iter()
            .flat_map(|m| &m.functions)
            .filter(|f| !f.is_override)
            .count();
        println!(
            "  {} mapper{}, {} function{} ({} synthesized)",
            output.mappers.len(),
            if output.mappers.len() == 1 { "" } else { "s" },
            functions,
            if functions == 1 { "" } else { "s" },
            synthesized
        );
        for mapper in &output.mappers {
            println!("    {} ({} functions)", mapper.name, mapper.functions.len());
        }
        if !output.factories.is_empty() {
            println!("  {} factories", output.factories.len());
        }

        Ok(())
    }

    fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        match self.format {
            Format::Text => print_diagnostics(diagnostics),
            Format::Json => {
                let json = serde_json::to_string_pretty(diagnostics)
                    .wrap_err("Failed to serialize diagnostics")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
