use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use remap_codegen::language::LanguageCodegen;
use remap_codegen_rust::Generator;
use remap_manifest::RemapToml;

use super::{Outcome, UnwrapOrExit, compile, print_diagnostics};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to remap.toml (defaults to ./remap.toml)
    #[arg(short, long, default_value = "remap.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to `generated/` next to remap.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let remap_toml = RemapToml::open(&self.config).unwrap_or_exit();
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| remap_toml.root().join("generated"));

        let ctx = match compile(remap_toml.into_manifest())? {
            Outcome::Rejected(diagnostics) => {
                print_diagnostics(&diagnostics);
                std::process::exit(1);
            }
            Outcome::Compiled(ctx) => ctx,
        };
        print_diagnostics(&ctx.diagnostics);

        let output = ctx.output.clone().unwrap_or_default();
        let generator = Generator::new(&output);

        if self.dry_run {
            self.run_preview(&generator);
        } else {
            let result = generator
                .generate(&output_dir)
                .wrap_err("Failed to generate code")?;

            for path in &result.written {
                println!("  + {path}");
            }
            println!(
                "Generated {} mapper{} into {} ({} written, {} unchanged)",
                output.mappers.len(),
                if output.mappers.len() == 1 { "" } else { "s" },
                output_dir.display(),
                result.written.len(),
                result.unchanged.len()
            );
        }

        // Mappers that failed were skipped; the others are still written.
        if ctx.has_errors() {
            eprintln!("\n{} mapper error(s)", ctx.error_count());
            std::process::exit(1);
        }
        Ok(())
    }

    fn run_preview<G: LanguageCodegen>(&self, generator: &G) {
        let files = generator.preview();

        for file in &files {
            println!("── {} ──", file.path);
            println!("{}", file.content);
        }

        println!("── Summary ──");
        println!("{} files would be generated", files.len());
    }
}
