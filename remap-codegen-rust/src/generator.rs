use std::path::Path;

use eyre::Result;
use remap_codegen::{
    builder::GeneratedOutput,
    language::{GenerateResult, LanguageCodegen, PreviewFile},
};
use remap_core::{OutputFile, WriteResult};

use crate::files::{FactoryRs, GeneratedMod, MapperImplRs, RustSource};

/// Rust code generator for the mappers and factories of one generation pass.
pub struct Generator<'a> {
    output: &'a GeneratedOutput,
}

impl LanguageCodegen for Generator<'_> {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn preview(&self) -> Vec<PreviewFile> {
        self.files()
            .into_iter()
            .map(|file| PreviewFile {
                path: file.path().display().to_string(),
                content: file.content().to_string(),
            })
            .collect()
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let mut result = GenerateResult::default();
        for file in self.files() {
            let path = file.path().display().to_string();
            match file.write(output_dir)? {
                WriteResult::Written => result.written.push(path),
                WriteResult::Unchanged => result.unchanged.push(path),
            }
        }
        Ok(result)
    }
}

impl<'a> Generator<'a> {
    pub fn new(output: &'a GeneratedOutput) -> Self {
        Self { output }
    }

    /// Every file, mapper implementations first, then factories, then `mod.rs`.
    fn files(&self) -> Vec<OutputFile> {
        let mappers = self
            .output
            .mappers
            .iter()
            .map(|mapper| MapperImplRs::new(mapper).output_file());
        let factories = self
            .output
            .factories
            .iter()
            .map(|factory| FactoryRs::new(factory).output_file());
        mappers
            .chain(factories)
            .chain(std::iter::once(GeneratedMod::new(self.output).output_file()))
            .collect()
    }
}
