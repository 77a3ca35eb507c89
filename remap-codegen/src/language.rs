//! Target-language generator traits.

use std::path::Path;

use eyre::Result;
use remap_ir::TypeRef;

/// A backend that turns generated mapper specs into source files.
pub trait LanguageCodegen {
    /// Language identifier (e.g. "rust").
    fn language(&self) -> &'static str;

    /// File extension for generated source files (e.g. "rs").
    fn file_extension(&self) -> &'static str;

    /// Render every file without touching the disk.
    fn preview(&self) -> Vec<PreviewFile>;

    /// Write every file under `output_dir`, skipping files whose content is unchanged.
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult>;
}

/// Files touched by [`LanguageCodegen::generate`], relative to the output directory.
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
}

/// A generated file for preview.
#[derive(Debug)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    pub content: String,
}

/// Spells model types in a target language.
pub trait TypeMapper {
    fn language(&self) -> &'static str;

    /// The non-null spelling of `ty`.
    fn map_type(&self, ty: &TypeRef) -> String;

    /// The spelling of a possibly absent `inner` type.
    fn map_optional(&self, inner: String) -> String {
        format!("Option<{inner}>")
    }

    fn map_ref(&self, ty: &TypeRef) -> String {
        let inner = self.map_type(ty);
        if ty.nullable {
            self.map_optional(inner)
        } else {
            inner
        }
    }
}
