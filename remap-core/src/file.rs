use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had exactly this content
    Unchanged,
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Prefix the content with a header comment block.
    pub fn with_header(mut self, header: &str) -> Self {
        self.content = format!("{header}\n\n{}", self.content);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `base`, creating parent directories.
    ///
    /// Identical content on disk is left untouched so regenerating does not
    /// bump modification times.
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = base.join(&self.path);
        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == self.content) {
            return Ok(WriteResult::Unchanged);
        }
        write_file(&path, &self.content)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        Ok(WriteResult::Written)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
