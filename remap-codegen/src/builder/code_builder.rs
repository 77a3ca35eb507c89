//! Code builder utility for generating properly indented code.

use super::Indent;

/// Line-oriented writer that tracks indentation.
///
/// # Example
///
/// ```
/// use remap_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::rust();
/// builder
///     .push_line("fn main() {")
///     .push_indent()
///     .push_line("println!(\"Hello\");")
///     .push_dedent()
///     .push_line("}");
///
/// assert_eq!(builder.build(), "fn main() {\n    println!(\"Hello\");\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// A builder with 4-space indentation.
    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add several lines, each re-indented at the current level.
    ///
    /// Used for multi-line expressions rendered on their own.
    pub fn push_lines(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            if line.is_empty() {
                self.push_blank();
            } else {
                self.push_line(line);
            }
        }
        self
    }

    /// Add a blank line (no indentation).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a Rust doc comment.
    pub fn push_rust_doc(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.write_indent();
            if line.is_empty() {
                self.buffer.push_str("///\n");
            } else {
                self.buffer.push_str("/// ");
                self.buffer.push_str(line);
                self.buffer.push('\n');
            }
        }
        self
    }

    /// The string for one indent level.
    pub fn indent_str(&self) -> &'static str {
        self.indent.as_str()
    }

    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_indent() {
        let mut builder = CodeBuilder::rust();
        builder
            .push_line("impl A {")
            .push_indent()
            .push_line("fn a(&self) {")
            .push_indent()
            .push_line("todo!()")
            .push_dedent()
            .push_line("}")
            .push_dedent()
            .push_line("}");
        assert_eq!(
            builder.build(),
            "impl A {\n    fn a(&self) {\n        todo!()\n    }\n}\n"
        );
    }

    #[test]
    fn test_push_lines_reindents() {
        let mut builder = CodeBuilder::rust();
        builder.push_indent().push_lines("Model {\n    id: dto.id,\n}");
        assert_eq!(builder.build(), "    Model {\n        id: dto.id,\n    }\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut builder = CodeBuilder::rust();
        builder.push_dedent().push_line("x");
        assert_eq!(builder.build(), "x\n");
    }

    #[test]
    fn test_rust_doc_multiline() {
        let mut builder = CodeBuilder::rust();
        builder.push_rust_doc("First.\n\nSecond.");
        assert_eq!(builder.build(), "/// First.\n///\n/// Second.\n");
    }
}
