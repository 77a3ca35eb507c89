//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Holds the source, filename and the current path through the manifest
/// (`["mappers", "SampleMapper", "map"]`), so nested checks can name where
/// they failed.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "remap.toml");
/// ctx.validate_name("SampleMapper", "mapper")?;
///
/// let nested = ctx.push("SampleMapper");
/// nested.validate_name("map", "function")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    /// The current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// A context description for error messages, e.g. "field in 'SampleDto'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.source.src(), name)
    }

    /// Validate that a name can be used as a Rust identifier.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if is_rust_keyword(name) {
            return Err(self.source.reserved_keyword_error(
                name,
                self.context_for(kind),
                self.find_span(name),
            ));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }

        Ok(())
    }

    /// Fail with a validation error, pointing at `anchor` when it can be found.
    pub fn fail<T>(&self, message: impl Into<String>, anchor: &str) -> Result<T> {
        Err(self
            .source
            .validation_error_at(message, self.find_span(anchor)))
    }

    pub fn unknown_type<T>(&self, name: &str, kind: &str) -> Result<T> {
        Err(self.source.unknown_type_error(
            name,
            self.context_for(kind),
            find_type_span(self.source.src(), name),
        ))
    }
}

/// Rust reserved keywords that cannot be used as identifiers
/// Source: https://doc.rust-lang.org/reference/keywords.html
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
    // Weak keywords
    "union",
];

pub(crate) fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Find the span of a table or key name in the TOML source.
/// Searches for `.name]`, `.name.`, inline `{ name =`, and `name = "value"`.
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    let headers = [format!(".{}]", name), format!(".{}.", name)];
    for pattern in &headers {
        if let Some(pos) = src.find(pattern) {
            return Some(SourceSpan::from((pos + 1, name.len())));
        }
    }

    let inline_patterns = [
        (format!("{{ {} ", name), 2usize),
        (format!("{{ {}=", name), 2usize),
        (format!("{{{}=", name), 1usize),
        (format!(", {} ", name), 2usize),
        (format!(", {}=", name), 2usize),
        (format!(",{}=", name), 1usize),
    ];
    for (pattern, skip) in &inline_patterns {
        if let Some(pos) = src.find(pattern) {
            return Some(SourceSpan::from((pos + skip, name.len())));
        }
    }

    for quote in ['"', '\''] {
        let pattern = format!("name = {quote}{name}{quote}");
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos + 8, name.len())));
        }
    }

    // Values in string arrays, e.g. defaults = ["tags"]
    let quoted = format!("\"{name}\"");
    src.find(&quoted)
        .map(|pos| SourceSpan::from((pos + 1, name.len())))
}

/// Find a type name inside a quoted type expression.
pub(crate) fn find_type_span(src: &str, name: &str) -> Option<SourceSpan> {
    let boundary = |c: Option<char>| !c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    for prefix in ["\"", "<", ", ", ","] {
        let pattern = format!("{prefix}{name}");
        let mut from = 0;
        while let Some(found) = src[from..].find(&pattern) {
            let start = from + found + prefix.len();
            if boundary(src[start + name.len()..].chars().next()) {
                return Some(SourceSpan::from((start, name.len())));
            }
            from = start;
        }
    }
    None
}

/// Validate that a name is a valid Rust identifier.
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if is_rust_keyword(name) {
        return Some("name is a Rust reserved keyword");
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("map").is_none());
        assert!(validate_identifier("nestedId").is_none());
        assert!(validate_identifier("SampleMapper").is_none());
        assert!(validate_identifier("_private").is_none());
        assert!(validate_identifier("ONE_SAMPLE").is_none());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("").is_some());
        assert!(validate_identifier("1st").is_some());
        assert!(validate_identifier("nested-id").is_some());
        assert!(validate_identifier("dto.id").is_some());
        assert!(validate_identifier("fn").is_some());
    }

    #[test]
    fn test_is_rust_keyword() {
        assert!(is_rust_keyword("type"));
        assert!(is_rust_keyword("match"));
        assert!(!is_rust_keyword("map"));
    }

    #[test]
    fn test_find_name_span_table_header() {
        let src = "[mappers.SampleMapper]\nshape = \"interface\"";
        let span = find_name_span(src, "SampleMapper").unwrap();
        assert_eq!(span.offset(), 9);
        assert_eq!(span.len(), 12);
    }

    #[test]
    fn test_find_name_span_function_name() {
        let src = "[[mappers.SampleMapper.functions]]\nname = \"type\"";
        let span = find_name_span(src, "type").unwrap();
        assert_eq!(span.offset(), 43);
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn test_find_name_span_inline_table() {
        let src = "fields = { id = \"Long\", match = \"String\" }";
        let span = find_name_span(src, "match").unwrap();
        assert_eq!(span.offset(), 24);
    }

    #[test]
    fn test_find_type_span_skips_prefixes() {
        let src = "fields = { a = \"DtoList\", b = \"List<Dto>\" }";
        let span = find_type_span(src, "Dto").unwrap();
        assert_eq!(span.offset(), src.find("<Dto>").unwrap() + 1);
        assert_eq!(span.len(), 3);
    }
}
