//! Highlighting backend seam.
//!
//! # Data Flow
//! ```text
//! handler (code, lexer name, formatter name, options)
//!     → lexer_by_name (fallback to "text")
//!     → Highlighter::highlight
//!     → Highlighter::style_defs (formatters that support them)
//! ```
//!
//! # Design Decisions
//! - Handlers only see the `Highlighter` trait; the engine is swappable
//! - Formatter options are an opaque JSON object, validated by the backend
//! - The bundled `PlainHighlighter` renders untokenized text only

pub mod plain;

use serde_json::{Map, Value};

pub use plain::PlainHighlighter;

/// Name of the lexer used when a requested one is unknown.
pub const FALLBACK: &str = "text";

/// Options handed to a formatter.
pub type FormatterOptions = Map<String, Value>;

/// Errors reported by a highlighting backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HighlightError {
    #[error("no lexer for alias '{0}' found")]
    UnknownLexer(String),

    #[error("no formatter for alias '{0}' found")]
    UnknownFormatter(String),

    #[error("invalid formatter option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("formatter '{0}' has no style definitions")]
    NoStyleDefs(String),
}

/// A syntax highlighting engine.
pub trait Highlighter: Send + Sync {
    fn has_lexer(&self, name: &str) -> bool;

    fn has_formatter(&self, name: &str) -> bool;

    /// Highlight `code` with the named lexer and formatter.
    fn highlight(
        &self,
        code: &str,
        lexer: &str,
        formatter: &str,
        options: &FormatterOptions,
    ) -> Result<String, HighlightError>;

    /// Style definitions of the named formatter, scoped to `selectors`.
    fn style_defs(
        &self,
        formatter: &str,
        selectors: &[String],
        options: &FormatterOptions,
    ) -> Result<String, HighlightError>;
}

/// `name` if the backend knows such a lexer, otherwise `fallback`.
pub fn lexer_by_name<'a>(highlighter: &dyn Highlighter, name: &'a str, fallback: &'a str) -> &'a str {
    if highlighter.has_lexer(name) {
        name
    } else {
        tracing::debug!(lexer = %name, fallback = %fallback, "Unknown lexer, falling back");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_fallback() {
        let highlighter = PlainHighlighter::new();

        assert_eq!(lexer_by_name(&highlighter, "text", FALLBACK), "text");
        assert_eq!(lexer_by_name(&highlighter, "brainfudge", FALLBACK), "text");
    }
}
