//! Raw comments and their formatted text.

use crate::source::SourceRange;

/// A comment as lexed, markers included.
#[derive(Debug, Clone)]
pub struct RawComment {
    pub text: String,
    pub range: SourceRange,
}

impl RawComment {
    pub fn new(text: &str, range: SourceRange) -> Self {
        Self { text: text.to_string(), range }
    }

    /// The comment text with markers stripped: `//`-style markers (including
    /// `///` and `//!`) are removed per line, block markers are removed at
    /// the ends, and one leading space after a marker is dropped.
    pub fn formatted_text(&self) -> String {
        let body = self.text.trim();
        let body = if let Some(inner) = body.strip_prefix("/*") {
            inner.strip_suffix("*/").unwrap_or(inner)
        } else {
            body
        };

        let mut lines = Vec::new();
        for line in body.lines() {
            let mut line = line.trim_start();
            while let Some(rest) = line.strip_prefix('/') {
                line = rest;
            }
            // Block-comment continuation lines conventionally start with `*`.
            if let Some(rest) = line.strip_prefix('*') {
                line = rest;
            }
            line = line.strip_prefix(' ').unwrap_or(line);
            lines.push(line.trim_end());
        }
        while lines.last() == Some(&"") {
            lines.pop();
        }
        while lines.first() == Some(&"") {
            lines.remove(0);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> RawComment {
        RawComment::new(text, SourceRange::default())
    }

    #[test]
    fn line_comment_markers_are_stripped() {
        assert_eq!(comment("// hello").formatted_text(), "hello");
        assert_eq!(comment("/// doc line").formatted_text(), "doc line");
        assert_eq!(comment("// a\n// b").formatted_text(), "a\nb");
    }

    #[test]
    fn block_comment_markers_are_stripped() {
        assert_eq!(comment("/* hello */").formatted_text(), "hello");
        assert_eq!(comment("/*\n * a\n * b\n */").formatted_text(), "a\nb");
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        assert_eq!(comment("// padded   ").formatted_text(), "padded");
    }
}
