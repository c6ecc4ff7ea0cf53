//! Document module - Immutable source buffers.
//!
//! A [`Document`] owns the text of one input and a file identifier. It is
//! constructed once and read by every downstream consumer (scanner, parser,
//! diagnostics) without synchronization. Spans reference documents by
//! [`FileId`]; the document resolves them back to text and line/column
//! positions.

use crate::error::{DocumentError, DocumentResult};
use crate::span::{FileId, Span};

/// An immutable source buffer plus its file identifier.
///
/// # Examples
///
/// ```
/// use minjs_util::document::Document;
///
/// let doc = Document::new("input.js", "var x = 1;\nvar y = 2;\n");
/// assert_eq!(doc.name(), "input.js");
/// assert_eq!(doc.line_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// Display name of the input (file path or pseudo-name)
    name: String,
    /// The raw source text
    text: String,
    /// Byte offset of the start of each line, line 1 first
    line_starts: Vec<usize>,
    /// Identifier used by spans referencing this document
    file_id: FileId,
}

impl Document {
    /// Create a document from a name and source text.
    ///
    /// The line-start table is computed eagerly; lookups afterwards are
    /// binary searches.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    // \r\n counts as one terminator
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            name: name.into(),
            text,
            line_starts,
            file_id: FileId::DUMMY,
        }
    }

    /// Create a document with an explicit file id.
    pub fn with_file_id(name: impl Into<String>, text: impl Into<String>, file_id: FileId) -> Self {
        let mut doc = Self::new(name, text);
        doc.file_id = file_id;
        doc
    }

    /// Display name of the input.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the source in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True if the source is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Identifier used by spans referencing this document.
    #[inline]
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Number of lines, counting the line after a trailing terminator.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The raw code slice a span covers.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SpanOutOfBounds`] when the span does not lie
    /// within the document, and [`DocumentError::NotACharBoundary`] when the
    /// offsets split a UTF-8 sequence.
    pub fn snippet(&self, span: &Span) -> DocumentResult<&str> {
        if span.start > span.end || span.end > self.text.len() {
            return Err(DocumentError::SpanOutOfBounds {
                file_len: self.text.len(),
                span_start: span.start,
                span_end: span.end,
            });
        }
        if !self.text.is_char_boundary(span.start) || !self.text.is_char_boundary(span.end) {
            return Err(DocumentError::NotACharBoundary {
                span_start: span.start,
                span_end: span.end,
            });
        }
        Ok(&self.text[span.start..span.end])
    }

    /// Line (1-based) and column (0-based) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.text[line_start..offset.min(self.text.len())]
            .chars()
            .count() as u32;
        (line_idx as u32 + 1, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_line_count() {
        let doc = Document::new("a.js", "one\ntwo\nthree");
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn test_document_crlf() {
        let doc = Document::new("a.js", "one\r\ntwo");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_col(5), (2, 0));
    }

    #[test]
    fn test_document_snippet() {
        let doc = Document::new("a.js", "var x = 1;");
        let span = Span::new(4, 5, 1, 4);
        assert_eq!(doc.snippet(&span).unwrap(), "x");
    }

    #[test]
    fn test_document_snippet_out_of_bounds() {
        let doc = Document::new("a.js", "var");
        let span = Span::new(0, 10, 1, 0);
        assert!(doc.snippet(&span).is_err());
    }

    #[test]
    fn test_document_line_col() {
        let doc = Document::new("a.js", "ab\ncd\nef");
        assert_eq!(doc.line_col(0), (1, 0));
        assert_eq!(doc.line_col(1), (1, 1));
        assert_eq!(doc.line_col(3), (2, 0));
        assert_eq!(doc.line_col(7), (3, 1));
    }

    #[test]
    fn test_document_line_col_multibyte() {
        let doc = Document::new("a.js", "a\u{00e9}b");
        assert_eq!(doc.line_col(3), (1, 2));
    }
}
