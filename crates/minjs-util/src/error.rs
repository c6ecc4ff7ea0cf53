//! Core error types for minjs-util crate
//!
//! This module defines error types used throughout the util crate.

use thiserror::Error;

/// Error type for document operations
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Span out of bounds for the document
    #[error("Span out of bounds: document has {file_len} bytes, span is {span_start}..{span_end}")]
    SpanOutOfBounds {
        file_len: usize,
        span_start: usize,
        span_end: usize,
    },

    /// Span offsets split a UTF-8 sequence
    #[error("Span does not fall on character boundaries: {span_start}..{span_end}")]
    NotACharBoundary { span_start: usize, span_end: usize },
}

/// Result type alias for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
