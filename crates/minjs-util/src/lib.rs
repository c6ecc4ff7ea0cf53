//! minjs-util - Shared infrastructure for the minjs compressor.
//!
//! This crate holds everything the phase crates have in common:
//!
//! - [`document::Document`]: the immutable source buffer
//! - [`span::Span`]: source location descriptors carried by tokens and AST
//!   nodes
//! - [`symbol::Symbol`]: interned identifier/property/label names
//! - [`diagnostic`]: the error taxonomy, severity model, and the [`Handler`]
//!   sink the scanner, parser and resolution passes report through
//!
//! Nothing here knows about JavaScript syntax; that starts in `minjs-lex`.

pub mod diagnostic;
pub mod document;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, ErrorKind, Handler, ReferenceType, UndefinedReference};
pub use document::Document;
pub use error::{DocumentError, DocumentResult};
pub use span::{FileId, Span};
pub use symbol::Symbol;
