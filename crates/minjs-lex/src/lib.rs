//! minjs-lex - Lexical analysis for JavaScript source.
//!
//! The scanner turns a [`minjs_util::Document`] into a stream of [`Token`]s.
//! JavaScript lexing is context-sensitive in one famous place: a `/` is a
//! divide operator or the start of a regular-expression literal depending on
//! what the *parser* expects, so regex literals are only produced on request
//! via [`Scanner::scan_regex`].
//!
//! Whitespace, comments and line terminators never reach the parser as
//! tokens; the scanner records them in side channels (`found_newline`,
//! important-comment queue, `new_module`) that the parser samples between
//! tokens.

pub mod cursor;
pub mod scanner;
pub mod token;

mod edge_cases;

pub use scanner::{ImportantComment, Scanner, ScannerSettings, StringLiteral};
pub use token::{keyword_from_ident, OpPrec, Token, TokenKind};
