//! Edge case tests for minjs-lex
