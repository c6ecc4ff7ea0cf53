//! Edge case tests for minjs-par
