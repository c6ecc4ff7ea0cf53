//! minjs-drv - Pipeline driver.
//!
//! Wires the phases together: document → scanner → parser → (reference
//! resolution) → printer. This crate owns the public entry points callers
//! use:
//!
//! - [`parse`]: source text to AST plus diagnostics
//! - [`Session::minify`]: source text to minified text
//!
//! Optimization passes live outside the core: a caller that wants them
//! runs its visitors over the [`ParsedProgram`] between [`parse`] and
//! [`print`].

use minjs_out::{print_program, OutputSettings};
use minjs_par::ast::Block;
use minjs_par::{resolve_references, ParseSettings, Parser, ScopeTree};
use minjs_util::{Diagnostic, Document, Handler, UndefinedReference};

pub use minjs_out::{BlockStart, OutputMode};
pub use minjs_par::SourceMode;

/// Everything the driver needs to run one compression.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Display name used in diagnostics
    pub file_name: String,
    pub parse: ParseSettings,
    pub output: OutputSettings,
}

impl Config {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }
}

/// A parse result: the AST, the scope tree populated alongside it, and
/// everything the handler collected.
#[derive(Debug)]
pub struct ParsedProgram {
    pub program: Block,
    pub scopes: ScopeTree,
    pub diagnostics: Vec<Diagnostic>,
    pub undefined_references: Vec<UndefinedReference>,
}

impl ParsedProgram {
    /// True when no severity 0–1 diagnostic was reported.
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// The minified text plus the diagnostics produced along the way.
#[derive(Debug)]
pub struct MinifyOutput {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `source` under `settings`, returning the AST and diagnostics.
///
/// Parsing always returns an AST, possibly partial; consult the
/// diagnostics' `can_recover` flags to decide whether downstream passes
/// should still run.
pub fn parse(file_name: &str, source: &str, settings: &ParseSettings) -> ParsedProgram {
    let document = Document::new(file_name, source);
    let handler = Handler::new();
    let parser = Parser::new(&document, &handler, settings.clone());
    let output = parser.parse();
    let mut scopes = output.scopes;
    let program = output.program;
    resolve_references(&mut scopes, &program, &handler);
    ParsedProgram {
        program,
        scopes,
        diagnostics: handler.take_diagnostics(),
        undefined_references: handler.take_undefined_references(),
    }
}

/// Print a parsed program under `settings`.
pub fn print(program: &Block, settings: &OutputSettings) -> String {
    print_program(program, settings)
}

/// One configured compression pipeline.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline over `source`.
    pub fn minify(&self, source: &str) -> MinifyOutput {
        let parsed = parse(&self.config.file_name, source, &self.config.parse);
        let code = print(&parsed.program, &self.config.output);
        MinifyOutput {
            code,
            diagnostics: parsed.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_minifies() {
        let session = Session::new(Config::new("input.js"));
        let output = session.minify("var answer = 40 + 2;");
        assert_eq!(output.code, "var answer=40+2");
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_reports_diagnostics() {
        let parsed = parse("bad.js", "var a = ;", &ParseSettings::default());
        assert!(!parsed.is_clean());
        assert!(!parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_undefined_references_surface() {
        let parsed = parse("refs.js", "var a; a = missing;", &ParseSettings::default());
        assert_eq!(parsed.undefined_references.len(), 1);
        assert_eq!(parsed.undefined_references[0].name.as_str(), "missing");
    }
}
