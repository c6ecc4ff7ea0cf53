//! minjs-out - The output printer.
//!
//! Walks the AST from `minjs-par` and emits JavaScript source: single-line
//! minified by default, or indented multi-line. The printer honors the
//! rules the parser relies on so output re-parses to a structurally
//! equivalent tree: ASI-aware semicolon handling, precedence-aware
//! parenthesization, the no-in restriction inside `for` initializers, and
//! the adjacency quirks (`a+ ++b`, `typeof x`, `a/ /re/`).

pub mod number;
pub mod printer;
pub mod string_lit;
pub mod writer;

mod edge_cases;

pub use number::minify_number;
pub use printer::Printer;
pub use string_lit::{minify_string, StringPolicy};

use minjs_par::ast::Block;

/// Whole-output layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Everything on one line; whitespace only where the grammar needs it
    #[default]
    SingleLine,
    /// Indented, one statement per line
    MultipleLines,
}

/// Where an opening brace lands in multi-line output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockStart {
    NewLine,
    #[default]
    SameLine,
    /// Follow the source layout; rendered as [`BlockStart::SameLine`]
    /// since the tree does not retain source line structure
    UseSource,
}

/// Print-time settings (§external interface): layout plus the printer
/// policy flags. Pass-level flags consumed by external optimization
/// visitors (`local_renaming`, `eval_literal_expressions`,
/// `remove_unneeded_code`) are carried but not interpreted here.
#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub output_mode: OutputMode,
    pub indent_size: usize,
    /// Soft column limit governing replaceable semicolons and optional
    /// breaks in multi-line output
    pub line_break_threshold: usize,
    pub blocks_start_on_same_line: BlockStart,
    /// Always emit a terminating semicolon at the end of the root block
    pub term_semicolons: bool,

    /// Minify literals and unquote property names; when off, constants and
    /// directives re-emit their original lexemes verbatim
    pub minify_code: bool,
    pub preserve_important_comments: bool,
    pub remove_function_expression_names: bool,
    pub quote_object_literal_properties: bool,
    pub inline_safe_strings: bool,
    pub mac_safari_quirks: bool,
    pub always_escape_non_ascii: bool,

    // accepted for external passes
    pub local_renaming: bool,
    pub eval_literal_expressions: bool,
    pub remove_unneeded_code: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::SingleLine,
            indent_size: 4,
            line_break_threshold: usize::MAX,
            blocks_start_on_same_line: BlockStart::SameLine,
            term_semicolons: false,
            minify_code: true,
            preserve_important_comments: true,
            remove_function_expression_names: false,
            quote_object_literal_properties: false,
            inline_safe_strings: false,
            mac_safari_quirks: false,
            always_escape_non_ascii: false,
            local_renaming: false,
            eval_literal_expressions: false,
            remove_unneeded_code: false,
        }
    }
}

/// Print a parsed program with the given settings.
pub fn print_program(program: &Block, settings: &OutputSettings) -> String {
    let mut printer = Printer::new(settings);
    printer.print_program(program);
    printer.finish()
}
