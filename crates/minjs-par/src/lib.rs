//! minjs-par - Recursive-descent parser for JavaScript.
//!
//! The parser consumes the token stream from [`minjs_lex::Scanner`] and
//! builds the typed AST defined in [`ast`]. It is built to keep going:
//! lexical errors never reach it (the scanner synthesizes surrogates),
//! and syntactic errors produce a [`Recovery`] value carrying the offending
//! token plus whatever partial node was built, which unwinds to the nearest
//! enclosing production whose *no-skip set* covers the token. Panic-mode
//! skipping is bounded; after 50 consecutively skipped tokens the parse
//! gives up and returns what it has.
//!
//! The parse always returns an AST, possibly partial, alongside the scope
//! tree it populated. Diagnostics and undefined-reference events flow
//! through the shared [`minjs_util::Handler`].

pub mod ast;
pub mod equiv;
pub mod primitive;
pub mod scope;
pub mod visit;

mod expr;
mod stmt;

mod edge_cases;

pub use ast::*;
pub use equiv::{block_equivalent, expr_equivalent, stmt_equivalent};
pub use primitive::PrimitiveType;
pub use scope::{resolve_references, Field, FieldKind, Scope, ScopeId, ScopeKind, ScopeTree};
pub use visit::Visitor;

use rustc_hash::FxHashMap;

use minjs_lex::{Scanner, ScannerSettings, Token, TokenKind};
use minjs_util::{Document, ErrorKind, Handler, Span, Symbol};

/// What the source text is supposed to be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// A whole program: a list of source elements
    #[default]
    Program,
    /// A single expression, returned wrapped in a one-statement block
    Expression,
    /// The body of an implicit `function(event){…}`
    EventHandler,
}

/// Parse-time settings.
#[derive(Clone, Debug, Default)]
pub struct ParseSettings {
    pub source_mode: SourceMode,
    /// Initial strict flag for the root scope
    pub strict_mode: bool,
    /// Preprocessor name definitions consulted by `///#IF`
    pub preprocessor_values: FxHashMap<String, String>,
    pub allow_embedded_asp_net_blocks: bool,
    pub ignore_conditional_compilation: bool,
    pub preserve_important_comments: bool,
    pub strip_debug_statements: bool,
    /// Legacy Mozilla const: function-scoped, initializer optional
    pub const_statements_mozilla: bool,
}

impl ParseSettings {
    fn scanner_settings(&self) -> ScannerSettings {
        ScannerSettings {
            ignore_conditional_compilation: self.ignore_conditional_compilation,
            allow_embedded_asp_net_blocks: self.allow_embedded_asp_net_blocks,
            strip_debug_statements: self.strip_debug_statements,
            collect_important_comments: self.preserve_important_comments,
        }
    }
}

/// The recovery value produced by a failed production: the token that
/// stopped the parse and the partially-built node, if any survived.
#[derive(Debug)]
pub struct Recovery {
    pub token: Token,
    pub partial: Option<PartialNode>,
}

/// A partially-constructed node carried through recovery.
#[derive(Debug)]
pub enum PartialNode {
    Stmt(Box<Stmt>),
    Expr(Box<Expr>),
}

/// Result type threaded through every production.
pub type PResult<T> = Result<T, Recovery>;

/// Recovery stops skipping at a token that can start or end a statement.
pub(crate) const NOSKIP_STATEMENT: &[TokenKind] = &[
    TokenKind::EndOfFile,
    TokenKind::Semicolon,
    TokenKind::LeftCurly,
    TokenKind::RightCurly,
    TokenKind::Var,
    TokenKind::Let,
    TokenKind::Const,
    TokenKind::Function,
    TokenKind::If,
    TokenKind::For,
    TokenKind::Do,
    TokenKind::While,
    TokenKind::Switch,
    TokenKind::Try,
    TokenKind::Throw,
    TokenKind::Return,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::With,
    TokenKind::Debugger,
];

/// Inside a switch body, case labels are additional sync points.
pub(crate) const NOSKIP_CASE: &[TokenKind] =
    &[TokenKind::Case, TokenKind::Default, TokenKind::RightCurly];

/// Inside a parenthesized clause.
pub(crate) const NOSKIP_PAREN: &[TokenKind] =
    &[TokenKind::RightParenthesis, TokenKind::LeftCurly];

/// Panic-mode recovery gives up after this many consecutive skips.
const MAX_SKIPPED_TOKENS: u32 = 50;

/// Everything a parse produces besides diagnostics: the AST and the scope
/// tree populated alongside it.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Block,
    pub scopes: ScopeTree,
}

/// Tracks one label while its labeled statement parses.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LabelInfo {
    pub(crate) name: Symbol,
    /// The labeled statement chain ends in an iteration statement, making
    /// this a valid `continue` target
    pub(crate) is_loop: bool,
}

/// The recursive-descent parser.
pub struct Parser<'a> {
    pub(crate) scanner: Scanner<'a>,
    pub(crate) document: &'a Document,
    pub(crate) handler: &'a Handler,
    pub(crate) settings: ParseSettings,

    /// One-token lookahead buffer.
    pub(crate) current: Token,
    /// A line terminator preceded `current`.
    pub(crate) newline_before: bool,
    /// Kind of the token consumed before `current`.
    pub(crate) prev_token_kind: TokenKind,

    /// Stack of no-skip sets pushed by enclosing productions.
    pub(crate) no_skip_stack: Vec<&'static [TokenKind]>,
    /// Consecutive tokens dropped by panic-mode recovery.
    pub(crate) skipped_in_a_row: u32,
    /// Recovery exhausted its budget; unwind to the top.
    pub(crate) aborted: bool,

    pub(crate) scopes: ScopeTree,
    pub(crate) scope_stack: Vec<ScopeId>,

    /// Active labels, innermost last.
    pub(crate) labels: Vec<LabelInfo>,
    /// Nesting depth of iteration statements.
    pub(crate) iteration_depth: usize,
    /// Nesting depth of constructs an unlabeled `break` may exit.
    pub(crate) breakable_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `document`, reporting through `handler`.
    pub fn new(document: &'a Document, handler: &'a Handler, settings: ParseSettings) -> Self {
        let mut scanner = Scanner::new(document, handler, settings.scanner_settings());
        for name in settings.preprocessor_values.keys() {
            scanner.define_name(Symbol::intern(name));
        }

        let mut parser = Self {
            scanner,
            document,
            handler,
            settings: settings.clone(),
            current: Token::new(TokenKind::EndOfFile, Span::DUMMY),
            newline_before: false,
            prev_token_kind: TokenKind::EndOfFile,
            no_skip_stack: Vec::new(),
            skipped_in_a_row: 0,
            aborted: false,
            scopes: ScopeTree::new(settings.strict_mode),
            scope_stack: vec![ScopeId::GLOBAL],
            labels: Vec::new(),
            iteration_depth: 0,
            breakable_depth: 0,
        };
        parser.advance();
        parser
    }

    /// Run the parse for the configured [`SourceMode`].
    ///
    /// Always returns an AST, possibly partial. A stray recovery value
    /// reaching this level is reported as an application error.
    pub fn parse(mut self) -> ParseOutput {
        let program = match self.settings.source_mode {
            SourceMode::Program => self.parse_program(),
            SourceMode::Expression => self.parse_expression_program(),
            SourceMode::EventHandler => self.parse_event_handler(),
        };
        ParseOutput {
            program,
            scopes: self.scopes,
        }
    }

    fn parse_program(&mut self) -> Block {
        self.no_skip_stack.push(NOSKIP_STATEMENT);
        let start = self.current.span;
        let stmts = self.parse_source_elements(TokenKind::EndOfFile);
        self.no_skip_stack.pop();
        Block {
            span: start.merge(self.current.span),
            stmts,
            scope: None,
        }
    }

    fn parse_expression_program(&mut self) -> Block {
        let start = self.current.span;
        let stmt = match self.parse_expression(false) {
            Ok(expr) => Stmt::Expr(ExprStatement {
                span: expr.span(),
                expr,
                strip: false,
            }),
            Err(recovery) => {
                self.report_application_error(&recovery);
                match recovery.partial {
                    Some(PartialNode::Expr(expr)) => Stmt::Expr(ExprStatement {
                        span: expr.span(),
                        expr: *expr,
                        strip: false,
                    }),
                    Some(PartialNode::Stmt(stmt)) => *stmt,
                    None => Stmt::Empty(start),
                }
            }
        };
        Block {
            span: start.merge(self.current.span),
            stmts: vec![stmt],
            scope: None,
        }
    }

    fn parse_event_handler(&mut self) -> Block {
        // the input is the body of an implicit function(event){…}
        let scope = self.scopes.push_scope(ScopeKind::Function, self.current_scope());
        self.scopes.define(
            scope,
            Symbol::intern("event"),
            FieldKind::Parameter { position: 0 },
            Span::DUMMY,
        );
        self.scope_stack.push(scope);
        self.no_skip_stack.push(NOSKIP_STATEMENT);
        let start = self.current.span;
        let stmts = self.parse_source_elements(TokenKind::EndOfFile);
        self.no_skip_stack.pop();
        self.scope_stack.pop();
        Block {
            span: start.merge(self.current.span),
            stmts,
            scope: Some(scope),
        }
    }

    // ---- token plumbing ----

    /// Advance the lookahead buffer, skipping surrogate error tokens (their
    /// diagnostics were already reported by the scanner).
    pub(crate) fn advance(&mut self) {
        self.prev_token_kind = self.current.kind;
        loop {
            let token = self.scanner.next_token();
            let newline = self.scanner.found_newline();
            if token.kind == TokenKind::Error {
                continue;
            }
            self.current = token;
            self.newline_before = newline;
            return;
        }
    }

    /// Peek one token past `current` without committing the scanner.
    pub(crate) fn peek(&self) -> Token {
        let mut lookahead = self.scanner.clone();
        loop {
            let token = lookahead.next_token();
            if token.kind != TokenKind::Error {
                return token;
            }
        }
    }

    /// The source text of a token.
    pub(crate) fn token_text(&self, token: &Token) -> &'a str {
        self.document.snippet(&token.span).unwrap_or("")
    }

    /// Report `kind` at the current token.
    pub(crate) fn report_current(&self, kind: ErrorKind) {
        let excerpt = self.token_text(&self.current).to_owned();
        self.handler.report(kind, self.current.span, excerpt);
    }

    /// Report `kind` at an arbitrary span.
    pub(crate) fn report_at(&self, kind: ErrorKind, span: Span) {
        let excerpt = self.document.snippet(&span).unwrap_or("").to_owned();
        self.handler.report(kind, span, excerpt);
    }

    /// Consume the expected token or report `err` and carry on without it.
    pub(crate) fn expect(&mut self, kind: TokenKind, err: ErrorKind) -> bool {
        if self.current.kind == kind {
            self.advance();
            true
        } else {
            self.report_current(err);
            false
        }
    }

    /// Build a recovery value at the current token, reporting `kind`.
    pub(crate) fn recovery(&self, kind: ErrorKind, partial: Option<PartialNode>) -> Recovery {
        self.report_current(kind);
        Recovery {
            token: self.current,
            partial,
        }
    }

    /// True when any pushed no-skip set covers `kind`.
    pub(crate) fn in_no_skip_set(&self, kind: TokenKind) -> bool {
        self.no_skip_stack.iter().any(|set| set.contains(&kind))
    }

    /// Panic-mode recovery: drop tokens until one appears in a no-skip set.
    /// Returns `false` when the skip budget is exhausted and the parse must
    /// give up.
    pub(crate) fn skip_to_no_skip_token(&mut self) -> bool {
        while !self.in_no_skip_set(self.current.kind) {
            if self.current.kind == TokenKind::EndOfFile {
                return true;
            }
            self.skipped_in_a_row += 1;
            if self.skipped_in_a_row > MAX_SKIPPED_TOKENS {
                self.report_current(ErrorKind::TooManySkippedTokens);
                self.aborted = true;
                return false;
            }
            self.advance();
        }
        true
    }

    fn report_application_error(&self, recovery: &Recovery) {
        self.handler.report(
            ErrorKind::ApplicationError,
            recovery.token.span,
            self.token_text(&recovery.token).to_owned(),
        );
    }

    // ---- scopes ----

    pub(crate) fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack never empties")
    }

    pub(crate) fn current_strict(&self) -> bool {
        self.scopes.scope(self.current_scope()).strict
    }

    pub(crate) fn set_current_strict(&mut self) {
        let scope = self.current_scope();
        self.scopes.scope_mut(scope).strict = true;
    }

    /// Declare a name, routing `var`-style declarations to the hoist
    /// target and checking strict-mode restricted names.
    pub(crate) fn declare(&mut self, name: Symbol, kind: FieldKind, span: Span) {
        let target = match kind {
            FieldKind::Var | FieldKind::FunctionDecl => {
                self.scopes.hoist_target(self.current_scope())
            }
            _ => self.current_scope(),
        };
        if self.current_strict()
            && (name == minjs_util::symbol::WK_EVAL || name == minjs_util::symbol::WK_ARGUMENTS)
        {
            self.report_at(ErrorKind::StrictModeRestrictedName, span);
        }
        let fresh = self.scopes.define(target, name, kind, span);
        if !fresh {
            if let FieldKind::Parameter { .. } = kind {
                self.report_at(ErrorKind::DuplicateParameterName, span);
            }
        }
    }

    // ---- automatic semicolon insertion ----

    /// Terminate a statement: consume `;`, or apply ASI when the next token
    /// is `}`, end of input, or a line terminator was crossed. Otherwise a
    /// missing-semicolon error is reported and parsing continues.
    pub(crate) fn expect_semicolon(&mut self, span: &mut Span) {
        match self.current.kind {
            TokenKind::Semicolon => {
                *span = span.merge(self.current.span);
                self.advance();
            }
            TokenKind::RightCurly | TokenKind::EndOfFile => {
                // ASI without a warning
            }
            _ if self.newline_before => {
                self.report_at(ErrorKind::SemicolonInsertion, *span);
            }
            _ => {
                self.report_current(ErrorKind::NoSemicolon);
            }
        }
    }
}
