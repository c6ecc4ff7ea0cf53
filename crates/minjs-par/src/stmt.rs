//! Statement parsing: the dispatcher and one sub-parser per statement form.
//!
//! Statement lists are where error recovery lands: a failed production
//! unwinds here as a [`Recovery`], its partial node is kept, and panic-mode
//! skipping resynchronizes on the active no-skip sets.

use minjs_lex::TokenKind;
use minjs_util::{ErrorKind, Span, Symbol};

use crate::ast::*;
use crate::scope::{FieldKind, ScopeKind};
use crate::{LabelInfo, PResult, Parser, PartialNode, Recovery, NOSKIP_CASE, NOSKIP_STATEMENT};

impl<'a> Parser<'a> {
    /// Parse statements until `terminator`, handling directive prologues,
    /// important comments, and error recovery. Used for programs and
    /// function bodies.
    pub(crate) fn parse_source_elements(&mut self, terminator: TokenKind) -> Vec<Stmt> {
        self.parse_statement_list(terminator, true)
    }

    pub(crate) fn parse_statement_list(
        &mut self,
        terminator: TokenKind,
        directives: bool,
    ) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        let mut directive_ok = directives;
        loop {
            if self.aborted
                || self.current.kind == terminator
                || self.current.kind == TokenKind::EndOfFile
            {
                break;
            }
            // a ///#source directive starts a new module whose prologue may
            // carry directives again
            if self.scanner.take_new_module() {
                directive_ok = directives;
            }
            self.emit_important_comments(&mut stmts);
            if self.current.kind == terminator || self.current.kind == TokenKind::EndOfFile {
                break;
            }
            let iteration_start = self.current.span.start;

            match self.parse_statement() {
                Ok(stmt) => {
                    self.skipped_in_a_row = 0;
                    if directive_ok {
                        match self.as_directive(stmt) {
                            Ok(directive) => {
                                stmts.push(directive);
                                continue;
                            }
                            Err(stmt) => {
                                directive_ok = false;
                                stmts.push(stmt);
                            }
                        }
                    } else {
                        stmts.push(stmt);
                    }
                }
                Err(recovery) => {
                    if let Some(partial) = recovery.partial {
                        stmts.push(partial_to_stmt(partial));
                    }
                    if !self.skip_to_no_skip_token() {
                        break;
                    }
                    if self.current.kind == TokenKind::Semicolon {
                        self.advance();
                    } else if self.current.span.start == iteration_start
                        && self.current.kind != TokenKind::EndOfFile
                    {
                        // an entire iteration made no progress; drop the
                        // offending token rather than spin on it
                        self.advance();
                    }
                }
            }
        }
        stmts
    }

    /// Re-tag a leading string-literal expression statement as a directive
    /// prologue; `"use strict"` flips the enclosing scope strict.
    fn as_directive(&mut self, stmt: Stmt) -> Result<Stmt, Stmt> {
        if let Stmt::Expr(es) = &stmt {
            if let Expr::Constant(c) = &es.expr {
                if let PrimitiveValue::Str(value) = &c.value {
                    let use_strict = value == "use strict";
                    if use_strict {
                        self.set_current_strict();
                    }
                    return Ok(Stmt::Directive(DirectivePrologue {
                        span: es.span,
                        value: value.clone(),
                        use_strict,
                        raw: c.raw.clone().unwrap_or_default(),
                        may_have_issues: c.may_have_issues,
                    }));
                }
            }
        }
        Err(stmt)
    }

    /// Emit each queued important comment as its own pseudo-statement.
    pub(crate) fn emit_important_comments(&mut self, stmts: &mut Vec<Stmt>) {
        if !self.settings.preserve_important_comments {
            self.scanner.discard_important_comments();
            return;
        }
        for comment in self.scanner.take_important_comments() {
            stmts.push(Stmt::ImportantComment(ImportantCommentStatement {
                span: comment.span,
                text: comment.text,
            }));
        }
    }

    /// An embedded statement (loop body, if branch, label target) discards
    /// queued important comments so labels stay attached to real statements.
    fn parse_embedded_statement(&mut self) -> PResult<Stmt> {
        self.scanner.discard_important_comments();
        self.parse_statement()
    }

    /// The statement dispatcher: one switch on the current token.
    pub(crate) fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.current.kind {
            TokenKind::LeftCurly => {
                let block = self.parse_block()?;
                Ok(Stmt::Block(block))
            }
            TokenKind::Semicolon => {
                let span = self.current.span;
                self.advance();
                Ok(Stmt::Empty(span))
            }
            TokenKind::Var => self.parse_var_statement(),
            TokenKind::Const => self.parse_lexical_statement(true),
            TokenKind::Let => {
                // `let` only opens a declaration when an identifier follows;
                // otherwise it is a plain identifier expression
                if self.current_strict() || self.peek().kind.can_be_identifier(false) {
                    self.parse_lexical_statement(false)
                } else {
                    self.parse_expression_statement()
                }
            }
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Do => self.parse_do_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Debugger => self.parse_debugger_statement(),
            TokenKind::ConditionalComment => {
                let span = self.current.span;
                let text = self.token_text(&self.current).to_owned();
                self.advance();
                Ok(Stmt::ConditionalComment(ConditionalCommentStatement {
                    span,
                    text,
                }))
            }
            TokenKind::Else => {
                self.report_current(ErrorKind::ElseWithoutIf);
                self.advance();
                self.parse_statement()
            }
            TokenKind::Case | TokenKind::Default => {
                Err(self.recovery(ErrorKind::BadSwitch, None))
            }
            TokenKind::Identifier if self.peek().kind == TokenKind::Colon => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `{ … }` as a statement: opens a block scope.
    pub(crate) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.current.span;
        if !self.expect(TokenKind::LeftCurly, ErrorKind::NoLeftCurly) {
            return Err(Recovery {
                token: self.current,
                partial: None,
            });
        }
        let scope = self.scopes.push_scope(ScopeKind::Block, self.current_scope());
        self.scope_stack.push(scope);
        self.no_skip_stack.push(NOSKIP_STATEMENT);
        let stmts = self.parse_statement_list(TokenKind::RightCurly, false);
        self.no_skip_stack.pop();
        self.scope_stack.pop();
        let mut span = start;
        if self.current.kind == TokenKind::RightCurly {
            span = span.merge(self.current.span);
            self.advance();
        } else {
            self.report_current(ErrorKind::NoRightCurly);
        }
        Ok(Block {
            span,
            stmts,
            scope: Some(scope),
        })
    }

    fn parse_var_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        let decls = self.parse_declarations(FieldKind::Var, false, false, &mut span)?;
        self.expect_semicolon(&mut span);
        Ok(Stmt::Var(VarStatement { span, decls }))
    }

    fn parse_lexical_statement(&mut self, is_const: bool) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        let mozilla_const = is_const && self.settings.const_statements_mozilla;
        let kind = if mozilla_const {
            // legacy const is function-scoped like var
            FieldKind::Var
        } else if is_const {
            FieldKind::Const
        } else {
            FieldKind::Let
        };
        let decls = self.parse_declarations(kind, is_const && !mozilla_const, false, &mut span)?;
        self.expect_semicolon(&mut span);
        Ok(Stmt::Lexical(LexicalDeclaration {
            span,
            is_const,
            mozilla_const,
            decls,
        }))
    }

    /// Comma-separated declarator list shared by `var`/`let`/`const` and
    /// for-statement initializers.
    pub(crate) fn parse_declarations(
        &mut self,
        kind: FieldKind,
        require_init: bool,
        no_in: bool,
        span: &mut Span,
    ) -> PResult<Vec<VariableDeclaration>> {
        let mut decls = Vec::new();
        loop {
            let name = match self.expect_binding_identifier() {
                Some(name) => name,
                None => {
                    return Err(Recovery {
                        token: self.current,
                        partial: decls_partial(*span, decls),
                    });
                }
            };
            let name_span = name.1;
            self.declare(name.0, kind, name_span);
            let mut decl_span = name_span;

            let init = if self.current.kind == TokenKind::Assign {
                self.advance();
                let init = match self.parse_assignment_expression(no_in) {
                    Ok(expr) => expr,
                    Err(mut recovery) => {
                        decls.push(VariableDeclaration {
                            span: decl_span,
                            name: name.0,
                            name_span,
                            init: recovery.partial.take().and_then(partial_to_expr),
                        });
                        recovery.partial = decls_partial(*span, decls);
                        return Err(recovery);
                    }
                };
                decl_span = decl_span.merge(init.span());
                Some(init)
            } else {
                if require_init {
                    self.report_at(ErrorKind::NoEqual, name_span);
                }
                None
            };

            *span = span.merge(decl_span);
            decls.push(VariableDeclaration {
                span: decl_span,
                name: name.0,
                name_span,
                init,
            });

            if self.current.kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(decls)
    }

    /// Expect an identifier in binding position, tolerating contextual
    /// keywords where the grammar allows them.
    fn expect_binding_identifier(&mut self) -> Option<(Symbol, Span)> {
        let kind = self.current.kind;
        let strict = self.current_strict();
        if kind.can_be_identifier(strict) {
            if kind != TokenKind::Identifier && kind != TokenKind::Get && kind != TokenKind::Set {
                self.report_current(ErrorKind::KeywordUsedAsIdentifier);
            }
            let span = self.current.span;
            let name = self.current_identifier_symbol();
            self.advance();
            Some((name, span))
        } else {
            self.report_current(ErrorKind::NoIdentifier);
            None
        }
    }

    /// The interned name of the current identifier-ish token, consulting
    /// the scanner when the lexeme contained escapes.
    pub(crate) fn current_identifier_symbol(&mut self) -> Symbol {
        match self.scanner.take_identifier_text() {
            Some(decoded) => Symbol::intern(&decoded),
            None => Symbol::intern(self.token_text(&self.current)),
        }
    }

    fn parse_if_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        let condition = self.parse_paren_expression()?;
        self.check_suspect_assignment(&condition);
        let true_branch = Box::new(self.parse_embedded_statement()?);
        let mut span = start.merge(true_branch.span());
        let false_branch = if self.current.kind == TokenKind::Else {
            self.advance();
            let stmt = self.parse_embedded_statement()?;
            span = span.merge(stmt.span());
            Some(Box::new(stmt))
        } else {
            None
        };
        Ok(Stmt::If(IfStatement {
            span,
            condition,
            true_branch,
            false_branch,
        }))
    }

    /// `( expression )` with its own no-skip frame.
    pub(crate) fn parse_paren_expression(&mut self) -> PResult<Expr> {
        self.expect(TokenKind::LeftParenthesis, ErrorKind::NoLeftParenthesis);
        self.no_skip_stack.push(crate::NOSKIP_PAREN);
        let expr = self.parse_expression(false);
        self.no_skip_stack.pop();
        let expr = expr?;
        self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);
        Ok(expr)
    }

    fn parse_for_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        self.expect(TokenKind::LeftParenthesis, ErrorKind::NoLeftParenthesis);

        // initializer clause: the `in` operator is inhibited here
        let init = match self.current.kind {
            TokenKind::Semicolon => None,
            TokenKind::Var => {
                let mut span = self.current.span;
                self.advance();
                let decls = self.parse_declarations(FieldKind::Var, false, true, &mut span)?;
                Some(ForInit::Var(VarStatement { span, decls }))
            }
            TokenKind::Let | TokenKind::Const => {
                let is_const = self.current.kind == TokenKind::Const;
                let mut span = self.current.span;
                self.advance();
                let kind = if is_const { FieldKind::Const } else { FieldKind::Let };
                let decls = self.parse_declarations(kind, false, true, &mut span)?;
                Some(ForInit::Lexical(LexicalDeclaration {
                    span,
                    is_const,
                    mozilla_const: false,
                    decls,
                }))
            }
            _ => Some(ForInit::Expr(self.parse_expression(true)?)),
        };

        // `for (x in o)` / `for (x of o)` branch off here
        let for_in_kind = if self.current.kind == TokenKind::In {
            Some(ForInKind::In)
        } else if self.current.kind == TokenKind::Identifier && self.token_text(&self.current) == "of"
        {
            Some(ForInKind::Of)
        } else {
            None
        };

        let init = match (for_in_kind, init) {
            (Some(kind), Some(variable)) => {
                if let ForInit::Var(v) = &variable {
                    if v.decls.len() > 1 {
                        // only one declarator may appear before `in`
                        self.report_current(ErrorKind::NoSemicolon);
                    }
                }
                self.advance();
                let collection = self.parse_expression(false)?;
                self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);
                let body = self.parse_iteration_body()?;
                let span = start.merge(body.span());
                return Ok(Stmt::ForIn(ForInStatement {
                    span,
                    kind,
                    variable,
                    collection,
                    body: Box::new(body),
                }));
            }
            (_, init) => init,
        };

        self.expect(TokenKind::Semicolon, ErrorKind::NoSemicolon);
        let condition = if self.current.kind == TokenKind::Semicolon {
            None
        } else {
            let condition = self.parse_expression(false)?;
            self.check_suspect_assignment(&condition);
            Some(condition)
        };
        self.expect(TokenKind::Semicolon, ErrorKind::NoSemicolon);
        let incrementer = if self.current.kind == TokenKind::RightParenthesis {
            None
        } else {
            Some(self.parse_expression(false)?)
        };
        self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);

        let body = self.parse_iteration_body()?;
        let span = start.merge(body.span());
        Ok(Stmt::For(ForStatement {
            span,
            init,
            condition,
            incrementer,
            body: Box::new(body),
        }))
    }

    fn parse_iteration_body(&mut self) -> PResult<Stmt> {
        self.iteration_depth += 1;
        let body = self.parse_embedded_statement();
        self.iteration_depth -= 1;
        body
    }

    fn parse_while_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        let condition = self.parse_paren_expression()?;
        self.check_suspect_assignment(&condition);
        let body = self.parse_iteration_body()?;
        let span = start.merge(body.span());
        Ok(Stmt::While(WhileStatement {
            span,
            condition,
            body: Box::new(body),
        }))
    }

    fn parse_do_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        let body = self.parse_iteration_body()?;
        self.expect(TokenKind::While, ErrorKind::NoWhile);
        let condition = self.parse_paren_expression()?;
        self.check_suspect_assignment(&condition);
        let mut span = start.merge(condition.span());
        self.expect_semicolon(&mut span);
        Ok(Stmt::DoWhile(DoWhileStatement {
            span,
            body: Box::new(body),
            condition,
        }))
    }

    fn parse_switch_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        let test = self.parse_paren_expression()?;
        self.expect(TokenKind::LeftCurly, ErrorKind::NoLeftCurly);

        self.breakable_depth += 1;
        self.no_skip_stack.push(NOSKIP_CASE);
        let mut cases = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Case => {
                    let case_start = self.current.span;
                    self.advance();
                    let test = self.parse_expression(false)?;
                    self.expect(TokenKind::Colon, ErrorKind::NoColon);
                    let stmts = self.parse_case_statements();
                    cases.push(SwitchCase {
                        span: case_start.merge(self.current.span),
                        test: Some(test),
                        stmts,
                    });
                }
                TokenKind::Default => {
                    let case_start = self.current.span;
                    self.advance();
                    self.expect(TokenKind::Colon, ErrorKind::NoColon);
                    let stmts = self.parse_case_statements();
                    cases.push(SwitchCase {
                        span: case_start.merge(self.current.span),
                        test: None,
                        stmts,
                    });
                }
                _ => break,
            }
        }
        self.no_skip_stack.pop();
        self.breakable_depth -= 1;

        let mut span = start;
        if self.current.kind == TokenKind::RightCurly {
            span = span.merge(self.current.span);
            self.advance();
        } else {
            self.report_current(ErrorKind::NoRightCurly);
        }
        Ok(Stmt::Switch(SwitchStatement { span, test, cases }))
    }

    fn parse_case_statements(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Case
                | TokenKind::Default
                | TokenKind::RightCurly
                | TokenKind::EndOfFile => break,
                _ => {}
            }
            if self.aborted {
                break;
            }
            self.emit_important_comments(&mut stmts);
            let iteration_start = self.current.span.start;
            match self.parse_statement() {
                Ok(stmt) => {
                    self.skipped_in_a_row = 0;
                    stmts.push(stmt);
                }
                Err(recovery) => {
                    if let Some(partial) = recovery.partial {
                        stmts.push(partial_to_stmt(partial));
                    }
                    if !self.skip_to_no_skip_token() {
                        break;
                    }
                    if self.current.kind == TokenKind::Semicolon {
                        self.advance();
                    } else if self.current.span.start == iteration_start
                        && self.current.kind != TokenKind::EndOfFile
                    {
                        self.advance();
                    }
                }
            }
        }
        stmts
    }

    fn parse_try_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        self.advance();
        let try_block = self.parse_block()?;
        let mut span = start.merge(try_block.span);

        let mut catch_var = None;
        let mut catch_block = None;
        if self.current.kind == TokenKind::Catch {
            self.advance();
            self.expect(TokenKind::LeftParenthesis, ErrorKind::NoLeftParenthesis);
            let scope = self.scopes.push_scope(ScopeKind::Catch, self.current_scope());
            if let Some((name, name_span)) = self.expect_binding_identifier() {
                if self.current_strict()
                    && (name == minjs_util::symbol::WK_EVAL
                        || name == minjs_util::symbol::WK_ARGUMENTS)
                {
                    self.report_at(ErrorKind::StrictModeRestrictedName, name_span);
                }
                self.scopes
                    .define(scope, name, FieldKind::CatchArgument, name_span);
                catch_var = Some(CatchVariable {
                    name,
                    span: name_span,
                    scope,
                });
            }
            self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);
            self.scope_stack.push(scope);
            let block = self.parse_block();
            self.scope_stack.pop();
            let block = block?;
            span = span.merge(block.span);
            catch_block = Some(block);
        }

        let finally_block = if self.current.kind == TokenKind::Finally {
            self.advance();
            let block = self.parse_block()?;
            span = span.merge(block.span);
            Some(block)
        } else {
            None
        };

        if catch_block.is_none() && finally_block.is_none() {
            self.report_current(ErrorKind::NoCatchOrFinally);
        }

        Ok(Stmt::Try(TryStatement {
            span,
            try_block,
            catch_var,
            catch_block,
            finally_block,
        }))
    }

    fn parse_throw_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        // a line terminator after `throw` closes the statement
        let operand = if self.newline_before
            || matches!(
                self.current.kind,
                TokenKind::Semicolon | TokenKind::RightCurly | TokenKind::EndOfFile
            ) {
            None
        } else {
            let operand = self.parse_expression(false)?;
            span = span.merge(operand.span());
            Some(operand)
        };
        self.expect_semicolon(&mut span);
        Ok(Stmt::Throw(ThrowStatement { span, operand }))
    }

    fn parse_return_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        let operand = if self.newline_before
            || matches!(
                self.current.kind,
                TokenKind::Semicolon | TokenKind::RightCurly | TokenKind::EndOfFile
            ) {
            None
        } else {
            let operand = self.parse_expression(false)?;
            span = span.merge(operand.span());
            Some(operand)
        };
        self.expect_semicolon(&mut span);
        Ok(Stmt::Return(ReturnStatement { span, operand }))
    }

    fn parse_break_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        let label = self.parse_optional_label();
        match label {
            Some(name) => {
                if !self.labels.iter().any(|l| l.name == name) {
                    self.report_at(ErrorKind::NoLabel, span);
                }
            }
            None => {
                if self.iteration_depth == 0 && self.breakable_depth == 0 {
                    self.report_at(ErrorKind::BadBreak, span);
                }
            }
        }
        self.expect_semicolon(&mut span);
        Ok(Stmt::Break(BreakStatement { span, label }))
    }

    fn parse_continue_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        let label = self.parse_optional_label();
        match label {
            Some(name) => match self.labels.iter().find(|l| l.name == name) {
                Some(info) if !info.is_loop => self.report_at(ErrorKind::BadContinue, span),
                Some(_) => {}
                None => self.report_at(ErrorKind::NoLabel, span),
            },
            None => {
                if self.iteration_depth == 0 {
                    self.report_at(ErrorKind::BadContinue, span);
                }
            }
        }
        self.expect_semicolon(&mut span);
        Ok(Stmt::Continue(ContinueStatement { span, label }))
    }

    /// A label operand attaches only when no line terminator intervenes.
    fn parse_optional_label(&mut self) -> Option<Symbol> {
        if self.current.kind == TokenKind::Identifier && !self.newline_before {
            let name = self.current_identifier_symbol();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    fn parse_with_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        if self.current_strict() {
            self.report_at(ErrorKind::WithInStrictMode, start);
        }
        self.report_at(ErrorKind::WithNotRecommended, start);
        self.advance();
        let object = self.parse_paren_expression()?;
        let scope = self.scopes.push_scope(ScopeKind::With, self.current_scope());
        self.scope_stack.push(scope);
        let body = self.parse_embedded_statement();
        self.scope_stack.pop();
        let body = body?;
        let span = start.merge(body.span());
        Ok(Stmt::With(WithStatement {
            span,
            object,
            body: Box::new(body),
            scope,
        }))
    }

    fn parse_labeled_statement(&mut self) -> PResult<Stmt> {
        let start = self.current.span;
        let label = self.current_identifier_symbol();
        if self.labels.iter().any(|l| l.name == label) {
            self.report_current(ErrorKind::DuplicateLabel);
        }
        self.advance(); // identifier
        self.advance(); // colon

        let is_loop = self.label_targets_loop();
        self.labels.push(LabelInfo {
            name: label,
            is_loop,
        });
        let statement = self.parse_embedded_statement();
        self.labels.pop();
        let statement = statement?;

        let span = start.merge(statement.span());
        Ok(Stmt::Labeled(LabeledStatement {
            span,
            label,
            statement: Box::new(statement),
        }))
    }

    /// Whether the statement chain after a label lands on an iteration
    /// statement, walking through any further `name :` links.
    fn label_targets_loop(&self) -> bool {
        match self.current.kind {
            TokenKind::For | TokenKind::While | TokenKind::Do => true,
            TokenKind::Identifier => {
                fn next_significant<'s>(l: &mut minjs_lex::Scanner<'s>) -> minjs_lex::Token {
                    loop {
                        let t = l.next_token();
                        if t.kind != TokenKind::Error {
                            return t;
                        }
                    }
                }
                let mut lookahead = self.scanner.clone();
                loop {
                    if next_significant(&mut lookahead).kind != TokenKind::Colon {
                        return false;
                    }
                    match next_significant(&mut lookahead).kind {
                        TokenKind::For | TokenKind::While | TokenKind::Do => return true,
                        TokenKind::Identifier => continue,
                        _ => return false,
                    }
                }
            }
            _ => false,
        }
    }

    fn parse_debugger_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.current.span;
        self.advance();
        self.expect_semicolon(&mut span);
        Ok(Stmt::Debugger(DebuggerStatement {
            span,
            strip: self.settings.strip_debug_statements,
        }))
    }

    fn parse_function_declaration(&mut self) -> PResult<Stmt> {
        let function = self.parse_function(FunctionKind::Declaration)?;
        Ok(Stmt::FunctionDecl(Box::new(function)))
    }

    /// Parse a `function` construct: declarations, expressions, and (via
    /// [`Parser::parse_accessor_function`]) getter/setter bodies.
    pub(crate) fn parse_function(&mut self, kind: FunctionKind) -> PResult<FunctionObject> {
        let start = self.current.span;
        self.advance(); // `function`

        let strict = self.current_strict();
        let name = if self.current.kind.can_be_identifier(strict) {
            let span = self.current.span;
            let symbol = self.current_identifier_symbol();
            self.advance();
            Some(FunctionName { name: symbol, span })
        } else {
            if kind == FunctionKind::Declaration {
                self.report_current(ErrorKind::NoIdentifier);
            }
            None
        };

        // declarations bind their name in the enclosing (hoist) scope
        if kind == FunctionKind::Declaration {
            if let Some(n) = &name {
                self.declare(n.name, FieldKind::FunctionDecl, n.span);
            }
        }

        let scope = self.scopes.push_scope(ScopeKind::Function, self.current_scope());
        self.scope_stack.push(scope);

        // a named function expression can refer to itself
        if kind != FunctionKind::Declaration {
            if let Some(n) = &name {
                self.scopes.define(scope, n.name, FieldKind::FunctionDecl, n.span);
            }
        }

        let result = self.parse_function_rest(start, kind, name, scope);
        self.scope_stack.pop();
        result
    }

    /// Accessor form: `get`/`set` already consumed, no `function` keyword.
    pub(crate) fn parse_accessor_function(
        &mut self,
        start: Span,
        kind: FunctionKind,
    ) -> PResult<FunctionObject> {
        let scope = self.scopes.push_scope(ScopeKind::Function, self.current_scope());
        self.scope_stack.push(scope);
        let result = self.parse_function_rest(start, kind, None, scope);
        self.scope_stack.pop();
        result
    }

    fn parse_function_rest(
        &mut self,
        start: Span,
        kind: FunctionKind,
        name: Option<FunctionName>,
        scope: crate::ScopeId,
    ) -> PResult<FunctionObject> {
        self.expect(TokenKind::LeftParenthesis, ErrorKind::NoLeftParenthesis);
        let mut params = Vec::new();
        if self.current.kind != TokenKind::RightParenthesis {
            loop {
                match self.expect_binding_identifier() {
                    Some((param, span)) => {
                        let position = params.len();
                        self.declare(param, FieldKind::Parameter { position }, span);
                        params.push(ParameterDeclaration {
                            span,
                            name: param,
                            position,
                        });
                    }
                    None => break,
                }
                if self.current.kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);

        let body_start = self.current.span;
        self.expect(TokenKind::LeftCurly, ErrorKind::NoLeftCurly);
        self.no_skip_stack.push(NOSKIP_STATEMENT);
        let stmts = self.parse_source_elements(TokenKind::RightCurly);
        self.no_skip_stack.pop();

        let mut body_span = body_start;
        if self.current.kind == TokenKind::RightCurly {
            body_span = body_span.merge(self.current.span);
            self.advance();
        } else {
            // end of file inside the function body
            self.report_at(ErrorKind::UnclosedFunction, start);
        }

        let strict = self.scopes.scope(scope).strict;
        Ok(FunctionObject {
            span: start.merge(body_span),
            kind,
            name,
            params,
            body: Block {
                span: body_span,
                stmts,
                scope: None,
            },
            scope,
            strict,
        })
    }

    fn parse_expression_statement(&mut self) -> PResult<Stmt> {
        let expr = self.parse_expression(false)?;
        let mut span = expr.span();
        self.expect_semicolon(&mut span);
        let strip = self.settings.strip_debug_statements && is_debug_namespace_call(&expr);
        Ok(Stmt::Expr(ExprStatement { span, expr, strip }))
    }

    /// Warn when a conditional context is controlled by an assignment.
    pub(crate) fn check_suspect_assignment(&self, condition: &Expr) {
        if let Expr::Binary(b) = condition.unwrap_grouping() {
            if b.op.is_assignment() {
                self.report_at(ErrorKind::SuspectAssignment, b.span);
            }
        }
    }
}

fn partial_to_stmt(partial: PartialNode) -> Stmt {
    match partial {
        PartialNode::Stmt(stmt) => *stmt,
        PartialNode::Expr(expr) => Stmt::Expr(ExprStatement {
            span: expr.span(),
            expr: *expr,
            strip: false,
        }),
    }
}

fn partial_to_expr(partial: PartialNode) -> Option<Expr> {
    match partial {
        PartialNode::Expr(expr) => Some(*expr),
        PartialNode::Stmt(_) => None,
    }
}

fn decls_partial(span: Span, decls: Vec<VariableDeclaration>) -> Option<PartialNode> {
    if decls.is_empty() {
        None
    } else {
        Some(PartialNode::Stmt(Box::new(Stmt::Var(VarStatement {
            span,
            decls,
        }))))
    }
}

/// `Debug.xxx(…)` call statements are stripped with debug statements.
fn is_debug_namespace_call(expr: &Expr) -> bool {
    if let Expr::Call(call) = expr {
        let mut root = &*call.func;
        while let Expr::Member(member) = root {
            root = &member.root;
        }
        if let Expr::Lookup(lookup) = root {
            return lookup.name == minjs_util::symbol::WK_DEBUG;
        }
    }
    false
}
