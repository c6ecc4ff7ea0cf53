//! The output printer: walks the AST and emits minified (or formatted)
//! JavaScript that parses back to a structurally equivalent tree.
//!
//! Parenthesization is re-derived from operator precedence rather than
//! replayed from source, so redundant source parentheses disappear and
//! required ones survive. The printer never fails on a well-formed tree.

use minjs_lex::{keyword_from_ident, OpPrec, TokenKind};
use minjs_par::ast::*;

use crate::number::minify_number;
use crate::string_lit::{minify_string, StringPolicy};
use crate::writer::OutputWriter;
use crate::{BlockStart, OutputMode, OutputSettings};

/// Rank used for primary expressions, above every operator.
fn primary_rank() -> u8 {
    OpPrec::FieldAccess.rank() + 1
}

fn relational_rank() -> u8 {
    OpPrec::Relational.rank()
}

/// The tree walker. One instance prints one program.
pub struct Printer<'s> {
    w: OutputWriter,
    settings: &'s OutputSettings,
    /// `@cc_on` has been emitted already; duplicates are dropped.
    cc_on_emitted: bool,
    /// Strictness of the scope being emitted, for directive insertion and
    /// property-name quoting.
    strict: bool,
}

impl<'s> Printer<'s> {
    pub fn new(settings: &'s OutputSettings) -> Self {
        Self {
            w: OutputWriter::new(settings),
            settings,
            cc_on_emitted: false,
            strict: false,
        }
    }

    /// Emit a whole program (the root block, unbraced).
    pub fn print_program(&mut self, program: &Block) {
        self.emit_stmt_list(&program.stmts, self.settings.term_semicolons);
    }

    /// The finished text.
    pub fn finish(self) -> String {
        self.w.into_inner()
    }

    // ---- statement lists ----

    fn stmt_is_dropped(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Debugger(d) => d.strip,
            Stmt::Expr(e) => e.strip,
            Stmt::ImportantComment(_) => !self.settings.preserve_important_comments,
            _ => false,
        }
    }

    fn emit_stmt_list(&mut self, stmts: &[Stmt], force_final_semicolon: bool) {
        let emittable: Vec<&Stmt> = stmts
            .iter()
            .filter(|s| !self.stmt_is_dropped(s))
            .collect();
        let count = emittable.len();
        for (i, stmt) in emittable.into_iter().enumerate() {
            let last = i + 1 == count;
            self.emit_stmt(stmt);
            if needs_semicolon(stmt) {
                if !last {
                    self.w.write_char(';');
                } else if force_final_semicolon
                    || (self.settings.mac_safari_quirks && matches!(stmt, Stmt::Throw(_)))
                {
                    self.w.write_char(';');
                }
                // otherwise the `}` (or end of input) terminates via ASI
            }
            if !last {
                self.w.newline();
            }
        }
    }

    // ---- statements ----

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.emit_block(block),
            Stmt::Var(var) => self.emit_var("var", &var.decls, false),
            Stmt::Lexical(lexical) => {
                let keyword = if lexical.is_const { "const" } else { "let" };
                self.emit_var(keyword, &lexical.decls, false);
            }
            Stmt::If(n) => self.emit_if(n),
            Stmt::For(n) => self.emit_for(n),
            Stmt::ForIn(n) => self.emit_for_in(n),
            Stmt::While(n) => {
                self.w.write_word("while");
                self.w.write_char('(');
                self.emit_expr(&n.condition, OpPrec::Comma.rank(), false);
                self.w.write_char(')');
                self.emit_embedded(&n.body, false);
            }
            Stmt::DoWhile(n) => self.emit_do_while(n),
            Stmt::Switch(n) => self.emit_switch(n),
            Stmt::Try(n) => self.emit_try(n),
            Stmt::Throw(n) => {
                self.w.write_word("throw");
                if let Some(operand) = &n.operand {
                    self.emit_restricted_operand(operand);
                }
            }
            Stmt::Return(n) => {
                self.w.write_word("return");
                if let Some(operand) = &n.operand {
                    self.emit_restricted_operand(operand);
                }
            }
            Stmt::Break(n) => {
                self.w.write_word("break");
                if let Some(label) = n.label {
                    self.w.write_word(label.as_str());
                }
            }
            Stmt::Continue(n) => {
                self.w.write_word("continue");
                if let Some(label) = n.label {
                    self.w.write_word(label.as_str());
                }
            }
            Stmt::With(n) => {
                self.w.write_word("with");
                self.w.write_char('(');
                self.emit_expr(&n.object, OpPrec::Comma.rank(), false);
                self.w.write_char(')');
                self.emit_embedded(&n.body, false);
            }
            Stmt::Labeled(n) => {
                self.w.write_word(n.label.as_str());
                self.w.write_char(':');
                self.emit_embedded(&n.statement, false);
            }
            Stmt::Debugger(_) => self.w.write_word("debugger"),
            Stmt::Empty(_) => self.w.write_char(';'),
            Stmt::Directive(n) => self.emit_directive(n),
            Stmt::ImportantComment(n) => {
                // verbatim, then a forced break in every output mode
                self.w.write_str(&n.text);
                self.w.force_newline();
            }
            Stmt::ConditionalComment(n) => self.emit_conditional_comment(&n.text),
            Stmt::FunctionDecl(f) => self.emit_function(f, None),
            Stmt::Expr(n) => self.emit_statement_expression(&n.expr),
        }
    }

    /// `return`/`throw` operands admit no line break after the keyword.
    fn emit_restricted_operand(&mut self, operand: &Expr) {
        let previous = self.w.set_no_line_breaks(true);
        self.emit_expr(operand, OpPrec::Comma.rank(), false);
        self.w.set_no_line_breaks(previous);
    }

    fn emit_statement_expression(&mut self, expr: &Expr) {
        // a function expression or object literal opening a statement would
        // read as a declaration or block
        if starts_statement_ambiguously(expr) {
            self.w.write_char('(');
            self.emit_expr(expr, OpPrec::Comma.rank(), false);
            self.w.write_char(')');
        } else {
            self.emit_expr(expr, OpPrec::Comma.rank(), false);
        }
    }

    fn emit_var(&mut self, keyword: &str, decls: &[VariableDeclaration], no_in: bool) {
        self.w.write_word(keyword);
        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                self.w.write_char(',');
            }
            self.w.write_word(decl.name.as_str());
            if let Some(init) = &decl.init {
                self.w.write_operator("=");
                self.emit_expr(init, OpPrec::Assignment.rank(), no_in);
            }
        }
    }

    fn emit_block(&mut self, block: &Block) {
        self.open_brace();
        self.w.indent();
        self.w.newline();
        self.emit_stmt_list(&block.stmts, false);
        self.w.unindent();
        self.w.newline();
        self.w.write_char('}');
    }

    fn open_brace(&mut self) {
        if self.settings.output_mode == OutputMode::MultipleLines
            && self.settings.blocks_start_on_same_line == BlockStart::NewLine
        {
            self.w.newline();
        }
        self.w.write_char('{');
    }

    /// Emit an embedded statement (branch or body). `force_braces` wraps a
    /// bare statement to protect a dangling `else`.
    fn emit_embedded(&mut self, stmt: &Stmt, force_braces: bool) {
        if let Stmt::Block(block) = stmt {
            self.emit_block(block);
            return;
        }
        if force_braces {
            self.open_brace();
            self.w.indent();
            self.w.newline();
            self.emit_stmt(stmt);
            if needs_semicolon(stmt) && self.settings.output_mode == OutputMode::MultipleLines {
                self.w.write_char(';');
            }
            self.w.unindent();
            self.w.newline();
            self.w.write_char('}');
            return;
        }
        if self.settings.output_mode == OutputMode::MultipleLines {
            self.w.indent();
            self.w.newline();
            self.emit_stmt(stmt);
            self.w.unindent();
        } else {
            self.emit_stmt(stmt);
        }
    }

    fn emit_if(&mut self, n: &IfStatement) {
        self.w.write_word("if");
        self.w.write_char('(');
        self.emit_expr(&n.condition, OpPrec::Comma.rank(), false);
        self.w.write_char(')');

        match &n.false_branch {
            None => self.emit_embedded(&n.true_branch, false),
            Some(false_branch) => {
                // a trailing else must not capture an inner if
                let brace_true = ends_with_dangling_if(&n.true_branch);
                self.emit_embedded(&n.true_branch, brace_true);
                if !brace_true && needs_semicolon(&n.true_branch) {
                    self.w.replaceable_semicolon();
                }
                self.w.newline();
                self.w.write_word("else");
                if let Stmt::If(_) = &**false_branch {
                    // `else if` chains on one line
                    if self.settings.output_mode == OutputMode::MultipleLines {
                        self.w.write_char(' ');
                        self.emit_stmt(false_branch);
                    } else {
                        self.emit_embedded(false_branch, false);
                    }
                } else {
                    self.emit_embedded(false_branch, false);
                }
            }
        }
    }

    fn emit_for(&mut self, n: &ForStatement) {
        self.w.write_word("for");
        self.w.write_char('(');
        match &n.init {
            Some(ForInit::Var(var)) => self.emit_var("var", &var.decls, true),
            Some(ForInit::Lexical(lexical)) => {
                let keyword = if lexical.is_const { "const" } else { "let" };
                self.emit_var(keyword, &lexical.decls, true);
            }
            Some(ForInit::Expr(expr)) => self.emit_expr(expr, OpPrec::Comma.rank(), true),
            None => {}
        }
        self.w.write_char(';');
        if let Some(condition) = &n.condition {
            self.emit_expr(condition, OpPrec::Comma.rank(), false);
        }
        self.w.write_char(';');
        if let Some(incrementer) = &n.incrementer {
            self.emit_expr(incrementer, OpPrec::Comma.rank(), false);
        }
        self.w.write_char(')');
        self.emit_embedded(&n.body, false);
    }

    fn emit_for_in(&mut self, n: &ForInStatement) {
        self.w.write_word("for");
        self.w.write_char('(');
        match &n.variable {
            ForInit::Var(var) => self.emit_var("var", &var.decls, true),
            ForInit::Lexical(lexical) => {
                let keyword = if lexical.is_const { "const" } else { "let" };
                self.emit_var(keyword, &lexical.decls, true);
            }
            ForInit::Expr(expr) => self.emit_expr(expr, OpPrec::Assignment.rank(), true),
        }
        match n.kind {
            ForInKind::In => self.w.write_word("in"),
            ForInKind::Of => self.w.write_word("of"),
        }
        self.emit_expr(&n.collection, OpPrec::Comma.rank(), false);
        self.w.write_char(')');
        self.emit_embedded(&n.body, false);
    }

    fn emit_do_while(&mut self, n: &DoWhileStatement) {
        self.w.write_word("do");
        self.emit_embedded(&n.body, false);
        if !matches!(&*n.body, Stmt::Block(_)) && needs_semicolon(&n.body) {
            self.w.replaceable_semicolon();
        }
        self.w.newline();
        self.w.write_word("while");
        self.w.write_char('(');
        self.emit_expr(&n.condition, OpPrec::Comma.rank(), false);
        self.w.write_char(')');
    }

    fn emit_switch(&mut self, n: &SwitchStatement) {
        self.w.write_word("switch");
        self.w.write_char('(');
        self.emit_expr(&n.test, OpPrec::Comma.rank(), false);
        self.w.write_char(')');
        self.open_brace();
        self.w.indent();
        for (i, case) in n.cases.iter().enumerate() {
            self.w.newline();
            match &case.test {
                Some(test) => {
                    self.w.write_word("case");
                    self.emit_expr(test, OpPrec::Comma.rank(), false);
                }
                None => self.w.write_word("default"),
            }
            self.w.write_char(':');
            if !case.stmts.is_empty() {
                self.w.indent();
                self.w.newline();
                self.emit_stmt_list(&case.stmts, false);
                self.w.unindent();
                // a terminator is still required between arms
                let last_arm = i + 1 == n.cases.len();
                if !last_arm {
                    if let Some(last) = case.stmts.last() {
                        if needs_semicolon(last) {
                            self.w.replaceable_semicolon();
                        }
                    }
                }
            }
        }
        self.w.unindent();
        self.w.newline();
        self.w.write_char('}');
    }

    fn emit_try(&mut self, n: &TryStatement) {
        self.w.write_word("try");
        self.emit_block(&n.try_block);
        if let Some(catch_block) = &n.catch_block {
            self.w.newline();
            self.w.write_word("catch");
            self.w.write_char('(');
            if let Some(var) = &n.catch_var {
                self.w.write_word(var.name.as_str());
            }
            self.w.write_char(')');
            self.emit_block(catch_block);
        }
        if let Some(finally_block) = &n.finally_block {
            self.w.newline();
            self.w.write_word("finally");
            self.emit_block(finally_block);
        }
    }

    fn emit_directive(&mut self, n: &DirectivePrologue) {
        if (n.may_have_issues || !self.settings.minify_code) && !n.raw.is_empty() {
            self.w.write_str(&n.raw);
        } else {
            let text = minify_string(&n.value, self.string_policy());
            self.w.write_str(&text);
        }
        if n.use_strict {
            self.strict = true;
        }
    }

    fn emit_conditional_comment(&mut self, text: &str) {
        if text.contains("@cc_on") {
            if self.cc_on_emitted && is_bare_cc_on(text) {
                // @cc_on only once per output stream
                return;
            }
            self.cc_on_emitted = true;
        }
        self.w.write_str(text);
        if text.starts_with("//") {
            // a line comment must not swallow what follows
            self.w.force_newline();
        }
    }

    fn emit_function(&mut self, f: &FunctionObject, property_name: Option<&ObjectLiteralField>) {
        match f.kind {
            FunctionKind::Getter => self.w.write_word("get"),
            FunctionKind::Setter => self.w.write_word("set"),
            _ => self.w.write_word("function"),
        }
        match f.kind {
            FunctionKind::Getter | FunctionKind::Setter => {
                if let Some(name) = property_name {
                    self.emit_property_key(&name.key);
                }
            }
            _ => {
                let drop_name = f.kind == FunctionKind::Expression
                    && self.settings.remove_function_expression_names;
                if !drop_name {
                    if let Some(name) = &f.name {
                        self.w.write_word(name.name.as_str());
                    }
                }
            }
        }
        self.w.write_char('(');
        for (i, param) in f.params.iter().enumerate() {
            if i > 0 {
                self.w.write_char(',');
            }
            self.w.write_word(param.name.as_str());
        }
        self.w.write_char(')');

        let enclosing_strict = self.strict;
        self.open_brace();
        self.w.indent();
        self.w.newline();
        self.strict = f.strict;
        // a strict function below a sloppy scope needs its directive made
        // explicit when the body lost it
        if f.strict && !enclosing_strict && !has_use_strict_directive(&f.body) {
            self.w.write_str("\"use strict\"");
            self.w.write_char(';');
            self.w.newline();
        }
        self.emit_stmt_list(&f.body.stmts, false);
        self.strict = enclosing_strict;
        self.w.unindent();
        self.w.newline();
        self.w.write_char('}');
    }

    // ---- expressions ----

    /// Emit `expr`, parenthesizing when its precedence falls below the
    /// context minimum, or when a bare `in` must be hidden from an
    /// enclosing for-initializer.
    fn emit_expr(&mut self, expr: &Expr, min_rank: u8, no_in: bool) {
        let rank = expr_rank(expr);
        let parens = rank < min_rank || (no_in && is_in_operator(expr));
        if parens {
            self.w.write_char('(');
        }
        // wrapping parens clear the restriction
        let no_in = no_in && !parens;
        self.emit_expr_inner(expr, no_in);
        if parens {
            self.w.write_char(')');
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr, no_in: bool) {
        match expr {
            Expr::Constant(c) => self.emit_constant(c),
            Expr::RegExp(re) => {
                self.w
                    .write_operator(&format!("/{}/{}", re.pattern, re.flags));
            }
            Expr::This(_) => self.w.write_word("this"),
            Expr::Lookup(l) => self.w.write_word(l.name.as_str()),
            Expr::Member(m) => self.emit_member(m),
            Expr::Call(c) => self.emit_call(c),
            Expr::Unary(u) => self.emit_unary(u),
            Expr::Binary(b) => self.emit_binary(b, no_in),
            Expr::Conditional(c) => {
                self.emit_expr(&c.condition, OpPrec::Conditional.rank() + 1, no_in);
                self.w.write_char('?');
                self.emit_expr(&c.true_expr, OpPrec::Assignment.rank(), propagate(no_in, OpPrec::Assignment.rank()));
                self.w.write_char(':');
                self.emit_expr(&c.false_expr, OpPrec::Assignment.rank(), propagate(no_in, OpPrec::Assignment.rank()));
            }
            Expr::Grouping(g) => {
                // transparent; required parens re-derive from precedence
                self.emit_expr_inner(g.operand.unwrap_grouping(), no_in);
            }
            Expr::Array(a) => self.emit_array(a),
            Expr::Object(o) => self.emit_object(o),
            Expr::Function(f) => self.emit_function(f, None),
            Expr::List(list) => {
                for (i, e) in list.exprs.iter().enumerate() {
                    if i > 0 {
                        self.w.write_char(',');
                    }
                    self.emit_expr(e, OpPrec::Assignment.rank(), propagate(no_in, OpPrec::Assignment.rank()));
                }
            }
            Expr::AspNet(block) => self.w.write_str(&block.text),
        }
    }

    fn emit_constant(&mut self, c: &ConstantWrapper) {
        // lossy conversions, and non-minifying output, round-trip through
        // the original lexeme
        if c.may_have_issues || !self.settings.minify_code {
            if let Some(raw) = &c.raw {
                self.w.write_word(raw);
                return;
            }
        }
        match &c.value {
            PrimitiveValue::Number(n) => self.w.write_word(&minify_number(*n)),
            PrimitiveValue::Str(s) => {
                let text = minify_string(s, self.string_policy());
                self.w.write_str(&text);
            }
            PrimitiveValue::Bool(true) => self.w.write_word("true"),
            PrimitiveValue::Bool(false) => self.w.write_word("false"),
            PrimitiveValue::Null => self.w.write_word("null"),
        }
    }

    fn string_policy(&self) -> StringPolicy {
        StringPolicy {
            inline_safe: self.settings.inline_safe_strings,
            always_escape_non_ascii: self.settings.always_escape_non_ascii,
        }
    }

    fn emit_member(&mut self, m: &Member) {
        let forced = member_root_needs_parens(&m.root);
        if forced {
            self.w.write_char('(');
            self.emit_expr_inner(m.root.unwrap_grouping(), false);
            self.w.write_char(')');
        } else {
            self.emit_expr(&m.root, OpPrec::FieldAccess.rank(), false);
        }
        self.w.write_char('.');
        self.w.write_str(m.name.as_str());
    }

    fn emit_call(&mut self, c: &Call) {
        if c.in_brackets {
            self.emit_expr(&c.func, OpPrec::FieldAccess.rank(), false);
            self.w.write_char('[');
            for (i, arg) in c.args.iter().enumerate() {
                if i > 0 {
                    self.w.write_char(',');
                }
                self.emit_expr(arg, OpPrec::Assignment.rank(), false);
            }
            self.w.write_char(']');
            return;
        }

        if c.is_constructor {
            self.w.write_word("new");
            let callee_parens = new_callee_needs_parens(&c.func);
            if callee_parens {
                self.w.write_char('(');
                self.emit_expr_inner(c.func.unwrap_grouping(), false);
                self.w.write_char(')');
            } else {
                self.emit_expr(&c.func, OpPrec::FieldAccess.rank(), false);
            }
            if !c.args.is_empty() {
                self.emit_argument_list(&c.args);
            }
            return;
        }

        // a zero-argument constructor used as a plain callee would steal
        // this call's argument list
        let callee_parens = matches!(
            c.func.unwrap_grouping(),
            Expr::Call(inner) if inner.is_constructor && inner.args.is_empty()
        );
        if callee_parens {
            self.w.write_char('(');
            self.emit_expr_inner(c.func.unwrap_grouping(), false);
            self.w.write_char(')');
        } else {
            self.emit_expr(&c.func, OpPrec::FieldAccess.rank(), false);
        }
        self.emit_argument_list(&c.args);
    }

    fn emit_argument_list(&mut self, args: &[Expr]) {
        self.w.write_char('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.w.write_char(',');
            }
            self.emit_expr(arg, OpPrec::Assignment.rank(), false);
        }
        self.w.write_char(')');
    }

    fn emit_unary(&mut self, u: &UnaryExpr) {
        if u.is_postfix {
            // no line break between the operand and a postfix operator
            let previous = self.w.set_no_line_breaks(true);
            self.emit_expr(&u.operand, OpPrec::Postfix.rank(), false);
            self.w.write_operator(u.op.text().unwrap_or(""));
            self.w.set_no_line_breaks(previous);
        } else {
            match u.op {
                TokenKind::Delete | TokenKind::Void | TokenKind::Typeof => {
                    self.w.write_word(u.op.text().unwrap_or(""));
                }
                _ => self.w.write_operator(u.op.text().unwrap_or("")),
            }
            self.emit_expr(&u.operand, OpPrec::Unary.rank(), false);
        }
    }

    fn emit_binary(&mut self, b: &BinaryExpr, no_in: bool) {
        let rank = b.op.precedence().rank();
        let right_assoc = b.op.is_right_associative();

        let left_min = if right_assoc { rank + 1 } else { rank };
        let right_min = if right_assoc {
            rank
        } else if is_associative_op(b.op) && same_operator(&b.right, b.op) {
            // (a*b)*(c*d) regroups freely
            rank
        } else {
            rank + 1
        };

        self.emit_expr(&b.left, left_min, propagate(no_in, left_min));
        match b.op {
            TokenKind::In | TokenKind::Instanceof => {
                self.w.write_word(b.op.text().unwrap_or(""));
            }
            _ => self.w.write_operator(b.op.text().unwrap_or("")),
        }
        self.emit_expr(&b.right, right_min, propagate(no_in, right_min));
    }

    fn emit_array(&mut self, a: &ArrayLiteral) {
        self.w.write_char('[');
        let len = a.elements.len();
        for (i, element) in a.elements.iter().enumerate() {
            if let Some(e) = element {
                self.emit_expr(e, OpPrec::Assignment.rank(), false);
            }
            if i + 1 < len {
                self.w.write_char(',');
            } else if element.is_none() {
                // a trailing elision needs its comma kept
                self.w.write_char(',');
            }
        }
        self.w.write_char(']');
    }

    fn emit_object(&mut self, o: &ObjectLiteral) {
        self.w.write_char('{');
        for (i, property) in o.properties.iter().enumerate() {
            if i > 0 {
                self.w.write_char(',');
            }
            match property.value.unwrap_grouping() {
                Expr::Function(f)
                    if matches!(f.kind, FunctionKind::Getter | FunctionKind::Setter) =>
                {
                    self.emit_function(f, Some(&property.name));
                }
                _ => {
                    self.emit_property_key(&property.name.key);
                    self.w.write_char(':');
                    self.emit_expr(&property.value, OpPrec::Assignment.rank(), false);
                }
            }
        }
        self.w.write_char('}');
    }

    fn emit_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Number(n) => self.w.write_word(&minify_number(*n)),
            PropertyKey::Ident(name) => self.emit_property_name(name.as_str(), false, false),
            PropertyKey::Str {
                value,
                may_have_issues,
            } => self.emit_property_name(value, *may_have_issues, true),
        }
    }

    /// Unquote a property name when it is a valid identifier and not a
    /// reserved word in the current strict mode; otherwise emit it as a
    /// string literal. Dropping the quotes from a string-written key is a
    /// minification, so it only happens under `minify_code`.
    fn emit_property_name(&mut self, name: &str, force_quotes: bool, was_quoted: bool) {
        let unquoted = !force_quotes
            && !self.settings.quote_object_literal_properties
            && (!was_quoted || self.settings.minify_code)
            && is_valid_identifier_name(name, self.strict);
        if unquoted {
            self.w.write_word(name);
        } else {
            let text = minify_string(name, self.string_policy());
            self.w.write_str(&text);
        }
    }
}

// ---- classification helpers ----

fn propagate(no_in: bool, child_min_rank: u8) -> bool {
    // contexts above relational already parenthesize any in-operator
    no_in && child_min_rank <= relational_rank()
}

fn is_in_operator(expr: &Expr) -> bool {
    matches!(expr.unwrap_grouping(), Expr::Binary(b) if b.op == TokenKind::In)
}

fn is_associative_op(op: TokenKind) -> bool {
    matches!(
        op,
        TokenKind::Multiply
            | TokenKind::BitwiseAnd
            | TokenKind::BitwiseOr
            | TokenKind::BitwiseXor
            | TokenKind::LogicalAnd
            | TokenKind::LogicalOr
    )
}

fn same_operator(expr: &Expr, op: TokenKind) -> bool {
    matches!(expr.unwrap_grouping(), Expr::Binary(b) if b.op == op)
}

fn expr_rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Constant(_)
        | Expr::RegExp(_)
        | Expr::This(_)
        | Expr::Lookup(_)
        | Expr::Array(_)
        | Expr::Object(_)
        | Expr::Function(_)
        | Expr::AspNet(_) => primary_rank(),
        Expr::Grouping(g) => expr_rank(&g.operand),
        Expr::Member(_) | Expr::Call(_) => OpPrec::FieldAccess.rank(),
        Expr::Unary(u) => {
            if u.is_postfix {
                OpPrec::Postfix.rank()
            } else {
                OpPrec::Unary.rank()
            }
        }
        Expr::Binary(b) => b.op.precedence().rank(),
        Expr::Conditional(_) => OpPrec::Conditional.rank(),
        Expr::List(_) => OpPrec::Comma.rank(),
    }
}

/// Would this expression, opening a statement, be misread as a declaration
/// or block?
fn starts_statement_ambiguously(expr: &Expr) -> bool {
    match expr {
        Expr::Function(f) => f.kind == FunctionKind::Expression,
        Expr::Object(_) => true,
        Expr::Grouping(g) => starts_statement_ambiguously(&g.operand),
        Expr::Binary(b) => starts_statement_ambiguously(&b.left),
        Expr::Conditional(c) => starts_statement_ambiguously(&c.condition),
        Expr::Member(m) => starts_statement_ambiguously(&m.root),
        Expr::Call(c) => !c.is_constructor && starts_statement_ambiguously(&c.func),
        Expr::Unary(u) => u.is_postfix && starts_statement_ambiguously(&u.operand),
        Expr::List(l) => l
            .exprs
            .first()
            .map(starts_statement_ambiguously)
            .unwrap_or(false),
        _ => false,
    }
}

/// An `else` about to be emitted must not attach to a nested `if`.
fn ends_with_dangling_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If(n) => match &n.false_branch {
            None => true,
            Some(false_branch) => ends_with_dangling_if(false_branch),
        },
        Stmt::While(n) => ends_with_dangling_if(&n.body),
        Stmt::For(n) => ends_with_dangling_if(&n.body),
        Stmt::ForIn(n) => ends_with_dangling_if(&n.body),
        Stmt::With(n) => ends_with_dangling_if(&n.body),
        Stmt::Labeled(n) => ends_with_dangling_if(&n.statement),
        _ => false,
    }
}

/// Statements whose output must be followed by `;` (or ASI) before another
/// statement.
fn needs_semicolon(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Var(_)
        | Stmt::Lexical(_)
        | Stmt::Expr(_)
        | Stmt::Return(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Throw(_)
        | Stmt::Debugger(_)
        | Stmt::DoWhile(_)
        | Stmt::Directive(_) => true,
        Stmt::If(n) => match &n.false_branch {
            Some(false_branch) => needs_semicolon(false_branch),
            None => needs_semicolon(&n.true_branch),
        },
        Stmt::While(n) => needs_semicolon(&n.body),
        Stmt::For(n) => needs_semicolon(&n.body),
        Stmt::ForIn(n) => needs_semicolon(&n.body),
        Stmt::With(n) => needs_semicolon(&n.body),
        Stmt::Labeled(n) => needs_semicolon(&n.statement),
        _ => false,
    }
}

/// A member root that must be parenthesized: plain integers (`4.x` is a
/// malformed number) and zero-argument constructors (`new X.b` binds the
/// member to the callee).
fn member_root_needs_parens(root: &Expr) -> bool {
    match root.unwrap_grouping() {
        Expr::Constant(c) => match c.value {
            PrimitiveValue::Number(n) => {
                let text = if c.may_have_issues {
                    c.raw.clone().unwrap_or_default()
                } else {
                    minify_number(n)
                };
                !text.contains('.') && !text.contains('e') && !text.contains('x')
            }
            _ => false,
        },
        Expr::Call(c) => c.is_constructor && c.args.is_empty(),
        _ => false,
    }
}

/// A `new` callee must be parenthesized when it contains a plain call or a
/// nested `new` without an argument list, so the outer arguments cannot
/// bind to it. A nested `new` that has its own arguments is unambiguous.
fn new_callee_needs_parens(callee: &Expr) -> bool {
    match callee.unwrap_grouping() {
        Expr::Call(c) => !c.is_constructor || c.args.is_empty(),
        Expr::Member(m) => new_callee_needs_parens(&m.root),
        _ => false,
    }
}

fn has_use_strict_directive(body: &Block) -> bool {
    body.stmts
        .iter()
        .any(|s| matches!(s, Stmt::Directive(d) if d.use_strict))
}

/// A conditional comment that contains nothing beyond `@cc_on`.
fn is_bare_cc_on(text: &str) -> bool {
    let body = text
        .trim_start_matches("/*")
        .trim_end_matches("*/")
        .trim_start_matches("//")
        .trim();
    body.trim_start_matches('@')
        .trim_end_matches('@')
        .trim()
        .eq_ignore_ascii_case("cc_on")
}

/// Valid unquoted property name: identifier shape and not a reserved word
/// in the given strict mode (`static` is fine in sloppy code, `new` never
/// is).
fn is_valid_identifier_name(name: &str, strict: bool) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    match keyword_from_ident(name) {
        Some(kind) => kind.can_be_identifier(strict),
        None => true,
    }
}
