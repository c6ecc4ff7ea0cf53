//! The visitor interface shared by every pass over the AST.
//!
//! Each node variant has a `visit_*` method whose default implementation
//! walks the children in source order through the free `walk_*` functions.
//! A pass overrides the variants it cares about and lets the defaults carry
//! traversal. Double dispatch is available through [`Stmt::accept`] and
//! [`Expr::accept`].

use crate::ast::*;

/// Read-only visitor over the AST, one method per node variant.
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_block(&mut self, node: &Block) {
        walk_block(self, node);
    }
    fn visit_var(&mut self, node: &VarStatement) {
        walk_var(self, node);
    }
    fn visit_lexical(&mut self, node: &LexicalDeclaration) {
        walk_lexical(self, node);
    }
    fn visit_if(&mut self, node: &IfStatement) {
        walk_if(self, node);
    }
    fn visit_for(&mut self, node: &ForStatement) {
        walk_for(self, node);
    }
    fn visit_for_in(&mut self, node: &ForInStatement) {
        walk_for_in(self, node);
    }
    fn visit_while(&mut self, node: &WhileStatement) {
        walk_while(self, node);
    }
    fn visit_do_while(&mut self, node: &DoWhileStatement) {
        walk_do_while(self, node);
    }
    fn visit_switch(&mut self, node: &SwitchStatement) {
        walk_switch(self, node);
    }
    fn visit_try(&mut self, node: &TryStatement) {
        walk_try(self, node);
    }
    fn visit_throw(&mut self, node: &ThrowStatement) {
        walk_throw(self, node);
    }
    fn visit_return(&mut self, node: &ReturnStatement) {
        walk_return(self, node);
    }
    fn visit_break(&mut self, node: &BreakStatement) {}
    fn visit_continue(&mut self, node: &ContinueStatement) {}
    fn visit_with(&mut self, node: &WithStatement) {
        walk_with(self, node);
    }
    fn visit_labeled(&mut self, node: &LabeledStatement) {
        walk_labeled(self, node);
    }
    fn visit_debugger(&mut self, node: &DebuggerStatement) {}
    fn visit_empty(&mut self, span: &minjs_util::Span) {}
    fn visit_directive(&mut self, node: &DirectivePrologue) {}
    fn visit_important_comment(&mut self, node: &ImportantCommentStatement) {}
    fn visit_conditional_comment(&mut self, node: &ConditionalCommentStatement) {}
    fn visit_function(&mut self, node: &FunctionObject) {
        walk_function(self, node);
    }
    fn visit_expr_statement(&mut self, node: &ExprStatement) {
        walk_expr_statement(self, node);
    }

    fn visit_constant(&mut self, node: &ConstantWrapper) {}
    fn visit_regexp(&mut self, node: &RegExpLiteral) {}
    fn visit_this(&mut self, span: &minjs_util::Span) {}
    fn visit_lookup(&mut self, node: &Lookup) {}
    fn visit_member(&mut self, node: &Member) {
        walk_member(self, node);
    }
    fn visit_call(&mut self, node: &Call) {
        walk_call(self, node);
    }
    fn visit_unary(&mut self, node: &UnaryExpr) {
        walk_unary(self, node);
    }
    fn visit_binary(&mut self, node: &BinaryExpr) {
        walk_binary(self, node);
    }
    fn visit_conditional(&mut self, node: &ConditionalExpr) {
        walk_conditional(self, node);
    }
    fn visit_grouping(&mut self, node: &GroupingExpr) {
        walk_grouping(self, node);
    }
    fn visit_array(&mut self, node: &ArrayLiteral) {
        walk_array(self, node);
    }
    fn visit_object(&mut self, node: &ObjectLiteral) {
        walk_object(self, node);
    }
    fn visit_list(&mut self, node: &AstList) {
        walk_list(self, node);
    }
    fn visit_asp_net(&mut self, node: &AspNetBlock) {}
}

impl Stmt {
    /// Double dispatch to the matching `visit_*` method.
    pub fn accept<V: Visitor + ?Sized>(&self, v: &mut V) {
        match self {
            Stmt::Block(n) => v.visit_block(n),
            Stmt::Var(n) => v.visit_var(n),
            Stmt::Lexical(n) => v.visit_lexical(n),
            Stmt::If(n) => v.visit_if(n),
            Stmt::For(n) => v.visit_for(n),
            Stmt::ForIn(n) => v.visit_for_in(n),
            Stmt::While(n) => v.visit_while(n),
            Stmt::DoWhile(n) => v.visit_do_while(n),
            Stmt::Switch(n) => v.visit_switch(n),
            Stmt::Try(n) => v.visit_try(n),
            Stmt::Throw(n) => v.visit_throw(n),
            Stmt::Return(n) => v.visit_return(n),
            Stmt::Break(n) => v.visit_break(n),
            Stmt::Continue(n) => v.visit_continue(n),
            Stmt::With(n) => v.visit_with(n),
            Stmt::Labeled(n) => v.visit_labeled(n),
            Stmt::Debugger(n) => v.visit_debugger(n),
            Stmt::Empty(span) => v.visit_empty(span),
            Stmt::Directive(n) => v.visit_directive(n),
            Stmt::ImportantComment(n) => v.visit_important_comment(n),
            Stmt::ConditionalComment(n) => v.visit_conditional_comment(n),
            Stmt::FunctionDecl(n) => v.visit_function(n),
            Stmt::Expr(n) => v.visit_expr_statement(n),
        }
    }
}

impl Expr {
    /// Double dispatch to the matching `visit_*` method.
    pub fn accept<V: Visitor + ?Sized>(&self, v: &mut V) {
        match self {
            Expr::Constant(n) => v.visit_constant(n),
            Expr::RegExp(n) => v.visit_regexp(n),
            Expr::This(span) => v.visit_this(span),
            Expr::Lookup(n) => v.visit_lookup(n),
            Expr::Member(n) => v.visit_member(n),
            Expr::Call(n) => v.visit_call(n),
            Expr::Unary(n) => v.visit_unary(n),
            Expr::Binary(n) => v.visit_binary(n),
            Expr::Conditional(n) => v.visit_conditional(n),
            Expr::Grouping(n) => v.visit_grouping(n),
            Expr::Array(n) => v.visit_array(n),
            Expr::Object(n) => v.visit_object(n),
            Expr::Function(n) => v.visit_function(n),
            Expr::List(n) => v.visit_list(n),
            Expr::AspNet(n) => v.visit_asp_net(n),
        }
    }
}

pub fn walk_block<V: Visitor + ?Sized>(v: &mut V, node: &Block) {
    for stmt in &node.stmts {
        stmt.accept(v);
    }
}

pub fn walk_var<V: Visitor + ?Sized>(v: &mut V, node: &VarStatement) {
    for decl in &node.decls {
        if let Some(init) = &decl.init {
            init.accept(v);
        }
    }
}

pub fn walk_lexical<V: Visitor + ?Sized>(v: &mut V, node: &LexicalDeclaration) {
    for decl in &node.decls {
        if let Some(init) = &decl.init {
            init.accept(v);
        }
    }
}

pub fn walk_if<V: Visitor + ?Sized>(v: &mut V, node: &IfStatement) {
    node.condition.accept(v);
    node.true_branch.accept(v);
    if let Some(false_branch) = &node.false_branch {
        false_branch.accept(v);
    }
}

fn walk_for_init<V: Visitor + ?Sized>(v: &mut V, init: &ForInit) {
    match init {
        ForInit::Var(var) => v.visit_var(var),
        ForInit::Lexical(lex) => v.visit_lexical(lex),
        ForInit::Expr(expr) => expr.accept(v),
    }
}

pub fn walk_for<V: Visitor + ?Sized>(v: &mut V, node: &ForStatement) {
    if let Some(init) = &node.init {
        walk_for_init(v, init);
    }
    if let Some(condition) = &node.condition {
        condition.accept(v);
    }
    if let Some(incrementer) = &node.incrementer {
        incrementer.accept(v);
    }
    node.body.accept(v);
}

pub fn walk_for_in<V: Visitor + ?Sized>(v: &mut V, node: &ForInStatement) {
    walk_for_init(v, &node.variable);
    node.collection.accept(v);
    node.body.accept(v);
}

pub fn walk_while<V: Visitor + ?Sized>(v: &mut V, node: &WhileStatement) {
    node.condition.accept(v);
    node.body.accept(v);
}

pub fn walk_do_while<V: Visitor + ?Sized>(v: &mut V, node: &DoWhileStatement) {
    node.body.accept(v);
    node.condition.accept(v);
}

pub fn walk_switch<V: Visitor + ?Sized>(v: &mut V, node: &SwitchStatement) {
    node.test.accept(v);
    for case in &node.cases {
        if let Some(test) = &case.test {
            test.accept(v);
        }
        for stmt in &case.stmts {
            stmt.accept(v);
        }
    }
}

pub fn walk_try<V: Visitor + ?Sized>(v: &mut V, node: &TryStatement) {
    v.visit_block(&node.try_block);
    if let Some(catch_block) = &node.catch_block {
        v.visit_block(catch_block);
    }
    if let Some(finally_block) = &node.finally_block {
        v.visit_block(finally_block);
    }
}

pub fn walk_throw<V: Visitor + ?Sized>(v: &mut V, node: &ThrowStatement) {
    if let Some(operand) = &node.operand {
        operand.accept(v);
    }
}

pub fn walk_return<V: Visitor + ?Sized>(v: &mut V, node: &ReturnStatement) {
    if let Some(operand) = &node.operand {
        operand.accept(v);
    }
}

pub fn walk_with<V: Visitor + ?Sized>(v: &mut V, node: &WithStatement) {
    node.object.accept(v);
    node.body.accept(v);
}

pub fn walk_labeled<V: Visitor + ?Sized>(v: &mut V, node: &LabeledStatement) {
    node.statement.accept(v);
}

pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, node: &FunctionObject) {
    v.visit_block(&node.body);
}

pub fn walk_expr_statement<V: Visitor + ?Sized>(v: &mut V, node: &ExprStatement) {
    node.expr.accept(v);
}

pub fn walk_member<V: Visitor + ?Sized>(v: &mut V, node: &Member) {
    node.root.accept(v);
}

pub fn walk_call<V: Visitor + ?Sized>(v: &mut V, node: &Call) {
    node.func.accept(v);
    for arg in &node.args {
        arg.accept(v);
    }
}

pub fn walk_unary<V: Visitor + ?Sized>(v: &mut V, node: &UnaryExpr) {
    node.operand.accept(v);
}

pub fn walk_binary<V: Visitor + ?Sized>(v: &mut V, node: &BinaryExpr) {
    node.left.accept(v);
    node.right.accept(v);
}

pub fn walk_conditional<V: Visitor + ?Sized>(v: &mut V, node: &ConditionalExpr) {
    node.condition.accept(v);
    node.true_expr.accept(v);
    node.false_expr.accept(v);
}

pub fn walk_grouping<V: Visitor + ?Sized>(v: &mut V, node: &GroupingExpr) {
    node.operand.accept(v);
}

pub fn walk_array<V: Visitor + ?Sized>(v: &mut V, node: &ArrayLiteral) {
    for element in node.elements.iter().flatten() {
        element.accept(v);
    }
}

pub fn walk_object<V: Visitor + ?Sized>(v: &mut V, node: &ObjectLiteral) {
    for property in &node.properties {
        property.value.accept(v);
    }
}

pub fn walk_list<V: Visitor + ?Sized>(v: &mut V, node: &AstList) {
    for expr in &node.exprs {
        expr.accept(v);
    }
}
