//! Structural equivalence over AST nodes.
//!
//! Two nodes are equivalent when their variants match and every child slot
//! is recursively equivalent. Spans never participate. Operator nodes
//! additionally require equal operator tokens; constants require equal
//! primitive type and value (ordinal comparison for strings and regex
//! pattern/flags). Grouping parentheses are transparent on both sides, so a
//! re-parse of printed output compares equal to the original tree.

use crate::ast::*;

/// Recursive structural equivalence for expressions.
pub fn expr_equivalent(a: &Expr, b: &Expr) -> bool {
    let a = a.unwrap_grouping();
    let b = b.unwrap_grouping();
    match (a, b) {
        (Expr::Constant(x), Expr::Constant(y)) => constant_equivalent(x, y),
        (Expr::RegExp(x), Expr::RegExp(y)) => x.pattern == y.pattern && x.flags == y.flags,
        (Expr::This(_), Expr::This(_)) => true,
        (Expr::Lookup(x), Expr::Lookup(y)) => x.name == y.name,
        (Expr::Member(x), Expr::Member(y)) => {
            x.name == y.name && expr_equivalent(&x.root, &y.root)
        }
        (Expr::Call(x), Expr::Call(y)) => {
            x.in_brackets == y.in_brackets
                && x.is_constructor == y.is_constructor
                && expr_equivalent(&x.func, &y.func)
                && slice_equivalent(&x.args, &y.args)
        }
        (Expr::Unary(x), Expr::Unary(y)) => {
            x.op == y.op && x.is_postfix == y.is_postfix && expr_equivalent(&x.operand, &y.operand)
        }
        (Expr::Binary(x), Expr::Binary(y)) => {
            x.op == y.op && expr_equivalent(&x.left, &y.left) && expr_equivalent(&x.right, &y.right)
        }
        (Expr::Conditional(x), Expr::Conditional(y)) => {
            expr_equivalent(&x.condition, &y.condition)
                && expr_equivalent(&x.true_expr, &y.true_expr)
                && expr_equivalent(&x.false_expr, &y.false_expr)
        }
        (Expr::Array(x), Expr::Array(y)) => {
            x.elements.len() == y.elements.len()
                && x.elements.iter().zip(&y.elements).all(|(e, f)| match (e, f) {
                    (Some(e), Some(f)) => expr_equivalent(e, f),
                    (None, None) => true,
                    _ => false,
                })
        }
        (Expr::Object(x), Expr::Object(y)) => {
            x.properties.len() == y.properties.len()
                && x.properties.iter().zip(&y.properties).all(|(p, q)| {
                    property_key_equivalent(&p.name.key, &q.name.key)
                        && expr_equivalent(&p.value, &q.value)
                })
        }
        (Expr::Function(x), Expr::Function(y)) => function_equivalent(x, y),
        (Expr::List(x), Expr::List(y)) => slice_equivalent(&x.exprs, &y.exprs),
        (Expr::AspNet(x), Expr::AspNet(y)) => x.text == y.text,
        _ => false,
    }
}

fn slice_equivalent(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| expr_equivalent(x, y))
}

fn constant_equivalent(a: &ConstantWrapper, b: &ConstantWrapper) -> bool {
    match (&a.value, &b.value) {
        // bit comparison keeps -0 distinct and treats every NaN as itself
        (PrimitiveValue::Number(x), PrimitiveValue::Number(y)) => {
            x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())
        }
        (PrimitiveValue::Str(x), PrimitiveValue::Str(y)) => x == y,
        (PrimitiveValue::Bool(x), PrimitiveValue::Bool(y)) => x == y,
        (PrimitiveValue::Null, PrimitiveValue::Null) => true,
        _ => false,
    }
}

fn property_key_equivalent(a: &PropertyKey, b: &PropertyKey) -> bool {
    match (a, b) {
        (PropertyKey::Ident(x), PropertyKey::Ident(y)) => x == y,
        (PropertyKey::Str { value: x, .. }, PropertyKey::Str { value: y, .. }) => x == y,
        (PropertyKey::Number(x), PropertyKey::Number(y)) => {
            x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())
        }
        // an identifier key and a string key with the same text name the
        // same property; the printer may unquote
        (PropertyKey::Ident(x), PropertyKey::Str { value: y, .. })
        | (PropertyKey::Str { value: y, .. }, PropertyKey::Ident(x)) => x.as_str() == y,
        _ => false,
    }
}

fn function_equivalent(a: &FunctionObject, b: &FunctionObject) -> bool {
    a.kind == b.kind
        && a.name.as_ref().map(|n| n.name) == b.name.as_ref().map(|n| n.name)
        && a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(p, q)| p.name == q.name)
        && block_equivalent(&a.body, &b.body)
}

/// Recursive structural equivalence for statements.
pub fn stmt_equivalent(a: &Stmt, b: &Stmt) -> bool {
    match (a, b) {
        (Stmt::Block(x), Stmt::Block(y)) => block_equivalent(x, y),
        (Stmt::Var(x), Stmt::Var(y)) => decls_equivalent(&x.decls, &y.decls),
        (Stmt::Lexical(x), Stmt::Lexical(y)) => {
            x.is_const == y.is_const && decls_equivalent(&x.decls, &y.decls)
        }
        (Stmt::If(x), Stmt::If(y)) => {
            expr_equivalent(&x.condition, &y.condition)
                && stmt_equivalent(&x.true_branch, &y.true_branch)
                && option_stmt_equivalent(&x.false_branch, &y.false_branch)
        }
        (Stmt::For(x), Stmt::For(y)) => {
            for_init_equivalent(&x.init, &y.init)
                && option_expr_equivalent(&x.condition, &y.condition)
                && option_expr_equivalent(&x.incrementer, &y.incrementer)
                && stmt_equivalent(&x.body, &y.body)
        }
        (Stmt::ForIn(x), Stmt::ForIn(y)) => {
            x.kind == y.kind
                && for_init_node_equivalent(&x.variable, &y.variable)
                && expr_equivalent(&x.collection, &y.collection)
                && stmt_equivalent(&x.body, &y.body)
        }
        (Stmt::While(x), Stmt::While(y)) => {
            expr_equivalent(&x.condition, &y.condition) && stmt_equivalent(&x.body, &y.body)
        }
        (Stmt::DoWhile(x), Stmt::DoWhile(y)) => {
            expr_equivalent(&x.condition, &y.condition) && stmt_equivalent(&x.body, &y.body)
        }
        (Stmt::Switch(x), Stmt::Switch(y)) => {
            expr_equivalent(&x.test, &y.test)
                && x.cases.len() == y.cases.len()
                && x.cases.iter().zip(&y.cases).all(|(c, d)| {
                    option_expr_equivalent(&c.test, &d.test) && stmts_equivalent(&c.stmts, &d.stmts)
                })
        }
        (Stmt::Try(x), Stmt::Try(y)) => {
            block_equivalent(&x.try_block, &y.try_block)
                && x.catch_var.as_ref().map(|v| v.name) == y.catch_var.as_ref().map(|v| v.name)
                && match (&x.catch_block, &y.catch_block) {
                    (Some(c), Some(d)) => block_equivalent(c, d),
                    (None, None) => true,
                    _ => false,
                }
                && match (&x.finally_block, &y.finally_block) {
                    (Some(c), Some(d)) => block_equivalent(c, d),
                    (None, None) => true,
                    _ => false,
                }
        }
        (Stmt::Throw(x), Stmt::Throw(y)) => option_expr_equivalent(&x.operand, &y.operand),
        (Stmt::Return(x), Stmt::Return(y)) => option_expr_equivalent(&x.operand, &y.operand),
        (Stmt::Break(x), Stmt::Break(y)) => x.label == y.label,
        (Stmt::Continue(x), Stmt::Continue(y)) => x.label == y.label,
        (Stmt::With(x), Stmt::With(y)) => {
            expr_equivalent(&x.object, &y.object) && stmt_equivalent(&x.body, &y.body)
        }
        (Stmt::Labeled(x), Stmt::Labeled(y)) => {
            x.label == y.label && stmt_equivalent(&x.statement, &y.statement)
        }
        (Stmt::Debugger(_), Stmt::Debugger(_)) => true,
        (Stmt::Empty(_), Stmt::Empty(_)) => true,
        (Stmt::Directive(x), Stmt::Directive(y)) => x.value == y.value,
        (Stmt::ImportantComment(x), Stmt::ImportantComment(y)) => x.text == y.text,
        (Stmt::ConditionalComment(x), Stmt::ConditionalComment(y)) => x.text == y.text,
        (Stmt::FunctionDecl(x), Stmt::FunctionDecl(y)) => function_equivalent(x, y),
        (Stmt::Expr(x), Stmt::Expr(y)) => expr_equivalent(&x.expr, &y.expr),
        _ => false,
    }
}

fn option_stmt_equivalent(a: &Option<Box<Stmt>>, b: &Option<Box<Stmt>>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => stmt_equivalent(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn option_expr_equivalent(a: &Option<Expr>, b: &Option<Expr>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => expr_equivalent(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn decls_equivalent(a: &[VariableDeclaration], b: &[VariableDeclaration]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.name == y.name && option_expr_equivalent(&x.init, &y.init))
}

fn for_init_equivalent(a: &Option<ForInit>, b: &Option<ForInit>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => for_init_node_equivalent(x, y),
        _ => false,
    }
}

fn for_init_node_equivalent(a: &ForInit, b: &ForInit) -> bool {
    match (a, b) {
        (ForInit::Var(x), ForInit::Var(y)) => decls_equivalent(&x.decls, &y.decls),
        (ForInit::Lexical(x), ForInit::Lexical(y)) => {
            x.is_const == y.is_const && decls_equivalent(&x.decls, &y.decls)
        }
        (ForInit::Expr(x), ForInit::Expr(y)) => expr_equivalent(x, y),
        _ => false,
    }
}

fn stmts_equivalent(a: &[Stmt], b: &[Stmt]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| stmt_equivalent(x, y))
}

/// Structural equivalence for blocks: statement-by-statement, order
/// significant.
pub fn block_equivalent(a: &Block, b: &Block) -> bool {
    stmts_equivalent(&a.stmts, &b.stmts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minjs_lex::TokenKind;
    use minjs_util::{Span, Symbol};

    fn lookup(name: &str) -> Expr {
        Expr::Lookup(Lookup {
            span: Span::DUMMY,
            name: Symbol::intern(name),
        })
    }

    fn grouped(e: Expr) -> Expr {
        Expr::Grouping(GroupingExpr {
            span: Span::DUMMY,
            operand: Box::new(e),
        })
    }

    #[test]
    fn test_spans_ignored() {
        let a = Expr::Lookup(Lookup {
            span: Span::new(0, 1, 1, 0),
            name: Symbol::intern("x"),
        });
        let b = Expr::Lookup(Lookup {
            span: Span::new(40, 41, 3, 7),
            name: Symbol::intern("x"),
        });
        assert!(expr_equivalent(&a, &b));
    }

    #[test]
    fn test_grouping_transparent() {
        assert!(expr_equivalent(&grouped(lookup("a")), &lookup("a")));
    }

    #[test]
    fn test_operator_tokens_compared() {
        let plus = Expr::Binary(BinaryExpr {
            span: Span::DUMMY,
            op: TokenKind::Plus,
            left: Box::new(lookup("a")),
            right: Box::new(lookup("b")),
        });
        let minus = Expr::Binary(BinaryExpr {
            span: Span::DUMMY,
            op: TokenKind::Minus,
            left: Box::new(lookup("a")),
            right: Box::new(lookup("b")),
        });
        assert!(!expr_equivalent(&plus, &minus));
    }

    #[test]
    fn test_negative_zero_distinct() {
        let zero = Expr::Constant(ConstantWrapper {
            span: Span::DUMMY,
            value: PrimitiveValue::Number(0.0),
            raw: None,
            may_have_issues: false,
        });
        let neg_zero = Expr::Constant(ConstantWrapper {
            span: Span::DUMMY,
            value: PrimitiveValue::Number(-0.0),
            raw: None,
            may_have_issues: false,
        });
        assert!(!expr_equivalent(&zero, &neg_zero));
    }

    #[test]
    fn test_array_elisions_compared() {
        let a = Expr::Array(ArrayLiteral {
            span: Span::DUMMY,
            elements: vec![Some(lookup("a")), None],
        });
        let b = Expr::Array(ArrayLiteral {
            span: Span::DUMMY,
            elements: vec![Some(lookup("a")), Some(lookup("b"))],
        });
        assert!(!expr_equivalent(&a, &b));
    }
}
