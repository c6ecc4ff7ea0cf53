//! Primitive type inference over expressions.
//!
//! The printer uses this to decide parenthesization of numeric members
//! (`(4).toString()`), and optimization passes use it to gate literal
//! folding. Inference is purely structural; anything that could be any
//! run-time type reports [`PrimitiveType::Other`].

use minjs_lex::{OpPrec, TokenKind};

use crate::ast::{Expr, PrimitiveValue};

/// The statically knowable primitive type of an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    Number,
    Str,
    Boolean,
    Null,
    Other,
}

impl PrimitiveType {
    fn common(self, other: PrimitiveType) -> PrimitiveType {
        if self == other {
            self
        } else {
            PrimitiveType::Other
        }
    }
}

impl Expr {
    /// Infer the primitive type this expression must evaluate to.
    pub fn find_primitive_type(&self) -> PrimitiveType {
        match self {
            Expr::Constant(c) => match c.value {
                PrimitiveValue::Number(_) => PrimitiveType::Number,
                PrimitiveValue::Str(_) => PrimitiveType::Str,
                PrimitiveValue::Bool(_) => PrimitiveType::Boolean,
                PrimitiveValue::Null => PrimitiveType::Null,
            },
            Expr::Grouping(g) => g.operand.find_primitive_type(),
            Expr::Unary(u) => match u.op {
                TokenKind::Typeof => PrimitiveType::Str,
                TokenKind::LogicalNot => PrimitiveType::Boolean,
                TokenKind::Void | TokenKind::Delete => PrimitiveType::Other,
                // +, -, ~, ++, -- all coerce to number
                _ => PrimitiveType::Number,
            },
            Expr::Binary(b) => binary_type(b.op, &b.left, &b.right),
            Expr::Conditional(c) => c
                .true_expr
                .find_primitive_type()
                .common(c.false_expr.find_primitive_type()),
            Expr::List(l) => l
                .exprs
                .last()
                .map(|e| e.find_primitive_type())
                .unwrap_or(PrimitiveType::Other),
            _ => PrimitiveType::Other,
        }
    }
}

fn binary_type(op: TokenKind, left: &Expr, right: &Expr) -> PrimitiveType {
    use TokenKind::*;
    match op {
        // string concatenation wins over numeric addition
        Plus => {
            let lt = left.find_primitive_type();
            let rt = right.find_primitive_type();
            if lt == PrimitiveType::Str || rt == PrimitiveType::Str {
                PrimitiveType::Str
            } else if lt != PrimitiveType::Other && rt != PrimitiveType::Other {
                PrimitiveType::Number
            } else {
                PrimitiveType::Other
            }
        }

        Minus | Multiply | Divide | Modulo | BitwiseAnd | BitwiseOr | BitwiseXor | LeftShift
        | RightShift | UnsignedRightShift => PrimitiveType::Number,

        Equal | NotEqual | StrictEqual | StrictNotEqual | LessThan | LessThanEqual
        | GreaterThan | GreaterThanEqual | In | Instanceof => PrimitiveType::Boolean,

        LogicalAnd | LogicalOr => left
            .find_primitive_type()
            .common(right.find_primitive_type()),

        // plain assignment and comma take the right operand's type; compound
        // assignments follow their underlying operator
        Assign | Comma => right.find_primitive_type(),
        PlusAssign => binary_type(Plus, left, right),
        _ if op.precedence() == OpPrec::Assignment => PrimitiveType::Number,

        _ => PrimitiveType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use minjs_util::{Span, Symbol};

    fn num(v: f64) -> Expr {
        Expr::Constant(ConstantWrapper {
            span: Span::DUMMY,
            value: PrimitiveValue::Number(v),
            raw: None,
            may_have_issues: false,
        })
    }

    fn string(v: &str) -> Expr {
        Expr::Constant(ConstantWrapper {
            span: Span::DUMMY,
            value: PrimitiveValue::Str(v.to_owned()),
            raw: None,
            may_have_issues: false,
        })
    }

    fn lookup() -> Expr {
        Expr::Lookup(Lookup {
            span: Span::DUMMY,
            name: Symbol::intern("x"),
        })
    }

    fn binary(op: TokenKind, l: Expr, r: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            span: Span::DUMMY,
            op,
            left: Box::new(l),
            right: Box::new(r),
        })
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(num(1.0).find_primitive_type(), PrimitiveType::Number);
        assert_eq!(string("a").find_primitive_type(), PrimitiveType::Str);
        assert_eq!(lookup().find_primitive_type(), PrimitiveType::Other);
    }

    #[test]
    fn test_plus_string_contagion() {
        assert_eq!(
            binary(TokenKind::Plus, num(1.0), string("a")).find_primitive_type(),
            PrimitiveType::Str
        );
        assert_eq!(
            binary(TokenKind::Plus, num(1.0), num(2.0)).find_primitive_type(),
            PrimitiveType::Number
        );
        assert_eq!(
            binary(TokenKind::Plus, num(1.0), lookup()).find_primitive_type(),
            PrimitiveType::Other
        );
    }

    #[test]
    fn test_typeof_is_string() {
        let e = Expr::Unary(UnaryExpr {
            span: Span::DUMMY,
            op: TokenKind::Typeof,
            operand: Box::new(lookup()),
            is_postfix: false,
        });
        assert_eq!(e.find_primitive_type(), PrimitiveType::Str);
    }

    #[test]
    fn test_comparison_is_boolean() {
        assert_eq!(
            binary(TokenKind::In, lookup(), lookup()).find_primitive_type(),
            PrimitiveType::Boolean
        );
    }

    #[test]
    fn test_logical_common_type() {
        assert_eq!(
            binary(TokenKind::LogicalOr, num(1.0), num(2.0)).find_primitive_type(),
            PrimitiveType::Number
        );
        assert_eq!(
            binary(TokenKind::LogicalOr, num(1.0), string("s")).find_primitive_type(),
            PrimitiveType::Other
        );
    }

    #[test]
    fn test_conditional_common_type() {
        let e = Expr::Conditional(ConditionalExpr {
            span: Span::DUMMY,
            condition: Box::new(lookup()),
            true_expr: Box::new(num(1.0)),
            false_expr: Box::new(num(2.0)),
        });
        assert_eq!(e.find_primitive_type(), PrimitiveType::Number);
    }
}
