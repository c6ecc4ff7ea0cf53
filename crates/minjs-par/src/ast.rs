//! minjs-par - AST node definitions.
//!
//! Tagged sums for every statement and expression the parser can build.
//! Children are owned through `Box`/`Vec`; ownership is the parent/child
//! relation, and re-parenting is slot assignment. Every node carries the
//! [`Span`] it was parsed from.
//!
//! Nodes are created only by the parser, mutated by optimization visitors,
//! and read-only during printing.

use minjs_lex::TokenKind;
use minjs_util::{Span, Symbol};

use crate::scope::ScopeId;

/// A statement.
#[derive(Clone, Debug)]
pub enum Stmt {
    Block(Block),
    Var(VarStatement),
    Lexical(LexicalDeclaration),
    If(IfStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    Switch(SwitchStatement),
    Try(TryStatement),
    Throw(ThrowStatement),
    Return(ReturnStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    With(WithStatement),
    Labeled(LabeledStatement),
    Debugger(DebuggerStatement),
    Empty(Span),
    Directive(DirectivePrologue),
    ImportantComment(ImportantCommentStatement),
    ConditionalComment(ConditionalCommentStatement),
    FunctionDecl(Box<FunctionObject>),
    Expr(ExprStatement),
}

/// A braced statement list. Statement order is significant.
#[derive(Clone, Debug)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Stmt>,
    /// Lexical scope opened by this block, when it is a statement block.
    /// Function bodies resolve against the function scope instead.
    pub scope: Option<ScopeId>,
}

/// `var` declaration statement (function-scoped).
#[derive(Clone, Debug)]
pub struct VarStatement {
    pub span: Span,
    pub decls: Vec<VariableDeclaration>,
}

/// `let`/`const` declaration statement (block-scoped).
///
/// Legacy Mozilla-style `const` parses into the same node with
/// `mozilla_const` set; it is function-scoped and tolerates a missing
/// initializer.
#[derive(Clone, Debug)]
pub struct LexicalDeclaration {
    pub span: Span,
    pub is_const: bool,
    pub mozilla_const: bool,
    pub decls: Vec<VariableDeclaration>,
}

/// A single `name = init` declarator.
#[derive(Clone, Debug)]
pub struct VariableDeclaration {
    pub span: Span,
    pub name: Symbol,
    pub name_span: Span,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct IfStatement {
    pub span: Span,
    pub condition: Expr,
    pub true_branch: Box<Stmt>,
    pub false_branch: Option<Box<Stmt>>,
}

/// `for(init; condition; incrementer)` — every clause optional.
#[derive(Clone, Debug)]
pub struct ForStatement {
    pub span: Span,
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub incrementer: Option<Expr>,
    pub body: Box<Stmt>,
}

/// The initializer clause of a `for` or the variable clause of a `for-in`.
#[derive(Clone, Debug)]
pub enum ForInit {
    Var(VarStatement),
    Lexical(LexicalDeclaration),
    Expr(Expr),
}

/// Whether a for-in style loop uses `in` or the `of` extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForInKind {
    In,
    Of,
}

#[derive(Clone, Debug)]
pub struct ForInStatement {
    pub span: Span,
    pub kind: ForInKind,
    pub variable: ForInit,
    pub collection: Expr,
    pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct WhileStatement {
    pub span: Span,
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct DoWhileStatement {
    pub span: Span,
    pub body: Box<Stmt>,
    pub condition: Expr,
}

#[derive(Clone, Debug)]
pub struct SwitchStatement {
    pub span: Span,
    pub test: Expr,
    pub cases: Vec<SwitchCase>,
}

/// One `case test:` or `default:` arm.
#[derive(Clone, Debug)]
pub struct SwitchCase {
    pub span: Span,
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct TryStatement {
    pub span: Span,
    pub try_block: Block,
    pub catch_var: Option<CatchVariable>,
    pub catch_block: Option<Block>,
    pub finally_block: Option<Block>,
}

#[derive(Clone, Debug)]
pub struct CatchVariable {
    pub name: Symbol,
    pub span: Span,
    pub scope: ScopeId,
}

#[derive(Clone, Debug)]
pub struct ThrowStatement {
    pub span: Span,
    /// Absent only after error recovery or a restricted line break
    pub operand: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct ReturnStatement {
    pub span: Span,
    pub operand: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct BreakStatement {
    pub span: Span,
    pub label: Option<Symbol>,
}

#[derive(Clone, Debug)]
pub struct ContinueStatement {
    pub span: Span,
    pub label: Option<Symbol>,
}

#[derive(Clone, Debug)]
pub struct WithStatement {
    pub span: Span,
    pub object: Expr,
    pub body: Box<Stmt>,
    pub scope: ScopeId,
}

#[derive(Clone, Debug)]
pub struct LabeledStatement {
    pub span: Span,
    pub label: Symbol,
    pub statement: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct DebuggerStatement {
    pub span: Span,
    /// Set when `strip_debug_statements` asked for this statement to be
    /// dropped from output
    pub strip: bool,
}

/// A leading string-literal expression statement re-tagged as a directive.
#[derive(Clone, Debug)]
pub struct DirectivePrologue {
    pub span: Span,
    pub value: String,
    pub use_strict: bool,
    /// Original lexeme, re-emitted verbatim when decoding was lossy
    pub raw: String,
    pub may_have_issues: bool,
}

/// An important comment promoted to statement position, emitted verbatim.
#[derive(Clone, Debug)]
pub struct ImportantCommentStatement {
    pub span: Span,
    pub text: String,
}

/// A conditional-compilation comment, preserved structurally; its deeper
/// semantics are deliberately uninterpreted.
#[derive(Clone, Debug)]
pub struct ConditionalCommentStatement {
    pub span: Span,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct ExprStatement {
    pub span: Span,
    pub expr: Expr,
    /// Set on `Debug`-namespace call statements when debug stripping is on
    pub strip: bool,
}

/// How a function object appears in source.
///
/// Only declarations may legally lack enclosing parentheses at statement
/// start; the printer wraps the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Getter,
    Setter,
}

#[derive(Clone, Debug)]
pub struct FunctionObject {
    pub span: Span,
    pub kind: FunctionKind,
    pub name: Option<FunctionName>,
    pub params: Vec<ParameterDeclaration>,
    pub body: Block,
    pub scope: ScopeId,
    /// Body begins with a `"use strict"` directive (or inherited strict)
    pub strict: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionName {
    pub name: Symbol,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ParameterDeclaration {
    pub span: Span,
    pub name: Symbol,
    pub position: usize,
}

/// An expression.
#[derive(Clone, Debug)]
pub enum Expr {
    Constant(ConstantWrapper),
    RegExp(RegExpLiteral),
    This(Span),
    Lookup(Lookup),
    Member(Member),
    Call(Call),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Grouping(GroupingExpr),
    Array(ArrayLiteral),
    Object(ObjectLiteral),
    Function(Box<FunctionObject>),
    /// Comma sequence, normalized from nested comma operators
    List(AstList),
    AspNet(AspNetBlock),
}

/// The primitive value inside a [`ConstantWrapper`].
#[derive(Clone, Debug)]
pub enum PrimitiveValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

/// A literal constant.
///
/// `raw` keeps the original lexeme; when `may_have_issues` is set the
/// printer re-emits it verbatim rather than re-encoding the decoded value.
#[derive(Clone, Debug)]
pub struct ConstantWrapper {
    pub span: Span,
    pub value: PrimitiveValue,
    pub raw: Option<String>,
    pub may_have_issues: bool,
}

#[derive(Clone, Debug)]
pub struct RegExpLiteral {
    pub span: Span,
    pub pattern: String,
    pub flags: String,
}

/// A name reference, bound to a scope field by the resolution pass.
#[derive(Clone, Debug)]
pub struct Lookup {
    pub span: Span,
    pub name: Symbol,
}

/// `root.name`
#[derive(Clone, Debug)]
pub struct Member {
    pub span: Span,
    pub root: Box<Expr>,
    pub name: Symbol,
    pub name_span: Span,
}

/// A call-family node: plain calls, constructor calls, and computed member
/// access, distinguished by the two flags.
///
/// `a[e]` is a call with `in_brackets` set and one argument.
#[derive(Clone, Debug)]
pub struct Call {
    pub span: Span,
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub in_brackets: bool,
    pub is_constructor: bool,
}

#[derive(Clone, Debug)]
pub struct UnaryExpr {
    pub span: Span,
    pub op: TokenKind,
    pub operand: Box<Expr>,
    pub is_postfix: bool,
}

#[derive(Clone, Debug)]
pub struct BinaryExpr {
    pub span: Span,
    pub op: TokenKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct ConditionalExpr {
    pub span: Span,
    pub condition: Box<Expr>,
    pub true_expr: Box<Expr>,
    pub false_expr: Box<Expr>,
}

/// Explicit parentheses from source. Transparent for structural
/// equivalence; the printer re-derives parenthesization from precedence.
#[derive(Clone, Debug)]
pub struct GroupingExpr {
    pub span: Span,
    pub operand: Box<Expr>,
}

/// `[…]` — `None` elements are elisions.
#[derive(Clone, Debug)]
pub struct ArrayLiteral {
    pub span: Span,
    pub elements: Vec<Option<Expr>>,
}

#[derive(Clone, Debug)]
pub struct ObjectLiteral {
    pub span: Span,
    pub properties: Vec<ObjectLiteralProperty>,
}

/// One `name: value` (or accessor) member of an object literal.
///
/// Getter/setter members carry the accessor as an [`Expr::Function`] with
/// the matching [`FunctionKind`].
#[derive(Clone, Debug)]
pub struct ObjectLiteralProperty {
    pub span: Span,
    pub name: ObjectLiteralField,
    pub value: Expr,
}

#[derive(Clone, Debug)]
pub struct ObjectLiteralField {
    pub span: Span,
    pub key: PropertyKey,
}

#[derive(Clone, Debug)]
pub enum PropertyKey {
    Ident(Symbol),
    Str {
        value: String,
        may_have_issues: bool,
    },
    Number(f64),
}

/// Comma-expression container; also used for argument and element lists
/// during parsing.
#[derive(Clone, Debug)]
pub struct AstList {
    pub span: Span,
    pub exprs: Vec<Expr>,
}

/// An embedded `<% … %>` server block, preserved verbatim.
#[derive(Clone, Debug)]
pub struct AspNetBlock {
    pub span: Span,
    pub text: String,
}

impl Stmt {
    /// The span this statement was parsed from.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(n) => n.span,
            Stmt::Var(n) => n.span,
            Stmt::Lexical(n) => n.span,
            Stmt::If(n) => n.span,
            Stmt::For(n) => n.span,
            Stmt::ForIn(n) => n.span,
            Stmt::While(n) => n.span,
            Stmt::DoWhile(n) => n.span,
            Stmt::Switch(n) => n.span,
            Stmt::Try(n) => n.span,
            Stmt::Throw(n) => n.span,
            Stmt::Return(n) => n.span,
            Stmt::Break(n) => n.span,
            Stmt::Continue(n) => n.span,
            Stmt::With(n) => n.span,
            Stmt::Labeled(n) => n.span,
            Stmt::Debugger(n) => n.span,
            Stmt::Empty(span) => *span,
            Stmt::Directive(n) => n.span,
            Stmt::ImportantComment(n) => n.span,
            Stmt::ConditionalComment(n) => n.span,
            Stmt::FunctionDecl(n) => n.span,
            Stmt::Expr(n) => n.span,
        }
    }
}

impl Expr {
    /// The span this expression was parsed from.
    pub fn span(&self) -> Span {
        match self {
            Expr::Constant(n) => n.span,
            Expr::RegExp(n) => n.span,
            Expr::This(span) => *span,
            Expr::Lookup(n) => n.span,
            Expr::Member(n) => n.span,
            Expr::Call(n) => n.span,
            Expr::Unary(n) => n.span,
            Expr::Binary(n) => n.span,
            Expr::Conditional(n) => n.span,
            Expr::Grouping(n) => n.span,
            Expr::Array(n) => n.span,
            Expr::Object(n) => n.span,
            Expr::Function(n) => n.span,
            Expr::List(n) => n.span,
            Expr::AspNet(n) => n.span,
        }
    }

    /// Direct sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Constant(_) | Expr::RegExp(_) | Expr::This(_) | Expr::Lookup(_)
            | Expr::AspNet(_) | Expr::Function(_) => Vec::new(),
            Expr::Member(n) => vec![&*n.root],
            Expr::Call(n) => {
                let mut out = vec![&*n.func];
                out.extend(n.args.iter());
                out
            }
            Expr::Unary(n) => vec![&*n.operand],
            Expr::Binary(n) => vec![&*n.left, &*n.right],
            Expr::Conditional(n) => vec![&*n.condition, &*n.true_expr, &*n.false_expr],
            Expr::Grouping(n) => vec![&*n.operand],
            Expr::Array(n) => n.elements.iter().flatten().collect(),
            Expr::Object(n) => n.properties.iter().map(|p| &p.value).collect(),
            Expr::List(n) => n.exprs.iter().collect(),
        }
    }

    /// The left-hand side of this expression for binding purposes: a comma
    /// sequence delegates to the leftmost sub-expression of its rightmost
    /// operand; every other expression is its own left-hand side.
    pub fn left_hand_side(&self) -> &Expr {
        match self {
            Expr::List(n) => match n.exprs.last() {
                Some(last) => last.left_hand_side(),
                None => self,
            },
            Expr::Binary(n) if n.op == TokenKind::Comma => n.right.left_hand_side(),
            _ => self,
        }
    }

    /// Unwrap any number of grouping parentheses.
    pub fn unwrap_grouping(&self) -> &Expr {
        let mut e = self;
        while let Expr::Grouping(g) = e {
            e = &g.operand;
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minjs_util::Symbol;

    fn lookup(name: &str) -> Expr {
        Expr::Lookup(Lookup {
            span: Span::DUMMY,
            name: Symbol::intern(name),
        })
    }

    #[test]
    fn test_children_order_binary() {
        let e = Expr::Binary(BinaryExpr {
            span: Span::DUMMY,
            op: TokenKind::Plus,
            left: Box::new(lookup("a")),
            right: Box::new(lookup("b")),
        });
        let kids = e.children();
        assert_eq!(kids.len(), 2);
        assert!(matches!(kids[0], Expr::Lookup(l) if l.name.as_str() == "a"));
    }

    #[test]
    fn test_left_hand_side_of_list() {
        let list = Expr::List(AstList {
            span: Span::DUMMY,
            exprs: vec![
                lookup("a"),
                Expr::Binary(BinaryExpr {
                    span: Span::DUMMY,
                    op: TokenKind::Plus,
                    left: Box::new(lookup("b")),
                    right: Box::new(lookup("c")),
                }),
            ],
        });
        // rightmost operand is `b + c`; it is its own left-hand side
        assert!(matches!(list.left_hand_side(), Expr::Binary(_)));
    }

    #[test]
    fn test_unwrap_grouping() {
        let inner = lookup("x");
        let wrapped = Expr::Grouping(GroupingExpr {
            span: Span::DUMMY,
            operand: Box::new(Expr::Grouping(GroupingExpr {
                span: Span::DUMMY,
                operand: Box::new(inner),
            })),
        });
        assert!(matches!(wrapped.unwrap_grouping(), Expr::Lookup(_)));
    }

    #[test]
    fn test_elisions_excluded_from_children() {
        let arr = Expr::Array(ArrayLiteral {
            span: Span::DUMMY,
            elements: vec![Some(lookup("a")), None, Some(lookup("b"))],
        });
        assert_eq!(arr.children().len(), 2);
    }
}
