//! Expression parsing: precedence climbing over the operator table.
//!
//! Assignment operators and the ternary are right-associative; everything
//! else associates left. The `in` operator is inhibited while a `no_in`
//! flag is active (the initializer clause of a `for` statement), and is
//! re-enabled inside any bracketed or parenthesized sub-expression.
//!
//! Comma sequences are normalized as they parse: `a, b, c` becomes a single
//! [`AstList`] rather than nested comma operators.

use minjs_lex::{OpPrec, TokenKind};
use minjs_util::{ErrorKind, Span};

use crate::ast::*;
use crate::{PResult, Parser, PartialNode};

impl<'a> Parser<'a> {
    /// A full expression, commas included.
    pub(crate) fn parse_expression(&mut self, no_in: bool) -> PResult<Expr> {
        self.parse_binary_expression(OpPrec::Comma.rank(), no_in)
    }

    /// A single assignment expression (no top-level commas).
    pub(crate) fn parse_assignment_expression(&mut self, no_in: bool) -> PResult<Expr> {
        self.parse_binary_expression(OpPrec::Assignment.rank(), no_in)
    }

    /// The precedence-climbing driver.
    fn parse_binary_expression(&mut self, min_rank: u8, no_in: bool) -> PResult<Expr> {
        let mut lhs = self.parse_unary_expression(no_in)?;

        loop {
            let op = self.current.kind;
            if op == TokenKind::In && no_in {
                break;
            }
            // a slash straight after a function expression's closing brace
            // reads as a regex literal, not a divide
            if matches!(op, TokenKind::Divide | TokenKind::DivideAssign)
                && self.prev_token_kind == TokenKind::RightCurly
                && matches!(lhs.unwrap_grouping(), Expr::Function(f) if f.kind == FunctionKind::Expression)
            {
                if let Some((pattern, body_span)) = self.scanner.scan_regex(self.current.span) {
                    let (flags, flags_span) = self.scanner.scan_regex_flags();
                    let span = body_span.merge(flags_span);
                    self.advance();
                    lhs = Expr::RegExp(RegExpLiteral {
                        span,
                        pattern,
                        flags,
                    });
                    continue;
                }
            }
            let prec = op.precedence();
            if prec == OpPrec::None
                || prec == OpPrec::Unary
                || prec == OpPrec::Postfix
                || prec == OpPrec::FieldAccess
                || prec.rank() < min_rank
            {
                break;
            }

            match prec {
                OpPrec::Conditional => {
                    self.advance();
                    // `in` is legal again in the true branch; the false
                    // branch stays restricted
                    let true_expr = self.parse_branch(&mut lhs, false)?;
                    self.expect(TokenKind::Colon, ErrorKind::NoColon);
                    let false_expr = self.parse_branch(&mut lhs, no_in)?;
                    let span = lhs.span().merge(false_expr.span());
                    lhs = Expr::Conditional(ConditionalExpr {
                        span,
                        condition: Box::new(lhs),
                        true_expr: Box::new(true_expr),
                        false_expr: Box::new(false_expr),
                    });
                }
                OpPrec::Comma => {
                    self.advance();
                    let next = self.parse_operand(&mut lhs, OpPrec::Assignment.rank(), no_in)?;
                    lhs = match lhs {
                        Expr::List(mut list) => {
                            list.span = list.span.merge(next.span());
                            list.exprs.push(next);
                            Expr::List(list)
                        }
                        first => Expr::List(AstList {
                            span: first.span().merge(next.span()),
                            exprs: vec![first, next],
                        }),
                    };
                }
                OpPrec::Assignment => {
                    self.check_assignment_target(&lhs);
                    self.advance();
                    // right-associative: reuse the same rank
                    let rhs = self.parse_operand(&mut lhs, prec.rank(), no_in)?;
                    let span = lhs.span().merge(rhs.span());
                    lhs = Expr::Binary(BinaryExpr {
                        span,
                        op,
                        left: Box::new(lhs),
                        right: Box::new(rhs),
                    });
                }
                _ => {
                    self.advance();
                    let rhs = self.parse_operand(&mut lhs, prec.rank() + 1, no_in)?;
                    if op.is_loose_equality()
                        && (is_null_constant(&lhs) || is_null_constant(&rhs))
                    {
                        self.report_at(ErrorKind::SuspectEquality, lhs.span().merge(rhs.span()));
                    }
                    let span = lhs.span().merge(rhs.span());
                    lhs = Expr::Binary(BinaryExpr {
                        span,
                        op,
                        left: Box::new(lhs),
                        right: Box::new(rhs),
                    });
                }
            }
        }

        Ok(lhs)
    }

    /// Parse a right operand, attaching the left side as the partial node
    /// when the operand fails.
    fn parse_operand(&mut self, lhs: &mut Expr, min_rank: u8, no_in: bool) -> PResult<Expr> {
        match self.parse_binary_expression(min_rank, no_in) {
            Ok(expr) => Ok(expr),
            Err(mut recovery) => {
                if recovery.partial.is_none() {
                    let placeholder = Expr::Constant(ConstantWrapper {
                        span: lhs.span(),
                        value: PrimitiveValue::Null,
                        raw: None,
                        may_have_issues: false,
                    });
                    let partial = std::mem::replace(lhs, placeholder);
                    recovery.partial = Some(PartialNode::Expr(Box::new(partial)));
                }
                Err(recovery)
            }
        }
    }

    fn parse_branch(&mut self, lhs: &mut Expr, no_in: bool) -> PResult<Expr> {
        self.parse_operand(lhs, OpPrec::Assignment.rank(), no_in)
    }

    /// Strict mode forbids assigning to `eval` and `arguments`.
    fn check_assignment_target(&self, target: &Expr) {
        if !self.current_strict() {
            return;
        }
        if let Expr::Lookup(lookup) = target.unwrap_grouping() {
            if lookup.name == minjs_util::symbol::WK_EVAL
                || lookup.name == minjs_util::symbol::WK_ARGUMENTS
            {
                self.report_at(ErrorKind::StrictModeRestrictedName, lookup.span);
            }
        }
    }

    /// Prefix operators, then the postfix/member/call tier.
    fn parse_unary_expression(&mut self, no_in: bool) -> PResult<Expr> {
        let op = self.current.kind;
        match op {
            TokenKind::Delete
            | TokenKind::Void
            | TokenKind::Typeof
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::BitwiseNot
            | TokenKind::LogicalNot
            | TokenKind::Increment
            | TokenKind::Decrement => {
                let start = self.current.span;
                self.advance();
                let operand = self.parse_unary_expression(no_in)?;
                Ok(Expr::Unary(UnaryExpr {
                    span: start.merge(operand.span()),
                    op,
                    operand: Box::new(operand),
                    is_postfix: false,
                }))
            }
            _ => {
                let mut expr = self.parse_left_hand_side(no_in)?;
                // postfix operators attach only without an intervening
                // line terminator
                if matches!(self.current.kind, TokenKind::Increment | TokenKind::Decrement)
                    && !self.newline_before
                {
                    let op = self.current.kind;
                    let span = expr.span().merge(self.current.span);
                    self.advance();
                    expr = Expr::Unary(UnaryExpr {
                        span,
                        op,
                        operand: Box::new(expr),
                        is_postfix: true,
                    });
                }
                Ok(expr)
            }
        }
    }

    /// Member access, calls, and pending `new` expressions.
    fn parse_left_hand_side(&mut self, no_in: bool) -> PResult<Expr> {
        // collect a stack of `new` contexts before the primary
        let mut new_spans = Vec::new();
        while self.current.kind == TokenKind::New {
            new_spans.push(self.current.span);
            self.advance();
        }

        if !new_spans.is_empty()
            && !matches!(
                self.current.kind,
                TokenKind::Identifier
                    | TokenKind::This
                    | TokenKind::New
                    | TokenKind::LeftParenthesis
                    | TokenKind::Function
            )
            && !self.current.kind.can_be_identifier(self.current_strict())
        {
            return Err(self.recovery(ErrorKind::NoConstructor, None));
        }

        let mut expr = self.parse_primary_expression(no_in)?;

        loop {
            match self.current.kind {
                TokenKind::AccessField => {
                    self.advance();
                    let kind = self.current.kind;
                    // reserved words are valid member names
                    if kind == TokenKind::Identifier || kind.is_keyword() {
                        let name_span = self.current.span;
                        let name = self.current_identifier_symbol();
                        self.advance();
                        expr = Expr::Member(Member {
                            span: expr.span().merge(name_span),
                            root: Box::new(expr),
                            name,
                            name_span,
                        });
                    } else {
                        self.report_current(ErrorKind::NoMemberIdentifier);
                        break;
                    }
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    // brackets clear the no-in restriction
                    let index = self.parse_expression(false)?;
                    let mut span = expr.span();
                    if self.current.kind == TokenKind::RightBracket {
                        span = span.merge(self.current.span);
                        self.advance();
                    } else {
                        self.report_current(ErrorKind::NoRightBracket);
                    }
                    expr = Expr::Call(Call {
                        span,
                        func: Box::new(expr),
                        args: vec![index],
                        in_brackets: true,
                        is_constructor: false,
                    });
                }
                TokenKind::LeftParenthesis => {
                    let (args, args_end) = self.parse_arguments()?;
                    // a pending `new` pairs with the nearest argument list
                    let pending_new = new_spans.pop();
                    let start = pending_new.unwrap_or_else(|| expr.span());
                    expr = Expr::Call(Call {
                        span: start.merge(args_end),
                        func: Box::new(expr),
                        args,
                        in_brackets: false,
                        is_constructor: pending_new.is_some(),
                    });
                }
                _ => break,
            }
        }

        // leftover `new` contexts synthesize zero-argument constructor calls
        while let Some(new_span) = new_spans.pop() {
            expr = Expr::Call(Call {
                span: new_span.merge(expr.span()),
                func: Box::new(expr),
                args: Vec::new(),
                in_brackets: false,
                is_constructor: true,
            });
        }

        Ok(expr)
    }

    fn parse_arguments(&mut self) -> PResult<(Vec<Expr>, Span)> {
        debug_assert_eq!(self.current.kind, TokenKind::LeftParenthesis);
        self.advance();
        let mut args = Vec::new();
        if self.current.kind != TokenKind::RightParenthesis {
            loop {
                args.push(self.parse_assignment_expression(false)?);
                if self.current.kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let end = self.current.span;
        self.expect(TokenKind::RightParenthesis, ErrorKind::NoRightParenthesis);
        Ok((args, end))
    }

    fn parse_primary_expression(&mut self, _no_in: bool) -> PResult<Expr> {
        let token = self.current;
        match token.kind {
            TokenKind::This => {
                self.advance();
                Ok(Expr::This(token.span))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::Constant(ConstantWrapper {
                    span: token.span,
                    value: PrimitiveValue::Bool(token.kind == TokenKind::True),
                    raw: None,
                    may_have_issues: false,
                }))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Constant(ConstantWrapper {
                    span: token.span,
                    value: PrimitiveValue::Null,
                    raw: None,
                    may_have_issues: false,
                }))
            }
            TokenKind::IntegerLiteral | TokenKind::NumericLiteral => {
                let constant = self.convert_numeric_literal();
                self.advance();
                Ok(Expr::Constant(constant))
            }
            TokenKind::StringLiteral => {
                let literal = self.scanner.take_string_literal();
                let raw = self.token_text(&token).to_owned();
                self.advance();
                Ok(Expr::Constant(ConstantWrapper {
                    span: token.span,
                    value: PrimitiveValue::Str(literal.value),
                    raw: Some(raw),
                    may_have_issues: literal.may_have_issues,
                }))
            }
            TokenKind::Divide | TokenKind::DivideAssign => {
                // `/` where a primary is expected: try a regex literal
                match self.scanner.scan_regex(token.span) {
                    Some((pattern, body_span)) => {
                        let (flags, flags_span) = self.scanner.scan_regex_flags();
                        let span = body_span.merge(flags_span);
                        self.advance();
                        Ok(Expr::RegExp(RegExpLiteral {
                            span,
                            pattern,
                            flags,
                        }))
                    }
                    None => Err(self.recovery(ErrorKind::ExpressionExpected, None)),
                }
            }
            TokenKind::LeftParenthesis => {
                self.advance();
                // parentheses clear the no-in restriction
                let operand = self.parse_expression(false)?;
                let mut span = token.span.merge(operand.span());
                if self.current.kind == TokenKind::RightParenthesis {
                    span = span.merge(self.current.span);
                    self.advance();
                } else {
                    self.report_current(ErrorKind::NoRightParenthesis);
                }
                Ok(Expr::Grouping(GroupingExpr {
                    span,
                    operand: Box::new(operand),
                }))
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftCurly => self.parse_object_literal(),
            TokenKind::Function => {
                let function = self.parse_function(FunctionKind::Expression)?;
                Ok(Expr::Function(Box::new(function)))
            }
            TokenKind::AspNetBlock => {
                let text = self.token_text(&token).to_owned();
                self.advance();
                Ok(Expr::AspNet(AspNetBlock {
                    span: token.span,
                    text,
                }))
            }
            kind if kind.can_be_identifier(self.current_strict()) => {
                if !matches!(
                    kind,
                    TokenKind::Identifier | TokenKind::Get | TokenKind::Set
                ) {
                    self.report_current(ErrorKind::KeywordUsedAsIdentifier);
                }
                let name = self.current_identifier_symbol();
                self.advance();
                Ok(Expr::Lookup(Lookup {
                    span: token.span,
                    name,
                }))
            }
            _ => Err(self.recovery(ErrorKind::ExpressionExpected, None)),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<Expr> {
        let start = self.current.span;
        self.advance();
        let mut elements: Vec<Option<Expr>> = Vec::new();
        let end;
        loop {
            match self.current.kind {
                TokenKind::RightBracket => {
                    end = self.current.span;
                    self.advance();
                    break;
                }
                TokenKind::Comma => {
                    // elision
                    elements.push(None);
                    self.advance();
                }
                _ => {
                    let element = self.parse_assignment_expression(false)?;
                    elements.push(Some(element));
                    if self.current.kind == TokenKind::Comma {
                        self.advance();
                        if self.current.kind == TokenKind::RightBracket {
                            self.report_current(ErrorKind::ArrayLiteralTrailingComma);
                        }
                    } else {
                        end = self.current.span;
                        self.expect(TokenKind::RightBracket, ErrorKind::NoRightBracket);
                        break;
                    }
                }
            }
        }
        Ok(Expr::Array(ArrayLiteral {
            span: start.merge(end),
            elements,
        }))
    }

    fn parse_object_literal(&mut self) -> PResult<Expr> {
        let start = self.current.span;
        self.advance();
        let mut properties = Vec::new();
        let end;
        loop {
            if self.current.kind == TokenKind::RightCurly {
                end = self.current.span;
                self.advance();
                break;
            }

            let accessor = match self.current.kind {
                TokenKind::Get => Some(FunctionKind::Getter),
                TokenKind::Set => Some(FunctionKind::Setter),
                _ => None,
            }
            .filter(|_| {
                // `get`/`set` are accessors only when a property name follows
                !matches!(
                    self.peek().kind,
                    TokenKind::Colon | TokenKind::Comma | TokenKind::RightCurly
                )
            });

            let property = if let Some(kind) = accessor {
                let accessor_start = self.current.span;
                self.advance();
                let name = self.parse_property_name()?;
                let function = self.parse_accessor_function(accessor_start, kind)?;
                let span = accessor_start.merge(function.span);
                ObjectLiteralProperty {
                    span,
                    name,
                    value: Expr::Function(Box::new(function)),
                }
            } else {
                let name = self.parse_property_name()?;
                self.expect(TokenKind::Colon, ErrorKind::NoColon);
                let value = self.parse_assignment_expression(false)?;
                let span = name.span.merge(value.span());
                ObjectLiteralProperty { span, name, value }
            };
            properties.push(property);

            if self.current.kind == TokenKind::Comma {
                self.advance();
            } else {
                end = self.current.span;
                self.expect(TokenKind::RightCurly, ErrorKind::NoRightCurly);
                break;
            }
        }
        Ok(Expr::Object(ObjectLiteral {
            span: start.merge(end),
            properties,
        }))
    }

    /// Property names admit identifiers, reserved words, strings, and
    /// numbers.
    fn parse_property_name(&mut self) -> PResult<ObjectLiteralField> {
        let token = self.current;
        match token.kind {
            kind if kind == TokenKind::Identifier || kind.is_keyword() => {
                let name = self.current_identifier_symbol();
                self.advance();
                Ok(ObjectLiteralField {
                    span: token.span,
                    key: PropertyKey::Ident(name),
                })
            }
            TokenKind::StringLiteral => {
                let literal = self.scanner.take_string_literal();
                self.advance();
                Ok(ObjectLiteralField {
                    span: token.span,
                    key: PropertyKey::Str {
                        value: literal.value,
                        may_have_issues: literal.may_have_issues,
                    },
                })
            }
            TokenKind::IntegerLiteral | TokenKind::NumericLiteral => {
                let constant = self.convert_numeric_literal();
                self.advance();
                let value = match constant.value {
                    PrimitiveValue::Number(n) => n,
                    _ => 0.0,
                };
                Ok(ObjectLiteralField {
                    span: token.span,
                    key: PropertyKey::Number(value),
                })
            }
            _ => Err(self.recovery(ErrorKind::NoIdentifier, None)),
        }
    }

    /// Convert the current numeric token, flagging literals that cannot be
    /// re-emitted exactly from their converted value.
    pub(crate) fn convert_numeric_literal(&mut self) -> ConstantWrapper {
        let token = self.current;
        let lexeme = self.token_text(&token).to_owned();
        let strict = self.current_strict();
        let mut may_have_issues = false;

        let value = if let Some(digits) = radix_digits(&lexeme, "0x", "0X") {
            self.convert_radix(digits, 16, token.span, &mut may_have_issues)
        } else if let Some(digits) = radix_digits(&lexeme, "0o", "0O") {
            self.convert_radix(digits, 8, token.span, &mut may_have_issues)
        } else if let Some(digits) = radix_digits(&lexeme, "0b", "0B") {
            self.convert_radix(digits, 2, token.span, &mut may_have_issues)
        } else if token.kind == TokenKind::IntegerLiteral
            && lexeme.len() > 1
            && lexeme.starts_with('0')
        {
            // leading-zero decimal: first try legacy octal
            if lexeme.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                let octal = self.convert_radix(&lexeme[1..], 8, token.span, &mut may_have_issues);
                let decimal: f64 = lexeme.parse().unwrap_or(octal);
                if octal != decimal {
                    self.report_at(ErrorKind::OctalLiteralsDeprecated, token.span);
                    may_have_issues = true;
                    if strict {
                        self.report_at(ErrorKind::OctalInStrictMode, token.span);
                    }
                }
                octal
            } else {
                // digits 8/9 force the decimal reading
                self.report_at(ErrorKind::OctalLiteralsDeprecated, token.span);
                may_have_issues = true;
                lexeme.parse().unwrap_or(0.0)
            }
        } else {
            match lexeme.parse::<f64>() {
                Ok(value) => {
                    // an integer lexeme that does not survive the round
                    // trip through f64 is preserved textually
                    if value.is_infinite()
                        || (token.kind == TokenKind::IntegerLiteral
                            && format!("{}", value) != lexeme)
                    {
                        self.report_at(ErrorKind::NumericOverflow, token.span);
                        may_have_issues = true;
                    }
                    value
                }
                Err(_) => {
                    self.report_at(ErrorKind::BadNumericLiteral, token.span);
                    may_have_issues = true;
                    0.0
                }
            }
        };

        ConstantWrapper {
            span: token.span,
            value: PrimitiveValue::Number(value),
            raw: Some(lexeme),
            may_have_issues,
        }
    }

    fn convert_radix(
        &self,
        digits: &str,
        radix: u32,
        span: Span,
        may_have_issues: &mut bool,
    ) -> f64 {
        if digits.is_empty() {
            // the scanner already reported the malformed literal
            *may_have_issues = true;
            return 0.0;
        }
        match u128::from_str_radix(digits, radix) {
            Ok(exact) => {
                if exact > 1u128 << 53 {
                    self.report_at(ErrorKind::NumericOverflow, span);
                    *may_have_issues = true;
                }
                exact as f64
            }
            Err(_) => {
                // overflowed even u128, or stray digits survived scanning;
                // accumulate a best-effort approximation
                self.report_at(ErrorKind::NumericOverflow, span);
                *may_have_issues = true;
                let mut value = 0f64;
                for c in digits.chars() {
                    match c.to_digit(radix) {
                        Some(d) => value = value * radix as f64 + d as f64,
                        None => break,
                    }
                }
                value
            }
        }
    }
}

fn radix_digits<'t>(lexeme: &'t str, lower: &str, upper: &str) -> Option<&'t str> {
    lexeme
        .strip_prefix(lower)
        .or_else(|| lexeme.strip_prefix(upper))
}

fn is_null_constant(expr: &Expr) -> bool {
    matches!(
        expr.unwrap_grouping(),
        Expr::Constant(ConstantWrapper {
            value: PrimitiveValue::Null,
            ..
        })
    )
}
