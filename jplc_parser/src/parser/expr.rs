//! Expression parsing.
//!
//! JPL's precedence table folds naturally into a single climbing loop:
//! each call to `parse_expr` asks for an operand via `parse_unary`
//! (which transparently handles prefix `!`/`-` by recursing into
//! itself) and then keeps swallowing trailing binary operators whose
//! precedence meets the caller's floor, recursing on the right-hand
//! side at one level tighter to get left-associativity. Comprehension
//! and `if` bodies are themselves full expressions, so they recurse
//! back into `parse_expr` at the loosest level rather than threading
//! bespoke grammar through every precedence tier.

use super::Parser;
use crate::ast::{BinopKind, Expr, ExprKind, UnopKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::LiteralValue;
use crate::span::Span;
use crate::token::{Precedence, Token};

pub(crate) fn parse_expr(parser: &mut Parser<'_>, min_prec: Precedence) -> ParseResult<Expr> {
    let mut lhs = parse_unary(parser)?;
    loop {
        let Token::Op = parser.current_kind() else {
            break;
        };
        let text = parser.current().text;
        let Some(kind) = BinopKind::from_text(text) else {
            break;
        };
        let Some(prec) = Precedence::of(text) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        parser.advance();
        let rhs = parse_expr(parser, next_tighter(prec))?;
        let span = lhs.span.merge(&rhs.span);
        lhs = Expr::new(ExprKind::Binop(kind, Box::new(lhs), Box::new(rhs)), span);
    }
    Ok(lhs)
}

fn next_tighter(prec: Precedence) -> Precedence {
    match prec {
        Precedence::BooleanOr => Precedence::Comparison,
        Precedence::Comparison => Precedence::Additive,
        Precedence::Additive => Precedence::Multiplicative,
        Precedence::Multiplicative => Precedence::Unary,
        Precedence::Unary => Precedence::Unary,
    }
}

fn parse_unary(parser: &mut Parser<'_>) -> ParseResult<Expr> {
    if parser.check_op("!") {
        let start = parser.advance().span;
        let operand = parse_unary(parser)?;
        let span = start.merge(&operand.span);
        return Ok(Expr::new(
            ExprKind::Unop(UnopKind::Not, Box::new(operand)),
            span,
        ));
    }
    if parser.check_op("-") {
        let start = parser.advance().span;
        let operand = parse_unary(parser)?;
        let span = start.merge(&operand.span);
        return Ok(Expr::new(
            ExprKind::Unop(UnopKind::Neg, Box::new(operand)),
            span,
        ));
    }
    parse_postfix(parser)
}

fn parse_postfix(parser: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut expr = parse_primary(parser)?;
    loop {
        if parser.check(&Token::LSquare) {
            parser.advance();
            let indices = super::parse_comma_separated(
                parser,
                |p| p.check(&Token::RSquare),
                |p| parse_expr(p, Precedence::BooleanOr),
            )?;
            let end = parser.expect(Token::RSquare)?.span;
            let span = expr.span.merge(&end);
            expr = Expr::new(ExprKind::ArrayIndex(Box::new(expr), indices), span);
        } else if parser.check(&Token::LCurly) {
            parser.advance();
            let idx_span = parser.current_span();
            let idx_tok = parser.expect(Token::IntVal)?;
            let idx_text = idx_tok.text;
            let index: u32 = idx_text.parse().map_err(|_| {
                ParseError::invalid_syntax("tuple index must be a non-negative integer", idx_span, true)
            })?;
            let end = parser.expect(Token::RCurly)?.span;
            let span = expr.span.merge(&end);
            expr = Expr::new(ExprKind::TupleIndex(Box::new(expr), index), span);
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_primary(parser: &mut Parser<'_>) -> ParseResult<Expr> {
    let start_span = parser.current_span();
    match parser.current_kind().clone() {
        Token::IntVal => {
            let tok = parser.advance();
            let value = match &tok.literal {
                Some(LiteralValue::Int(v)) => *v,
                _ => unreachable!("IntVal token always carries an Int literal"),
            };
            Ok(Expr::new(ExprKind::Int(value), start_span))
        }
        Token::FloatVal => {
            let tok = parser.advance();
            let value = match &tok.literal {
                Some(LiteralValue::Float(v)) => *v,
                _ => unreachable!("FloatVal token always carries a Float literal"),
            };
            Ok(Expr::new(ExprKind::Float(value), start_span))
        }
        Token::KwTrue => {
            parser.advance();
            Ok(Expr::new(ExprKind::True, start_span))
        }
        Token::KwFalse => {
            parser.advance();
            Ok(Expr::new(ExprKind::False, start_span))
        }
        Token::LParen => {
            parser.advance();
            let inner = parse_expr(parser, Precedence::BooleanOr)?;
            let end = parser.expect(Token::RParen)?.span;
            Ok(Expr::new(inner.kind, start_span.merge(&end)))
        }
        Token::LCurly => parse_tuple_literal(parser, start_span),
        Token::LSquare => parse_array_literal(parser, start_span),
        Token::KwIf => parse_if(parser, start_span),
        Token::KwArray => parse_comprehension(parser, start_span, true),
        Token::KwSum => parse_comprehension(parser, start_span, false),
        Token::Variable => {
            let name = parser.expect_variable()?;
            if parser.check(&Token::LParen) {
                parser.advance();
                let args = super::parse_comma_separated(
                    parser,
                    |p| p.check(&Token::RParen),
                    |p| parse_expr(p, Precedence::BooleanOr),
                )?;
                let end = parser.expect(Token::RParen)?.span;
                Ok(Expr::new(
                    ExprKind::Call(name, args),
                    start_span.merge(&end),
                ))
            } else {
                Ok(Expr::new(ExprKind::Var(name), start_span))
            }
        }
        other => Err(ParseError::unexpected_token(
            "an expression",
            other.describe(),
            start_span,
            false,
        )),
    }
}

fn parse_tuple_literal(parser: &mut Parser<'_>, start_span: Span) -> ParseResult<Expr> {
    parser.advance();
    let fields = super::parse_comma_separated(
        parser,
        |p| p.check(&Token::RCurly),
        |p| parse_expr(p, Precedence::BooleanOr),
    )?;
    let end = parser.expect(Token::RCurly)?.span;
    Ok(Expr::new(
        ExprKind::TupleLiteral(fields),
        start_span.merge(&end),
    ))
}

fn parse_array_literal(parser: &mut Parser<'_>, start_span: Span) -> ParseResult<Expr> {
    parser.advance();
    let elements = super::parse_comma_separated(
        parser,
        |p| p.check(&Token::RSquare),
        |p| parse_expr(p, Precedence::BooleanOr),
    )?;
    let end = parser.expect(Token::RSquare)?.span;
    Ok(Expr::new(
        ExprKind::ArrayLiteral(elements),
        start_span.merge(&end),
    ))
}

fn parse_if(parser: &mut Parser<'_>, start_span: Span) -> ParseResult<Expr> {
    parser.advance();
    let cond = parse_expr(parser, Precedence::BooleanOr)?;
    parser.expect(Token::KwThen).map_err(ParseError::make_fatal)?;
    let then_branch = parse_expr(parser, Precedence::BooleanOr)?;
    parser.expect(Token::KwElse).map_err(ParseError::make_fatal)?;
    let else_branch = parse_expr(parser, Precedence::BooleanOr)?;
    let span = start_span.merge(&else_branch.span);
    Ok(Expr::new(
        ExprKind::If(
            Box::new(cond),
            Box::new(then_branch),
            Box::new(else_branch),
        ),
        span,
    ))
}

/// Parses `array[x1:n1, ...] body` or `sum[x1:n1, ...] body`. The
/// binding group is committed to once `array`/`sum` has been consumed,
/// so every failure past that point is fatal.
fn parse_comprehension(parser: &mut Parser<'_>, start_span: Span, is_array: bool) -> ParseResult<Expr> {
    parser.advance();
    parser.expect(Token::LSquare).map_err(ParseError::make_fatal)?;
    let bindings = super::parse_comma_separated(
        parser,
        |p| p.check(&Token::RSquare),
        |p| -> ParseResult<(String, Expr)> {
            let name = p.expect_variable().map_err(ParseError::make_fatal)?;
            p.expect(Token::Colon).map_err(ParseError::make_fatal)?;
            let bound = parse_expr(p, Precedence::BooleanOr)?;
            Ok((name, bound))
        },
    )?;
    if bindings.is_empty() {
        return Err(ParseError::invalid_syntax(
            "comprehension requires at least one binding",
            parser.current_span(),
            true,
        ));
    }
    parser
        .expect(Token::RSquare)
        .map_err(ParseError::make_fatal)?;
    let body = parse_expr(parser, Precedence::BooleanOr)?;
    let span = start_span.merge(&body.span);
    let kind = if is_array {
        ExprKind::ArrayLoop(bindings, Box::new(body))
    } else {
        ExprKind::SumLoop(bindings, Box::new(body))
    };
    Ok(Expr::new(kind, span))
}
