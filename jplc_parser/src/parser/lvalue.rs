//! `arg`, `binding`, and `lvalue` parsing, shared by `let` statements,
//! function parameter lists, and `read image ... to` targets.

use super::Parser;
use crate::ast::{Arg, Binding, LValue};
use crate::error::ParseResult;
use crate::token::Token;

/// `name` or `name[d1,...,dk]` (the dimension variables bound alongside
/// an array parameter).
pub(crate) fn parse_arg(parser: &mut Parser<'_>) -> ParseResult<Arg> {
    let name = parser.expect_variable()?;
    if parser.check(&Token::LSquare) {
        parser.advance();
        let dims = super::parse_comma_separated(
            parser,
            |p| p.check(&Token::RSquare),
            |p| p.expect_variable(),
        )?;
        parser.expect(Token::RSquare)?;
        Ok(Arg::Array(name, dims))
    } else {
        Ok(Arg::Var(name))
    }
}

/// `arg : type` or `{binding, ...}`.
pub(crate) fn parse_binding(parser: &mut Parser<'_>) -> ParseResult<Binding> {
    if parser.check(&Token::LCurly) {
        parser.advance();
        let fields = super::parse_comma_separated(
            parser,
            |p| p.check(&Token::RCurly),
            parse_binding,
        )?;
        parser.expect(Token::RCurly)?;
        Ok(Binding::Tuple(fields))
    } else {
        let arg = parse_arg(parser)?;
        parser.expect(Token::Colon)?;
        let ty = super::types::parse_type(parser)?;
        Ok(Binding::Var(arg, ty))
    }
}

/// `arg` or `{lvalue, ...}`.
pub(crate) fn parse_lvalue(parser: &mut Parser<'_>) -> ParseResult<LValue> {
    if parser.check(&Token::LCurly) {
        parser.advance();
        let fields = super::parse_comma_separated(
            parser,
            |p| p.check(&Token::RCurly),
            parse_lvalue,
        )?;
        parser.expect(Token::RCurly)?;
        Ok(LValue::Tuple(fields))
    } else {
        Ok(LValue::Arg(parse_arg(parser)?))
    }
}
