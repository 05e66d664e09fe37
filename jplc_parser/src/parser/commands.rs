//! Top-level command parsing: `let`, `fn`, `assert`, `print`, `read
//! image`, `show`, `time`, `type`, `write image`.

use super::Parser;
use crate::ast::Command;
use crate::error::{ParseError, ParseResult};
use crate::token::Precedence;
use crate::token::Token;

pub(crate) fn parse_command(parser: &mut Parser<'_>) -> ParseResult<Command> {
    let command = match parser.current_kind() {
        Token::KwLet => parse_let(parser)?,
        Token::KwFn => parse_fn(parser)?,
        Token::KwAssert => parse_assert(parser)?,
        Token::KwPrint => parse_print(parser)?,
        Token::KwRead => parse_read(parser)?,
        Token::KwShow => parse_show(parser)?,
        Token::KwTime => parse_time(parser)?,
        Token::KwType => parse_type_alias(parser)?,
        Token::KwWrite => parse_write(parser)?,
        other => {
            return Err(ParseError::unexpected_token(
                "a command",
                other.describe(),
                parser.current_span(),
                false,
            ))
        }
    };
    parser.expect_newline(true)?;
    Ok(command)
}

fn parse_let(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let lvalue = super::lvalue::parse_lvalue(parser).map_err(ParseError::make_fatal)?;
    parser.expect(Token::Equals).map_err(ParseError::make_fatal)?;
    let value = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
    Ok(Command::Let(lvalue, value))
}

fn parse_assert(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let cond = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
    parser.expect(Token::Comma).map_err(ParseError::make_fatal)?;
    let message = parser.expect_string().map_err(ParseError::make_fatal)?;
    Ok(Command::Assert(cond, message))
}

fn parse_print(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let message = parser.expect_string().map_err(ParseError::make_fatal)?;
    Ok(Command::Print(message))
}

fn parse_show(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let value = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
    Ok(Command::Show(value))
}

fn parse_read(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    parser.expect(Token::KwImage).map_err(ParseError::make_fatal)?;
    let path = parser.expect_string().map_err(ParseError::make_fatal)?;
    parser.expect(Token::KwTo).map_err(ParseError::make_fatal)?;
    let target = super::lvalue::parse_arg(parser).map_err(ParseError::make_fatal)?;
    Ok(Command::Read(path, target))
}

fn parse_write(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    parser.expect(Token::KwImage).map_err(ParseError::make_fatal)?;
    let value = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
    parser.expect(Token::KwTo).map_err(ParseError::make_fatal)?;
    let path = parser.expect_string().map_err(ParseError::make_fatal)?;
    Ok(Command::Write(value, path))
}

fn parse_type_alias(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let name = parser.expect_variable().map_err(ParseError::make_fatal)?;
    parser.expect(Token::Equals).map_err(ParseError::make_fatal)?;
    let ty = super::types::parse_type(parser).map_err(ParseError::make_fatal)?;
    Ok(Command::Type(name, ty))
}

fn parse_time(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let inner = parse_command_body(parser).map_err(ParseError::make_fatal)?;
    Ok(Command::Time(Box::new(inner)))
}

/// The part of `parse_command` before the trailing-newline check,
/// reused by `time` so `time show x` doesn't eat two newlines.
fn parse_command_body(parser: &mut Parser<'_>) -> ParseResult<Command> {
    match parser.current_kind() {
        Token::KwLet => parse_let(parser),
        Token::KwFn => parse_fn(parser),
        Token::KwAssert => parse_assert(parser),
        Token::KwPrint => parse_print(parser),
        Token::KwRead => parse_read(parser),
        Token::KwShow => parse_show(parser),
        Token::KwType => parse_type_alias(parser),
        Token::KwWrite => parse_write(parser),
        other => Err(ParseError::unexpected_token(
            "a command",
            other.describe(),
            parser.current_span(),
            true,
        )),
    }
}

fn parse_fn(parser: &mut Parser<'_>) -> ParseResult<Command> {
    parser.advance();
    let name = parser.expect_variable().map_err(ParseError::make_fatal)?;
    parser.expect(Token::LParen).map_err(ParseError::make_fatal)?;
    let params = super::parse_comma_separated(
        parser,
        |p| p.check(&Token::RParen),
        super::lvalue::parse_binding,
    )
    .map_err(ParseError::make_fatal)?;
    parser.expect(Token::RParen).map_err(ParseError::make_fatal)?;
    parser.expect(Token::Colon).map_err(ParseError::make_fatal)?;
    let ret_ty = super::types::parse_type(parser).map_err(ParseError::make_fatal)?;
    parser.expect(Token::LCurly).map_err(ParseError::make_fatal)?;
    parser.expect_newline(true)?;
    let mut body = Vec::new();
    while !parser.check(&Token::RCurly) {
        body.push(super::statements::parse_stmt(parser)?);
    }
    parser.expect(Token::RCurly).map_err(ParseError::make_fatal)?;
    Ok(Command::Fn(name, params, ret_ty, body))
}
