//! Statement parsing inside a function body: `let`, `assert`, `return`.

use super::Parser;
use crate::ast::Stmt;
use crate::error::{ParseError, ParseResult};
use crate::token::{Precedence, Token};

pub(crate) fn parse_stmt(parser: &mut Parser<'_>) -> ParseResult<Stmt> {
    let stmt = match parser.current_kind() {
        Token::KwLet => {
            parser.advance();
            let lvalue = super::lvalue::parse_lvalue(parser).map_err(ParseError::make_fatal)?;
            parser
                .expect(Token::Equals)
                .map_err(ParseError::make_fatal)?;
            let value = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
            Stmt::Let(lvalue, value)
        }
        Token::KwAssert => {
            parser.advance();
            let cond = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
            parser
                .expect(Token::Comma)
                .map_err(ParseError::make_fatal)?;
            let message = parser.expect_string().map_err(ParseError::make_fatal)?;
            Stmt::Assert(cond, message)
        }
        Token::KwReturn => {
            parser.advance();
            let value = super::expr::parse_expr(parser, Precedence::BooleanOr)?;
            Stmt::Return(value)
        }
        other => {
            return Err(ParseError::unexpected_token(
                "a statement",
                other.describe(),
                parser.current_span(),
                true,
            ))
        }
    };
    parser.expect_newline(true)?;
    Ok(stmt)
}
