//! Type-expression parsing: `int`, `float`, `bool`, a `type` alias
//! name, `{t1, t2, ...}` tuples, and postfix `t[,,]` array brackets
//! (rank = comma count + 1).

use super::Parser;
use crate::ast::TypeExpr;
use crate::error::ParseResult;
use crate::token::Token;

pub(crate) fn parse_type(parser: &mut Parser<'_>) -> ParseResult<TypeExpr> {
    let mut ty = parse_base_type(parser)?;
    while parser.check(&Token::LSquare) {
        parser.advance();
        let mut rank = 1;
        while parser.check(&Token::Comma) {
            parser.advance();
            rank += 1;
        }
        parser.expect(Token::RSquare)?;
        ty = TypeExpr::Array(Box::new(ty), rank);
    }
    Ok(ty)
}

fn parse_base_type(parser: &mut Parser<'_>) -> ParseResult<TypeExpr> {
    match parser.current_kind() {
        Token::KwInt => {
            parser.advance();
            Ok(TypeExpr::Int)
        }
        Token::KwFloat => {
            parser.advance();
            Ok(TypeExpr::Float)
        }
        Token::KwBool => {
            parser.advance();
            Ok(TypeExpr::Bool)
        }
        Token::LCurly => {
            parser.advance();
            let fields = super::parse_comma_separated(
                parser,
                |p| p.check(&Token::RCurly),
                parse_type,
            )?;
            parser.expect(Token::RCurly)?;
            Ok(TypeExpr::Tuple(fields))
        }
        Token::Variable => {
            let name = parser.expect_variable()?;
            Ok(TypeExpr::Var(name))
        }
        _ => Err(crate::error::ParseError::unexpected_token(
            "a type",
            parser.current_kind().describe(),
            parser.current_span(),
            false,
        )),
    }
}
