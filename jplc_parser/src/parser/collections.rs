//! Comma-separated list helper shared by call arguments, tuple
//! literals, array literals, parameter lists, and comprehension
//! binding groups.

use super::Parser;
use crate::error::ParseResult;

/// Parses zero or more `item` separated by commas, stopping as soon as
/// the next token isn't a comma. Caller owns the surrounding delimiters.
pub(crate) fn parse_comma_separated<'a, T>(
    parser: &mut Parser<'a>,
    is_empty: impl Fn(&Parser<'a>) -> bool,
    mut item: impl FnMut(&mut Parser<'a>) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    use crate::token::Token;

    let mut items = Vec::new();
    if is_empty(parser) {
        return Ok(items);
    }
    items.push(item(parser)?);
    while parser.check(&Token::Comma) {
        parser.advance();
        items.push(item(parser)?);
    }
    Ok(items)
}
