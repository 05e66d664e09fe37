//! Driver around the `Logos`-generated token stream.
//!
//! Bundles each raw token with its byte span and, for literals, its
//! decoded value, then appends the synthetic `EndOfFile` sentinel the
//! parser's contract requires.

use logos::Logos;

use crate::error::ParseError;
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A decoded literal payload, carried alongside a token's raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub text: &'a str,
    pub span: Span,
    pub literal: Option<LiteralValue>,
}

fn decode_string(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Tokenizes the full source into a vector, terminated by `EndOfFile`.
///
/// Returns the first lexical error encountered, if any; the rest of the
/// compiler never needs partial token streams — no error is ever
/// downgraded or partially recovered from at the lex level.
pub fn tokenize<'a>(
    source: &'a str,
    source_map: &SourceMap,
) -> Result<Vec<SpannedToken<'a>>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => {
                let text = &source[span.start..span.end];
                let literal = match token {
                    Token::IntVal => Some(LiteralValue::Int(text.parse().map_err(|_| {
                        ParseError::invalid_syntax(
                            format!("invalid integer literal '{text}'"),
                            source_map.span(span.start, span.end),
                            true,
                        )
                    })?)),
                    Token::FloatVal => Some(LiteralValue::Float(text.parse().map_err(|_| {
                        ParseError::invalid_syntax(
                            format!("invalid float literal '{text}'"),
                            source_map.span(span.start, span.end),
                            true,
                        )
                    })?)),
                    Token::StringLit => Some(LiteralValue::Str(decode_string(text))),
                    _ => None,
                };
                tokens.push(SpannedToken {
                    token,
                    text,
                    span: source_map.span(span.start, span.end),
                    literal,
                });
            }
            Err(()) => {
                let text = &source[span.start..span.end];
                return Err(ParseError::invalid_syntax(
                    format!("unrecognized character sequence '{text}'"),
                    source_map.span(span.start, span.end),
                    true,
                ));
            }
        }
    }

    tokens.push(SpannedToken {
        token: Token::EndOfFile,
        text: "",
        span: source_map.eof_span(),
        literal: None,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_ends_with_eof() {
        let map = SourceMap::new("1 + 2");
        let tokens = tokenize("1 + 2", &map).unwrap();
        assert_eq!(tokens.last().unwrap().token, Token::EndOfFile);
        assert_eq!(tokens.len(), 4); // IntVal, Op, IntVal, Eof
    }

    #[test]
    fn decodes_string_escapes() {
        let map = SourceMap::new(r#""a\nb""#);
        let tokens = tokenize(r#""a\nb""#, &map).unwrap();
        assert_eq!(
            tokens[0].literal,
            Some(LiteralValue::Str("a\nb".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        let map = SourceMap::new("1 ~ 2");
        assert!(tokenize("1 ~ 2", &map).is_err());
    }
}
