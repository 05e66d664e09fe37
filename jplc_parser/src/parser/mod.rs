//! Recursive-descent parser for JPL.
//!
//! Converts the token stream into the typed AST (`ast::Program`). Token
//! management and the shared `expect*` helpers live here; grammar-
//! specific productions are split into sibling modules by syntactic
//! category. Every JPL command and statement is led by a distinct
//! keyword, so no alternative ever needs to be tried and rolled back;
//! the `fatal` flag on `ParseError` still records, for each failure,
//! whether the grammar had already committed when it occurred.

mod collections;
mod commands;
mod expr;
mod lvalue;
mod statements;
mod types;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken};
use crate::span::{SourceMap, Span};
use crate::token::Token;

pub(crate) use collections::parse_comma_separated;

/// Parses JPL source into a program (a list of top-level commands).
pub fn parse(source: &str) -> ParseResult<Program> {
    let source_map = SourceMap::new(source);
    let tokens = tokenize(source, &source_map)?;
    Parser::new(&tokens, &source_map).parse_program()
}

pub(crate) struct Parser<'a> {
    tokens: &'a [SpannedToken<'a>],
    pos: usize,
    pub(crate) source_map: &'a SourceMap,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [SpannedToken<'a>], source_map: &'a SourceMap) -> Self {
        Parser {
            tokens,
            pos: 0,
            source_map,
        }
    }

    pub(crate) fn current(&self) -> &SpannedToken<'a> {
        &self.tokens[self.pos]
    }

    pub(crate) fn current_kind(&self) -> &Token {
        &self.current().token
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn check(&self, kind: &Token) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn check_op(&self, text: &str) -> bool {
        matches!(self.current_kind(), Token::Op) && self.current().text == text
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), Token::EndOfFile)
    }

    pub(crate) fn advance(&mut self) -> &SpannedToken<'a> {
        let tok = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it matches, committing the caller to
    /// this alternative: a mismatch here is always fatal.
    pub(crate) fn expect(&mut self, kind: Token) -> ParseResult<&SpannedToken<'a>> {
        if self.check(&kind) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(
                kind.describe(),
                self.current_span(),
            ))
        } else {
            Err(ParseError::unexpected_token(
                kind.describe(),
                self.current().token.describe(),
                self.current_span(),
                true,
            ))
        }
    }

    pub(crate) fn expect_newline(&mut self, fatal: bool) -> ParseResult<()> {
        if self.check(&Token::Newline) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::unexpected_newline(
                "newline",
                self.current_span(),
                fatal,
            ))
        }
    }

    pub(crate) fn expect_variable(&mut self) -> ParseResult<String> {
        let tok = self.expect(Token::Variable)?;
        Ok(tok.text.to_string())
    }

    pub(crate) fn expect_string(&mut self) -> ParseResult<String> {
        use crate::lexer::LiteralValue;
        let span = self.current_span();
        let tok = self.expect(Token::StringLit)?;
        match &tok.literal {
            Some(LiteralValue::Str(s)) => Ok(s.clone()),
            _ => Err(ParseError::invalid_syntax(
                "malformed string literal",
                span,
                true,
            )),
        }
    }

    /// Top-level loop: skip a leading newline, then repeatedly parse
    /// commands until only `EndOfFile` remains.
    pub(crate) fn parse_program(&mut self) -> ParseResult<Program> {
        if self.check(&Token::Newline) {
            self.advance();
        }
        let mut commands = Vec::new();
        while !self.is_at_end() {
            commands.push(commands::parse_command(self)?);
        }
        Ok(commands)
    }
}
