//! Parse error type.
//!
//! A single enum carries both recoverable and unrecoverable failures:
//! the `fatal` flag on each variant tells `apply_parsers` whether
//! trying the next alternative is legal, or whether the error must
//! propagate because the grammar already committed.

use crate::span::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
        fatal: bool,
    },

    #[error("unexpected end of file, expected {expected} at {span:?}")]
    UnexpectedEof {
        expected: String,
        span: Span,
        fatal: bool,
    },

    #[error("unexpected newline, expected {expected} at {span:?}")]
    UnexpectedNewline {
        expected: String,
        span: Span,
        fatal: bool,
    },

    #[error("trailing token '{found}' after end of command at {span:?}")]
    TrailingToken {
        found: String,
        span: Span,
        fatal: bool,
    },

    #[error("{message} at {span:?}")]
    InvalidSyntax {
        message: String,
        span: Span,
        fatal: bool,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::UnexpectedNewline { span, .. }
            | ParseError::TrailingToken { span, .. }
            | ParseError::InvalidSyntax { span, .. } => *span,
        }
    }

    /// Whether this error commits the current grammar alternative: a
    /// `true` value means the caller must not try a sibling alternative
    /// and should propagate instead.
    pub fn is_fatal(&self) -> bool {
        match self {
            ParseError::UnexpectedToken { fatal, .. }
            | ParseError::UnexpectedEof { fatal, .. }
            | ParseError::UnexpectedNewline { fatal, .. }
            | ParseError::TrailingToken { fatal, .. }
            | ParseError::InvalidSyntax { fatal, .. } => *fatal,
        }
    }

    /// Reinterprets this error as fatal, used when a caller commits to
    /// an alternative after the fact (e.g. after consuming a leading
    /// keyword).
    pub fn make_fatal(mut self) -> Self {
        match &mut self {
            ParseError::UnexpectedToken { fatal, .. }
            | ParseError::UnexpectedEof { fatal, .. }
            | ParseError::UnexpectedNewline { fatal, .. }
            | ParseError::TrailingToken { fatal, .. }
            | ParseError::InvalidSyntax { fatal, .. } => *fatal = true,
        }
        self
    }

    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
        fatal: bool,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
            fatal,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
            fatal: true,
        }
    }

    pub fn unexpected_newline(expected: impl Into<String>, span: Span, fatal: bool) -> Self {
        ParseError::UnexpectedNewline {
            expected: expected.into(),
            span,
            fatal,
        }
    }

    pub fn trailing_token(found: impl Into<String>, span: Span) -> Self {
        ParseError::TrailingToken {
            found: found.into(),
            span,
            fatal: true,
        }
    }

    pub fn invalid_syntax(message: impl Into<String>, span: Span, fatal: bool) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            span,
            fatal,
        }
    }

    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let lines: Vec<&str> = source.lines().collect();
        let line_idx = span.start_line.saturating_sub(1);
        let Some(line) = lines.get(line_idx) else {
            return String::new();
        };
        let col = span.start_column.saturating_sub(1);
        let marker = "^".repeat(span.len().max(1).min(line.len().saturating_sub(col).max(1)));
        format!(
            "  {} | {}\n  {} | {}{}",
            span.start_line,
            line,
            " ".repeat(span.start_line.to_string().len()),
            " ".repeat(col),
            marker
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_fatal_flips_the_flag() {
        let span = Span::new(0, 1, 1, 1, 1, 2);
        let err = ParseError::unexpected_token("')'", "','", span, false);
        assert!(!err.is_fatal());
        assert!(err.make_fatal().is_fatal());
    }

    #[test]
    fn format_with_context_points_at_the_span() {
        let source = "let x = \n";
        let span = Span::new(8, 8, 1, 9, 1, 9);
        let err = ParseError::unexpected_eof("value", span);
        let ctx = err.format_with_context(source);
        assert!(ctx.contains("let x ="));
        assert!(ctx.contains('^'));
    }
}
