//! Token definitions for the JPL lexer.
//!
//! The tokenizer is treated as a black box by the rest of the compiler:
//! it only needs to produce a flat stream of tagged tokens with byte
//! offsets. Kept intentionally small relative to the parser/resolver/
//! codegen core.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("array")]
    KwArray,
    #[token("assert")]
    KwAssert,
    #[token("bool")]
    KwBool,
    #[token("else")]
    KwElse,
    #[token("false")]
    KwFalse,
    #[token("float")]
    KwFloat,
    #[token("fn")]
    KwFn,
    #[token("if")]
    KwIf,
    #[token("image")]
    KwImage,
    #[token("int")]
    KwInt,
    #[token("let")]
    KwLet,
    #[token("print")]
    KwPrint,
    #[token("read")]
    KwRead,
    #[token("return")]
    KwReturn,
    #[token("show")]
    KwShow,
    #[token("sum")]
    KwSum,
    #[token("then")]
    KwThen,
    #[token("time")]
    KwTime,
    #[token("to")]
    KwTo,
    #[token("true")]
    KwTrue,
    #[token("type")]
    KwType,
    #[token("write")]
    KwWrite,

    // ==================== Punctuation ====================
    #[token(":")]
    Colon,
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("[")]
    LSquare,
    #[token("]")]
    RSquare,
    #[token("=")]
    Equals,

    // ==================== Operators ====================
    // All arithmetic, comparison, and boolean operators share one kind,
    // distinguished by `text`, matching the original `OP` token type.
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token(">")]
    #[token("&&")]
    #[token("||")]
    #[token("!")]
    Op,

    // ==================== Literals ====================
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    FloatVal,
    #[regex(r"[0-9]+")]
    IntVal,

    // ==================== Identifiers ====================
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Variable,

    #[regex(r"\n")]
    Newline,

    /// Synthesized once by the lexer driver after the token stream is
    /// exhausted; never produced by the `Logos` derive itself.
    EndOfFile,
}

impl Token {
    pub fn is_op_text(&self, text: &str, expected: &str) -> bool {
        matches!(self, Token::Op) && text == expected
    }

    /// The upper-case kind name used by `-l`'s token dump, one per line.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::KwArray => "ARRAY",
            Token::KwAssert => "ASSERT",
            Token::KwBool => "BOOL",
            Token::KwElse => "ELSE",
            Token::KwFalse => "FALSE",
            Token::KwFloat => "FLOAT",
            Token::KwFn => "FN",
            Token::KwIf => "IF",
            Token::KwImage => "IMAGE",
            Token::KwInt => "INT",
            Token::KwLet => "LET",
            Token::KwPrint => "PRINT",
            Token::KwRead => "READ",
            Token::KwReturn => "RETURN",
            Token::KwShow => "SHOW",
            Token::KwSum => "SUM",
            Token::KwThen => "THEN",
            Token::KwTime => "TIME",
            Token::KwTo => "TO",
            Token::KwTrue => "TRUE",
            Token::KwType => "TYPE",
            Token::KwWrite => "WRITE",
            Token::Colon => "COLON",
            Token::LCurly => "LCURLY",
            Token::RCurly => "RCURLY",
            Token::LParen => "LPAREN",
            Token::RParen => "RPAREN",
            Token::Comma => "COMMA",
            Token::LSquare => "LSQUARE",
            Token::RSquare => "RSQUARE",
            Token::Equals => "EQUALS",
            Token::Op => "OP",
            Token::StringLit => "STRING",
            Token::FloatVal => "FLOATVAL",
            Token::IntVal => "INTVAL",
            Token::Variable => "VARIABLE",
            Token::Newline => "NEWLINE",
            Token::EndOfFile => "END_OF_FILE",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Token::KwArray => "'array'",
            Token::KwAssert => "'assert'",
            Token::KwBool => "'bool'",
            Token::KwElse => "'else'",
            Token::KwFalse => "'false'",
            Token::KwFloat => "'float'",
            Token::KwFn => "'fn'",
            Token::KwIf => "'if'",
            Token::KwImage => "'image'",
            Token::KwInt => "'int'",
            Token::KwLet => "'let'",
            Token::KwPrint => "'print'",
            Token::KwRead => "'read'",
            Token::KwReturn => "'return'",
            Token::KwShow => "'show'",
            Token::KwSum => "'sum'",
            Token::KwThen => "'then'",
            Token::KwTime => "'time'",
            Token::KwTo => "'to'",
            Token::KwTrue => "'true'",
            Token::KwType => "'type'",
            Token::KwWrite => "'write'",
            Token::Colon => "':'",
            Token::LCurly => "'{'",
            Token::RCurly => "'}'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Comma => "','",
            Token::LSquare => "'['",
            Token::RSquare => "']'",
            Token::Equals => "'='",
            Token::Op => "an operator",
            Token::StringLit => "a string literal",
            Token::FloatVal => "a float literal",
            Token::IntVal => "an int literal",
            Token::Variable => "an identifier",
            Token::Newline => "a newline",
            Token::EndOfFile => "end of file",
        }
    }
}

/// Operator precedence levels, ascending = binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    BooleanOr,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Precedence {
    pub fn of(op: &str) -> Option<Precedence> {
        match op {
            "&&" | "||" => Some(Precedence::BooleanOr),
            "<" | ">" | "<=" | ">=" | "==" | "!=" => Some(Precedence::Comparison),
            "+" | "-" => Some(Precedence::Additive),
            "*" | "/" | "%" => Some(Precedence::Multiplicative),
            "!" => Some(Precedence::Unary),
            _ => None,
        }
    }

    pub fn associativity(self) -> Associativity {
        // All binary levels in JPL are left-associative; unary is handled
        // separately by the prefix pass.
        Associativity::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_additive_below_multiplicative() {
        assert!(Precedence::of("+").unwrap() < Precedence::of("*").unwrap());
    }

    #[test]
    fn precedence_orders_boolean_below_comparison() {
        assert!(Precedence::of("&&").unwrap() < Precedence::of("<").unwrap());
    }
}
