//! jplc_parser
//!
//! Lexer, typed AST, and recursive-descent parser for JPL, a small
//! statically-typed array language. Produces a `Program` — a flat list
//! of top-level commands — ready for a resolver and code generator to
//! consume.
//!
//! # Example
//!
//! ```
//! use jplc_parser::parse;
//!
//! let program = parse("let x = 5\nshow x\n").expect("parse failed");
//! assert_eq!(program.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
mod parser;
pub mod resolved_type;
pub mod span;
pub mod token;

pub use ast::{Arg, Binding, BinopKind, Command, Expr, ExprKind, LValue, Program, Stmt, TypeExpr, UnopKind};
pub use error::{ParseError, ParseResult};
pub use parser::parse;
pub use resolved_type::ResolvedType;
pub use span::{SourceMap, Span};
pub use token::{Associativity, Precedence, Token};
