//! The typed AST: a family of sum types (one per syntactic category)
//! rather than a class hierarchy. Each node owns its children; visitors
//! pattern-match on the variant instead of virtual-dispatching.

use std::cell::RefCell;

use crate::resolved_type::ResolvedType;
use crate::span::Span;

/// A source-level (unresolved) type expression: `int[,,]`, `{int, float}`,
/// or a bare identifier referring to a `type` alias.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Bool,
    Int,
    Float,
    Array(Box<TypeExpr>, u32),
    Tuple(Vec<TypeExpr>),
    Var(String),
}

/// `var(name)` or `v[d1,...,dk]` (array-argument, dimension variables
/// bound as `int` by the resolver).
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Var(String),
    Array(String, Vec<String>),
}

impl Arg {
    pub fn name(&self) -> &str {
        match self {
            Arg::Var(name) | Arg::Array(name, _) => name,
        }
    }
}

/// `var(arg, type)` or `{binding, ...}` tuple destructuring, used by
/// function parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Var(Arg, TypeExpr),
    Tuple(Vec<Binding>),
}

/// `arg(arg)` or `{lvalue, ...}`, used by `let`.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    Arg(Arg),
    Tuple(Vec<LValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnopKind {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinopKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinopKind {
    pub fn from_text(text: &str) -> Option<BinopKind> {
        Some(match text {
            "+" => BinopKind::Add,
            "-" => BinopKind::Sub,
            "*" => BinopKind::Mul,
            "/" => BinopKind::Div,
            "%" => BinopKind::Mod,
            "<" => BinopKind::Lt,
            ">" => BinopKind::Gt,
            "<=" => BinopKind::Le,
            ">=" => BinopKind::Ge,
            "==" => BinopKind::Eq,
            "!=" => BinopKind::Ne,
            "&&" => BinopKind::And,
            "||" => BinopKind::Or,
            _ => return None,
        })
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinopKind::Add | BinopKind::Sub | BinopKind::Mul | BinopKind::Div | BinopKind::Mod
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinopKind::Lt | BinopKind::Gt | BinopKind::Le | BinopKind::Ge
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinopKind::Eq | BinopKind::Ne)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BinopKind::And | BinopKind::Or)
    }
}

/// An expression node. Owns a nullable resolved-type slot, written
/// exactly once by the resolver and read-only thereafter, plus a
/// nullable constant-propagation slot written only by the (out of
/// scope) constant-propagation visitor.
#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    resolved_type: RefCell<Option<ResolvedType>>,
    const_value: RefCell<Option<i64>>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            resolved_type: RefCell::new(None),
            const_value: RefCell::new(None),
        }
    }

    /// Reads the resolved type. Panics if called before the resolver
    /// has run to completion on this node — that indicates a resolver
    /// bug, not a user-facing error.
    pub fn resolved_type(&self) -> ResolvedType {
        self.resolved_type
            .borrow()
            .clone()
            .expect("expression read before its type was resolved")
    }

    pub fn try_resolved_type(&self) -> Option<ResolvedType> {
        self.resolved_type.borrow().clone()
    }

    /// Sets the resolved type. Panics on a second write: the slot is a
    /// genuine once-write cache guarded by single-writer discipline.
    pub fn set_resolved_type(&self, ty: ResolvedType) {
        let mut slot = self.resolved_type.borrow_mut();
        assert!(slot.is_none(), "resolved type slot written twice");
        *slot = Some(ty);
    }

    pub fn const_value(&self) -> Option<i64> {
        *self.const_value.borrow()
    }

    pub fn set_const_value(&self, value: i64) {
        *self.const_value.borrow_mut() = Some(value);
    }
}

#[derive(Debug)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    True,
    False,
    Var(String),
    Unop(UnopKind, Box<Expr>),
    Binop(BinopKind, Box<Expr>, Box<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    ArrayIndex(Box<Expr>, Vec<Expr>),
    TupleIndex(Box<Expr>, u32),
    ArrayLiteral(Vec<Expr>),
    TupleLiteral(Vec<Expr>),
    /// `array[x1:n1, ...] body`
    ArrayLoop(Vec<(String, Expr)>, Box<Expr>),
    /// `sum[x1:n1, ...] body`
    SumLoop(Vec<(String, Expr)>, Box<Expr>),
}

#[derive(Debug)]
pub enum Stmt {
    Assert(Expr, String),
    Let(LValue, Expr),
    Return(Expr),
}

#[derive(Debug)]
pub enum Command {
    Assert(Expr, String),
    Fn(String, Vec<Binding>, TypeExpr, Vec<Stmt>),
    Let(LValue, Expr),
    Print(String),
    Read(String, Arg),
    Show(Expr),
    Time(Box<Command>),
    Type(String, TypeExpr),
    Write(Expr, String),
}

pub type Program = Vec<Command>;
