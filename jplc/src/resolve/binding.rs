//! Declares `Arg`/`Binding`/`LValue` patterns into the symbol table and
//! checks an `LValue`'s shape against a resolved value type.

use jplc_parser::{Arg, Binding, LValue, ResolvedType, Span};

use super::error::ResolveError;
use super::Resolver;
use crate::symbol_table::Symbol;

impl Resolver {
    /// Declares `arg` at type `ty`. An `Arg::Array` additionally binds
    /// each dimension name as `int` and requires `ty` to be an array of
    /// matching rank.
    pub(crate) fn declare_arg(
        &mut self,
        arg: &Arg,
        ty: &ResolvedType,
        span: Span,
    ) -> Result<(), ResolveError> {
        match arg {
            Arg::Var(name) => self.declare(name, Symbol::Variable(ty.clone()), span),
            Arg::Array(name, dims) => {
                let ResolvedType::Array { rank, .. } = ty else {
                    return Err(ResolveError::TypeMismatch {
                        expected: "an array".to_string(),
                        found: ty.to_string(),
                        span,
                    });
                };
                if *rank as usize != dims.len() {
                    return Err(ResolveError::RankMismatch {
                        expected: *rank,
                        found: dims.len() as u32,
                        span,
                    });
                }
                self.declare(name, Symbol::Variable(ty.clone()), span)?;
                for dim in dims {
                    self.declare(dim, Symbol::Variable(ResolvedType::Int), span)?;
                }
                Ok(())
            }
        }
    }

    /// The type a binding denotes, without declaring any of its names —
    /// used to build a function's signature before its body scope is
    /// opened.
    pub(crate) fn binding_type(
        &self,
        binding: &Binding,
        span: Span,
    ) -> Result<ResolvedType, ResolveError> {
        match binding {
            Binding::Var(_, type_expr) => self.resolve_type_expr(type_expr, span),
            Binding::Tuple(fields) => {
                let field_tys = fields
                    .iter()
                    .map(|field| self.binding_type(field, span))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::tuple(field_tys))
            }
        }
    }

    /// Resolves a function-parameter binding's declared type and
    /// declares every name it introduces, returning the type to record
    /// in the function's signature.
    pub(crate) fn declare_binding(
        &mut self,
        binding: &Binding,
        span: Span,
    ) -> Result<ResolvedType, ResolveError> {
        match binding {
            Binding::Var(arg, type_expr) => {
                let ty = self.resolve_type_expr(type_expr, span)?;
                self.declare_arg(arg, &ty, span)?;
                Ok(ty)
            }
            Binding::Tuple(fields) => {
                let field_tys = fields
                    .iter()
                    .map(|field| self.declare_binding(field, span))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::tuple(field_tys))
            }
        }
    }

    /// Declares an `LValue` against an already-resolved value type,
    /// recursing into tuple patterns and checking their shape matches.
    pub(crate) fn declare_lvalue(
        &mut self,
        lvalue: &LValue,
        value_ty: &ResolvedType,
        span: Span,
    ) -> Result<(), ResolveError> {
        match lvalue {
            LValue::Arg(arg) => self.declare_arg(arg, value_ty, span),
            LValue::Tuple(fields) => {
                let ResolvedType::Tuple(value_fields) = value_ty else {
                    return Err(ResolveError::BindingShapeMismatch {
                        expected: format!("a {}-tuple pattern", fields.len()),
                        found: value_ty.to_string(),
                        span,
                    });
                };
                if value_fields.len() != fields.len() {
                    return Err(ResolveError::BindingShapeMismatch {
                        expected: format!("a {}-tuple pattern", fields.len()),
                        found: value_ty.to_string(),
                        span,
                    });
                }
                for (field_pattern, field_ty) in fields.iter().zip(value_fields.iter()) {
                    self.declare_lvalue(field_pattern, field_ty, span)?;
                }
                Ok(())
            }
        }
    }

    fn declare(&mut self, name: &str, symbol: Symbol, span: Span) -> Result<(), ResolveError> {
        self.symbols
            .declare(name, symbol)
            .map_err(|name| ResolveError::DuplicateSymbol { name, span })
    }
}
