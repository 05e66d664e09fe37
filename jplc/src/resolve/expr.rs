//! Type resolution for every expression form.

use jplc_parser::{BinopKind, Expr, ExprKind, ResolvedType, Span, UnopKind};

use super::error::ResolveError;
use super::Resolver;
use crate::symbol_table::Symbol;

impl Resolver {
    /// Resolves `expr`'s type, writing it into the node's once-write
    /// slot, and returns a copy for the caller to use immediately.
    pub(crate) fn resolve_expr(&mut self, expr: &Expr) -> Result<ResolvedType, ResolveError> {
        let ty = self.resolve_expr_kind(expr)?;
        expr.set_resolved_type(ty.clone());
        Ok(ty)
    }

    fn resolve_expr_kind(&mut self, expr: &Expr) -> Result<ResolvedType, ResolveError> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(_) => Ok(ResolvedType::Int),
            ExprKind::Float(_) => Ok(ResolvedType::Float),
            ExprKind::True | ExprKind::False => Ok(ResolvedType::Bool),

            ExprKind::Var(name) => match self.symbols.lookup(name) {
                Some(Symbol::Variable(ty)) => Ok(ty.clone()),
                Some(Symbol::Function(..)) => Err(ResolveError::KindMismatch {
                    name: name.clone(),
                    kind: "function",
                    expected: "variable",
                    span,
                }),
                None => Err(ResolveError::UnknownSymbol {
                    name: name.clone(),
                    span,
                }),
            },

            ExprKind::Unop(op, operand) => {
                let operand_ty = self.resolve_expr(operand)?;
                match op {
                    UnopKind::Not => {
                        if operand_ty != ResolvedType::Bool {
                            return Err(ResolveError::TypeMismatch {
                                expected: "bool".to_string(),
                                found: operand_ty.to_string(),
                                span,
                            });
                        }
                        Ok(ResolvedType::Bool)
                    }
                    UnopKind::Neg => {
                        if !operand_ty.is_numeric() {
                            return Err(ResolveError::TypeMismatch {
                                expected: "int or float".to_string(),
                                found: operand_ty.to_string(),
                                span,
                            });
                        }
                        Ok(operand_ty)
                    }
                }
            }

            ExprKind::Binop(op, lhs, rhs) => {
                let lhs_ty = self.resolve_expr(lhs)?;
                let rhs_ty = self.resolve_expr(rhs)?;
                resolve_binop(*op, &lhs_ty, &rhs_ty, span)
            }

            ExprKind::If(cond, then_branch, else_branch) => {
                let cond_ty = self.resolve_expr(cond)?;
                if cond_ty != ResolvedType::Bool {
                    return Err(ResolveError::NonBooleanCondition {
                        found: cond_ty.to_string(),
                        span: cond.span,
                    });
                }
                let then_ty = self.resolve_expr(then_branch)?;
                let else_ty = self.resolve_expr(else_branch)?;
                if then_ty != else_ty {
                    return Err(ResolveError::TypeMismatch {
                        expected: then_ty.to_string(),
                        found: else_ty.to_string(),
                        span: else_branch.span,
                    });
                }
                Ok(then_ty)
            }

            ExprKind::Call(name, args) => {
                let (params, ret) = match self.symbols.lookup(name) {
                    Some(Symbol::Function(params, ret)) => (params.clone(), ret.clone()),
                    Some(Symbol::Variable(_)) => {
                        return Err(ResolveError::NotCallable {
                            name: name.clone(),
                            span,
                        })
                    }
                    None => {
                        return Err(ResolveError::UnknownSymbol {
                            name: name.clone(),
                            span,
                        })
                    }
                };
                if params.len() != args.len() {
                    return Err(ResolveError::ArityMismatch {
                        name: name.clone(),
                        expected: params.len(),
                        found: args.len(),
                        span,
                    });
                }
                for (param_ty, arg) in params.iter().zip(args.iter()) {
                    let arg_ty = self.resolve_expr(arg)?;
                    if &arg_ty != param_ty {
                        return Err(ResolveError::TypeMismatch {
                            expected: param_ty.to_string(),
                            found: arg_ty.to_string(),
                            span: arg.span,
                        });
                    }
                }
                Ok(ret)
            }

            ExprKind::ArrayIndex(base, indices) => {
                let base_ty = self.resolve_expr(base)?;
                let ResolvedType::Array { element, rank } = &base_ty else {
                    return Err(ResolveError::NotIndexable {
                        found: base_ty.to_string(),
                        span: base.span,
                    });
                };
                if *rank as usize != indices.len() {
                    return Err(ResolveError::RankMismatch {
                        expected: *rank,
                        found: indices.len() as u32,
                        span,
                    });
                }
                let element = (**element).clone();
                for index in indices {
                    let idx_ty = self.resolve_expr(index)?;
                    if idx_ty != ResolvedType::Int {
                        return Err(ResolveError::NonIntegerIndex {
                            found: idx_ty.to_string(),
                            span: index.span,
                        });
                    }
                }
                Ok(element)
            }

            ExprKind::TupleIndex(base, index) => {
                let base_ty = self.resolve_expr(base)?;
                let ResolvedType::Tuple(fields) = &base_ty else {
                    return Err(ResolveError::NotATuple {
                        found: base_ty.to_string(),
                        span: base.span,
                    });
                };
                fields.get(*index as usize).cloned().ok_or(ResolveError::TupleIndexOutOfRange {
                    index: *index,
                    size: fields.len(),
                    span,
                })
            }

            ExprKind::ArrayLiteral(elements) => {
                let mut elements = elements.iter();
                let Some(first) = elements.next() else {
                    return Err(ResolveError::EmptyArrayLiteral { span });
                };
                let first_ty = self.resolve_expr(first)?;
                for rest in elements {
                    let rest_ty = self.resolve_expr(rest)?;
                    if rest_ty != first_ty {
                        return Err(ResolveError::HeterogeneousArrayLiteral {
                            first: first_ty.to_string(),
                            other: rest_ty.to_string(),
                            span: rest.span,
                        });
                    }
                }
                Ok(ResolvedType::array(first_ty, 1))
            }

            ExprKind::TupleLiteral(fields) => {
                let tys = fields
                    .iter()
                    .map(|field| self.resolve_expr(field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::tuple(tys))
            }

            ExprKind::ArrayLoop(bindings, body) => {
                self.resolve_loop(bindings, body, span).map(|body_ty| {
                    ResolvedType::array(body_ty, bindings.len() as u32)
                })
            }

            ExprKind::SumLoop(bindings, body) => {
                let body_ty = self.resolve_loop(bindings, body, span)?;
                if !body_ty.is_numeric() {
                    return Err(ResolveError::TypeMismatch {
                        expected: "int or float".to_string(),
                        found: body_ty.to_string(),
                        span: body.span,
                    });
                }
                Ok(body_ty)
            }
        }
    }

    /// Shared machinery for `array[...]`/`sum[...]`: opens a scope,
    /// binds each index name as `int`, resolves the bound expressions
    /// and the body, then closes the scope before returning the body's
    /// type — regardless of whether resolution failed partway through.
    fn resolve_loop(
        &mut self,
        bindings: &[(String, Expr)],
        body: &Expr,
        _span: Span,
    ) -> Result<ResolvedType, ResolveError> {
        self.symbols.push_scope();
        let result = (|| {
            for (name, bound) in bindings {
                let bound_ty = self.resolve_expr(bound)?;
                if bound_ty != ResolvedType::Int {
                    return Err(ResolveError::TypeMismatch {
                        expected: "int".to_string(),
                        found: bound_ty.to_string(),
                        span: bound.span,
                    });
                }
                self.symbols
                    .declare(name, Symbol::Variable(ResolvedType::Int))
                    .map_err(|name| ResolveError::DuplicateSymbol {
                        name,
                        span: bound.span,
                    })?;
            }
            self.resolve_expr(body)
        })();
        self.symbols.pop_scope();
        result
    }
}

fn resolve_binop(
    op: BinopKind,
    lhs: &ResolvedType,
    rhs: &ResolvedType,
    span: Span,
) -> Result<ResolvedType, ResolveError> {
    if op.is_boolean() {
        return if lhs == &ResolvedType::Bool && rhs == &ResolvedType::Bool {
            Ok(ResolvedType::Bool)
        } else {
            Err(ResolveError::TypeMismatch {
                expected: "bool".to_string(),
                found: format!("{} and {}", lhs, rhs),
                span,
            })
        };
    }
    if op.is_equality() {
        let is_primitive = matches!(lhs, ResolvedType::Bool | ResolvedType::Int | ResolvedType::Float);
        return if lhs == rhs && is_primitive {
            Ok(ResolvedType::Bool)
        } else {
            Err(ResolveError::TypeMismatch {
                expected: "bool, int, or float operands".to_string(),
                found: format!("{} and {}", lhs, rhs),
                span,
            })
        };
    }
    if lhs != rhs || !lhs.is_numeric() {
        return Err(ResolveError::TypeMismatch {
            expected: "matching int or float operands".to_string(),
            found: format!("{} and {}", lhs, rhs),
            span,
        });
    }
    if op.is_ordering() {
        Ok(ResolvedType::Bool)
    } else {
        Ok(lhs.clone())
    }
}
