//! Resolves a whole program: top-level commands in source order, and
//! function bodies (their own statement lists) inside a fresh scope.
//!
//! Commands are resolved strictly top to bottom: a `type` alias or
//! `fn` must be declared before anything that references it. This
//! keeps resolution a single forward pass, matching the rest of the
//! compiler's recursive-descent structure, and still allows a function
//! to call itself since its own signature is registered before its
//! body is walked.

use jplc_parser::{Command, Program, ResolvedType, Span, Stmt};

use super::error::ResolveError;
use super::Resolver;
use crate::symbol_table::Symbol;

impl Resolver {
    pub fn resolve_program(&mut self, program: &Program) -> Result<(), ResolveError> {
        for command in program {
            self.resolve_command(command)?;
        }
        Ok(())
    }

    fn resolve_command(&mut self, command: &Command) -> Result<(), ResolveError> {
        match command {
            Command::Let(lvalue, value) => {
                let value_ty = self.resolve_expr(value)?;
                self.declare_lvalue(lvalue, &value_ty, value.span)
            }
            Command::Assert(cond, _message) => {
                let cond_ty = self.resolve_expr(cond)?;
                if cond_ty != ResolvedType::Bool {
                    return Err(ResolveError::NonBooleanCondition {
                        found: cond_ty.to_string(),
                        span: cond.span,
                    });
                }
                Ok(())
            }
            Command::Print(_) => Ok(()),
            Command::Show(value) => {
                self.resolve_expr(value)?;
                Ok(())
            }
            Command::Type(name, type_expr) => {
                let resolved = self.resolve_type_expr(type_expr, Span::default())?;
                self.type_aliases.insert(name.clone(), resolved);
                Ok(())
            }
            Command::Read(_path, target) => {
                self.declare_arg(target, &ResolvedType::image_type(), Span::default())
            }
            Command::Write(value, _path) => {
                let value_ty = self.resolve_expr(value)?;
                if value_ty != ResolvedType::image_type() {
                    return Err(ResolveError::TypeMismatch {
                        expected: ResolvedType::image_type().to_string(),
                        found: value_ty.to_string(),
                        span: value.span,
                    });
                }
                Ok(())
            }
            Command::Time(inner) => self.resolve_command(inner),
            Command::Fn(name, params, ret_type, body) => self.resolve_fn(name, params, ret_type, body),
        }
    }

    fn resolve_fn(
        &mut self,
        name: &str,
        params: &[jplc_parser::Binding],
        ret_type: &jplc_parser::TypeExpr,
        body: &[Stmt],
    ) -> Result<(), ResolveError> {
        let ret_ty = self.resolve_type_expr(ret_type, Span::default())?;
        let param_tys = params
            .iter()
            .map(|binding| self.binding_type(binding, Span::default()))
            .collect::<Result<Vec<_>, _>>()?;

        // Declared in the enclosing scope (not the parameter scope
        // opened below) so the function is visible to its own body for
        // recursive calls and to every command that follows it.
        self.symbols
            .declare(name, Symbol::Function(param_tys, ret_ty.clone()))
            .map_err(|name| ResolveError::DuplicateSymbol {
                name,
                span: Span::default(),
            })?;

        self.symbols.push_scope();
        let result = (|| {
            for binding in params {
                self.declare_binding(binding, Span::default())?;
            }
            self.resolve_fn_body(name, body, &ret_ty)
        })();
        self.symbols.pop_scope();
        result
    }

    fn resolve_fn_body(
        &mut self,
        name: &str,
        body: &[Stmt],
        ret_ty: &ResolvedType,
    ) -> Result<(), ResolveError> {
        for (i, stmt) in body.iter().enumerate() {
            let is_last = i + 1 == body.len();
            match stmt {
                Stmt::Let(lvalue, value) => {
                    let value_ty = self.resolve_expr(value)?;
                    self.declare_lvalue(lvalue, &value_ty, value.span)?;
                }
                Stmt::Assert(cond, _message) => {
                    let cond_ty = self.resolve_expr(cond)?;
                    if cond_ty != ResolvedType::Bool {
                        return Err(ResolveError::NonBooleanCondition {
                            found: cond_ty.to_string(),
                            span: cond.span,
                        });
                    }
                }
                Stmt::Return(value) => {
                    let value_ty = self.resolve_expr(value)?;
                    if &value_ty != ret_ty {
                        return Err(ResolveError::TypeMismatch {
                            expected: ret_ty.to_string(),
                            found: value_ty.to_string(),
                            span: value.span,
                        });
                    }
                }
            }
            if is_last && !matches!(stmt, Stmt::Return(_)) {
                return Err(ResolveError::NotAllPathsReturn {
                    name: name.to_string(),
                    span: Span::default(),
                });
            }
        }
        if body.is_empty() {
            return Err(ResolveError::NotAllPathsReturn {
                name: name.to_string(),
                span: Span::default(),
            });
        }
        Ok(())
    }
}
