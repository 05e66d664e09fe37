//! Resolves syntactic type expressions into alias-free `ResolvedType`s.

use jplc_parser::{ResolvedType, Span, TypeExpr};

use super::error::ResolveError;
use super::Resolver;

impl Resolver {
    pub(crate) fn resolve_type_expr(
        &self,
        ty: &TypeExpr,
        span: Span,
    ) -> Result<ResolvedType, ResolveError> {
        match ty {
            TypeExpr::Bool => Ok(ResolvedType::Bool),
            TypeExpr::Int => Ok(ResolvedType::Int),
            TypeExpr::Float => Ok(ResolvedType::Float),
            TypeExpr::Array(inner, rank) => {
                Ok(ResolvedType::array(self.resolve_type_expr(inner, span)?, *rank))
            }
            TypeExpr::Tuple(fields) => {
                let resolved = fields
                    .iter()
                    .map(|field| self.resolve_type_expr(field, span))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::tuple(resolved))
            }
            TypeExpr::Var(name) => self
                .type_aliases
                .get(name)
                .cloned()
                .ok_or_else(|| ResolveError::UnknownType {
                    name: name.clone(),
                    span,
                }),
        }
    }
}
