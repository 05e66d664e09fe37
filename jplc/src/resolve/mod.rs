//! Static type resolution.
//!
//! Walks a parsed program top to bottom, threading a lexically-scoped
//! symbol table and a table of `type` aliases, and writes a resolved
//! type into every expression node it visits. Submodules split the
//! work by syntactic category: `types` resolves type expressions,
//! `binding` declares `Arg`/`Binding`/`LValue` patterns, `expr` covers
//! every expression form, and `command` drives the top-level walk and
//! function bodies.

mod binding;
mod command;
mod error;
mod expr;
mod types;

use std::collections::HashMap;

use jplc_parser::{Program, ResolvedType};

pub use error::{ResolveError, ResolveResult};

use crate::symbol_table::SymbolTable;

#[derive(Debug)]
pub struct Resolver {
    pub(crate) symbols: SymbolTable,
    pub(crate) type_aliases: HashMap<String, ResolvedType>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            symbols: SymbolTable::new(),
            type_aliases: HashMap::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

/// Resolves every command in `program`, writing a resolved type onto
/// each `Expr` node in place. Returns the resolver so a caller (the
/// code generator) can still consult its symbol table and type-alias
/// map afterward.
pub fn resolve(program: &Program) -> ResolveResult<Resolver> {
    let mut resolver = Resolver::new();
    resolver.resolve_program(program)?;
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jplc_parser::parse;

    fn resolve_source(source: &str) -> ResolveResult<Resolver> {
        let program = parse(source).expect("parse should succeed");
        resolve(&program)
    }

    #[test]
    fn resolves_literal_let_and_show() {
        resolve_source("let x = 5\nshow x\n").expect("should resolve");
    }

    #[test]
    fn rejects_unknown_variable() {
        let err = resolve_source("show y\n").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSymbol { .. }));
    }

    #[test]
    fn rejects_mismatched_if_branches() {
        let err = resolve_source("show if true then 1 else 1.0\n").unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn resolves_array_comprehension() {
        resolve_source("show array[i: 10] i * 2\n").expect("should resolve");
    }

    #[test]
    fn rejects_rank_mismatch_on_index() {
        let err = resolve_source("let a = [1, 2, 3]\nshow a[0, 0]\n").unwrap_err();
        assert!(matches!(err, ResolveError::RankMismatch { .. }));
    }

    #[test]
    fn resolves_recursive_function() {
        resolve_source(
            "fn fact(n: int): int {\n  return if n == 0 then 1 else n * fact(n - 1)\n}\nshow fact(5)\n",
        )
        .expect("should resolve");
    }

    #[test]
    fn rejects_function_missing_a_return() {
        let err = resolve_source("fn f(n: int): int {\n  let m = n\n}\nshow f(1)\n").unwrap_err();
        assert!(matches!(err, ResolveError::NotAllPathsReturn { .. }));
    }

    #[test]
    fn resolves_tuple_destructuring_let() {
        resolve_source("let {a, b} = {1, 2.0}\nshow a\nshow b\n").expect("should resolve");
    }

    #[test]
    fn resolves_float_modulus() {
        resolve_source("show 5.0 % 2.0\n").expect("float % float should resolve like other arithmetic");
    }

    #[test]
    fn rejects_mixed_type_modulus() {
        let err = resolve_source("show 5 % 2.0\n").unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn rejects_tuple_equality() {
        let err = resolve_source("show {1, 2} == {3, 4}\n").unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn rejects_array_equality() {
        let err = resolve_source("show [1, 2] == [3, 4]\n").unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn resolves_primitive_equality() {
        resolve_source("show 1 == 2\nshow 1.0 != 2.0\nshow true == false\n").expect("should resolve");
    }
}
