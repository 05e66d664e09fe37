//! Lexically-scoped symbol table threaded through resolution.
//!
//! A stack of scopes, each mapping a name to either a variable's
//! resolved type or a function's signature. Lookup walks from the
//! innermost scope outward. Two globals are seeded before any user
//! code is resolved: `argnum: int` and `args: array<int,1>`, the
//! command-line argument vector every JPL program can see.

use std::collections::HashMap;

use jplc_parser::ResolvedType;

#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(ResolvedType),
    Function(Vec<ResolvedType>, ResolvedType),
}

#[derive(Debug, Default)]
struct Scope {
    names: HashMap<String, Symbol>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable {
            scopes: vec![Scope::default()],
        };
        table
            .declare("argnum", Symbol::Variable(ResolvedType::Int))
            .expect("argnum is the first declaration in an empty scope");
        table
            .declare(
                "args",
                Symbol::Variable(ResolvedType::array(ResolvedType::Int, 1)),
            )
            .expect("args is the second declaration in an empty scope");
        table
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the global scope");
        self.scopes.pop();
    }

    /// Declares `name` in the current (innermost) scope. Returns `Err`
    /// with the name if it is already bound in that same scope — JPL
    /// allows shadowing an outer binding but not redeclaring within one
    /// block.
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> Result<(), String> {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        if scope.names.contains_key(name) {
            return Err(name.to_string());
        }
        scope.names.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Looks up `name`, searching from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.names.get(name))
    }

    /// True if `name` is bound in the innermost scope specifically
    /// (used to reject redeclaration without blocking shadowing).
    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .expect("scope stack is never empty")
            .names
            .contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predeclares_argnum_and_args() {
        let table = SymbolTable::new();
        assert!(matches!(table.lookup("argnum"), Some(Symbol::Variable(ResolvedType::Int))));
        assert!(matches!(table.lookup("args"), Some(Symbol::Variable(t)) if t.is_array()));
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut table = SymbolTable::new();
        table
            .declare("x", Symbol::Variable(ResolvedType::Int))
            .unwrap();
        table.push_scope();
        table
            .declare("x", Symbol::Variable(ResolvedType::Float))
            .unwrap();
        assert!(matches!(table.lookup("x"), Some(Symbol::Variable(ResolvedType::Float))));
        table.pop_scope();
        assert!(matches!(table.lookup("x"), Some(Symbol::Variable(ResolvedType::Int))));
    }

    #[test]
    fn redeclaring_in_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        table
            .declare("x", Symbol::Variable(ResolvedType::Int))
            .unwrap();
        assert!(table
            .declare("x", Symbol::Variable(ResolvedType::Bool))
            .is_err());
    }
}
