//! jplc
//!
//! Static type resolution and x86-64 (NASM, System V) code generation
//! for JPL, a small statically-typed array language, plus the `jplc`
//! CLI binary that drives the pipeline end to end.
//!
//! # Example
//!
//! ```
//! let asm = jplc::compile("let x = 5\nshow x\n").expect("compile failed");
//! assert!(asm.contains("_jpl_main"));
//! ```

pub mod call_signature;
pub mod codegen;
pub mod constant_pool;
pub mod error;
pub mod resolve;
pub mod stack_model;
pub mod symbol_table;
pub mod visitor;

pub use error::{CompileError, CompileResult};

/// Parses, resolves, and generates assembly for `source`, stopping at
/// the first phase that fails.
pub fn compile(source: &str) -> CompileResult<String> {
    let program = jplc_parser::parse(source)?;
    let resolver = resolve::resolve(&program)?;
    let assembly = codegen::generate(&program, &resolver)?;
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_program() {
        let asm = compile("let x = 5\nshow x\n").expect("compile failed");
        assert!(asm.contains("_jpl_main"));
        assert!(asm.contains("global _jpl_main"));
    }

    #[test]
    fn surfaces_parse_errors() {
        let err = compile("let x = \n").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn surfaces_resolve_errors() {
        let err = compile("show y\n").unwrap_err();
        assert!(matches!(err, CompileError::Resolve(_)));
    }
}
