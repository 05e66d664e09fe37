//! The top-level error unifying every phase of compilation.

use thiserror::Error;

use crate::codegen::CodegenError;
use crate::resolve::ResolveError;
use jplc_parser::ParseError;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// True when the failure should be reported without a source span
    /// (codegen errors are always internal-compiler-error class; the
    /// other two carry their own span-aware `Display`).
    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Codegen(_))
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
