use thiserror::Error;

/// Codegen failures are always internal-compiler-error class: by the
/// time a program reaches codegen, resolution has already guaranteed
/// every type and symbol checks out, so a codegen failure means this
/// compiler has a bug, not that the input program is wrong.
#[derive(Error, Debug, Clone)]
pub enum CodegenError {
    #[error("internal compiler error: {0}")]
    Internal(String),
}

pub type CodegenResult<T> = Result<T, CodegenError>;
