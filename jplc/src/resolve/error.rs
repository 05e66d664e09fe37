use jplc_parser::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("duplicate symbol '{name}' at {span:?}")]
    DuplicateSymbol { name: String, span: Span },

    #[error("unknown symbol '{name}' at {span:?}")]
    UnknownSymbol { name: String, span: Span },

    #[error("unknown type '{name}' at {span:?}")]
    UnknownType { name: String, span: Span },

    #[error("'{name}' is a {kind}, not a {expected} at {span:?}")]
    KindMismatch {
        name: String,
        kind: &'static str,
        expected: &'static str,
        span: Span,
    },

    #[error("type mismatch: expected {expected}, found {found} at {span:?}")]
    TypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("'{name}' expects {expected} argument(s), found {found} at {span:?}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("expected an array of rank {expected}, found rank {found} at {span:?}")]
    RankMismatch { expected: u32, found: u32, span: Span },

    #[error("tuple index {index} out of range for a {size}-field tuple at {span:?}")]
    TupleIndexOutOfRange { index: u32, size: usize, span: Span },

    #[error("array index must be int, found {found} at {span:?}")]
    NonIntegerIndex { found: String, span: Span },

    #[error("condition must be bool, found {found} at {span:?}")]
    NonBooleanCondition { found: String, span: Span },

    #[error("array literal has mismatched element types ({first} vs {other}) at {span:?}")]
    HeterogeneousArrayLiteral {
        first: String,
        other: String,
        span: Span,
    },

    #[error("empty array literal has no element type at {span:?}")]
    EmptyArrayLiteral { span: Span },

    #[error("'{name}' is not callable at {span:?}")]
    NotCallable { name: String, span: Span },

    #[error("indexing requires an array, found {found} at {span:?}")]
    NotIndexable { found: String, span: Span },

    #[error("tuple indexing requires a tuple, found {found} at {span:?}")]
    NotATuple { found: String, span: Span },

    #[error("function '{name}' does not return on all paths at {span:?}")]
    NotAllPathsReturn { name: String, span: Span },

    #[error("`let` pattern does not match the shape of its value ({expected} vs {found}) at {span:?}")]
    BindingShapeMismatch {
        expected: String,
        found: String,
        span: Span,
    },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::DuplicateSymbol { span, .. }
            | ResolveError::UnknownSymbol { span, .. }
            | ResolveError::UnknownType { span, .. }
            | ResolveError::KindMismatch { span, .. }
            | ResolveError::TypeMismatch { span, .. }
            | ResolveError::ArityMismatch { span, .. }
            | ResolveError::RankMismatch { span, .. }
            | ResolveError::TupleIndexOutOfRange { span, .. }
            | ResolveError::NonIntegerIndex { span, .. }
            | ResolveError::NonBooleanCondition { span, .. }
            | ResolveError::HeterogeneousArrayLiteral { span, .. }
            | ResolveError::EmptyArrayLiteral { span }
            | ResolveError::NotCallable { span, .. }
            | ResolveError::NotIndexable { span, .. }
            | ResolveError::NotATuple { span, .. }
            | ResolveError::NotAllPathsReturn { span, .. }
            | ResolveError::BindingShapeMismatch { span, .. } => *span,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
