//! Codegen error types.

use soyjs_types::Span;
use thiserror::Error;

use crate::funcs::Arity;

/// Errors that can occur while generating JavaScript.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A call site passed an argument count outside the function's budget.
    #[error("{span}: function `{name}` called with {got} argument(s), expected {expected}")]
    ArityMismatch {
        name: String,
        got: usize,
        expected: Arity,
        span: Span,
    },

    /// Neither a native built-in nor a registered page function.
    #[error("{span}: unknown function `{name}`")]
    UnknownFunction { name: String, span: Span },

    /// A template construct the generator cannot express in JavaScript.
    #[error("{span}: unsupported: {message}")]
    Unsupported { message: String, span: Span },

    /// The requested file is not part of the template registry.
    #[error("unknown template file: {0}")]
    UnknownFile(String),

    /// An internal consistency check failed.
    #[error("internal codegen error: {0}")]
    Internal(String),

    /// Writing to the destination sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
