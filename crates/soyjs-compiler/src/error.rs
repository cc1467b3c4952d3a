//! Compiler error types.

use std::io;
use std::path::PathBuf;

use soyjs_codegen::CodegenError;
use thiserror::Error;

/// Errors surfaced by the compilation pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    /// JavaScript generation failed; the inner error is passed through as is.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("template directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to scan template directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two compiled files share a name.
    #[error("duplicate template file `{0}`")]
    DuplicateFile(String),
}

/// Compiler result type alias.
pub type CompileResult<T> = Result<T, CompileError>;
