//! Shared types for the soyjs compiler.
//!
//! This crate defines the compiled template AST handed over by the upstream
//! template compiler, source spans, and the registry of compiled files that
//! the code generator walks.

mod span;
pub mod ast;

pub use ast::{SoyFile, TemplateRegistry};
pub use span::Span;
