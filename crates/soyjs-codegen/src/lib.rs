//! soyjs code generator: compiled templates to client-side JavaScript.
//!
//! # Architecture
//!
//! The generator walks a [`soyjs_types::TemplateRegistry`] one file at a
//! time and writes one self-contained JavaScript fragment per file.
//! Expressions are rendered by [`JsWriter`]; function calls that are not
//! native built-ins are translated through the page function table
//! ([`FuncRegistry`]), which is built once and only read afterwards.
//!
//! ## Call translation
//!
//! | Strategy | Output |
//! |---|---|
//! | forward | `yext.pages.soy.timef(a, b)` |
//! | inline | `a.length`, `a.slice(1, 2)`, `a.replace(b, c)` |
//! | server-side only | `alert('gmap is not implemented for JS templates')` |

pub mod error;
pub mod expr;
pub mod funcs;
pub mod generator;
pub mod writer;

pub use error::{CodegenError, CodegenResult};
pub use funcs::{Arity, Emitter, Func, FuncRegistry, InlineMethod, JS_FUNC_NAMESPACE};
pub use generator::{FileGenerator, Generator};
pub use writer::{JsSink, JsWriter};
