//! soyjs compiler: orchestrates the template-to-JavaScript pipeline.
//!
//! ```text
//! compiled bundle (*.soy.json) → TemplateRegistry → per-file codegen → out.js
//! ```

pub mod bundle;
pub mod error;
pub mod translate;

use std::io::Write;
use std::path::Path;

use soyjs_codegen::FuncRegistry;
use soyjs_types::TemplateRegistry;

pub use bundle::{Bundle, COMPILED_TEMPLATE_SUFFIX};
pub use error::{CompileError, CompileResult};
pub use translate::{soy_to_js, translate};

/// Load every compiled template under `dir`.
pub fn load_dir(dir: impl AsRef<Path>) -> CompileResult<TemplateRegistry> {
    Bundle::new().add_template_dir(dir)?.compile()
}

/// Load `dir` and write the JavaScript for all of its files to `out`.
pub fn compile_dir(
    dir: impl AsRef<Path>,
    funcs: &FuncRegistry,
    out: &mut dyn Write,
) -> CompileResult<TemplateRegistry> {
    let registry = load_dir(dir)?;
    soy_to_js(&registry, funcs, out)?;
    Ok(registry)
}
