//! Translation-unit loop: one generated fragment per compiled file.
//!
//! Files are generated in registry order and written back to back into a
//! single destination, with no separators. Generation stops at the first
//! failing file and its error is returned unchanged; files after it are
//! never generated.

use std::io::Write;

use soyjs_codegen::{CodegenResult, FileGenerator, FuncRegistry, Generator};
use soyjs_types::TemplateRegistry;

/// Drive `generator` over every file of `files`, appending to `out`.
pub fn translate<G>(files: &TemplateRegistry, generator: &G, out: &mut dyn Write) -> CodegenResult<()>
where
    G: FileGenerator + ?Sized,
{
    for file in files.files() {
        tracing::info!(file = %file.name, "generating");
        generator.write_file(out, &file.name)?;
    }
    Ok(())
}

/// Generate JavaScript for every file of `registry` with the default
/// generator.
pub fn soy_to_js(
    registry: &TemplateRegistry,
    funcs: &FuncRegistry,
    out: &mut dyn Write,
) -> CodegenResult<()> {
    let generator = Generator::new(registry, funcs);
    translate(registry, &generator, out)
}
