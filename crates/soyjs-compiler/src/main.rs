use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use soyjs_codegen::{FuncRegistry, JS_FUNC_NAMESPACE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soyjs")]
#[command(about = "Compile page templates into client-side JavaScript")]
struct Cli {
    /// Directory holding the compiled templates (`*.soy.json`)
    template_dir: PathBuf,

    /// Output JavaScript file
    #[arg(short, long, default_value = "out.js")]
    out: PathBuf,

    /// Prefix of the page runtime library functions are forwarded to
    #[arg(long, default_value = JS_FUNC_NAMESPACE)]
    runtime_namespace: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(dir = %cli.template_dir.display(), "loading soy templates");

    let funcs = FuncRegistry::with_namespace(cli.runtime_namespace);
    let registry = soyjs_compiler::load_dir(&cli.template_dir)?;

    let file = File::create(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;
    let mut out = BufWriter::new(file);
    soyjs_compiler::soy_to_js(&registry, &funcs, &mut out)?;
    out.flush()
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    tracing::info!(
        files = registry.len(),
        out = %cli.out.display(),
        "javascript written"
    );
    Ok(())
}
