//! Loading compiled template bundles.
//!
//! The upstream template compiler hands over one JSON document per source
//! file (`*.soy.json`, a serialized [`SoyFile`]). A [`Bundle`] collects them
//! and produces the [`TemplateRegistry`] the generator walks.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use soyjs_types::{SoyFile, TemplateRegistry};
use walkdir::WalkDir;

use crate::error::{CompileError, CompileResult};

/// File suffix of a compiled template document.
pub const COMPILED_TEMPLATE_SUFFIX: &str = ".soy.json";

/// Builder for a [`TemplateRegistry`].
#[derive(Debug, Default)]
pub struct Bundle {
    files: Vec<SoyFile>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every compiled template under `dir`, recursively, in path order.
    pub fn add_template_dir(mut self, dir: impl AsRef<Path>) -> CompileResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CompileError::NotADirectory(dir.to_path_buf()));
        }

        let paths = compiled_template_paths(dir)?;
        tracing::debug!(dir = %dir.display(), files = paths.len(), "loading template directory");
        for path in paths {
            self = self.add_file(path)?;
        }
        Ok(self)
    }

    /// Add one compiled template document.
    pub fn add_file(mut self, path: impl AsRef<Path>) -> CompileResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CompileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SoyFile = serde_json::from_slice(&bytes).map_err(|source| CompileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        self.files.push(file);
        Ok(self)
    }

    /// Add an already-decoded file.
    pub fn add_soy_file(mut self, file: SoyFile) -> Self {
        self.files.push(file);
        self
    }

    /// Finish the bundle. File names must be unique.
    pub fn compile(self) -> CompileResult<TemplateRegistry> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.name.as_str()) {
                return Err(CompileError::DuplicateFile(file.name.clone()));
            }
        }
        Ok(TemplateRegistry::new(self.files))
    }
}

fn is_compiled_template(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(COMPILED_TEMPLATE_SUFFIX))
}

/// Paths of the compiled templates under `dir`, in the order
/// [`Bundle::add_template_dir`] loads them.
pub fn compiled_template_paths(dir: &Path) -> CompileResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_compiled_template(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
