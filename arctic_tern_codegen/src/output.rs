use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;

use crate::error::{CodegenError, CodegenResult};
use crate::model::DeclId;

/// One generated source file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// File stem, e.g. `ArcticTernSettings`.
    pub file_name: String,
    pub tokens: TokenStream,
    /// Declarations whose change must regenerate this file.
    pub originating: Vec<DeclId>,
    /// Source files of those declarations, where known.
    pub origin_files: Vec<PathBuf>,
}

impl GeneratedFile {
    pub fn contents(&self) -> String {
        format!("// @generated by arctic_tern_codegen. Do not edit.\n{}\n", self.tokens)
    }

    /// Writes `<dir>/<file_name>.rs` and returns its path.
    pub fn write_to(&self, dir: &Path) -> CodegenResult<PathBuf> {
        let path = dir.join(format!("{}.rs", self.file_name));
        fs::write(&path, self.contents()).map_err(|source| CodegenError::Write {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }

    /// `cargo:rerun-if-changed` lines for a build script.
    pub fn rerun_directives(&self) -> Vec<String> {
        self.origin_files
            .iter()
            .map(|path| format!("cargo:rerun-if-changed={}", path.display()))
            .collect()
    }
}
