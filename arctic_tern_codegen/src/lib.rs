//! # arctic_tern_codegen
//!
//! Turns preference-unit declarations into Rust source for the `arctic_tern`
//! runtime.
//!
//! The pipeline is front-end agnostic:
//!
//! 1. a front-end describes user code as a [`DeclarationGraph`] (the
//!    `#[arctic_tern_module]` attribute does this from `syn` items, the
//!    [`manifest`] module does it from a TOML file);
//! 2. the [`validator`] checks every unit and resolves it into a
//!    [`PersistenceUnitSchema`](schema::PersistenceUnitSchema);
//! 3. the [`generators`] emit one type per unit plus, when a host marker is
//!    present, an `ArcticTernFactory`.
//!
//! [`Processor::process`] runs all three and isolates failures per unit.
//!
//! ## Build script usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let out_dir = std::env::var("OUT_DIR").unwrap();
//! for path in arctic_tern_codegen::manifest::generate_from_manifest("preferences.toml", Path::new(&out_dir)).unwrap() {
//!     println!("generated {}", path.display());
//! }
//! ```

pub mod error;
pub mod generators;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod output;
pub mod processor;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod validator;

use syn::parse_quote;

pub use error::{CodegenError, CodegenResult, ProcessingError, ProcessingResult};
pub use model::{DeclId, Declaration, DeclarationGraph};
pub use output::GeneratedFile;
pub use processor::{ProcessingOutput, Processor};

/// Settings shared by every generator.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Path generated code uses to reach the runtime crate.
    pub runtime: syn::Path,
}

impl GeneratorOptions {
    pub fn with_runtime(runtime: syn::Path) -> Self {
        Self { runtime }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            runtime: parse_quote!(::arctic_tern),
        }
    }
}
