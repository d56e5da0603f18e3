//! TOML front-end for build scripts.
//!
//! A manifest lists the same declarations the attribute macro would find in a
//! module, so generation can run from `build.rs` and write real files.

mod parser;
pub mod types;

pub use parser::{generate_from_manifest, parse_manifest, parse_manifest_str};
pub use types::Manifest;
