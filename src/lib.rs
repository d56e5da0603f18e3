//! # Arctic Tern
//!
//! Versioned key-value preferences generated from plain Rust declarations.
//!
//! A struct (or trait) inside an [`arctic_tern_module`] carrying
//! `#[arctic_tern(...)]` describes one preference file. Every field marked
//! with `#[property]` or `#[object_property]` becomes a typed accessor on a
//! generated `ArcticTern<Name>` type that reads and writes the file, can be
//! observed as a stream, and takes part in an ordered migration chain.
//!
//! ## Quick Start
//!
//! ```
//! use arctic_tern::prelude::*;
//!
//! #[arctic_tern_module]
//! mod settings {
//!     use arctic_tern::prelude::*;
//!
//!     #[arctic_tern(preference_file = "settings", version = 1)]
//!     #[derive(Default)]
//!     pub struct Settings {
//!         #[property(with_flow)]
//!         pub volume: i32,
//!         #[property(key = "dark", with_delete)]
//!         pub dark_mode: bool,
//!     }
//!
//!     #[migration(version = 1, unit = Settings)]
//!     pub struct LouderDefault;
//!
//!     impl Migration for LouderDefault {
//!         fn on_migrate(&self, _version: i32, preferences: &dyn SharedPreferences) -> anyhow::Result<()> {
//!             preferences.edit().put_int("key_volume", 8).commit()?;
//!             Ok(())
//!         }
//!     }
//! }
//!
//! # fn main() -> arctic_tern::PreferenceResult<()> {
//! let context = Context::in_memory();
//! let settings = settings::ArcticTernSettings::new(&context)?;
//! settings.initialize()?;
//! settings.migrate()?;
//!
//! assert_eq!(settings.volume()?, 8);
//! settings.set_dark_mode(true)?;
//! assert!(settings.is_dark_mode_set()?);
//! settings.delete_dark_mode()?;
//! assert!(!settings.dark_mode()?);
//! # Ok(())
//! # }
//! ```

extern crate self as arctic_tern;

pub mod config;
pub mod context;
pub mod error;
pub mod migration;
pub mod preference;
pub mod prelude;
pub mod serializer;
pub mod store;

pub use config::ContextConfig;
pub use context::Context;
pub use error::{PreferenceError, PreferenceResult};
pub use migration::{KEY_VERSION, Migratable, Migration, Migrations};
pub use preference::{Preference, PreferenceSink, PreferenceStream, SharedFlow, StateFlow};
pub use serializer::{NullableSerializer, Serializer};
pub use store::{
    Editor, MemoryPreferences, PreferenceValue, PreferencesHandle, SharedPreferences, SharedPreferencesExt,
    SledPreferences, ValueKind,
};

pub use arctic_tern_macros::arctic_tern_module;

/// Items referenced by generated code. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use log;
    pub use std::sync::{Arc, OnceLock};
    pub use tokio::runtime::Handle;
}
