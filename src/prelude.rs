//! Prelude module for convenient imports.
//!
//! ```rust
//! use arctic_tern::prelude::*;
//! ```
//!
//! Brings in the module attribute, the context, the store traits needed to
//! read and edit preference files inside migrations, and the serializer and
//! migration contracts.

pub use crate::arctic_tern_module;
pub use crate::context::Context;
pub use crate::error::{PreferenceError, PreferenceResult};
pub use crate::migration::{Migratable, Migration};
pub use crate::preference::{Preference, PreferenceStream};
pub use crate::serializer::{NullableSerializer, Serializer};
pub use crate::store::{SharedPreferences, SharedPreferencesExt};
