//! Configuration for persistent preference contexts.
//!
//! Built with `typed-builder`:
//!
//! ```
//! use arctic_tern::config::ContextConfig;
//!
//! let config = ContextConfig::builder()
//!     .path("app_preferences")
//!     .flush_on_commit(false)
//!     .build();
//! assert_eq!(config.cache_capacity, 64 * 1024 * 1024);
//! ```

use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::error::{PreferenceError, PreferenceResult};

#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct ContextConfig {
    /// Directory of the sled database holding every preference file.
    #[builder(default, setter(into, strip_option))]
    pub path: Option<PathBuf>,

    /// Delete the database when the context is dropped.
    #[builder(default = false)]
    pub temporary: bool,

    /// Page cache size in bytes.
    #[builder(default = 64 * 1024 * 1024)]
    pub cache_capacity: u64,

    /// Flush to disk at the end of every commit.
    #[builder(default = true)]
    pub flush_on_commit: bool,
}

impl ContextConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::builder().path(path).build()
    }

    pub fn temporary() -> Self {
        Self::builder().temporary(true).flush_on_commit(false).build()
    }

    pub(crate) fn to_sled(&self) -> PreferenceResult<sled::Config> {
        let config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .temporary(self.temporary);
        match (&self.path, self.temporary) {
            (Some(path), _) => Ok(config.path(path)),
            (None, true) => Ok(config),
            (None, false) => Err(PreferenceError::Configuration(
                "a persistent context requires a path".to_string(),
            )),
        }
    }
}
