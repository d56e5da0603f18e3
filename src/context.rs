//! The application-wide handle that hands out preference files by name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ContextConfig;
use crate::error::PreferenceResult;
use crate::store::{MemoryPreferences, PreferencesHandle, SledPreferences};

enum Backend {
    Memory,
    Sled { db: sled::Db, flush_on_commit: bool },
}

struct ContextInner {
    backend: Backend,
    files: Mutex<HashMap<String, PreferencesHandle>>,
}

/// Cheap to clone; every clone shares the same preference files.
///
/// Asking for the same file name twice returns the same store, so change
/// listeners registered through one handle see writes made through another.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    fn with_backend(backend: Backend) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                backend,
                files: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_backend(Backend::Memory)
    }

    pub fn open(config: ContextConfig) -> PreferenceResult<Self> {
        let db = config.to_sled()?.open()?;
        log::info!("opened preference context (temporary: {})", config.temporary);
        Ok(Self::with_backend(Backend::Sled {
            db,
            flush_on_commit: config.flush_on_commit,
        }))
    }

    /// A sled-backed context removed on drop.
    pub fn temporary() -> PreferenceResult<Self> {
        Self::open(ContextConfig::temporary())
    }

    pub fn get_shared_preferences(&self, name: &str) -> PreferenceResult<PreferencesHandle> {
        let mut files = self.inner.files.lock();
        if let Some(existing) = files.get(name) {
            return Ok(Arc::clone(existing));
        }
        let created: PreferencesHandle = match &self.inner.backend {
            Backend::Memory => Arc::new(MemoryPreferences::new(name)),
            Backend::Sled {
                db,
                flush_on_commit,
            } => Arc::new(SledPreferences::open(db, name, *flush_on_commit)?),
        };
        files.insert(name.to_string(), Arc::clone(&created));
        Ok(created)
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.inner.backend, Backend::Sled { .. })
    }

    pub fn flush(&self) -> PreferenceResult<()> {
        if let Backend::Sled { db, .. } = &self.inner.backend {
            db.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let files: Vec<String> = self.inner.files.lock().keys().cloned().collect();
        f.debug_struct("Context")
            .field("persistent", &self.is_persistent())
            .field("files", &files)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SharedPreferencesExt;

    #[test]
    fn same_name_returns_same_store() {
        let context = Context::in_memory();
        let first = context.get_shared_preferences("settings").unwrap();
        let second = context.clone().get_shared_preferences("settings").unwrap();
        first.edit().put_int("count", 1).commit().unwrap();
        assert_eq!(second.get_int("count", 0).unwrap(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn persistent_context_requires_a_path() {
        let config = ContextConfig::builder().build();
        assert!(Context::open(config).is_err());
    }
}
