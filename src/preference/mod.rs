//! The per-field wrapper used by generated preference units.
//!
//! A [`Preference`] couples a storage key and a default value with two
//! closures: a value provider that reads the typed value out of a store and a
//! value setter that writes it back and commits. Generated code builds one
//! wrapper per field lazily and forwards its accessors to it.

use std::fmt;
use std::sync::Arc;

use crate::error::PreferenceResult;
use crate::store::{PreferencesHandle, SharedPreferences, SharedPreferencesExt};

mod hot;
mod stream;

pub use hot::{PreferenceSink, SharedFlow, StateFlow};
pub use stream::PreferenceStream;

/// Reads a value: `(store, key, default) -> value`.
pub type ValueProvider<T> =
    Arc<dyn Fn(&dyn SharedPreferences, &str, &T) -> PreferenceResult<T> + Send + Sync>;

/// Writes and commits a value: `(store, key, value)`.
pub type ValueSetter<T> =
    Arc<dyn Fn(&dyn SharedPreferences, &str, T) -> PreferenceResult<()> + Send + Sync>;

pub struct Preference<T> {
    key: Arc<str>,
    default: T,
    provider: ValueProvider<T>,
    setter: ValueSetter<T>,
    preferences: PreferencesHandle,
}

impl<T> Preference<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<P, S>(
        key: impl Into<Arc<str>>,
        default: T,
        provider: P,
        setter: S,
        preferences: PreferencesHandle,
    ) -> Self
    where
        P: Fn(&dyn SharedPreferences, &str, &T) -> PreferenceResult<T> + Send + Sync + 'static,
        S: Fn(&dyn SharedPreferences, &str, T) -> PreferenceResult<()> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            default,
            provider: Arc::new(provider),
            setter: Arc::new(setter),
            preferences,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn preferences(&self) -> &PreferencesHandle {
        &self.preferences
    }

    /// Reads the stored value, or the default when the key is absent.
    pub fn value(&self) -> PreferenceResult<T> {
        (self.provider)(self.preferences.as_ref(), &self.key, &self.default)
    }

    pub fn set(&self, value: T) -> PreferenceResult<()> {
        (self.setter)(self.preferences.as_ref(), &self.key, value)
    }

    pub fn is_set(&self) -> PreferenceResult<bool> {
        self.preferences.contains(&self.key)
    }

    /// Removes the key; later reads observe the default again.
    pub fn delete(&self) -> PreferenceResult<()> {
        self.preferences.edit().remove(&self.key).commit()
    }

    /// A cold stream of the current value followed by every change.
    pub fn observe(&self) -> PreferenceStream<T> {
        PreferenceStream::new(self.clone())
    }

    /// Shares the observed value as a state holder driven on `handle`.
    pub fn as_state_flow(&self, handle: &tokio::runtime::Handle) -> PreferenceResult<StateFlow<T>> {
        StateFlow::launch(self, handle)
    }

    /// Broadcasts every observed value to any number of subscribers.
    pub fn as_shared_flow(&self, handle: &tokio::runtime::Handle, capacity: usize) -> SharedFlow<T> {
        SharedFlow::launch(self, handle, capacity)
    }

    /// A sink that writes every item it receives.
    pub fn as_sink(&self) -> PreferenceSink<T> {
        PreferenceSink::new(self.clone())
    }
}

impl<T: Clone> Clone for Preference<T> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            default: self.default.clone(),
            provider: Arc::clone(&self.provider),
            setter: Arc::clone(&self.setter),
            preferences: Arc::clone(&self.preferences),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Preference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preference")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("file", &self.preferences.name())
            .finish()
    }
}
