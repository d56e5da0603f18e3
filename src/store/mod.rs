//! The raw key-value store that generated preference units read and write.
//!
//! A [`SharedPreferences`] is one named preference file. Values are one of a
//! small set of native kinds ([`PreferenceValue`]); writes are staged on an
//! [`Editor`] and applied atomically by [`Editor::commit`], after which every
//! registered change listener is told which keys changed.
//!
//! The typed getters and the editor live on [`SharedPreferencesExt`], which is
//! implemented for every store including `dyn SharedPreferences`.

use std::collections::HashSet;
use std::sync::Arc;

use bincode::{Decode, Encode};
use strum::{Display, EnumDiscriminants};

use crate::error::{PreferenceError, PreferenceResult};

pub mod listeners;
pub mod memory;
pub mod sled_store;

pub use listeners::{ChangeListener, ListenerId, ListenerRegistry};
pub use memory::MemoryPreferences;
pub use sled_store::SledPreferences;

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Encode, Decode, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind), derive(Display, Hash))]
pub enum PreferenceValue {
    Int(i32),
    Boolean(bool),
    Float(f32),
    Long(i64),
    String(String),
    StringSet(HashSet<Option<String>>),
}

impl PreferenceValue {
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }
}

/// One staged mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Put(String, PreferenceValue),
    Remove(String),
}

impl Edit {
    pub fn key(&self) -> &str {
        match self {
            Edit::Put(key, _) | Edit::Remove(key) => key,
        }
    }
}

/// The set of mutations applied by a single commit.
///
/// A clear is always applied before the individual edits, whatever order the
/// calls were staged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    pub clear: bool,
    pub edits: Vec<Edit>,
}

impl EditBatch {
    pub fn is_empty(&self) -> bool {
        !self.clear && self.edits.is_empty()
    }
}

/// A named preference file.
pub trait SharedPreferences: Send + Sync {
    /// Name of the preference file this store holds.
    fn name(&self) -> &str;

    fn read(&self, key: &str) -> PreferenceResult<Option<PreferenceValue>>;

    fn contains(&self, key: &str) -> PreferenceResult<bool>;

    fn keys(&self) -> PreferenceResult<Vec<String>>;

    /// Applies every edit of `batch` atomically, then notifies listeners.
    ///
    /// Listeners receive `Some(key)` for each key whose stored state changed
    /// and `None` once when the batch cleared the file.
    fn apply(&self, batch: EditBatch) -> PreferenceResult<()>;

    fn register_listener(&self, listener: ChangeListener) -> ListenerId;

    /// Returns false if `id` was not registered.
    fn unregister_listener(&self, id: ListenerId) -> bool;
}

fn mismatch(key: &str, expected: ValueKind, found: &PreferenceValue) -> PreferenceError {
    PreferenceError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Typed access to a [`SharedPreferences`].
///
/// Every getter returns `default` when the key is absent and fails with
/// [`PreferenceError::TypeMismatch`] when the key holds another kind of value.
pub trait SharedPreferencesExt: SharedPreferences {
    fn get_int(&self, key: &str, default: i32) -> PreferenceResult<i32> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::Int(value)) => Ok(value),
            Some(other) => Err(mismatch(key, ValueKind::Int, &other)),
        }
    }

    fn get_boolean(&self, key: &str, default: bool) -> PreferenceResult<bool> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::Boolean(value)) => Ok(value),
            Some(other) => Err(mismatch(key, ValueKind::Boolean, &other)),
        }
    }

    fn get_float(&self, key: &str, default: f32) -> PreferenceResult<f32> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::Float(value)) => Ok(value),
            Some(other) => Err(mismatch(key, ValueKind::Float, &other)),
        }
    }

    fn get_long(&self, key: &str, default: i64) -> PreferenceResult<i64> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::Long(value)) => Ok(value),
            Some(other) => Err(mismatch(key, ValueKind::Long, &other)),
        }
    }

    fn get_string(&self, key: &str, default: Option<String>) -> PreferenceResult<Option<String>> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, ValueKind::String, &other)),
        }
    }

    /// Reads a set of strings. Absent elements stored by
    /// [`Editor::put_nullable_string_set`] are skipped.
    fn get_string_set(
        &self,
        key: &str,
        default: Option<HashSet<String>>,
    ) -> PreferenceResult<Option<HashSet<String>>> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::StringSet(values)) => Ok(Some(values.into_iter().flatten().collect())),
            Some(other) => Err(mismatch(key, ValueKind::StringSet, &other)),
        }
    }

    fn get_nullable_string_set(
        &self,
        key: &str,
        default: Option<HashSet<Option<String>>>,
    ) -> PreferenceResult<Option<HashSet<Option<String>>>> {
        match self.read(key)? {
            None => Ok(default),
            Some(PreferenceValue::StringSet(values)) => Ok(Some(values)),
            Some(other) => Err(mismatch(key, ValueKind::StringSet, &other)),
        }
    }

    fn edit(&self) -> Editor<'_, Self> {
        Editor {
            preferences: self,
            batch: EditBatch::default(),
        }
    }
}

impl<P: SharedPreferences + ?Sized> SharedPreferencesExt for P {}

/// Staged writes against one store. Nothing is visible until [`Editor::commit`].
#[must_use = "edits are discarded unless committed"]
pub struct Editor<'a, P: SharedPreferences + ?Sized> {
    preferences: &'a P,
    batch: EditBatch,
}

impl<'a, P: SharedPreferences + ?Sized> Editor<'a, P> {
    fn put(mut self, key: &str, value: PreferenceValue) -> Self {
        self.batch.edits.push(Edit::Put(key.to_string(), value));
        self
    }

    pub fn put_int(self, key: &str, value: i32) -> Self {
        self.put(key, PreferenceValue::Int(value))
    }

    pub fn put_boolean(self, key: &str, value: bool) -> Self {
        self.put(key, PreferenceValue::Boolean(value))
    }

    pub fn put_float(self, key: &str, value: f32) -> Self {
        self.put(key, PreferenceValue::Float(value))
    }

    pub fn put_long(self, key: &str, value: i64) -> Self {
        self.put(key, PreferenceValue::Long(value))
    }

    /// Stores a string; `None` removes the key.
    pub fn put_string(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.put(key, PreferenceValue::String(value)),
            None => self.remove(key),
        }
    }

    /// Stores a set of strings; `None` removes the key.
    pub fn put_string_set(self, key: &str, value: Option<HashSet<String>>) -> Self {
        match value {
            Some(values) => self.put(
                key,
                PreferenceValue::StringSet(values.into_iter().map(Some).collect()),
            ),
            None => self.remove(key),
        }
    }

    /// Stores a set that may contain absent elements; `None` removes the key.
    pub fn put_nullable_string_set(self, key: &str, value: Option<HashSet<Option<String>>>) -> Self {
        match value {
            Some(values) => self.put(key, PreferenceValue::StringSet(values)),
            None => self.remove(key),
        }
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.batch.edits.push(Edit::Remove(key.to_string()));
        self
    }

    pub fn clear(mut self) -> Self {
        self.batch.clear = true;
        self
    }

    /// Applies the staged edits synchronously.
    pub fn commit(self) -> PreferenceResult<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.preferences.apply(self.batch)
    }
}

/// Shared handle to a preference file.
pub type PreferencesHandle = Arc<dyn SharedPreferences>;
