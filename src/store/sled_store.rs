use std::collections::HashMap;

use super::{ChangeListener, Edit, EditBatch, ListenerId, ListenerRegistry, PreferenceValue, SharedPreferences};
use crate::error::PreferenceResult;

/// A preference file persisted as one sled tree. Values are bincode encoded.
pub struct SledPreferences {
    name: String,
    tree: sled::Tree,
    flush_on_commit: bool,
    listeners: ListenerRegistry,
}

impl SledPreferences {
    pub fn open(db: &sled::Db, name: &str, flush_on_commit: bool) -> PreferenceResult<Self> {
        let tree = db.open_tree(name)?;
        log::debug!("opened sled preference tree '{}'", name);
        Ok(Self {
            name: name.to_string(),
            tree,
            flush_on_commit,
            listeners: ListenerRegistry::new(),
        })
    }

    fn encode(value: &PreferenceValue) -> PreferenceResult<Vec<u8>> {
        Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
    }

    fn decode(bytes: &[u8]) -> PreferenceResult<PreferenceValue> {
        let (value, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(value)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SharedPreferences for SledPreferences {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, key: &str) -> PreferenceResult<Option<PreferenceValue>> {
        self.tree
            .get(key.as_bytes())?
            .map(|bytes| Self::decode(&bytes))
            .transpose()
    }

    fn contains(&self, key: &str) -> PreferenceResult<bool> {
        Ok(self.tree.contains_key(key.as_bytes())?)
    }

    fn keys(&self) -> PreferenceResult<Vec<String>> {
        self.tree
            .iter()
            .keys()
            .map(|key| Ok(String::from_utf8_lossy(&key?).into_owned()))
            .collect()
    }

    fn apply(&self, batch: EditBatch) -> PreferenceResult<()> {
        let mut writes = sled::Batch::default();
        let mut changes = Vec::new();

        if batch.clear {
            let mut removed = false;
            for key in self.tree.iter().keys() {
                writes.remove(key?);
                removed = true;
            }
            if removed {
                changes.push(None);
            }
        }

        // Later edits to a key override earlier ones in the same batch.
        let mut touched = Vec::new();
        let mut pending: HashMap<String, Option<PreferenceValue>> = HashMap::new();
        for edit in batch.edits {
            let (key, value) = match edit {
                Edit::Put(key, value) => (key, Some(value)),
                Edit::Remove(key) => (key, None),
            };
            if pending.insert(key.clone(), value).is_none() {
                touched.push(key);
            }
        }

        for key in touched {
            let value = pending.remove(&key).flatten();
            let before = if batch.clear { None } else { self.read(&key)? };
            if before == value {
                continue;
            }
            match &value {
                Some(value) => writes.insert(key.as_bytes(), Self::encode(value)?),
                None => writes.remove(key.as_bytes()),
            }
            changes.push(Some(key));
        }

        if changes.is_empty() {
            return Ok(());
        }

        self.tree.apply_batch(writes)?;
        if self.flush_on_commit {
            self.tree.flush()?;
        }
        log::debug!("committed {} change(s) to sled preferences '{}'", changes.len(), self.name);
        self.listeners.notify(&changes);
        Ok(())
    }

    fn register_listener(&self, listener: ChangeListener) -> ListenerId {
        self.listeners.register(listener)
    }

    fn unregister_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }
}

impl std::fmt::Debug for SledPreferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledPreferences")
            .field("name", &self.name)
            .field("flush_on_commit", &self.flush_on_commit)
            .field("listeners", &self.listeners)
            .finish()
    }
}
