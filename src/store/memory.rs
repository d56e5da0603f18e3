use std::collections::HashMap;

use parking_lot::RwLock;

use super::{ChangeListener, Edit, EditBatch, ListenerId, ListenerRegistry, PreferenceValue, SharedPreferences};
use crate::error::PreferenceResult;

/// Volatile preference file. Contents are lost when the last handle drops.
#[derive(Debug)]
pub struct MemoryPreferences {
    name: String,
    values: RwLock<HashMap<String, PreferenceValue>>,
    listeners: ListenerRegistry,
}

impl MemoryPreferences {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RwLock::new(HashMap::new()),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SharedPreferences for MemoryPreferences {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, key: &str) -> PreferenceResult<Option<PreferenceValue>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn contains(&self, key: &str) -> PreferenceResult<bool> {
        Ok(self.values.read().contains_key(key))
    }

    fn keys(&self) -> PreferenceResult<Vec<String>> {
        Ok(self.values.read().keys().cloned().collect())
    }

    fn apply(&self, batch: EditBatch) -> PreferenceResult<()> {
        let mut changes = Vec::new();
        {
            let mut values = self.values.write();
            if batch.clear && !values.is_empty() {
                values.clear();
                changes.push(None);
            }
            for edit in batch.edits {
                let changed = match edit {
                    Edit::Put(key, value) => {
                        if values.get(&key) == Some(&value) {
                            None
                        } else {
                            values.insert(key.clone(), value);
                            Some(key)
                        }
                    }
                    Edit::Remove(key) => values.remove(&key).map(|_| key),
                };
                if let Some(key) = changed {
                    changes.push(Some(key));
                }
            }
        }
        log::debug!("committed {} change(s) to memory preferences '{}'", changes.len(), self.name);
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
