use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Invoked with the changed key, or `None` when the whole file changed.
pub type ChangeListener = Arc<dyn Fn(Option<&str>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registered change listeners of one preference file.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, ChangeListener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        log::trace!("registered preference listener {:?}", id);
        id
    }

    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener once per change. Listeners run outside the lock so
    /// they may register or unregister.
    pub fn notify(&self, changes: &[Option<String>]) {
        if changes.is_empty() {
            return;
        }
        let snapshot: Vec<ChangeListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for change in changes {
            for listener in &snapshot {
                listener(change.as_deref());
            }
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn unregistered_listeners_are_not_called() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = registry.register(Arc::new(move |key: Option<&str>| {
            sink.lock().push(key.map(str::to_string));
        }));

        registry.notify(&[Some("a".into()), None]);
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        registry.notify(&[Some("b".into())]);

        assert_eq!(*seen.lock(), vec![Some("a".to_string()), None]);
        assert!(registry.is_empty());
    }
}
