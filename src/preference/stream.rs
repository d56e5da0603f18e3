use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use futures::Stream;
use parking_lot::Mutex;

use super::Preference;
use crate::error::PreferenceResult;
use crate::store::ListenerId;

#[derive(Default)]
struct Signal {
    dirty: bool,
    waker: Option<Waker>,
}

/// Cold observation of one preference.
///
/// The change listener is registered on the first poll, which yields the
/// current value. Afterwards every notification for this key (or for the
/// whole file) marks the stream dirty; any number of notifications arriving
/// before the next poll collapse into a single re-read. Dropping the stream
/// unregisters the listener.
pub struct PreferenceStream<T> {
    preference: Preference<T>,
    signal: Arc<Mutex<Signal>>,
    listener: Option<ListenerId>,
}

// Nothing is structurally pinned.
impl<T> Unpin for PreferenceStream<T> {}

impl<T> PreferenceStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) fn new(preference: Preference<T>) -> Self {
        Self {
            preference,
            signal: Arc::new(Mutex::new(Signal::default())),
            listener: None,
        }
    }

    fn subscribe(&mut self) {
        let key = self.preference.key().to_string();
        let signal = Arc::clone(&self.signal);
        let id = self
            .preference
            .preferences()
            .register_listener(Arc::new(move |changed: Option<&str>| {
                if changed.is_some_and(|changed| changed != key) {
                    return;
                }
                let mut signal = signal.lock();
                signal.dirty = true;
                if let Some(waker) = signal.waker.take() {
                    waker.wake();
                }
            }));
        self.listener = Some(id);
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }
}

impl<T> Stream for PreferenceStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = PreferenceResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.listener.is_none() {
            this.subscribe();
            return Poll::Ready(Some(this.preference.value()));
        }

        let mut signal = this.signal.lock();
        if signal.dirty {
            signal.dirty = false;
            drop(signal);
            return Poll::Ready(Some(this.preference.value()));
        }
        signal.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl<T> Drop for PreferenceStream<T> {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.preference.preferences.unregister_listener(id);
            log::trace!("unregistered listener for preference '{}'", self.preference.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryPreferences, SharedPreferences, SharedPreferencesExt};
    use tokio_test::task::spawn;
    use tokio_test::{assert_pending, assert_ready};

    fn flag(store: Arc<MemoryPreferences>) -> Preference<bool> {
        Preference::new(
            "key_flag",
            false,
            |prefs, key, default| prefs.get_boolean(key, *default),
            |prefs, key, value| prefs.edit().put_boolean(key, value).commit(),
            store as Arc<dyn SharedPreferences>,
        )
    }

    #[test]
    fn emits_current_value_then_waits() {
        let store = Arc::new(MemoryPreferences::new("flags"));
        let preference = flag(Arc::clone(&store));
        preference.set(true).unwrap();

        let mut stream = spawn(preference.observe());
        assert!(matches!(assert_ready!(stream.poll_next()), Some(Ok(true))));
        assert_pending!(stream.poll_next());
    }

    #[test]
    fn conflates_and_ignores_other_keys() {
        let store = Arc::new(MemoryPreferences::new("flags"));
        let preference = flag(Arc::clone(&store));
        let mut stream = spawn(preference.observe());
        assert!(matches!(assert_ready!(stream.poll_next()), Some(Ok(false))));
        assert_pending!(stream.poll_next());

        store.edit().put_int("unrelated", 1).commit().unwrap();
        assert!(!stream.is_woken());
        assert_pending!(stream.poll_next());

        preference.set(true).unwrap();
        preference.set(false).unwrap();
        preference.set(true).unwrap();
        assert!(stream.is_woken());
        assert!(matches!(assert_ready!(stream.poll_next()), Some(Ok(true))));
        assert_pending!(stream.poll_next());
    }

    #[test]
    fn drop_unregisters_listener() {
        let store = Arc::new(MemoryPreferences::new("flags"));
        let preference = flag(Arc::clone(&store));
        for _ in 0..3 {
            let mut stream = spawn(preference.observe());
            let _ = stream.poll_next();
            assert_eq!(store.listener_count(), 1);
        }
        assert_eq!(store.listener_count(), 0);
    }
}
