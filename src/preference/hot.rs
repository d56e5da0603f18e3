//! Hot adapters built on top of [`PreferenceStream`](super::PreferenceStream).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Sink, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::Preference;
use crate::error::{PreferenceError, PreferenceResult};

/// Holds the latest observed value. Collection starts immediately and stops
/// when the flow is dropped.
pub struct StateFlow<T> {
    receiver: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> StateFlow<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) fn launch(preference: &Preference<T>, handle: &Handle) -> PreferenceResult<Self> {
        let (sender, receiver) = watch::channel(preference.value()?);
        let mut stream = preference.observe();
        let key = preference.key().to_string();
        let task = handle.spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(value) => {
                        if sender.send(value).is_err() {
                            break;
                        }
                    }
                    Err(error) => log::warn!("state flow for '{}' failed to read: {}", key, error),
                }
            }
        });
        Ok(Self { receiver, task })
    }

    pub fn value(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Waits for the next published value. `None` once collection stopped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.receiver.clone()
    }
}

impl<T> Drop for StateFlow<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Multicasts every observed value to all current subscribers.
pub struct SharedFlow<T> {
    sender: broadcast::Sender<T>,
    task: JoinHandle<()>,
}

impl<T> SharedFlow<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) fn launch(preference: &Preference<T>, handle: &Handle, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let forward = sender.clone();
        let mut stream = preference.observe();
        let key = preference.key().to_string();
        let task = handle.spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    // No subscribers yet is not an error.
                    Ok(value) => {
                        let _ = forward.send(value);
                    }
                    Err(error) => log::warn!("shared flow for '{}' failed to read: {}", key, error),
                }
            }
        });
        Self { sender, task }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Drop for SharedFlow<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Writes every item sent into it to the preference.
pub struct PreferenceSink<T> {
    preference: Preference<T>,
}

impl<T> Unpin for PreferenceSink<T> {}

impl<T> PreferenceSink<T> {
    pub(super) fn new(preference: Preference<T>) -> Self {
        Self { preference }
    }
}

impl<T> Sink<T> for PreferenceSink<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Error = PreferenceError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: T) -> Result<(), Self::Error> {
        self.preference.set(item)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::SinkExt;

    use super::*;
    use crate::store::{MemoryPreferences, SharedPreferences, SharedPreferencesExt};

    fn volume(store: Arc<dyn SharedPreferences>) -> Preference<i32> {
        Preference::new(
            "key_volume",
            5,
            |prefs, key, default| prefs.get_int(key, *default),
            |prefs, key, value| prefs.edit().put_int(key, value).commit(),
            store,
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn state_flow_follows_writes() {
        let preference = volume(Arc::new(MemoryPreferences::new("audio")));
        let mut flow = preference.as_state_flow(&Handle::current()).unwrap();
        assert_eq!(flow.value(), 5);

        preference.set(9).unwrap();
        let observed = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if flow.changed().await == Some(9) {
                    break;
                }
            }
        })
        .await;
        assert!(observed.is_ok());
        assert_eq!(flow.value(), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shared_flow_broadcasts_to_subscribers() {
        let preference = volume(Arc::new(MemoryPreferences::new("audio")));
        let flow = preference.as_shared_flow(&Handle::current(), 8);
        let mut first = flow.subscribe();
        let mut second = flow.subscribe();
        assert_eq!(flow.subscriber_count(), 2);

        preference.set(1).unwrap();
        for receiver in [&mut first, &mut second] {
            let seen = tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    match receiver.recv().await {
                        Ok(1) => break true,
                        Ok(_) => continue,
                        Err(_) => break false,
                    }
                }
            })
            .await;
            assert_eq!(seen.ok(), Some(true));
        }
    }

    #[tokio::test]
    async fn sink_writes_each_item() {
        let preference = volume(Arc::new(MemoryPreferences::new("audio")));
        let mut sink = preference.as_sink();
        sink.send(2).await.unwrap();
        sink.send(3).await.unwrap();
        assert_eq!(preference.value().unwrap(), 3);
    }
}
