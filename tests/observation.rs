//! Streams, hot flows and sinks of generated fields.

use std::time::Duration;

use arctic_tern::prelude::*;
use futures::{FutureExt, SinkExt, StreamExt};
use tokio::runtime::Handle;

#[arctic_tern_module]
mod player {
    #[arctic_tern(preference_file = "player")]
    pub struct Player {
        #[property(with_flow)]
        pub volume: i32,
        #[property(with_flow, with_delete)]
        pub track: Option<String>,
        #[property]
        pub muted: bool,
    }

    impl Default for Player {
        fn default() -> Self {
            Self {
                volume: 5,
                track: None,
                muted: false,
            }
        }
    }
}

use player::ArcticTernPlayer;

#[tokio::test]
async fn flow_starts_with_the_current_value() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let mut volume = player.volume_flow();

    assert_eq!(volume.next().await.unwrap().unwrap(), 5);
    player.set_volume(8).unwrap();
    assert_eq!(volume.next().await.unwrap().unwrap(), 8);
}

#[tokio::test]
async fn pending_changes_collapse_into_one_read() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let mut volume = player.volume_flow();
    volume.next().await.unwrap().unwrap();

    player.set_volume(1).unwrap();
    player.set_volume(2).unwrap();
    player.set_volume(3).unwrap();

    assert_eq!(volume.next().await.unwrap().unwrap(), 3);
    assert!(volume.next().now_or_never().is_none());
}

#[tokio::test]
async fn other_fields_do_not_wake_the_flow() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let mut volume = player.volume_flow();
    volume.next().await.unwrap().unwrap();

    player.set_muted(true).unwrap();
    assert!(volume.next().now_or_never().is_none());
}

#[tokio::test]
async fn deletion_is_observed_as_the_default() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    player.set_track(Some("intro".to_string())).unwrap();

    let mut track = player.track_flow();
    assert_eq!(track.next().await.unwrap().unwrap().as_deref(), Some("intro"));
    player.delete_track().unwrap();
    assert_eq!(track.next().await.unwrap().unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn state_flow_tracks_the_latest_value() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let mut flow = player.volume_as_state_flow(&Handle::current()).unwrap();
    assert_eq!(flow.value(), 5);

    player.set_volume(9).unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while flow.changed().await != Some(9) {}
    })
    .await
    .expect("state flow never saw the write");
    assert_eq!(flow.value(), 9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shared_flow_reaches_every_subscriber() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let flow = player.volume_as_shared_flow(&Handle::current(), 16);
    let mut first = flow.subscribe();
    let mut second = flow.subscribe();
    assert_eq!(flow.subscriber_count(), 2);

    player.set_volume(4).unwrap();
    for receiver in [&mut first, &mut second] {
        tokio::time::timeout(Duration::from_secs(5), async move {
            while receiver.recv().await.unwrap() != 4 {}
        })
        .await
        .expect("subscriber never saw the write");
    }
}

#[tokio::test]
async fn sink_writes_every_item() {
    let context = Context::in_memory();
    let player = ArcticTernPlayer::new(&context).unwrap();
    let mut sink = player.volume_as_sink();

    sink.send(11).await.unwrap();
    assert_eq!(player.volume().unwrap(), 11);
    sink.send_all(&mut futures::stream::iter([Ok(12), Ok(13)])).await.unwrap();
    assert_eq!(player.volume().unwrap(), 13);
}
