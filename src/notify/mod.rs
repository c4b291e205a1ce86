//! Notification layer - the audible cue played on a match
//!
//! This module provides:
//! - AudioClip: a fully decoded, replayable clip loaded once at startup
//! - Notifier trait: "start playing, hand back a completion handle"
//! - AudioPlayer: rodio-backed implementation on a dedicated audio thread
//! - MockNotifier: counting implementation for tests

pub mod clip;
pub mod mock;
pub mod player;

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::Result;

pub use clip::{AudioClip, ClipSource};
pub use mock::MockNotifier;
pub use player::AudioPlayer;

/// Starts the notification. Calling `play` again while a previous playback is
/// still running restarts the clip from the beginning.
pub trait Notifier: Send + Sync {
    fn play(&self) -> Result<Playback>;
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn play(&self) -> Result<Playback> {
        (**self).play()
    }
}

/// Completion handle for one `play` call
#[derive(Debug)]
pub struct Playback {
    done: oneshot::Receiver<()>,
}

/// Completer side of a `Playback`. Dropping it counts as completion.
#[derive(Debug)]
pub struct PlaybackDone {
    tx: oneshot::Sender<()>,
}

impl PlaybackDone {
    pub fn complete(self) {
        let _ = self.tx.send(());
    }
}

impl Playback {
    /// A playback that completes when the returned `PlaybackDone` is completed or dropped
    pub fn pending() -> (PlaybackDone, Playback) {
        let (tx, rx) = oneshot::channel();
        (PlaybackDone { tx }, Playback { done: rx })
    }

    /// A playback that has already completed
    pub fn finished() -> Playback {
        let (done, playback) = Self::pending();
        done.complete();
        playback
    }

    /// Wait until playback ends or is superseded by a newer one
    pub async fn wait(self) {
        let _ = self.done.await;
    }
}
