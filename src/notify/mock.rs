//! Counting notifier for tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{Result, WatchError};
use crate::notify::{Notifier, Playback};

/// Records how often it was asked to play; playback "lasts" a configurable time
pub struct MockNotifier {
    plays: AtomicU64,
    completed: Arc<AtomicU64>,
    duration: Duration,
    broken: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            plays: AtomicU64::new(0),
            completed: Arc::new(AtomicU64::new(0)),
            duration: Duration::ZERO,
            broken: AtomicBool::new(false),
        }
    }

    /// Each playback completes after this long (needs a tokio runtime)
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Make every later `play` fail as if the audio thread had died
    pub fn break_player(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn plays(&self) -> u64 {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MockNotifier {
    fn play(&self) -> Result<Playback> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(WatchError::PlayerGone);
        }
        self.plays.fetch_add(1, Ordering::SeqCst);

        if self.duration.is_zero() {
            self.completed.fetch_add(1, Ordering::SeqCst);
            return Ok(Playback::finished());
        }

        let (done, playback) = Playback::pending();
        let duration = self.duration;
        let completed = self.completed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            completed.fetch_add(1, Ordering::SeqCst);
            done.complete();
        });
        Ok(playback)
    }
}
