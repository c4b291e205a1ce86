//! Tick bookkeeping - configuration, attempt counting, and per-tick reports
//!
//! Every tick:
//! - Increments the attempt counter
//! - Probes the target once
//! - Classifies the outcome and, on a match, starts the notification

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Url;

use crate::domain::ProbeOutcome;
use crate::error::{Result, WatchError};
use crate::policy::Verdict;

/// Default interval between ticks
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default status that counts as success
pub const DEFAULT_SUCCESS_STATUS: u16 = 404;

/// Whether the loop waits for the notification to finish before the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Start playback and move on; playback may overlap later probes
    #[default]
    FireAndForget,
    /// Pause ticking until playback ends (still interruptible by shutdown)
    AwaitCompletion,
}

/// Immutable loop configuration, built once at startup
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// URL probed on every tick
    pub target_url: String,
    /// Period between ticks, counted from loop start
    pub interval: Duration,
    /// Status code that counts as a match
    pub success_status: u16,
    pub notify_mode: NotifyMode,
}

impl PollConfig {
    /// Create a validated poll config
    pub fn new(target_url: impl Into<String>, interval: Duration, success_status: u16) -> Result<Self> {
        let target_url = target_url.into();

        let parsed = Url::parse(&target_url)
            .map_err(|e| WatchError::InvalidConfig(format!("target url {:?}: {}", target_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WatchError::InvalidConfig(format!(
                "target url must be http or https, got {:?}",
                parsed.scheme()
            )));
        }
        if interval.is_zero() {
            return Err(WatchError::InvalidConfig("interval must be greater than zero".to_string()));
        }
        if std::time::Instant::now().checked_add(interval).is_none() {
            return Err(WatchError::InvalidConfig(format!("interval {:?} is too large", interval)));
        }
        if !(100..=999).contains(&success_status) {
            return Err(WatchError::InvalidConfig(format!(
                "success status {} is not an HTTP status code",
                success_status
            )));
        }

        Ok(Self {
            target_url,
            interval,
            success_status,
            notify_mode: NotifyMode::default(),
        })
    }

    /// Set the notify mode
    pub fn with_notify_mode(mut self, notify_mode: NotifyMode) -> Self {
        self.notify_mode = notify_mode;
        self
    }
}

/// Monotonic attempt counter. Written only by the loop; clones may read it.
#[derive(Debug, Clone, Default)]
pub struct AttemptCounter {
    count: Arc<AtomicU64>,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new attempt and return its number (first attempt is 1)
    pub fn next(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of attempts made so far
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub attempt: u64,
    pub outcome: ProbeOutcome,
    pub verdict: Verdict,
    /// Notification was started for this tick
    pub notified: bool,
}

impl TickReport {
    pub fn matched(&self) -> bool {
        self.verdict == Verdict::Matched
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ProbeOutcome::Status(code) => write!(f, "attempt={} status={}", self.attempt, code)?,
            ProbeOutcome::TransportError(err) => write!(f, "attempt={} error=\"{}\"", self.attempt, err)?,
        }
        write!(f, " matched={} notified={}", self.matched(), self.notified)
    }
}
