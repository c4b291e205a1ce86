//! Scripted prober for tests
//!
//! Returns queued outcomes in order, each after an optional delay, then falls
//! back to a fixed outcome once the script runs out.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ProbeError, ProbeOutcome, ShutdownSignal};
use crate::probe::Prober;

/// One scripted probe response
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    pub outcome: ProbeOutcome,
    pub delay: Duration,
}

impl ScriptedProbe {
    pub fn status(code: u16) -> Self {
        Self {
            outcome: ProbeOutcome::Status(code),
            delay: Duration::ZERO,
        }
    }

    pub fn error(err: ProbeError) -> Self {
        Self {
            outcome: ProbeOutcome::TransportError(err),
            delay: Duration::ZERO,
        }
    }

    /// Delay the response, simulating a slow endpoint
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct MockProber {
    url: String,
    script: Mutex<VecDeque<ScriptedProbe>>,
    fallback: ProbeOutcome,
    started: AtomicU64,
    finished: AtomicU64,
}

impl MockProber {
    pub fn new(script: Vec<ScriptedProbe>) -> Self {
        Self {
            url: "mock://target".to_string(),
            script: Mutex::new(script.into()),
            fallback: ProbeOutcome::Status(200),
            started: AtomicU64::new(0),
            finished: AtomicU64::new(0),
        }
    }

    /// URL reported by `target()`
    pub fn with_target(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Outcome returned once the script is exhausted
    pub fn with_fallback(mut self, outcome: ProbeOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Number of probes that began
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of probes that ran to completion
    pub fn finished(&self) -> u64 {
        self.finished.load(Ordering::SeqCst)
    }

    fn next(&self) -> ScriptedProbe {
        let mut script = self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        script.pop_front().unwrap_or_else(|| ScriptedProbe {
            outcome: self.fallback.clone(),
            delay: Duration::ZERO,
        })
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, shutdown: &ShutdownSignal) -> ProbeOutcome {
        if shutdown.is_raised() {
            return ProbeError::Cancelled.into();
        }

        self.started.fetch_add(1, Ordering::SeqCst);
        let step = self.next();
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        step.outcome
    }

    fn target(&self) -> &str {
        &self.url
    }
}
