//! Poll loop - probe on a fixed cadence, notify on a match, stop on shutdown
//!
//! The loop waits on two event sources: a ticker and the shutdown signal.
//! Shutdown is checked first whenever both are ready, and it is also raced
//! against the in-flight probe and an awaited notification, so the loop
//! never holds the process open for a stale check.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::daemon::tick::{AttemptCounter, NotifyMode, PollConfig, TickReport};
use crate::domain::{ProbeOutcome, ShutdownReason, ShutdownSignal};
use crate::notify::{Notifier, Playback};
use crate::policy::{SuccessPolicy, Verdict};
use crate::probe::Prober;

/// Why and when the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    pub reason: ShutdownReason,
    /// Attempts made, including an abandoned one
    pub attempts: u64,
    /// Ticks whose outcome matched
    pub matches: u64,
}

/// The scheduler. Owns the cadence and coordinates prober, policy and notifier.
pub struct PollLoop<P, N> {
    config: PollConfig,
    prober: P,
    notifier: N,
    policy: SuccessPolicy,
    shutdown: ShutdownSignal,
    attempts: AttemptCounter,
    reports: Option<mpsc::UnboundedSender<TickReport>>,
}

impl<P: Prober, N: Notifier> PollLoop<P, N> {
    pub fn new(config: PollConfig, prober: P, notifier: N, shutdown: ShutdownSignal) -> Self {
        let policy = SuccessPolicy::new(config.success_status);
        Self {
            config,
            prober,
            notifier,
            policy,
            shutdown,
            attempts: AttemptCounter::new(),
            reports: None,
        }
    }

    /// Send a `TickReport` for every completed tick
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<TickReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Read handle on the attempt counter
    pub fn attempts(&self) -> AttemptCounter {
        self.attempts.clone()
    }

    /// Run until the shutdown signal is raised. There is no other exit.
    pub async fn run(&self) -> LoopExit {
        let interval = self.config.interval;
        let mut ticker = tokio::time::interval_at(first_tick(interval), interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut matches = 0;

        info!(
            url = self.prober.target(),
            interval = ?interval,
            success_status = self.config.success_status,
            notify_mode = ?self.config.notify_mode,
            "Poll loop started"
        );

        loop {
            tokio::select! {
                biased;
                reason = self.shutdown.raised() => return self.exit(reason, matches),
                _ = ticker.tick() => {}
            }

            let attempt = self.attempts.next();

            let outcome = tokio::select! {
                biased;
                reason = self.shutdown.raised() => {
                    info!(attempt, url = self.prober.target(), "Abandoning in-flight probe");
                    return self.exit(reason, matches);
                }
                outcome = self.prober.probe(&self.shutdown) => outcome,
            };

            // A probe that finished after shutdown is stale.
            if let Some(reason) = self.shutdown.reason() {
                return self.exit(reason, matches);
            }

            let verdict = self.policy.evaluate(&outcome);
            let playback = match verdict {
                Verdict::Matched => {
                    matches += 1;
                    self.start_notification(attempt)
                }
                Verdict::Unmatched | Verdict::TransportFailure => None,
            };

            self.record(TickReport {
                attempt,
                outcome,
                verdict,
                notified: playback.is_some(),
            });

            if let (Some(playback), NotifyMode::AwaitCompletion) = (playback, self.config.notify_mode) {
                tokio::select! {
                    biased;
                    reason = self.shutdown.raised() => return self.exit(reason, matches),
                    _ = playback.wait() => {}
                }
            }
        }
    }

    fn start_notification(&self, attempt: u64) -> Option<Playback> {
        match self.notifier.play() {
            Ok(playback) => Some(playback),
            Err(e) => {
                error!(attempt, error = %e, "Failed to play notification");
                None
            }
        }
    }

    fn record(&self, report: TickReport) {
        let url = self.prober.target();
        let interval = self.config.interval;

        match (&report.outcome, report.verdict) {
            (ProbeOutcome::Status(status), Verdict::Matched) => info!(
                attempt = report.attempt,
                status = *status,
                matched = true,
                notified = report.notified,
                interval = ?interval,
                url,
                "Check matched"
            ),
            (ProbeOutcome::Status(status), _) => info!(
                attempt = report.attempt,
                status = *status,
                matched = false,
                notified = false,
                interval = ?interval,
                url,
                "Unmatched status code"
            ),
            (ProbeOutcome::TransportError(err), _) => warn!(
                attempt = report.attempt,
                error = %err,
                matched = false,
                notified = false,
                interval = ?interval,
                url,
                "Probe failed"
            ),
        }

        if let Some(reports) = &self.reports {
            let _ = reports.send(report);
        }
    }

    fn exit(&self, reason: ShutdownReason, matches: u64) -> LoopExit {
        let exit = LoopExit {
            reason,
            attempts: self.attempts.current(),
            matches,
        };
        info!(
            reason = %exit.reason,
            attempts = exit.attempts,
            matches = exit.matches,
            "Graceful shutdown"
        );
        exit
    }
}

/// Deadline of the first tick, one interval after now. An interval too large to
/// represent never fires, which leaves shutdown as the only way out.
fn first_tick(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Roughly thirty years, the same horizon tokio uses for "never"
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);
