//! Process-wide shutdown signal
//!
//! A `ShutdownSignal` is raised at most once. The first raise records its
//! reason and wakes every waiter; later raises are ignored. Clones share the
//! same state, so the OS signal listener and the poll loop can each hold one.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// What asked the process to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Interactive interrupt (SIGINT / Ctrl-C)
    Interrupt,
    /// Termination request (SIGTERM), the default for containers
    Terminate,
    /// Programmatic request from inside the process
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminate => "terminate",
            ShutdownReason::Requested => "requested",
        };
        write!(f, "{}", s)
    }
}

/// Set-once cancellation source, observed cooperatively
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl ShutdownSignal {
    /// Create a signal that has not been raised
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the signal. Returns true only for the raise that took effect.
    pub fn raise(&self, reason: ShutdownReason) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(reason);
                true
            } else {
                false
            }
        })
    }

    /// Reason of the first raise, if any
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }

    pub fn is_raised(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Wait until the signal is raised. Resolves immediately if it already was.
    pub async fn raised(&self) -> ShutdownReason {
        let mut rx = self.tx.subscribe();
        let reason = rx.wait_for(Option::is_some).await.ok().and_then(|state| *state);
        match reason {
            Some(reason) => reason,
            // The sender lives as long as self, so the wait cannot fail while we are borrowed.
            None => std::future::pending().await,
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
