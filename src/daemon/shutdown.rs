//! OS signal listener
//!
//! Translates SIGINT / SIGTERM (Ctrl-C on non-Unix) into a raise of the
//! process-wide `ShutdownSignal`. Only the first signal takes effect; later
//! ones are logged and ignored while the loop winds down.

use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::{ShutdownReason, ShutdownSignal};
use crate::error::Result;

/// Install the OS signal handlers and spawn the listener task.
///
/// Handlers are registered before this returns, so a signal delivered right
/// after startup is never lost to the default disposition.
pub fn spawn_signal_listener(shutdown: ShutdownSignal) -> Result<JoinHandle<()>> {
    let mut signals = OsSignals::install()?;

    Ok(tokio::spawn(async move {
        loop {
            let Some(reason) = signals.next().await else {
                break;
            };
            if shutdown.raise(reason) {
                info!(signal = %reason, "Caught signal, shutting down");
            } else {
                info!(signal = %reason, "Shutdown already in progress");
            }
        }
    }))
}

#[cfg(unix)]
struct OsSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl OsSignals {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn next(&mut self) -> Option<ShutdownReason> {
        tokio::select! {
            sig = self.interrupt.recv() => sig.map(|_| ShutdownReason::Interrupt),
            sig = self.terminate.recv() => sig.map(|_| ShutdownReason::Terminate),
        }
    }
}

#[cfg(not(unix))]
struct OsSignals;

#[cfg(not(unix))]
impl OsSignals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> Option<ShutdownReason> {
        tokio::signal::ctrl_c().await.ok().map(|_| ShutdownReason::Interrupt)
    }
}
