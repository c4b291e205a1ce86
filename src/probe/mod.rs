//! Probe layer - one outbound check of the target per call
//!
//! This module provides:
//! - Prober trait for abstracting the transport
//! - HttpProber, the reqwest-backed implementation
//! - MockProber, a scripted implementation for tests and dry runs

pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ProbeOutcome, ShutdownSignal};

pub use http::HttpProber;
pub use mock::{MockProber, ScriptedProbe};

/// Issues a single check of the target endpoint. No retries happen inside a probe.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe once. Fails fast with `ProbeError::Cancelled` if shutdown was already raised.
    async fn probe(&self, shutdown: &ShutdownSignal) -> ProbeOutcome;

    /// The URL being probed, for logging
    fn target(&self) -> &str;
}

#[async_trait]
impl<T: Prober + ?Sized> Prober for Arc<T> {
    async fn probe(&self, shutdown: &ShutdownSignal) -> ProbeOutcome {
        (**self).probe(shutdown).await
    }

    fn target(&self) -> &str {
        (**self).target()
    }
}
