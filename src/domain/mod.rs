//! Domain types for slotwatch
//!
//! - ProbeOutcome: what one probe of the target produced (status or transport error)
//! - ShutdownSignal: the set-once, process-wide cancellation source

pub mod outcome;
pub mod signal;

pub use outcome::{ProbeError, ProbeOutcome};
pub use signal::{ShutdownReason, ShutdownSignal};
