//! Daemon core - the poll loop, its tick bookkeeping, and the shutdown listener
//!
//! The daemon is the long-running part of slotwatch that:
//! - Probes the target on a fixed cadence
//! - Plays the notification whenever the outcome matches
//! - Stops cleanly when an OS signal raises the shutdown signal

pub mod poll;
pub mod shutdown;
pub mod tick;

pub use poll::{LoopExit, PollLoop};
pub use shutdown::spawn_signal_listener;
pub use tick::*;
