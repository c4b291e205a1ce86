//! Slotwatch - poll an HTTP endpoint and sound an alarm on the status you want
//!
//! Slotwatch probes a single URL on a fixed interval. When the response status
//! equals the configured success status it plays a preloaded sound, and it keeps
//! going until an interrupt or termination request stops it.

pub mod daemon;
pub mod domain;
pub mod error;
pub mod notify;
pub mod policy;
pub mod probe;

pub use error::{Result, WatchError};
