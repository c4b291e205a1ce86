//! CLI module for slotwatch - command-line flags layered over the config file.

pub mod commands;

pub use commands::Cli;
