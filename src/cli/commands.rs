//! CLI definition using clap.
//!
//! Every flag overrides the matching field of the config file.

use clap::Parser;
use std::path::PathBuf;

/// Slotwatch - play a sound the moment a URL answers with the status you are waiting for
#[derive(Parser, Debug)]
#[command(name = "slotwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// URL to probe
    #[arg(short, long)]
    pub url: Option<String>,

    /// HTTP status that counts as success
    #[arg(short, long)]
    pub status: Option<u16>,

    /// Milliseconds between probes
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Audio file played on a match
    #[arg(long)]
    pub sound: Option<PathBuf>,

    /// Pause probing until the sound has finished playing
    #[arg(short, long)]
    pub wait_for_playback: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
