use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;

use slotwatch::daemon::{LoopExit, PollLoop, spawn_signal_listener};
use slotwatch::domain::ShutdownSignal;
use slotwatch::notify::{AudioClip, AudioPlayer};
use slotwatch::probe::HttpProber;

mod cli;
mod config;

use cli::Cli;
use config::Config;

fn setup_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(config.log_level.as_deref().unwrap_or("info"));

    // RUST_LOG wins over the configured level
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Some(log_file) = &config.log_file {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();

    if let Some(log_file) = &config.log_file {
        info!("Logging initialized, writing to: {}", log_file.display());
    }
    Ok(())
}

async fn run_application(config: &Config) -> Result<LoopExit> {
    let poll_config = config.poll_config().context("Invalid configuration")?;
    let timeout = config.request_timeout().context("Invalid configuration")?;

    // Audio first: without a way to notify there is no point in polling.
    let clip = AudioClip::load_once(&config.sound.path).context("Failed to load notification sound")?;
    let player = AudioPlayer::start(clip)
        .await
        .context("Failed to open audio output")?;

    let prober = HttpProber::new(poll_config.target_url.clone(), timeout).context("Failed to set up HTTP prober")?;

    let shutdown = ShutdownSignal::new();
    let _listener = spawn_signal_listener(shutdown.clone()).context("Failed to install signal handlers")?;

    println!(
        "{} {} every {:?}, alarm on status {} (Ctrl-C to stop)",
        "Watching".green().bold(),
        poll_config.target_url.cyan(),
        poll_config.interval,
        poll_config.success_status.to_string().yellow()
    );

    let poll = PollLoop::new(poll_config, prober, player, shutdown);
    Ok(poll.run().await)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then let flags override it
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .apply_cli(&cli);

    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    let exit = run_application(&config).await.context("Application failed")?;

    info!(
        "Stopped: reason={} attempts={} matches={}",
        exit.reason, exit.attempts, exit.matches
    );
    println!(
        "{} after {} attempts ({} matched), reason: {}",
        "Stopped".yellow().bold(),
        exit.attempts,
        exit.matches,
        exit.reason
    );

    Ok(())
}
