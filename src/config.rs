use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use slotwatch::WatchError;
use slotwatch::daemon::{DEFAULT_INTERVAL, DEFAULT_SUCCESS_STATUS, NotifyMode, PollConfig};
use slotwatch::probe::http::DEFAULT_TIMEOUT;

use crate::cli::Cli;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub interval_ms: u64,
    pub target: TargetConfig,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub url: Option<String>,
    pub success_status: u16,
    pub timeout_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: None,
            success_status: DEFAULT_SUCCESS_STATUS,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub path: PathBuf,
    pub wait_for_playback: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("notification.mp3"),
            wait_for_playback: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            log_file: None,
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            target: TargetConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Layer command-line flags over the loaded values
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if cli.is_verbose() {
            self.log_level = Some("debug".to_string());
        }
        if let Some(path) = &cli.log_file {
            self.log_file = Some(path.clone());
        }
        if let Some(url) = &cli.url {
            self.target.url = Some(url.clone());
        }
        if let Some(status) = cli.status {
            self.target.success_status = status;
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.target.timeout_ms = timeout_ms;
        }
        if let Some(sound) = &cli.sound {
            self.sound.path = sound.clone();
        }
        if cli.wait_for_playback {
            self.sound.wait_for_playback = true;
        }
        self
    }

    /// Build the validated loop configuration
    pub fn poll_config(&self) -> slotwatch::Result<PollConfig> {
        let url = self
            .target
            .url
            .as_deref()
            .ok_or_else(|| WatchError::InvalidConfig("no target url configured (use --url or target.url)".to_string()))?;

        let notify_mode = if self.sound.wait_for_playback {
            NotifyMode::AwaitCompletion
        } else {
            NotifyMode::FireAndForget
        };

        Ok(PollConfig::new(url, Duration::from_millis(self.interval_ms), self.target.success_status)?
            .with_notify_mode(notify_mode))
    }

    /// Per-request HTTP timeout
    pub fn request_timeout(&self) -> slotwatch::Result<Duration> {
        if self.target.timeout_ms == 0 {
            return Err(WatchError::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        Ok(Duration::from_millis(self.target.timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert!(config.log_file.is_none());
        assert_eq!(config.interval_ms, 5000);
        assert!(config.target.url.is_none());
        assert_eq!(config.target.success_status, 404);
        assert_eq!(config.target.timeout_ms, 10000);
        assert_eq!(config.sound.path, PathBuf::from("notification.mp3"));
        assert!(!config.sound.wait_for_playback);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("slotwatch.yml");
        fs::write(
            &path,
            r#"
interval_ms: 2000
target:
  url: https://example.org/appointment.do
  success_status: 200
sound:
  path: /tmp/alarm.mp3
  wait_for_playback: true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.target.url.as_deref(), Some("https://example.org/appointment.do"));
        assert_eq!(config.target.success_status, 200);
        // Unset fields keep their defaults.
        assert_eq!(config.target.timeout_ms, 10000);
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.sound.path, PathBuf::from("/tmp/alarm.mp3"));
        assert!(config.sound.wait_for_playback);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yml");
        fs::write(&path, "interval_ms: [not, a, number]").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "slotwatch",
            "--url",
            "http://localhost:8080/",
            "--status",
            "204",
            "--interval-ms",
            "750",
            "--timeout-ms",
            "300",
            "--sound",
            "beep.wav",
            "--wait-for-playback",
            "--verbose",
        ])
        .unwrap();

        let config = Config::default().apply_cli(&cli);
        assert_eq!(config.target.url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(config.target.success_status, 204);
        assert_eq!(config.interval_ms, 750);
        assert_eq!(config.target.timeout_ms, 300);
        assert_eq!(config.sound.path, PathBuf::from("beep.wav"));
        assert!(config.sound.wait_for_playback);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_without_flags_keeps_file_values() {
        let cli = Cli::try_parse_from(["slotwatch"]).unwrap();
        let mut config = Config::default();
        config.target.url = Some("http://localhost/".to_string());
        config.sound.wait_for_playback = true;

        let config = config.apply_cli(&cli);
        assert_eq!(config.target.url.as_deref(), Some("http://localhost/"));
        assert!(config.sound.wait_for_playback);
    }

    #[test]
    fn test_poll_config_requires_url() {
        let err = Config::default().poll_config().unwrap_err();
        assert!(err.to_string().contains("no target url"));
    }

    #[test]
    fn test_poll_config_from_values() {
        let mut config = Config::default();
        config.target.url = Some("https://example.org/".to_string());
        config.interval_ms = 1500;
        config.sound.wait_for_playback = true;

        let poll = config.poll_config().unwrap();
        assert_eq!(poll.target_url, "https://example.org/");
        assert_eq!(poll.interval, Duration::from_millis(1500));
        assert_eq!(poll.success_status, 404);
        assert_eq!(poll.notify_mode, NotifyMode::AwaitCompletion);
    }

    #[test]
    fn test_poll_config_rejects_zero_interval() {
        let mut config = Config::default();
        config.target.url = Some("https://example.org/".to_string());
        config.interval_ms = 0;
        assert!(config.poll_config().is_err());
    }

    #[test]
    fn test_request_timeout() {
        let mut config = Config::default();
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(10));
        config.target.timeout_ms = 0;
        assert!(config.request_timeout().is_err());
    }
}
