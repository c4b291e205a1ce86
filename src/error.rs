//! Error types for slotwatch
//!
//! Centralized error handling using thiserror. Only startup-time failures are
//! represented here; a failed probe is a value (`ProbeError`), not an error.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur while setting up or driving a watch
#[derive(Debug, Error)]
pub enum WatchError {
    /// Audio asset is missing or could not be decoded
    #[error("Failed to load audio from {path}: {reason}")]
    AudioLoad { path: PathBuf, reason: String },

    /// No usable audio output device
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// The playback thread has exited and can no longer take requests
    #[error("Audio player is no longer running")]
    PlayerGone,

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Configuration value rejected at startup
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for slotwatch operations
pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_load_error() {
        let err = WatchError::AudioLoad {
            path: PathBuf::from("alarm.mp3"),
            reason: "file not found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to load audio from alarm.mp3: file not found");
    }

    #[test]
    fn test_audio_device_error() {
        let err = WatchError::AudioDevice("no default output".to_string());
        assert_eq!(err.to_string(), "Audio device error: no default output");
    }

    #[test]
    fn test_player_gone_error() {
        assert_eq!(WatchError::PlayerGone.to_string(), "Audio player is no longer running");
    }

    #[test]
    fn test_invalid_config_error() {
        let err = WatchError::InvalidConfig("interval must be greater than zero".to_string());
        assert_eq!(err.to_string(), "Invalid config: interval must be greater than zero");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WatchError = io_err.into();
        assert!(matches!(err, WatchError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}
