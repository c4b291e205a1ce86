//! Probe outcome types.
//!
//! A `ProbeOutcome` is produced fresh by every probe and consumed immediately
//! by the success policy. It carries either an HTTP status or a transport
//! failure, never both.

use std::fmt;

use thiserror::Error;

/// Why a probe did not produce a status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The request did not complete within the client timeout
    #[error("request timed out")]
    Timeout,
    /// DNS resolution or TCP/TLS connection failed
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other failure while sending the request or reading the response head
    #[error("request failed: {0}")]
    Request(String),
    /// Shutdown was requested before the probe could start
    #[error("probe cancelled")]
    Cancelled,
}

/// Result of a single probe against the target endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint answered with this HTTP status code
    Status(u16),
    /// The endpoint could not be reached
    TransportError(ProbeError),
}

impl From<ProbeError> for ProbeOutcome {
    fn from(err: ProbeError) -> Self {
        ProbeOutcome::TransportError(err)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status(code) => write!(f, "{}", code),
            ProbeOutcome::TransportError(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probe_error() {
        let outcome: ProbeOutcome = ProbeError::Cancelled.into();
        assert_eq!(outcome, ProbeOutcome::TransportError(ProbeError::Cancelled));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProbeOutcome::Status(200).to_string(), "200");
        assert_eq!(
            ProbeOutcome::TransportError(ProbeError::Connect("connection refused".into())).to_string(),
            "connection failed: connection refused"
        );
        assert_eq!(ProbeOutcome::TransportError(ProbeError::Timeout).to_string(), "request timed out");
    }
}
