//! HTTP prober built on reqwest
//!
//! One `reqwest::Client` is built at startup and shared by every probe, so
//! connections may be reused between ticks. Each probe is a bare GET with no
//! body; only the status line matters.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::{ProbeError, ProbeOutcome, ShutdownSignal};
use crate::error::{Result, WatchError};
use crate::probe::Prober;

/// User agent sent with every probe
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Probes a single URL with HTTP GET
pub struct HttpProber {
    client: Client,
    url: String,
}

impl HttpProber {
    /// Create a prober with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WatchError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, url))
    }

    /// Create a prober around an existing client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, shutdown: &ShutdownSignal) -> ProbeOutcome {
        if shutdown.is_raised() {
            return ProbeError::Cancelled.into();
        }

        tokio::select! {
            biased;
            _ = shutdown.raised() => ProbeError::Cancelled.into(),
            result = self.client.get(&self.url).send() => match result {
                Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
                Err(e) => classify(&e).into(),
            },
        }
    }

    fn target(&self) -> &str {
        &self.url
    }
}

/// Map a reqwest failure onto the probe error taxonomy
fn classify(err: &reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_connect() {
        ProbeError::Connect(err.to_string())
    } else {
        ProbeError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShutdownReason;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned response on an ephemeral port
    async fn serve_once(status_line: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}/appointment.do", addr)
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("slotwatch/"));
    }

    #[test]
    fn test_target() {
        let prober = HttpProber::new("http://127.0.0.1:1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(prober.target(), "http://127.0.0.1:1/");
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let url = serve_once("404 Not Found", Duration::ZERO).await;
        let prober = HttpProber::new(url, Duration::from_secs(5)).unwrap();

        let outcome = prober.probe(&ShutdownSignal::new()).await;
        assert_eq!(outcome, ProbeOutcome::Status(404));
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let prober = HttpProber::new(format!("http://{}/", addr), Duration::from_secs(5)).unwrap();

        let outcome = prober.probe(&ShutdownSignal::new()).await;
        assert!(matches!(outcome, ProbeOutcome::TransportError(ProbeError::Connect(_))));
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let url = serve_once("200 OK", Duration::from_secs(2)).await;
        let prober = HttpProber::new(url, Duration::from_millis(100)).unwrap();

        let outcome = prober.probe(&ShutdownSignal::new()).await;
        assert_eq!(outcome, ProbeOutcome::TransportError(ProbeError::Timeout));
    }

    #[tokio::test]
    async fn test_probe_fails_fast_when_cancelled() {
        let shutdown = ShutdownSignal::new();
        shutdown.raise(ShutdownReason::Requested);
        let prober = HttpProber::new("http://127.0.0.1:1/", DEFAULT_TIMEOUT).unwrap();

        let outcome = prober.probe(&shutdown).await;
        assert_eq!(outcome, ProbeOutcome::TransportError(ProbeError::Cancelled));
    }

    #[tokio::test]
    async fn test_probe_abandoned_on_cancel() {
        let url = serve_once("200 OK", Duration::from_secs(5)).await;
        let prober = HttpProber::new(url, Duration::from_secs(10)).unwrap();
        let shutdown = ShutdownSignal::new();

        let raiser = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            raiser.raise(ShutdownReason::Interrupt);
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), prober.probe(&shutdown))
            .await
            .unwrap();
        assert_eq!(outcome, ProbeOutcome::TransportError(ProbeError::Cancelled));
    }
}
