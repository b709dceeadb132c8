//! Network transport for authorization requests.

use std::time::Duration;
use tapgate_core::{CardReading, constants::CONNECT_PROBE_TIMEOUT_MS};
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Errors that can occur while submitting an authorization request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request produced no response at all.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Transport-specific failure outside the HTTP layer.
    #[error("{0}")]
    Other(String),
}

/// Network transport capability for the authorization round trip.
///
/// `is_connected` reflects the connectivity state established before the
/// device loop started; the loop consults it every cycle but never manages
/// reconnection. `submit` performs one POST and hands back the raw response
/// body for any HTTP status; interpreting the body is the client's job.
pub trait AuthorizationTransport: Send + Sync {
    /// Current connectivity state, as established at startup.
    fn is_connected(&self) -> bool;

    /// POST the reading to the authorization endpoint and return the raw
    /// response body, regardless of HTTP status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received at all.
    async fn submit(&self, reading: &CardReading) -> Result<String, TransportError>;
}

/// HTTP implementation of the authorization transport.
///
/// The request carries the reading as a JSON body with
/// `Content-Type: application/json`. No explicit request timeout is set; the
/// round trip is bounded only by whatever the underlying client and OS
/// enforce, matching the terminal's one-shot, no-retry semantics.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    connected: bool,
}

impl HttpTransport {
    /// Create a transport for the given endpoint.
    ///
    /// `connected` is the result of the startup connectivity check; when it
    /// is `false` the client will never call [`submit`](Self::submit).
    pub fn new(endpoint: impl Into<String>, connected: bool) -> Self {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, connected, "creating authorization transport");
        Self {
            client: reqwest::Client::new(),
            endpoint,
            connected,
        }
    }

    /// Probe whether the authorization endpoint is reachable.
    ///
    /// Opens one TCP connection to the endpoint host with a short timeout.
    /// Run once before the device loop starts; the loop only consults the
    /// resulting flag and never re-probes.
    pub async fn probe(endpoint: &str) -> bool {
        let url = match reqwest::Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!(endpoint, error = %e, "authorization endpoint is not a valid url");
                return false;
            }
        };
        let Some(host) = url.host_str() else {
            warn!(endpoint, "authorization endpoint has no host");
            return false;
        };
        let port = url.port_or_known_default().unwrap_or(80);

        let timeout = Duration::from_millis(CONNECT_PROBE_TIMEOUT_MS);
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_)) => {
                info!(host, port, "authorization endpoint reachable");
                true
            }
            Ok(Err(e)) => {
                warn!(host, port, error = %e, "authorization endpoint unreachable");
                false
            }
            Err(_) => {
                warn!(
                    host,
                    port,
                    timeout_ms = CONNECT_PROBE_TIMEOUT_MS,
                    "connectivity probe timed out"
                );
                false
            }
        }
    }
}

impl AuthorizationTransport for HttpTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn submit(&self, reading: &CardReading) -> Result<String, TransportError> {
        debug!(uid = %reading.uid(), "posting reading to authorization endpoint");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(reading)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body = %body, "authorization response received");

        // Any received body is handed to the decision parser, whatever the
        // status code; the deployed service has been seen answering with a
        // decision on non-2xx responses.
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_rejects_invalid_url() {
        assert!(!HttpTransport::probe("not a url").await);
        assert!(!HttpTransport::probe("file:///tmp/x").await);
    }

    #[tokio::test]
    async fn test_probe_times_out_on_unroutable_host() {
        // RFC 5737 TEST-NET-1, guaranteed unroutable
        assert!(!HttpTransport::probe("http://192.0.2.1:9/api").await);
    }

    #[tokio::test]
    async fn test_probe_succeeds_against_local_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let endpoint = format!("http://{addr}/api/aa/insert");
        assert!(HttpTransport::probe(&endpoint).await);
    }

    #[test]
    fn test_transport_reports_connectivity() {
        let online = HttpTransport::new("http://127.0.0.1:6000/api", true);
        assert!(online.is_connected());

        let offline = HttpTransport::new("http://127.0.0.1:6000/api", false);
        assert!(!offline.is_connected());
    }
}
