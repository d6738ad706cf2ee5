//! HTTP transport client and single-request executor.
//!
//! The client here is deliberately dumb about redirects: `reqwest`'s
//! auto-follow is disabled so every 3xx response surfaces to the
//! [`walker`](super::walker) as a normal response, where the cycle and
//! hop-budget policy is applied. TLS peer verification can be skipped per
//! client; the setting never touches any process-wide default.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use super::error::FetchError;

/// HTTP method supported by the fetch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FetchMethod {
    /// Fetch the resource body.
    #[default]
    Get,
    /// Fetch headers only.
    Head,
}

impl FetchMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

/// HTTP client configured for explicit redirect handling.
///
/// Created fresh per download call; no pooling contract is imposed by the
/// engine. Redirect responses are always returned to the caller, and TLS
/// verification is controlled per instance.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Builds a client that never auto-follows redirects.
    ///
    /// When `insecure_tls` is true, TLS certificate verification is skipped
    /// for this client only.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the underlying builder fails.
    pub fn new(insecure_tls: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;

        Ok(Self { client })
    }

    /// Performs exactly one HTTP request against `url`, bounded by `deadline`.
    ///
    /// The deadline is absolute and shared by the whole redirect chain: each
    /// hop is given only the time remaining, and the per-request timeout also
    /// bounds reading the response body.
    ///
    /// The response body is neither consumed nor closed here; that is the
    /// caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for unparsable URLs,
    /// [`FetchError::Timeout`] when the deadline has already expired or
    /// expires mid-request, and [`FetchError::Transport`] for other
    /// network-level failures.
    pub async fn execute(
        &self,
        method: FetchMethod,
        url: &str,
        deadline: Instant,
    ) -> Result<reqwest::Response, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            return Err(FetchError::timeout(url));
        };
        if remaining.is_zero() {
            return Err(FetchError::timeout(url));
        }

        debug!(url = %parsed, ?method, remaining_ms = remaining.as_millis() as u64, "executing request");

        self.client
            .request(method.as_reqwest(), parsed)
            .timeout(remaining)
            .send()
            .await
            .map_err(|source| FetchError::transport(url, source))
    }
}
