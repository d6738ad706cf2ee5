//! Download engine facade.
//!
//! Composes client configuration, deadline derivation, and the redirect
//! walker behind a single call, then hands the terminal response to a
//! caller-supplied consumer exactly once.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::client::{FetchMethod, HttpClient};
use super::error::{ConsumerFailure, FetchError};
use super::walker;

/// Immutable description of one download, created once per invocation.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Starting URL of the chain.
    pub url: String,
    /// HTTP method used for every hop.
    pub method: FetchMethod,
    /// Budget for the *entire* chain, not per hop.
    pub timeout: Duration,
    /// Maximum number of redirects that may be followed.
    pub max_redirects: i64,
    /// Whether 301/302 responses are followed at all.
    pub follow_redirects: bool,
    /// Skip TLS certificate verification for this download only.
    pub insecure_tls: bool,
}

/// The response at which the redirect chain stopped.
///
/// The consumer exclusively owns the body stream until it is dropped.
#[derive(Debug)]
pub struct TerminalResponse {
    /// The raw HTTP response, body unread.
    pub response: reqwest::Response,
    /// URLs of the followed hops, in visit order.
    pub redirects: Vec<String>,
}

/// Terminal projection of a completed download.
///
/// Never partially populated: on any error the engine returns the error
/// alone, never a half-filled outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// HTTP status code of the terminal response.
    pub status: u16,
    /// Content-Length when the server reported one.
    pub content_length: Option<u64>,
    /// Content-Type header value, empty when absent.
    pub content_type: String,
    /// URLs of the followed hops, in visit order.
    pub redirects: Vec<String>,
}

/// One-shot download engine.
///
/// A fresh transport client is configured per call; nothing persists across
/// downloads (no shared cache, no connection reuse contract).
#[derive(Debug, Clone)]
pub struct FetchEngine {
    options: FetchOptions,
}

impl FetchEngine {
    /// Creates an engine for a single download described by `options`.
    #[must_use]
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// Runs the download and invokes `on_response` exactly once with the
    /// terminal response.
    ///
    /// The consumer owns the body stream and must release it on every exit
    /// path; when the walk fails before a terminal response exists, there is
    /// no body to release and the consumer is never invoked.
    ///
    /// # Errors
    ///
    /// Propagates every walker/executor error unchanged and wraps consumer
    /// failures as [`FetchError::Consumer`].
    #[instrument(skip(self, on_response), fields(url = %self.options.url))]
    pub async fn download<C, Fut>(&self, on_response: C) -> Result<FetchOutcome, FetchError>
    where
        C: FnOnce(TerminalResponse) -> Fut,
        Fut: Future<Output = Result<(), ConsumerFailure>>,
    {
        let client = HttpClient::new(self.options.insecure_tls)?;
        let deadline = Instant::now() + self.options.timeout;

        let (response, redirects) = walker::walk(
            &client,
            self.options.method,
            &self.options.url,
            self.options.max_redirects,
            self.options.follow_redirects,
            deadline,
        )
        .await?;

        // Metadata is snapshotted before the consumer takes the body. The
        // content length comes from the header, not the body size hint: a
        // HEAD response carries no body but its header still reports the
        // resource size.
        let outcome = FetchOutcome {
            status: response.status().as_u16(),
            content_length: response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok()),
            content_type: response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            redirects: redirects.clone(),
        };

        debug!(
            status = outcome.status,
            hops = outcome.redirects.len(),
            "handing terminal response to consumer"
        );

        on_response(TerminalResponse {
            response,
            redirects,
        })
        .await
        .map_err(FetchError::consumer)?;

        Ok(outcome)
    }
}
