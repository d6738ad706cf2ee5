//! Error types for the fetch module.
//!
//! One variant per failure class; none of these are retried internally.
//! Every error aborts the whole download and surfaces to the caller as a
//! single terminal error.

use thiserror::Error;

/// Boxed error returned by a response consumer.
pub type ConsumerFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or the request could not be built from it.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The shared deadline expired before the chain completed.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL in flight when the deadline expired.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Transport {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The redirect hop budget was exhausted mid-chain.
    #[error("download error: too many redirects (limit {limit})")]
    TooManyRedirects {
        /// The hop budget supplied by the caller.
        limit: i64,
    },

    /// A redirect chain revisited a previously visited URL.
    #[error("download error: cyclic requests (revisited {url})")]
    RedirectCycle {
        /// The URL that was revisited.
        url: String,
    },

    /// A 301/302 response carried a missing or unresolvable Location header.
    #[error("bad redirect from {url}: {reason}")]
    BadRedirect {
        /// The URL whose response could not be followed.
        url: String,
        /// Why the Location could not be used.
        reason: String,
    },

    /// The response consumer (including any sink write/close) failed.
    #[error("consumer error: {source}")]
    Consumer {
        /// The error returned by the consumer.
        #[source]
        source: ConsumerFailure,
    },
}

impl FetchError {
    /// Creates an invalid-URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a timeout error for the given URL.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a transport error, classifying reqwest timeouts as [`FetchError::Timeout`].
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Transport { url, source }
    }

    /// Creates a bad-redirect error.
    pub fn bad_redirect(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadRedirect {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an error returned by the response consumer.
    pub fn consumer(source: ConsumerFailure) -> Self {
        Self::Consumer { source }
    }
}
