//! Request documents read from standard input.
//!
//! A request is a single JSON object. The `method` field selects the handler
//! (GET by default); the remaining fields describe the fetch. Field
//! validation happens before any network activity.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::{Host, Url};

use crate::fetch::{FetchMethod, FetchOptions};

use super::duration::WireDuration;

/// Default redirect hop budget.
pub const DEFAULT_MAX_REDIRECTS: i64 = 5;

/// Default overall timeout.
pub const DEFAULT_TIMEOUT: WireDuration = WireDuration(Duration::from_secs(1));

/// A request field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `max-redirects` is out of range.
    #[error("input validation error: max-redirects value should be between 0 and 9223372036854775806")]
    MaxRedirects,
    /// `url` is empty or unparsable.
    #[error("input validation error: invalid url address")]
    Url,
    /// `output` is not a usable `host:port` address.
    #[error("input validation error: invalid output address")]
    Output,
}

/// Fields shared by every request document.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    /// Skip TLS certificate verification.
    #[serde(rename = "ignore-ssl-certificates", default)]
    pub ignore_ssl_certificates: bool,
    /// Follow 301/302 redirects.
    #[serde(rename = "follow-redirects", default)]
    pub follow_redirects: bool,
    /// Redirect hop budget.
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: i64,
    /// HTTP method, `GET` when absent.
    #[serde(default)]
    pub method: FetchMethod,
    /// Resource URL; required, non-empty.
    #[serde(default)]
    pub url: String,
    /// Overall deadline for the whole redirect chain.
    #[serde(default = "default_timeout")]
    pub timeout: WireDuration,
}

fn default_max_redirects() -> i64 {
    DEFAULT_MAX_REDIRECTS
}

fn default_timeout() -> WireDuration {
    DEFAULT_TIMEOUT
}

impl FetchRequest {
    /// Validates the shared fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an out-of-range hop budget or an
    /// empty/unparsable URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_redirects < 0 || self.max_redirects == i64::MAX - 1 {
            return Err(ValidationError::MaxRedirects);
        }

        if self.url.is_empty() || Url::parse(&self.url).is_err() {
            return Err(ValidationError::Url);
        }

        Ok(())
    }

    /// Builds engine options from the validated request.
    #[must_use]
    pub fn to_options(&self) -> FetchOptions {
        FetchOptions {
            url: self.url.clone(),
            method: self.method,
            timeout: self.timeout.as_duration(),
            max_redirects: self.max_redirects,
            follow_redirects: self.follow_redirects,
            insecure_tls: self.ignore_ssl_certificates,
        }
    }
}

/// GET request document: the shared fields plus an optional output sink.
#[derive(Debug, Clone, Deserialize)]
pub struct GetRequest {
    /// Shared request fields.
    #[serde(flatten)]
    pub request: FetchRequest,
    /// `host:port` of a TCP sink for the body; empty means no streaming.
    #[serde(default)]
    pub output: String,
}

impl GetRequest {
    /// Validates shared fields and the output address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when any field fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.request.validate()?;

        if !self.output.is_empty() && !is_valid_host_port(&self.output) {
            return Err(ValidationError::Output);
        }

        Ok(())
    }
}

/// HEAD request document; no output sink, the result carries headers instead.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadRequest {
    /// Shared request fields.
    #[serde(flatten)]
    pub request: FetchRequest,
}

impl HeadRequest {
    /// Validates the shared fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when any field fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.request.validate()
    }
}

/// Accepts `host` or `host:port` where the host is a valid DNS name or IP
/// address and the port, when present, is 1-65535.
fn is_valid_host_port(address: &str) -> bool {
    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (address, None),
    };

    if host.is_empty() || Host::parse(host).is_err() {
        return false;
    }

    match port {
        None => true,
        Some(port) => matches!(port.parse::<u16>(), Ok(value) if value > 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_get(raw: &str) -> GetRequest {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_defaults_applied_when_fields_absent() {
        let request = decode_get(r#"{"url": "https://example.com/file"}"#);
        assert!(!request.request.ignore_ssl_certificates);
        assert!(!request.request.follow_redirects);
        assert_eq!(request.request.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(request.request.method, FetchMethod::Get);
        assert_eq!(request.request.timeout, DEFAULT_TIMEOUT);
        assert!(request.output.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_full_document_decodes() {
        let request = decode_get(
            r#"{
                "ignore-ssl-certificates": true,
                "follow-redirects": true,
                "max-redirects": 2,
                "method": "GET",
                "url": "https://example.com/",
                "output": "127.0.0.1:9000",
                "timeout": "30s"
            }"#,
        );
        assert!(request.request.ignore_ssl_certificates);
        assert!(request.request.follow_redirects);
        assert_eq!(request.request.max_redirects, 2);
        assert_eq!(
            request.request.timeout.as_duration(),
            Duration::from_secs(30)
        );
        assert_eq!(request.output, "127.0.0.1:9000");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_timeout_accepts_nanosecond_number() {
        let request = decode_get(r#"{"url": "https://example.com/", "timeout": 250000000}"#);
        assert_eq!(
            request.request.timeout.as_duration(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_missing_url_fails_validation() {
        let request = decode_get("{}");
        assert_eq!(request.validate(), Err(ValidationError::Url));
    }

    #[test]
    fn test_unparsable_url_fails_validation() {
        let request = decode_get(r#"{"url": "not a url at all"}"#);
        assert_eq!(request.validate(), Err(ValidationError::Url));
    }

    #[test]
    fn test_negative_max_redirects_fails_validation() {
        let request = decode_get(r#"{"url": "https://example.com/", "max-redirects": -1}"#);
        assert_eq!(request.validate(), Err(ValidationError::MaxRedirects));
    }

    #[test]
    fn test_output_address_validation() {
        for good in ["127.0.0.1:9000", "localhost:80", "files.example.com:65535"] {
            assert!(is_valid_host_port(good), "{good}");
        }
        for bad in [":9000", "host:0", "host:66000", "host:port", "???:1"] {
            assert!(!is_valid_host_port(bad), "{bad}");
        }

        let request = decode_get(r#"{"url": "https://example.com/", "output": "host:0"}"#);
        assert_eq!(request.validate(), Err(ValidationError::Output));
    }

    #[test]
    fn test_to_options_carries_every_field() {
        let request = decode_get(
            r#"{
                "url": "https://example.com/a",
                "follow-redirects": true,
                "max-redirects": 7,
                "ignore-ssl-certificates": true,
                "timeout": "2s"
            }"#,
        );
        let options = request.request.to_options();
        assert_eq!(options.url, "https://example.com/a");
        assert!(options.follow_redirects);
        assert_eq!(options.max_redirects, 7);
        assert!(options.insecure_tls);
        assert_eq!(options.timeout, Duration::from_secs(2));
    }
}
