//! Request dispatch: decode a request document, run the download, encode the
//! result document.
//!
//! GET with a non-empty `output` forwards the body to the TCP sink on a
//! background task; the task's completion is awaited inside the consumer, so
//! the download is never reported complete before forwarding has finished and
//! a forwarding failure surfaces before any success document is written.

use std::sync::{Arc, Mutex};

use reqwest::header::HeaderMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::{ConsumerFailure, FetchEngine, TerminalResponse};
use crate::protocol::{
    ErrorDocument, GetRequest, HeadDocument, HeadRequest, SuccessDocument, ValidationError,
};
use crate::sink::TcpSink;

/// Errors surfaced by request handling, in the order they can occur:
/// decode, validation, fetch.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request document could not be decoded (or a result encoded).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The `method` field names something other than GET or HEAD.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// A request field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The download itself failed.
    #[error(transparent)]
    Fetch(#[from] crate::fetch::FetchError),
}

impl ServiceError {
    /// Renders this error as the wire error document.
    #[must_use]
    pub fn to_document(&self) -> ErrorDocument {
        ErrorDocument::new(self)
    }
}

#[derive(Debug, Deserialize)]
struct MethodEnvelope {
    #[serde(default = "default_method")]
    method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Serves one request document, returning the encoded success document.
///
/// # Errors
///
/// Returns [`ServiceError`] on decode, validation, or fetch failure; the
/// caller renders it as the error document.
pub async fn serve(raw: &str) -> Result<String, ServiceError> {
    let envelope: MethodEnvelope = serde_json::from_str(raw)?;

    match envelope.method.as_str() {
        "GET" => handle_get(raw).await,
        "HEAD" => handle_head(raw).await,
        other => Err(ServiceError::UnsupportedMethod(other.to_string())),
    }
}

async fn handle_get(raw: &str) -> Result<String, ServiceError> {
    let request: GetRequest = serde_json::from_str(raw)?;
    request.validate()?;

    info!(url = %request.request.url, output = %request.output, "handling GET request");

    let engine = FetchEngine::new(request.request.to_options());
    let output = request.output.clone();

    let outcome = engine
        .download(move |terminal| consume_get(terminal, output))
        .await?;

    Ok(serde_json::to_string(&SuccessDocument::from_outcome(
        &outcome,
    ))?)
}

async fn handle_head(raw: &str) -> Result<String, ServiceError> {
    let request: HeadRequest = serde_json::from_str(raw)?;
    request.validate()?;

    info!(url = %request.request.url, "handling HEAD request");

    let engine = FetchEngine::new(request.request.to_options());

    let captured: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let capture = Arc::clone(&captured);

    let outcome = engine
        .download(move |terminal| async move {
            let lines = format_headers(terminal.response.headers());
            if let Ok(mut guard) = capture.lock() {
                *guard = lines;
            }
            Ok(())
        })
        .await?;

    let headers = captured.lock().map(|guard| guard.clone()).unwrap_or_default();

    Ok(serde_json::to_string(&HeadDocument::from_outcome(
        &outcome, headers,
    ))?)
}

/// GET consumer: stream the body to the sink when an output is configured,
/// otherwise just release it.
async fn consume_get(terminal: TerminalResponse, output: String) -> Result<(), ConsumerFailure> {
    if output.is_empty() {
        // No sink: dropping the response closes the body without reading it.
        drop(terminal);
        return Ok(());
    }

    let sink = TcpSink::connect(&output)
        .await
        .map_err(ConsumerFailure::from)?;

    // Forward on a background task, then await it: the request is not
    // complete until the last body byte has reached the sink.
    let forwarding = tokio::spawn(forward_body(sink, terminal));

    match forwarding.await {
        Ok(Ok(bytes)) => {
            debug!(bytes, output = %output, "forwarding task finished");
            Ok(())
        }
        Ok(Err(sink_error)) => Err(sink_error.into()),
        Err(join_error) => Err(join_error.into()),
    }
}

/// Streams the body and closes the sink exactly once, on every path.
async fn forward_body(
    mut sink: TcpSink,
    terminal: TerminalResponse,
) -> Result<u64, crate::sink::SinkError> {
    let streamed = sink.stream_body(terminal.response).await;
    let closed = sink.shutdown().await;

    let bytes = streamed?;
    closed?;
    Ok(bytes)
}

/// Formats response headers as `"Name: value, value"` lines, one per header
/// name, multi-valued headers joined with `", "`.
fn format_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .keys()
        .map(|name| {
            let values: Vec<&str> = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect();
            format!("{name}: {}", values.join(", "))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn test_format_headers_joins_multi_values() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        headers.append(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_static("a"),
        );
        headers.append(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_static("b"),
        );

        let lines = format_headers(&headers);
        assert!(lines.contains(&"content-type: text/plain".to_string()));
        assert!(lines.contains(&"x-tag: a, b".to_string()));
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_serve_rejects_unsupported_method() {
        let result = serve(r#"{"method": "POST", "url": "https://example.com/"}"#).await;
        assert!(matches!(
            result,
            Err(ServiceError::UnsupportedMethod(method)) if method == "POST"
        ));
    }

    #[tokio::test]
    async fn test_serve_rejects_malformed_json() {
        let result = serve("{not json").await;
        assert!(matches!(result, Err(ServiceError::Json(_))));
    }

    #[tokio::test]
    async fn test_serve_rejects_missing_url_before_network() {
        let result = serve("{}").await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::Url))
        ));
    }

    #[test]
    fn test_error_document_rendering() {
        let error = ServiceError::UnsupportedMethod("PUT".to_string());
        let document = serde_json::to_value(error.to_document()).unwrap();
        assert_eq!(
            document,
            serde_json::json!({
                "success": false,
                "error-message": "unsupported method: PUT",
            })
        );
    }
}
