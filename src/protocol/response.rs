//! Result documents written to standard output.
//!
//! Exactly one document is produced per invocation: a success document on a
//! completed fetch, or the error document on any failure. Never a mixture.

use serde::Serialize;

use crate::fetch::FetchOutcome;

/// A content length of 0 is omitted, like an absent one.
#[allow(clippy::ref_option)]
fn content_length_omitted(value: &Option<u64>) -> bool {
    matches!(value, None | Some(0))
}

/// Success document for a GET request.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessDocument {
    /// Always `true`.
    pub success: bool,
    /// Terminal response status code.
    #[serde(rename = "http-code")]
    pub http_code: u16,
    /// Content-Length when the server reported one.
    #[serde(rename = "content-length", skip_serializing_if = "content_length_omitted")]
    pub content_length: Option<u64>,
    /// Content-Type of the terminal response.
    #[serde(rename = "content-type", skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    /// Followed redirect URLs in visit order; omitted when none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<String>,
}

impl SuccessDocument {
    /// Projects a download outcome into the GET success document.
    #[must_use]
    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        Self {
            success: true,
            http_code: outcome.status,
            content_length: outcome.content_length,
            content_type: outcome.content_type.clone(),
            redirects: outcome.redirects.clone(),
        }
    }
}

/// Success document for a HEAD request: no content type, full header dump.
#[derive(Debug, Clone, Serialize)]
pub struct HeadDocument {
    /// Always `true`.
    pub success: bool,
    /// Terminal response status code.
    #[serde(rename = "http-code")]
    pub http_code: u16,
    /// Content-Length when the server reported one.
    #[serde(rename = "content-length", skip_serializing_if = "content_length_omitted")]
    pub content_length: Option<u64>,
    /// Followed redirect URLs in visit order; omitted when none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<String>,
    /// Terminal response headers as `"Name: value, value"` lines.
    pub headers: Vec<String>,
}

impl HeadDocument {
    /// Projects a download outcome plus captured headers into the HEAD
    /// success document.
    #[must_use]
    pub fn from_outcome(outcome: &FetchOutcome, headers: Vec<String>) -> Self {
        Self {
            success: true,
            http_code: outcome.status,
            content_length: outcome.content_length,
            redirects: outcome.redirects.clone(),
            headers,
        }
    }
}

/// Error document written on any failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDocument {
    /// Always `false`.
    pub success: bool,
    /// Human-readable failure description.
    #[serde(rename = "error-message")]
    pub error_message: String,
}

impl ErrorDocument {
    /// Creates an error document from any displayable error.
    pub fn new(message: impl ToString) -> Self {
        Self {
            success: false,
            error_message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> FetchOutcome {
        FetchOutcome {
            status: 200,
            content_length: Some(1024),
            content_type: "application/pdf".to_string(),
            redirects: vec!["https://example.com/real".to_string()],
        }
    }

    #[test]
    fn test_success_document_shape() {
        let encoded =
            serde_json::to_value(SuccessDocument::from_outcome(&outcome())).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "success": true,
                "http-code": 200,
                "content-length": 1024,
                "content-type": "application/pdf",
                "redirects": ["https://example.com/real"],
            })
        );
    }

    #[test]
    fn test_success_document_omits_empty_fields() {
        let bare = FetchOutcome {
            status: 204,
            content_length: None,
            content_type: String::new(),
            redirects: Vec::new(),
        };
        let encoded = serde_json::to_value(SuccessDocument::from_outcome(&bare)).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"success": true, "http-code": 204})
        );
    }

    #[test]
    fn test_zero_content_length_omitted_like_absent() {
        let zero = FetchOutcome {
            status: 200,
            content_length: Some(0),
            content_type: String::new(),
            redirects: Vec::new(),
        };

        let get = serde_json::to_value(SuccessDocument::from_outcome(&zero)).unwrap();
        assert!(get.get("content-length").is_none());

        let head = serde_json::to_value(HeadDocument::from_outcome(&zero, Vec::new())).unwrap();
        assert!(head.get("content-length").is_none());
    }

    #[test]
    fn test_head_document_has_headers_and_no_content_type() {
        let encoded = serde_json::to_value(HeadDocument::from_outcome(
            &outcome(),
            vec!["Content-Type: application/pdf".to_string()],
        ))
        .unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "success": true,
                "http-code": 200,
                "content-length": 1024,
                "redirects": ["https://example.com/real"],
                "headers": ["Content-Type: application/pdf"],
            })
        );
    }

    #[test]
    fn test_error_document_shape() {
        let encoded =
            serde_json::to_value(ErrorDocument::new("download error: cyclic requests")).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "success": false,
                "error-message": "download error: cyclic requests",
            })
        );
    }
}
