//! Error types for the analyze endpoint.
//!
//! Every failure inside the relay is an [`AnalyzeError`]. The HTTP status and the
//! JSON envelope are decided only here, at the actix boundary.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Failures of `POST /api/analyze`.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Neither a file field nor a non-empty base64 field was sent.
    #[error("No video uploaded")]
    NoUpload,
    /// The `base64` field is not valid base64.
    #[error("Invalid base64 payload")]
    InvalidBase64(#[from] base64::DecodeError),
    /// The body could not be parsed as multipart, JSON, or form data.
    #[error("Malformed request body")]
    MalformedBody(String),
    /// The body exceeded the configured in-memory ceiling.
    #[error("Upload too large")]
    PayloadTooLarge { limit: usize },
    /// Forwarding mode without an API key.
    #[error("Missing GEMINI_API_KEY")]
    MissingApiKey,
    /// Transport failure or timeout talking to the inference API.
    #[error("Server Error")]
    Upstream(#[from] reqwest::Error),
    /// The inference API answered with something that is not JSON.
    #[error("Server Error")]
    InvalidUpstreamBody(#[source] serde_json::Error),
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AnalyzeError {
    /// Diagnostic text echoed to the caller alongside the error label.
    pub fn details(&self) -> Option<String> {
        match self {
            AnalyzeError::NoUpload | AnalyzeError::MissingApiKey => None,
            AnalyzeError::InvalidBase64(e) => Some(e.to_string()),
            AnalyzeError::MalformedBody(msg) => Some(msg.clone()),
            AnalyzeError::PayloadTooLarge { limit } => {
                Some(format!("request body exceeds {limit} bytes"))
            }
            AnalyzeError::Upstream(e) if e.is_timeout() => {
                Some(format!("inference request timed out: {e}"))
            }
            AnalyzeError::Upstream(e) => Some(e.to_string()),
            AnalyzeError::InvalidUpstreamBody(e) => {
                Some(format!("inference API returned invalid JSON: {e}"))
            }
        }
    }
}

impl ResponseError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::NoUpload
            | AnalyzeError::InvalidBase64(_)
            | AnalyzeError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AnalyzeError::MissingApiKey
            | AnalyzeError::Upstream(_)
            | AnalyzeError::InvalidUpstreamBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let details = self.details();

        if status.is_server_error() {
            tracing::error!(error = %self, details = ?details, "analyze request failed");
        } else {
            tracing::warn!(error = %self, details = ?details, "analyze request rejected");
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(AnalyzeError::NoUpload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AnalyzeError::MalformedBody("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalyzeError::PayloadTooLarge { limit: 1 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AnalyzeError::MissingApiKey.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn no_upload_body_has_only_error_field() {
        let resp = AnalyzeError::NoUpload.error_response();
        let bytes = resp.into_body().try_into_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "No video uploaded" }));
    }

    #[test]
    fn invalid_upstream_body_reports_details() {
        let parse_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = AnalyzeError::InvalidUpstreamBody(parse_err);
        assert_eq!(err.to_string(), "Server Error");
        assert!(err.details().unwrap().contains("invalid JSON"));
    }
}
