//! Typed error definitions for the gateway.
//!
//! Two layers:
//!
//! - [`AttachmentError`] - failures of a single attachment (fetch, upload, poll). These are
//!   always recovered by the ingestor and never abort a whole message.
//! - [`GatewayError`] - request-level failures surfaced to the caller as an HTTP status.

mod attachment;

pub use attachment::AttachmentError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-level error taxonomy.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum GatewayError {
    /// Missing model, credential or content. Client-fixable.
    #[error("{message}")]
    Validation { message: String },

    /// Request could not be composed (e.g. empty part list for the provider call)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Path does not map to any gateway operation
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Attachment pipeline failure that escaped local recovery
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Generation call failed, including content-policy rejections
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Provider answered without any candidate content
    #[error("Provider returned no content{}", block_reason.as_ref().map(|r| format!(" (blocked: {})", r)).unwrap_or_default())]
    EmptyResponse { block_reason: Option<String> },

    /// Failure while relaying an active stream
    #[error("Stream error: {message}")]
    StreamTransport { message: String },

    /// Caller closed the outbound connection. Not a failure.
    #[error("Request aborted by caller")]
    AbortedByCaller,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider { message: message.into() }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::StreamTransport { message: message.into() }
    }

    /// Check if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidRequest { .. } | Self::NotFound { .. }
        )
    }

    /// Caller aborts are suppressed from failure logging.
    pub fn is_caller_abort(&self) -> bool {
        matches!(self, Self::AbortedByCaller)
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::InvalidRequest { .. } => 400,
            Self::NotFound { .. } => 404,
            // nginx convention, never written to a live connection
            Self::AbortedByCaller => 499,
            Self::Attachment(_)
            | Self::Provider { .. }
            | Self::EmptyResponse { .. }
            | Self::StreamTransport { .. }
            | Self::Internal { .. } => 500,
        }
    }
}

/// Standard Result type using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(GatewayError::validation("missing model").http_status_code(), 400);
        assert_eq!(GatewayError::invalid_request("empty").http_status_code(), 400);
        assert_eq!(GatewayError::NotFound { path: "/x".into() }.http_status_code(), 404);
        assert_eq!(GatewayError::provider("boom").http_status_code(), 500);
        assert_eq!(
            GatewayError::EmptyResponse { block_reason: Some("SAFETY".into()) }.http_status_code(),
            500
        );
    }

    #[test]
    fn test_empty_response_surfaces_block_reason() {
        let err = GatewayError::EmptyResponse { block_reason: Some("SAFETY".into()) };
        assert_eq!(err.to_string(), "Provider returned no content (blocked: SAFETY)");

        let err = GatewayError::EmptyResponse { block_reason: None };
        assert_eq!(err.to_string(), "Provider returned no content");
    }

    #[test]
    fn test_attachment_error_wraps_transparently() {
        let err: GatewayError =
            AttachmentError::FileTimeout { name: "files/abc".into(), attempts: 10 }.into();
        assert!(err.to_string().contains("files/abc"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_serialization() {
        let err = GatewayError::validation("Missing model");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Validation"));

        let back: GatewayError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }

    #[test]
    fn test_abort_is_not_a_client_error() {
        assert!(GatewayError::AbortedByCaller.is_caller_abort());
        assert!(!GatewayError::AbortedByCaller.is_client_error());
    }
}
