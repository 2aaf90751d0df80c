//! Transport failure reported through the `onerror` callback
//!
//! There is a single failure kind from the caller's point of view. The
//! fields below are whatever the transport could attach; nothing is retried.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the transport was doing when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The server answered with a 4xx/5xx status
    Status,
    /// The request timed out
    Timeout,
    /// The connection could not be established
    Connect,
    /// The request could not be built from the configured method, URL or headers
    Build,
    /// Reading the response body failed
    Body,
    /// Any other request failure
    Request,
}

/// Failure of a single sent request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportError {
    /// Failure kind attached by the transport
    pub kind: FailureKind,
    /// Human-readable error message
    pub message: String,
    /// Full URL the request was sent to
    pub location: String,
    /// HTTP status code if a response arrived
    pub status: Option<u16>,
    /// Canonical reason phrase for `status`
    pub status_text: Option<String>,
    /// Raw response body if one was read
    pub response_text: Option<String>,
}

impl TransportError {
    pub fn new(kind: FailureKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: location.into(),
            status: None,
            status_text: None,
            response_text: None,
        }
    }

    /// Failure built from an error status response
    pub fn from_status(location: impl Into<String>, status: StatusCode, body: String) -> Self {
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        Self {
            kind: FailureKind::Status,
            message: format!("{} {}", status.as_u16(), status_text).trim().to_string(),
            location: location.into(),
            status: Some(status.as_u16()),
            status_text: Some(status_text),
            response_text: Some(body),
        }
    }

    /// Failure built from a reqwest error
    pub fn from_request_error(location: impl Into<String>, error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connect
        } else if error.is_builder() {
            FailureKind::Build
        } else if error.is_body() || error.is_decode() {
            FailureKind::Body
        } else {
            FailureKind::Request
        };

        let mut failure = Self::new(kind, location, error.to_string());
        if let Some(status) = error.status() {
            failure.status = Some(status.as_u16());
            failure.status_text = status.canonical_reason().map(str::to_string);
        }
        failure
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "XHR error [{}]: {} ({})",
            self.status
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.message,
            self.location
        )
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failure() {
        let err = TransportError::from_status(
            "http://localhost:3000/api/user",
            StatusCode::NOT_FOUND,
            "missing".to_string(),
        );
        assert_eq!(err.kind, FailureKind::Status);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.status_text.as_deref(), Some("Not Found"));
        assert_eq!(err.response_text.as_deref(), Some("missing"));
        assert_eq!(err.message, "404 Not Found");
    }

    #[test]
    fn test_display_includes_location() {
        let err = TransportError::new(FailureKind::Connect, "http://localhost:1/x", "refused");
        assert_eq!(err.to_string(), "XHR error [N/A]: refused (http://localhost:1/x)");
    }
}
