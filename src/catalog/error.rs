//! Error types for catalog requests.
//!
//! These errors never escape the absorbing [`CatalogSource`](super::CatalogSource)
//! operations; they surface only through the `try_*`/`fetch_work` primitives
//! and in logs. Messages follow the what/why plus suggestion layout used
//! across the project.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the catalog API.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The request did not complete within its time budget
    #[error(
        "request to '{url}' timed out after {timeout_ms} ms\n  Suggestion: Check your network connection or raise the request timeout"
    )]
    NetworkTimeout {
        /// The URL that timed out
        url: String,
        /// The time budget that was exceeded
        timeout_ms: u64,
    },

    /// Connection failure or a non-success HTTP status
    #[error("request to '{url}' failed: {reason}\n  Suggestion: {suggestion}")]
    NetworkError {
        /// The URL that failed
        url: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Why the request failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// Every candidate endpoint for a work id failed
    #[error(
        "work '{id}' not found after trying {tried_count} candidate endpoint(s)\n  Suggestion: Check the work id (for example OL45804W)"
    )]
    NotFound {
        /// The requested work id
        id: String,
        /// Number of candidate endpoints that were tried
        tried_count: usize,
    },

    /// A payload field had a shape that could not be interpreted
    #[error("malformed field '{field}' in response from '{origin}': {reason}")]
    MalformedField {
        /// Name of the offending field (or `body` for the whole payload)
        field: String,
        /// URL or work key the payload came from
        origin: String,
        /// What was wrong with it
        reason: String,
    },

    /// The HTTP client could not be constructed
    #[error("catalog client initialization failed: {reason}")]
    ClientInit {
        /// Why construction failed
        reason: String,
    },
}

impl CatalogError {
    /// Creates a `NetworkTimeout` error.
    #[must_use]
    pub fn timeout(url: &str, timeout: Duration) -> Self {
        Self::NetworkTimeout {
            url: url.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Creates a `NetworkError` for a non-success HTTP status.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        let (reason, suggestion) = match status {
            404 => (
                "resource not found in the catalog".to_string(),
                "Check the identifier or query",
            ),
            429 => (
                "catalog rate limit exceeded".to_string(),
                "Wait a few seconds and try again",
            ),
            s if s >= 500 => (
                format!("catalog API unavailable (HTTP {s})"),
                "Try again later",
            ),
            s => (format!("catalog API returned HTTP {s}"), "Check the request"),
        };
        Self::NetworkError {
            url: url.to_string(),
            status: Some(status),
            reason,
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `NetworkError` for a connection-level failure.
    #[must_use]
    pub fn connection(url: &str, reason: &str) -> Self {
        Self::NetworkError {
            url: url.to_string(),
            status: None,
            reason: reason.to_string(),
            suggestion: "Cannot reach the catalog API. Check your network connection.".to_string(),
        }
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(id: &str, tried_count: usize) -> Self {
        Self::NotFound {
            id: id.to_string(),
            tried_count,
        }
    }

    /// Creates a `MalformedField` error.
    #[must_use]
    pub fn malformed(field: &str, origin: &str, reason: &str) -> Self {
        Self::MalformedField {
            field: field.to_string(),
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `ClientInit` error.
    #[must_use]
    pub fn client_init(reason: &str) -> Self {
        Self::ClientInit {
            reason: reason.to_string(),
        }
    }
}
