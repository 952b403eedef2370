//! Shared HTTP client construction for catalog requests.
//!
//! Per-request time budgets are enforced by the caller (see
//! [`CatalogConfig`](super::CatalogConfig)); the client itself only carries the
//! connect timeout, user-agent and compression policy.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::user_agent;

use super::CatalogError;

/// Builds the catalog HTTP client.
///
/// # Errors
///
/// Returns [`CatalogError::ClientInit`] when client construction fails.
pub(crate) fn build_catalog_http_client(connect_timeout: Duration) -> Result<Client, CatalogError> {
    let user_agent = user_agent::default_catalog_user_agent();
    debug!(%user_agent, connect_timeout_ms = connect_timeout.as_millis(), "Building catalog HTTP client");

    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(user_agent)
        .gzip(true)
        .build()
        .map_err(|error| {
            CatalogError::client_init(&format!("HTTP client construction failed: {error}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_catalog_http_client_succeeds() {
        assert!(build_catalog_http_client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_build_catalog_http_client_accepts_zero_connect_timeout() {
        assert!(build_catalog_http_client(Duration::ZERO).is_ok());
    }
}
