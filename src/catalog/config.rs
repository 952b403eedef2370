//! Request settings for the Open Library client.

use std::time::Duration;

use super::RetryPolicy;

/// Default Open Library API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Default subject listed on the list view.
pub const DEFAULT_SUBJECT: &str = "computers";

/// Time budget for listing and search requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Time budget for each work detail candidate.
pub const DEFAULT_DETAIL_TIMEOUT: Duration = Duration::from_secs(3);

/// TCP connect timeout for the shared HTTP client.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result limit sent with every search request.
pub const SEARCH_LIMIT: u32 = 20;

/// Settings for [`OpenLibraryClient`](super::OpenLibraryClient).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Budget for each listing/search attempt.
    pub request_timeout: Duration,
    /// Budget for each work detail candidate.
    pub detail_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// `limit` query parameter for search requests.
    pub search_limit: u32,
    /// Retry policy for listing/search requests.
    pub retry_policy: RetryPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            detail_timeout: DEFAULT_DETAIL_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            search_limit: SEARCH_LIMIT,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl CatalogConfig {
    /// Returns the default configuration pointed at a different base URL
    /// (a mirror, or a mock server in tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Overrides the listing/search timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the per-candidate detail timeout.
    #[must_use]
    pub fn detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }
}

fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
