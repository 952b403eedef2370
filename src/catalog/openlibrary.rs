//! Open Library implementation of [`CatalogSource`].
//!
//! Listing and search requests share one retry loop. Work lookups go through
//! the per-id cache and, on a miss, an ordered chain of candidate endpoints:
//! the listing and detail endpoints do not agree on identifier format, so the
//! raw id, an `OL{id}M` variant and a stripped variant are tried in turn.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::work::{WORKS_PREFIX, Work};

use super::enrich::enrich;
use super::http_client::build_catalog_http_client;
use super::payload::{SearchResponse, SubjectResponse, WorkDetail};
use super::{CatalogConfig, CatalogError, CatalogSource, RetryDecision, classify_error};

/// Open Library API client with an in-memory per-id work cache.
///
/// The cache is never evicted. Lookups follow check/fetch/store without
/// in-flight deduplication, so two concurrent lookups of one uncached id may
/// both reach the network.
pub struct OpenLibraryClient {
    client: Client,
    config: CatalogConfig,
    cache: DashMap<String, Work>,
}

impl OpenLibraryClient {
    /// Creates a client for the public Open Library API.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if HTTP client construction fails.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_config(CatalogConfig::with_base_url(base_url))
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if HTTP client construction fails.
    #[tracing::instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn with_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = build_catalog_http_client(config.connect_timeout)?;
        Ok(Self {
            client,
            config,
            cache: DashMap::new(),
        })
    }

    /// Returns the active settings.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Returns the cached work for `id`, if it has been fetched this session.
    #[must_use]
    pub fn cached(&self, id: &str) -> Option<Work> {
        self.cache.get(id).map(|entry| entry.value().clone())
    }

    /// Number of cached works.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn subject_url(&self, subject: &str) -> String {
        let subject = normalize_subject(subject);
        format!(
            "{}/subjects/{}.json",
            self.config.base_url,
            urlencoding::encode(&subject)
        )
    }

    fn work_url(&self, candidate: &str) -> String {
        format!(
            "{}{WORKS_PREFIX}{}.json",
            self.config.base_url,
            urlencoding::encode(candidate)
        )
    }

    fn search_url(&self, param: &str, value: &str) -> String {
        format!(
            "{}/search.json?{param}={}&limit={}",
            self.config.base_url,
            urlencoding::encode(value),
            self.config.search_limit
        )
    }

    /// Performs one GET bounded by `budget` and decodes the JSON body.
    async fn get_json<T>(&self, url: &str, budget: Duration) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Send,
    {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|error| CatalogError::connection(url, &error.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::http_status(url, status.as_u16()));
            }

            response
                .json::<T>()
                .await
                .map_err(|error| CatalogError::malformed("body", url, &error.to_string()))
        };

        match tokio::time::timeout(budget, request).await {
            Ok(result) => result,
            Err(_elapsed) => Err(CatalogError::timeout(url, budget)),
        }
    }

    /// Performs a GET with the listing/search budget and retry policy.
    async fn get_json_with_retry<T>(&self, url: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Send,
    {
        let policy = &self.config.retry_policy;
        let mut attempt = 1;
        loop {
            debug!(url, attempt, "Requesting catalog resource");
            let error = match self.get_json(url, self.config.request_timeout).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            match policy.should_retry(classify_error(&error), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    warn!(url, attempt, error = %error, delay_ms = delay.as_millis(), "Catalog request failed; retrying");
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(url, attempt, %reason, "Giving up on catalog request");
                    return Err(error);
                }
            }
        }
    }

    async fn search(&self, param: &str, value: &str) -> Result<Vec<Work>, CatalogError> {
        let url = self.search_url(param, value);
        let response: SearchResponse = self.get_json_with_retry(&url).await?;
        let works: Vec<Work> = response
            .docs
            .into_iter()
            .filter_map(|doc| doc.into_work())
            .map(enrich)
            .collect();
        debug!(param, value, results = works.len(), "Search results received");
        Ok(works)
    }
}

impl std::fmt::Debug for OpenLibraryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenLibraryClient")
            .field("base_url", &self.config.base_url)
            .field("cached_works", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogSource for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "openlibrary"
    }

    #[tracing::instrument(skip(self), fields(source = "openlibrary"))]
    async fn try_list_works(&self, subject: &str) -> Result<Vec<Work>, CatalogError> {
        let url = self.subject_url(subject);
        let response: SubjectResponse = self.get_json_with_retry(&url).await?;
        let works: Vec<Work> = response
            .works
            .into_iter()
            .filter_map(|doc| doc.into_work())
            .map(enrich)
            .collect();
        info!(works = works.len(), "Subject listing received");
        Ok(works)
    }

    #[tracing::instrument(skip(self), fields(source = "openlibrary"))]
    async fn fetch_work(&self, id: &str) -> Result<Work, CatalogError> {
        if let Some(hit) = self.cached(id) {
            debug!("Work cache hit");
            return Ok(hit);
        }

        let candidates = candidate_ids(id);
        let tried = candidates.len();
        debug!(candidates = ?candidates, "Work cache miss; trying candidate endpoints");

        for (index, candidate) in candidates.iter().enumerate() {
            let url = self.work_url(candidate);
            match self
                .get_json::<WorkDetail>(&url, self.config.detail_timeout)
                .await
            {
                Ok(detail) => {
                    let work = enrich(detail.into_work(id));
                    info!(url = %url, key = %work.key, "Work loaded");
                    self.cache.insert(id.to_string(), work.clone());
                    return Ok(work);
                }
                Err(error) => {
                    warn!(
                        candidate = index + 1,
                        total = tried,
                        url = %url,
                        error = %error,
                        "Work candidate endpoint failed"
                    );
                }
            }
        }

        Err(CatalogError::not_found(id, tried))
    }

    #[tracing::instrument(skip(self), fields(source = "openlibrary"))]
    async fn try_search_by_title(&self, title: &str) -> Result<Vec<Work>, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        self.search("title", title).await
    }

    #[tracing::instrument(skip(self), fields(source = "openlibrary"))]
    async fn try_search_by_year(&self, year: i32) -> Result<Vec<Work>, CatalogError> {
        self.search("first_publish_year", &year.to_string()).await
    }
}

/// Derives the ordered candidate ids tried for a work lookup.
///
/// For `OL45804W` the candidates are `OL45804W`, `OLOL45804WM` and `45804W`
/// (first `OL` and first `M` removed). A leading `/works/` is stripped first;
/// duplicates and empty candidates are skipped.
#[must_use]
pub fn candidate_ids(id: &str) -> Vec<String> {
    let id = id.trim();
    let id = id.strip_prefix(WORKS_PREFIX).unwrap_or(id);
    if id.is_empty() {
        return Vec::new();
    }

    let stripped = id.replacen("OL", "", 1).replacen('M', "", 1);
    let mut candidates: Vec<String> = Vec::with_capacity(3);
    for candidate in [id.to_string(), format!("OL{id}M"), stripped] {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Open Library subject slugs are lowercase with underscores.
fn normalize_subject(subject: &str) -> String {
    subject
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::RetryPolicy;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenLibraryClient {
        let config = CatalogConfig::with_base_url(server.uri())
            .request_timeout(Duration::from_millis(500))
            .detail_timeout(Duration::from_millis(300))
            .retry_policy(RetryPolicy::immediate(2));
        OpenLibraryClient::with_config(config).unwrap()
    }

    fn subject_json() -> serde_json::Value {
        serde_json::json!({
            "name": "computers",
            "work_count": 2,
            "works": [
                {
                    "key": "/works/OL2038137W",
                    "title": "The C Programming Language",
                    "edition_count": 30,
                    "cover_id": 6_497_536,
                    "first_publish_year": 1978,
                    "authors": [
                        {"key": "/authors/OL1A", "name": "Brian W. Kernighan"},
                        {"key": "/authors/OL2A", "name": "Dennis M. Ritchie"}
                    ]
                },
                {
                    "key": "/works/OL1W",
                    "title": "Untraceable Manual",
                    "authors": []
                }
            ]
        })
    }

    fn detail_json(key: &str) -> serde_json::Value {
        serde_json::json!({
            "key": key,
            "title": "Hackers",
            "subtitle": "Heroes of the Computer Revolution",
            "covers": [8_231_432],
            "description": {"type": "/type/text", "value": "The classic history."},
            "authors": [{"author": {"key": "/authors/OL3A"}, "type": {"key": "/type/author_role"}}],
            "first_publish_date": "1984"
        })
    }

    fn search_json() -> serde_json::Value {
        serde_json::json!({
            "numFound": 1,
            "docs": [{
                "key": "/works/OL27448W",
                "title": "The Lord of the Rings",
                "first_publish_year": 1954,
                "edition_count": 250,
                "cover_i": 14_625_765,
                "author_name": ["J.R.R. Tolkien"]
            }]
        })
    }

    // ==================== Pure helpers ====================

    #[test]
    fn test_candidate_ids_for_work_id() {
        assert_eq!(candidate_ids("OL1W"), ["OL1W", "OLOL1WM", "1W"]);
    }

    #[test]
    fn test_candidate_ids_for_edition_style_id() {
        assert_eq!(candidate_ids("OL5M"), ["OL5M", "OLOL5MM", "5"]);
    }

    #[test]
    fn test_candidate_ids_deduplicates_numeric_id() {
        assert_eq!(candidate_ids("123"), ["123", "OL123M"]);
    }

    #[test]
    fn test_candidate_ids_strips_works_prefix() {
        assert_eq!(candidate_ids("/works/OL1W")[0], "OL1W");
    }

    #[test]
    fn test_candidate_ids_empty_id_has_no_candidates() {
        assert!(candidate_ids("  ").is_empty());
    }

    #[test]
    fn test_normalize_subject() {
        assert_eq!(normalize_subject("Science Fiction"), "science_fiction");
        assert_eq!(normalize_subject("computers"), "computers");
    }

    // ==================== Listing ====================

    #[tokio::test]
    async fn test_list_works_enriches_every_work() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subject_json()))
            .expect(1)
            .mount(&server)
            .await;

        let works = test_client(&server).list_works("computers").await;
        assert_eq!(works.len(), 2);
        assert_eq!(
            works[0].description,
            "The C Programming Language by Brian W. Kernighan, Dennis M. Ritchie (1978). Available in 30 edition(s)."
        );
        assert_eq!(
            works[1].description,
            "Untraceable Manual by Unknown author. Available in 1 edition(s)."
        );
    }

    #[tokio::test]
    async fn test_list_works_retries_once_after_server_error() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subject_json()))
            .expect(1)
            .mount(&server)
            .await;

        let works = test_client(&server).list_works("computers").await;
        assert_eq!(works.len(), 2);
    }

    #[tokio::test]
    async fn test_list_works_absorbs_repeated_failure() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        assert!(test_client(&server).list_works("computers").await.is_empty());
    }

    #[tokio::test]
    async fn test_try_list_works_reports_final_status() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let error = test_client(&server).try_list_works("computers").await;
        assert!(matches!(
            error,
            Err(CatalogError::NetworkError {
                status: Some(500),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_works_retries_after_not_found() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subject_json()))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(test_client(&server).list_works("computers").await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_works_malformed_body_is_retried_once() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(2)
            .mount(&server)
            .await;

        let result = test_client(&server).try_list_works("computers").await;
        assert!(matches!(result, Err(CatalogError::MalformedField { .. })));
    }

    #[tokio::test]
    async fn test_search_by_title_retries_after_client_error() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(400))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json()))
            .expect(1)
            .mount(&server)
            .await;

        let works = test_client(&server).search_by_title("rings").await;
        assert_eq!(works.len(), 1);
    }

    #[tokio::test]
    async fn test_list_works_times_out_and_retries() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(subject_json())
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let result = test_client(&server).try_list_works("computers").await;
        assert!(matches!(result, Err(CatalogError::NetworkTimeout { .. })));
    }

    #[tokio::test]
    async fn test_requests_carry_shared_user_agent() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/subjects/computers.json"))
            .and(header_regex("user-agent", r"^catalog-browser/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subject_json()))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(test_client(&server).list_works("computers").await.len(), 2);
    }

    // ==================== Work lookup ====================

    #[tokio::test]
    async fn test_get_work_by_id_falls_through_candidates() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/works/OL1W.json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/works/OLOL1WM.json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/works/1W.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("/works/OL1W")))
            .expect(1)
            .mount(&server)
            .await;

        let work = test_client(&server).get_work_by_id("OL1W").await;
        assert_eq!(work.key, "/works/OL1W");
        assert_eq!(work.title, "Hackers");
        assert_eq!(work.cover_id, Some(8_231_432));
        assert_eq!(work.description, "The classic history.");
        assert_eq!(work.first_publish_year, Some(1984));
    }

    #[tokio::test]
    async fn test_get_work_by_id_second_call_is_cache_hit() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/works/OL1W.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("/works/OL1W")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let first = client.get_work_by_id("OL1W").await;
        let second = client.get_work_by_id("OL1W").await;
        assert_eq!(first, second);
        assert_eq!(client.cache_len(), 1);
        assert_eq!(client.cached("OL1W"), Some(first));
    }

    #[tokio::test]
    async fn test_get_work_by_id_slow_candidate_times_out() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/works/OL7W.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(detail_json("/works/OL7W"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/works/OLOL7WM.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("/works/OL7W")))
            .expect(1)
            .mount(&server)
            .await;

        let work = test_client(&server).get_work_by_id("OL7W").await;
        assert_eq!(work.title, "Hackers");
    }

    #[tokio::test]
    async fn test_get_work_by_id_exhausted_candidates_returns_placeholder() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let work = client.get_work_by_id("OL1W").await;
        assert!(work.title.contains("OL1W"));
        assert!(!work.description.is_empty());
        assert_eq!(client.cache_len(), 0, "failures are never cached");
    }

    #[tokio::test]
    async fn test_fetch_work_reports_not_found_after_chain() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = test_client(&server).fetch_work("OL1W").await;
        assert!(matches!(
            result,
            Err(CatalogError::NotFound { tried_count: 3, .. })
        ));
    }

    // ==================== Search ====================

    #[tokio::test]
    async fn test_search_by_title_sends_encoded_title_and_limit() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("title", "the lord of the rings"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json()))
            .expect(1)
            .mount(&server)
            .await;

        let works = test_client(&server)
            .search_by_title("the lord of the rings")
            .await;
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].cover_id, Some(14_625_765));
        assert_eq!(works[0].author_names(), ["J.R.R. Tolkien"]);
        assert!(works[0].description.contains("(1954)"));
    }

    #[tokio::test]
    async fn test_search_by_year_sends_first_publish_year() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("first_publish_year", "1954"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json()))
            .expect(1)
            .mount(&server)
            .await;

        let works = test_client(&server).search_by_year(1954).await;
        assert_eq!(works[0].key, "/works/OL27448W");
    }

    #[tokio::test]
    async fn test_search_by_title_blank_query_skips_network() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json()))
            .expect(0)
            .mount(&server)
            .await;

        assert!(test_client(&server).search_by_title("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_absorbed() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        assert!(test_client(&server).search_by_year(2001).await.is_empty());
    }
}
