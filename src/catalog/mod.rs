//! Remote catalog client for the Open Library API.
//!
//! # Architecture
//!
//! - [`CatalogSource`] - Async trait the controllers depend on
//! - [`OpenLibraryClient`] - Production implementation with per-id cache,
//!   candidate endpoint chain and timeout/retry policy
//! - [`CatalogError`] - Typed request failures
//! - [`enrich`] - Post-fetch normalization guaranteeing title/description
//!
//! # Failure model
//!
//! The trait exposes two layers. The `try_*` operations and
//! [`CatalogSource::fetch_work`] report typed failures. The absorbing
//! operations ([`CatalogSource::list_works`], [`CatalogSource::get_work_by_id`],
//! [`CatalogSource::search_by_title`], [`CatalogSource::search_by_year`]) never
//! fail: errors are logged and replaced by an empty list or a placeholder work.
//!
//! # Example
//!
//! ```no_run
//! use catalog_core::catalog::{CatalogSource, OpenLibraryClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenLibraryClient::new()?;
//! let works = client.search_by_title("dune").await;
//! for work in &works {
//!     println!("{} - {}", work.key, work.title);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
pub mod enrich;
mod error;
mod http_client;
mod openlibrary;
mod payload;
mod retry;

pub use config::{
    CatalogConfig, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DETAIL_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SUBJECT, SEARCH_LIMIT,
};
pub use enrich::{UNKNOWN_AUTHOR, enrich, synthesize_description};
pub use error::CatalogError;
pub use openlibrary::{OpenLibraryClient, candidate_ids};
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
};

use async_trait::async_trait;
use tracing::warn;

use crate::work::Work;

/// Read-only access to a book catalog.
///
/// # Object Safety
///
/// This trait uses `async_trait` so controllers can hold an
/// `Arc<dyn CatalogSource>` and tests can substitute scripted sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the source's name for logging.
    fn name(&self) -> &str;

    /// Lists the works filed under `subject`.
    async fn try_list_works(&self, subject: &str) -> Result<Vec<Work>, CatalogError>;

    /// Loads a single work by id.
    async fn fetch_work(&self, id: &str) -> Result<Work, CatalogError>;

    /// Searches works by title.
    async fn try_search_by_title(&self, title: &str) -> Result<Vec<Work>, CatalogError>;

    /// Searches works by first publication year.
    async fn try_search_by_year(&self, year: i32) -> Result<Vec<Work>, CatalogError>;

    /// Lists works under `subject`, returning an empty list on failure.
    async fn list_works(&self, subject: &str) -> Vec<Work> {
        self.try_list_works(subject).await.unwrap_or_else(|error| {
            warn!(source = self.name(), subject, error = %error, "Listing failed; returning empty list");
            Vec::new()
        })
    }

    /// Loads a work by id, returning a placeholder work on failure.
    async fn get_work_by_id(&self, id: &str) -> Work {
        match self.fetch_work(id).await {
            Ok(work) => work,
            Err(error) => {
                warn!(source = self.name(), id, error = %error, "Work lookup failed; returning placeholder");
                Work::placeholder(id)
            }
        }
    }

    /// Searches by title, returning an empty list on failure.
    async fn search_by_title(&self, title: &str) -> Vec<Work> {
        self.try_search_by_title(title).await.unwrap_or_else(|error| {
            warn!(source = self.name(), title, error = %error, "Title search failed; returning empty list");
            Vec::new()
        })
    }

    /// Searches by first publication year, returning an empty list on failure.
    async fn search_by_year(&self, year: i32) -> Vec<Work> {
        self.try_search_by_year(year).await.unwrap_or_else(|error| {
            warn!(source = self.name(), year, error = %error, "Year search failed; returning empty list");
            Vec::new()
        })
    }
}
