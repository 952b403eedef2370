//! Catalog Browser Core Library
//!
//! This library provides the core of the catalog browser: it lists works from
//! the Open Library catalog, searches them by title or publication year, sorts
//! results, and loads a detail view per work.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Remote catalog client with cache, endpoint fallback chain,
//!   timeout/retry policy and enrichment
//! - [`search`] - Search coordination channel shared by the search input and
//!   the list view
//! - [`listing`] - Listing controller (load, local+remote search, sort,
//!   default-data fallback)
//! - [`detail`] - Detail controller with bounded loading timer
//! - [`work`] - Canonical `Work` type and cover URL derivation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod detail;
pub mod listing;
pub mod search;
pub mod work;

#[cfg(test)]
pub(crate) mod test_support;
mod user_agent;

// Re-export commonly used types
pub use catalog::{CatalogConfig, CatalogError, CatalogSource, OpenLibraryClient, RetryPolicy};
pub use detail::{DEFAULT_DISPLAY_TIMEOUT, DetailController, DetailState};
pub use listing::{ListingController, ListingError, ListingPhase, ListingView};
pub use search::{FilterState, SearchChannel, SearchInput, SortOption};
pub use work::{Author, CoverSize, Work};
