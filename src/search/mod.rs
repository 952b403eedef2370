//! Search coordination channel between the search input and the list view.
//!
//! [`SearchChannel`] holds three independently observable streams (title
//! filter, year filter, sort option) built on `tokio::sync::watch`. Every
//! stream always has exactly one current value, setters publish
//! synchronously, and a receiver obtained later still observes the most
//! recent value. Intermediate values can be skipped by a slow subscriber; only
//! the latest value is ever delivered.
//!
//! The channel is passed explicitly (usually as `Arc<SearchChannel>`) to the
//! publishing [`SearchInput`] and to the subscribing
//! [`ListingController`](crate::listing::ListingController).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use catalog_core::search::{SearchChannel, SearchInput, SortOption};
//!
//! let channel = Arc::new(SearchChannel::new());
//! let input = SearchInput::new(Arc::clone(&channel));
//!
//! input.submit_title("dune");
//! input.change_sort(SortOption::YEAR_DESC);
//!
//! let late = channel.subscribe_title();
//! assert_eq!(*late.borrow(), "dune");
//! assert_eq!(channel.sort_by(), SortOption::YEAR_DESC);
//! ```

mod sort;

pub use sort::{ParseSortOptionError, SortDirection, SortField, SortOption};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Snapshot of all filter values at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Current title filter; empty means "no title filter".
    pub title_query: String,
    /// Current year filter.
    pub year_query: Option<i32>,
    /// Current sort option.
    pub sort_option: SortOption,
}

/// Shared filter/sort state with subscribe-to-latest semantics.
#[derive(Debug)]
pub struct SearchChannel {
    title: watch::Sender<String>,
    year: watch::Sender<Option<i32>>,
    sort: watch::Sender<SortOption>,
}

impl SearchChannel {
    /// Creates a channel holding the defaults: empty title, no year, `title-asc`.
    #[must_use]
    pub fn new() -> Self {
        let (title, _) = watch::channel(String::new());
        let (year, _) = watch::channel(None);
        let (sort, _) = watch::channel(SortOption::default());
        Self { title, year, sort }
    }

    /// Publishes a new title filter.
    pub fn set_search_title(&self, title: impl Into<String>) {
        let title = title.into();
        debug!(title = %title, "Title filter published");
        self.title.send_replace(title);
    }

    /// Publishes a new year filter (`None` clears it).
    pub fn set_search_year(&self, year: Option<i32>) {
        debug!(?year, "Year filter published");
        self.year.send_replace(year);
    }

    /// Publishes a new sort option.
    pub fn set_sort_by(&self, option: SortOption) {
        debug!(sort = %option, "Sort option published");
        self.sort.send_replace(option);
    }

    /// Current title filter.
    #[must_use]
    pub fn search_title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Current year filter.
    #[must_use]
    pub fn search_year(&self) -> Option<i32> {
        *self.year.borrow()
    }

    /// Current sort option.
    #[must_use]
    pub fn sort_by(&self) -> SortOption {
        *self.sort.borrow()
    }

    /// Current values of all three streams.
    #[must_use]
    pub fn snapshot(&self) -> FilterState {
        FilterState {
            title_query: self.search_title(),
            year_query: self.search_year(),
            sort_option: self.sort_by(),
        }
    }

    /// Subscribes to the title stream.
    ///
    /// The receiver starts out marked as changed, so the first `changed()`
    /// resolves immediately with the current value.
    #[must_use]
    pub fn subscribe_title(&self) -> watch::Receiver<String> {
        let mut receiver = self.title.subscribe();
        receiver.mark_changed();
        receiver
    }

    /// Subscribes to the year stream (starts marked as changed).
    #[must_use]
    pub fn subscribe_year(&self) -> watch::Receiver<Option<i32>> {
        let mut receiver = self.year.subscribe();
        receiver.mark_changed();
        receiver
    }

    /// Subscribes to the sort stream (starts marked as changed).
    #[must_use]
    pub fn subscribe_sort(&self) -> watch::Receiver<SortOption> {
        let mut receiver = self.sort.subscribe();
        receiver.mark_changed();
        receiver
    }
}

impl Default for SearchChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// The publishing side used by a search form.
///
/// Mirrors the form's rules: blank titles and absent/zero years are not
/// submitted, and reset publishes the defaults on all three streams.
#[derive(Debug, Clone)]
pub struct SearchInput {
    channel: Arc<SearchChannel>,
}

impl SearchInput {
    /// Creates an input bound to `channel`.
    #[must_use]
    pub fn new(channel: Arc<SearchChannel>) -> Self {
        Self { channel }
    }

    /// Submits a title search. Returns `false` (and publishes nothing) for a
    /// blank title.
    pub fn submit_title(&self, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        self.channel.set_search_title(title);
        true
    }

    /// Submits a year search. Returns `false` for an absent or zero year.
    pub fn submit_year(&self, year: Option<i32>) -> bool {
        match year {
            Some(year) if year != 0 => {
                self.channel.set_search_year(Some(year));
                true
            }
            _ => false,
        }
    }

    /// Publishes a sort change.
    pub fn change_sort(&self, option: SortOption) {
        self.channel.set_sort_by(option);
    }

    /// Clears every filter and restores the default sort.
    pub fn reset(&self) {
        self.channel.set_search_title(String::new());
        self.channel.set_search_year(None);
        self.channel.set_sort_by(SortOption::default());
    }
}
