//! Listing controller: initial load, local+remote search merge, sorting and
//! default-data fallback.
//!
//! # Phases
//!
//! ```text
//! Loading ──list_works──► shape ──ok──► Ready
//!                            └──err──► ErrorWithFallback (built-in list)
//! ```
//!
//! A listing that comes back empty (including after a network failure the
//! client absorbed) is still `Ready`. Filter changes never move the phase;
//! they only replace the displayed works and message.
//!
//! The controller reads filters from a shared
//! [`SearchChannel`](crate::search::SearchChannel). Use
//! [`ListingController::run`] to react to changes as they arrive, or
//! [`ListingController::drain`] to apply pending changes one after another.
//! Displayed state is published on a `watch` channel; observe it with
//! [`ListingController::subscribe`].

mod fallback;
mod filter;

pub use fallback::default_works;
pub use filter::{YEAR_TOLERANCE, filter_by_title, filter_by_year, matches_title, matches_year};

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSource, DEFAULT_SUBJECT};
use crate::search::{SearchChannel, SortOption};
use crate::work::Work;

/// Errors raised while shaping a loaded listing for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// An entry's key has no id segment, so it cannot link to a detail view
    #[error(
        "work '{key}' has no id segment\n  Suggestion: The catalog returned an unusable entry; showing the built-in list instead"
    )]
    MalformedWork {
        /// The offending key
        key: String,
    },
}

/// Where the listing is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    /// Initial load in flight.
    Loading,
    /// Loaded list (possibly empty) is displayed.
    Ready,
    /// Loaded list could not be shaped; the built-in list is displayed.
    ErrorWithFallback,
}

/// What the list view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    /// Lifecycle phase.
    pub phase: ListingPhase,
    /// Displayed works, already sorted.
    pub works: Vec<Work>,
    /// User-facing message, if any.
    pub message: Option<String>,
}

impl ListingView {
    fn loading() -> Self {
        Self {
            phase: ListingPhase::Loading,
            works: Vec::new(),
            message: None,
        }
    }
}

/// Receivers for the three filter streams, owned by whoever applies them.
#[derive(Debug)]
pub struct FilterSubscription {
    title: watch::Receiver<String>,
    year: watch::Receiver<Option<i32>>,
    sort: watch::Receiver<SortOption>,
}

/// Drives the list view.
pub struct ListingController {
    source: Arc<dyn CatalogSource>,
    channel: Arc<SearchChannel>,
    subject: String,
    loaded: Mutex<Vec<Work>>,
    view: watch::Sender<ListingView>,
}

impl ListingController {
    /// Creates a controller listing the default subject.
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>, channel: Arc<SearchChannel>) -> Self {
        Self::with_subject(source, channel, DEFAULT_SUBJECT)
    }

    /// Creates a controller listing `subject`.
    #[must_use]
    pub fn with_subject(
        source: Arc<dyn CatalogSource>,
        channel: Arc<SearchChannel>,
        subject: impl Into<String>,
    ) -> Self {
        let (view, _) = watch::channel(ListingView::loading());
        Self {
            source,
            channel,
            subject: subject.into(),
            loaded: Mutex::new(Vec::new()),
            view,
        }
    }

    /// The subject this controller lists.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Current displayed state.
    #[must_use]
    pub fn view(&self) -> ListingView {
        self.view.borrow().clone()
    }

    /// Subscribes to displayed-state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListingView> {
        self.view.subscribe()
    }

    /// Loads the subject listing and displays it.
    #[tracing::instrument(skip(self), fields(subject = %self.subject))]
    pub async fn activate(&self) {
        self.view.send_replace(ListingView::loading());

        let works = self.source.list_works(&self.subject).await;
        match shape_listing(works) {
            Ok(works) => {
                info!(count = works.len(), "Listing loaded");
                let message = works
                    .is_empty()
                    .then(|| format!("No works found for subject '{}'.", self.subject));
                self.set_loaded(works.clone());
                self.publish(ListingPhase::Ready, works, message);
            }
            Err(error) => {
                warn!(error = %error, "Listing unusable; showing built-in list");
                let works = default_works();
                self.set_loaded(works.clone());
                self.publish(
                    ListingPhase::ErrorWithFallback,
                    works,
                    Some(error.to_string()),
                );
            }
        }
    }

    /// Applies a title filter.
    ///
    /// Local matches are displayed before the remote search starts. Non-empty
    /// remote results then replace them; otherwise local results stay. A
    /// message appears only when both came back empty.
    #[tracing::instrument(skip(self))]
    pub async fn apply_title_query(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.reset();
            return;
        }

        let local = filter_by_title(&self.loaded(), query);
        debug!(local = local.len(), "Local title matches");
        let local_empty = local.is_empty();
        self.publish_filtered(local, None);

        match self.source.try_search_by_title(query).await {
            Ok(remote) if !remote.is_empty() => {
                debug!(remote = remote.len(), "Remote title matches replace local");
                self.publish_filtered(remote, None);
            }
            Ok(_) if local_empty => {
                self.publish_filtered(Vec::new(), Some(no_match_message(query)));
            }
            Err(error) if local_empty => {
                warn!(error = %error, "Remote title search failed");
                self.publish_filtered(Vec::new(), Some(search_failed_message(query)));
            }
            Ok(_) => debug!("No remote title matches; keeping local results"),
            Err(error) => {
                warn!(error = %error, "Remote title search failed; keeping local results");
            }
        }
    }

    /// Applies a year filter; `None` resets to the full list.
    ///
    /// Works within [`YEAR_TOLERANCE`] years match locally. When nothing
    /// matches locally, a remote year search is used instead.
    #[tracing::instrument(skip(self))]
    pub async fn apply_year_query(&self, year: Option<i32>) {
        let Some(year) = year else {
            self.reset();
            return;
        };

        let local = filter_by_year(&self.loaded(), year);
        if !local.is_empty() {
            debug!(local = local.len(), "Local year matches");
            self.publish_filtered(local, None);
            return;
        }

        match self.source.try_search_by_year(year).await {
            Ok(remote) if !remote.is_empty() => {
                debug!(remote = remote.len(), "Remote year matches");
                self.publish_filtered(remote, None);
            }
            Ok(_) => {
                self.publish_filtered(Vec::new(), Some(no_match_message(&year.to_string())));
            }
            Err(error) => {
                warn!(error = %error, "Remote year search failed");
                self.publish_filtered(
                    Vec::new(),
                    Some(search_failed_message(&year.to_string())),
                );
            }
        }
    }

    /// Re-orders the displayed list.
    pub fn apply_sort(&self, option: SortOption) {
        debug!(sort = %option, "Sort applied");
        self.view.send_modify(|view| option.apply(&mut view.works));
    }

    /// Subscribes to the shared filter streams.
    ///
    /// Every stream starts out pending, so the first [`drain`](Self::drain)
    /// applies the current filter values.
    #[must_use]
    pub fn subscribe_filters(&self) -> FilterSubscription {
        FilterSubscription {
            title: self.channel.subscribe_title(),
            year: self.channel.subscribe_year(),
            sort: self.channel.subscribe_sort(),
        }
    }

    /// Applies every pending filter change, one after another.
    ///
    /// Clearing values are applied before active ones, so an active filter is
    /// not hidden by a simultaneous clear of the other stream. Sort goes last.
    pub async fn drain(&self, subscription: &mut FilterSubscription) {
        let title = subscription
            .title
            .has_changed()
            .unwrap_or(false)
            .then(|| subscription.title.borrow_and_update().clone());
        let year = subscription
            .year
            .has_changed()
            .unwrap_or(false)
            .then(|| *subscription.year.borrow_and_update());
        let sort = subscription
            .sort
            .has_changed()
            .unwrap_or(false)
            .then(|| *subscription.sort.borrow_and_update());

        let title_clears = title.as_deref().is_some_and(|t| t.trim().is_empty());
        let year_clears = matches!(year, Some(None));

        if title_clears || year_clears {
            self.reset();
        }
        if let Some(title) = title.filter(|_| !title_clears) {
            self.apply_title_query(&title).await;
        }
        if let Some(Some(year)) = year {
            self.apply_year_query(Some(year)).await;
        }
        if let Some(sort) = sort {
            self.apply_sort(sort);
        }
    }

    /// Reacts to filter changes until the channel goes away.
    ///
    /// Each change is handled on its own task. Superseded searches are not
    /// cancelled; whichever finishes last owns the display.
    pub fn run(self: Arc<Self>, mut subscription: FilterSubscription) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = subscription.title.changed() => {
                        if changed.is_err() { break; }
                        let title = subscription.title.borrow_and_update().clone();
                        let controller = Arc::clone(&self);
                        tokio::spawn(async move { controller.apply_title_query(&title).await });
                    }
                    changed = subscription.year.changed() => {
                        if changed.is_err() { break; }
                        let year = *subscription.year.borrow_and_update();
                        let controller = Arc::clone(&self);
                        tokio::spawn(async move { controller.apply_year_query(year).await });
                    }
                    changed = subscription.sort.changed() => {
                        if changed.is_err() { break; }
                        let sort = *subscription.sort.borrow_and_update();
                        self.apply_sort(sort);
                    }
                }
            }
            debug!("Filter channel closed; listing controller stopped");
        })
    }

    /// Displays the full loaded list again.
    fn reset(&self) {
        debug!("Filters cleared; showing full list");
        self.publish_filtered(self.loaded(), None);
    }

    fn loaded(&self) -> Vec<Work> {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_loaded(&self, works: Vec<Work>) {
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner) = works;
    }

    /// Publishes `works` under the current phase.
    fn publish_filtered(&self, works: Vec<Work>, message: Option<String>) {
        let phase = self.view.borrow().phase;
        self.publish(phase, works, message);
    }

    fn publish(&self, phase: ListingPhase, mut works: Vec<Work>, message: Option<String>) {
        self.channel.sort_by().apply(&mut works);
        self.view.send_replace(ListingView {
            phase,
            works,
            message,
        });
    }
}

impl std::fmt::Debug for ListingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingController")
            .field("source", &self.source.name())
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Prepares a loaded listing for display.
///
/// Duplicate keys keep their first occurrence.
///
/// # Errors
///
/// Returns [`ListingError::MalformedWork`] when a key has no id segment.
pub fn shape_listing(works: Vec<Work>) -> Result<Vec<Work>, ListingError> {
    let mut seen = HashSet::new();
    let mut shaped = Vec::with_capacity(works.len());
    for work in works {
        if work.id().trim().is_empty() {
            return Err(ListingError::MalformedWork { key: work.key });
        }
        if seen.insert(work.key.clone()) {
            shaped.push(work);
        }
    }
    Ok(shaped)
}

fn no_match_message(query: &str) -> String {
    format!("No works match \"{query}\".")
}

fn search_failed_message(query: &str) -> String {
    format!("Could not search the catalog for \"{query}\". Check your connection and try again.")
}
