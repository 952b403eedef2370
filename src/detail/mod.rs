//! Detail controller: loads one work by id with a bounded loading timer.
//!
//! ```text
//! Loading ──fetch ok──────────────► Ready(work)
//!    │──fetch err────────────────► Fallback(placeholder)
//!    └──timer (3 s)──► Fallback(placeholder) ──late fetch ok──► Ready(work)
//! ```
//!
//! Expiry of the display timer does not cancel the fetch; a late success still
//! replaces the fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::CatalogSource;
use crate::work::{CoverSize, Work};

/// How long the detail view shows the loading state before falling back.
pub const DEFAULT_DISPLAY_TIMEOUT: Duration = Duration::from_secs(3);

/// What the detail view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Nothing requested yet.
    Idle,
    /// Fetch in flight for the id.
    Loading {
        /// The requested id
        id: String,
    },
    /// Work loaded.
    Ready(Work),
    /// Synthetic content shown after a failure or a slow fetch.
    Fallback(Work),
}

impl DetailState {
    /// The displayable work, if the state has one.
    #[must_use]
    pub fn work(&self) -> Option<&Work> {
        match self {
            Self::Ready(work) | Self::Fallback(work) => Some(work),
            Self::Idle | Self::Loading { .. } => None,
        }
    }

    /// Returns `true` once the state can be rendered as a work.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.work().is_some()
    }

    /// Large cover URL for the displayed work.
    #[must_use]
    pub fn cover_url(&self) -> Option<String> {
        self.work().and_then(|work| work.cover_url(CoverSize::Large))
    }
}

/// Drives the detail view.
pub struct DetailController {
    source: Arc<dyn CatalogSource>,
    display_timeout: Duration,
    state: watch::Sender<DetailState>,
}

impl DetailController {
    /// Creates a controller with the default 3 s display timer.
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_display_timeout(source, DEFAULT_DISPLAY_TIMEOUT)
    }

    /// Creates a controller with a custom display timer.
    #[must_use]
    pub fn with_display_timeout(source: Arc<dyn CatalogSource>, display_timeout: Duration) -> Self {
        let (state, _) = watch::channel(DetailState::Idle);
        Self {
            source,
            display_timeout,
            state,
        }
    }

    /// The configured display timer.
    #[must_use]
    pub fn display_timeout(&self) -> Duration {
        self.display_timeout
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Loads the work for `id`, returning once the fetch has settled.
    ///
    /// If the display timer fires first, the placeholder is published and the
    /// fetch keeps running.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: &str) {
        self.state.send_replace(DetailState::Loading { id: id.to_string() });

        let fetch = self.source.fetch_work(id);
        tokio::pin!(fetch);

        let result = tokio::select! {
            result = &mut fetch => result,
            () = tokio::time::sleep(self.display_timeout) => {
                info!(
                    timeout_ms = u64::try_from(self.display_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Detail still loading; showing placeholder"
                );
                self.state.send_replace(DetailState::Fallback(Work::placeholder(id)));
                fetch.await
            }
        };

        match result {
            Ok(work) => {
                debug!(key = %work.key, "Detail loaded");
                self.state.send_replace(DetailState::Ready(work));
            }
            Err(error) => {
                warn!(error = %error, "Detail fetch failed; showing placeholder");
                self.state.send_replace(DetailState::Fallback(Work::placeholder(id)));
            }
        }
    }

    /// Starts [`activate`](Self::activate) on a background task.
    pub fn open(self: &Arc<Self>, id: impl Into<String>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let id = id.into();
        tokio::spawn(async move { controller.activate(&id).await })
    }

    /// Waits until the state is displayable and returns it.
    pub async fn wait_displayable(&self) -> DetailState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(DetailState::is_displayable).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl std::fmt::Debug for DetailController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("source", &self.source.name())
            .field("display_timeout", &self.display_timeout)
            .finish_non_exhaustive()
    }
}
