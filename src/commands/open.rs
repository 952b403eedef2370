//! Route surface: maps a path to the list or detail view.

use anyhow::Result;
use tracing::info;

use crate::app_config::EffectiveConfig;
use crate::cli::ListArgs;

/// A resolved view route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The list view (root path).
    List,
    /// The detail view for a work id.
    Detail(String),
}

impl Route {
    /// Parses a route path. Anything that is neither the root nor
    /// `book/{id}` redirects to the list view.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('/');

        let mut segments = path.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Self::List,
            (Some("book"), Some(id), None) if !id.trim().is_empty() => {
                Self::Detail(id.trim().to_string())
            }
            _ => {
                info!(path, "Unknown route; redirecting to the list view");
                Self::List
            }
        }
    }
}

pub async fn run_open_command(route: &str, config: &EffectiveConfig) -> Result<()> {
    match Route::parse(route) {
        Route::List => super::run_list_command(&ListArgs::default(), config).await,
        Route::Detail(id) => super::run_show_command(&id, config).await,
    }
}
