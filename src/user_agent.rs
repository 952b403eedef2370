//! Shared User-Agent string for catalog HTTP clients.
//!
//! Open Library asks API consumers to identify themselves; every request this
//! crate makes carries the same identifying header.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/nicksrandall/catalog-browser";

/// Default User-Agent for catalog requests.
#[must_use]
pub(crate) fn default_catalog_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("catalog-browser/{version} (catalog-browser; +{PROJECT_UA_URL})")
}
