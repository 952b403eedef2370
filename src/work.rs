//! Canonical catalog types shared by the client and the controllers.
//!
//! Every upstream payload shape is mapped into [`Work`] before it leaves the
//! [`catalog`](crate::catalog) module, so controllers only ever see one shape.

use serde::{Deserialize, Serialize};

/// Prefix every canonical work key starts with.
pub const WORKS_PREFIX: &str = "/works/";

/// Host serving cover images, addressed by numeric cover id.
pub const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";

/// Title used when an upstream work has no usable title.
pub const UNTITLED: &str = "Untitled work";

const PLACEHOLDER_DESCRIPTION: &str =
    "The Open Library catalog could not be reached for this work. Check your network connection and try again.";

/// A single author credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
}

impl Author {
    /// Creates an author credit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A catalog entry for one title, independent of any printed edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    /// Canonical identifier, always of the form `/works/{id}`.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Optional subtitle.
    pub subtitle: Option<String>,
    /// Year of first publication, when known.
    pub first_publish_year: Option<i32>,
    /// Number of known editions.
    pub edition_count: Option<u32>,
    /// Numeric reference into the cover image service.
    pub cover_id: Option<i64>,
    /// Ordered author credits.
    pub authors: Vec<Author>,
    /// Plain-text description (synthesized when upstream has none).
    pub description: String,
}

impl Work {
    /// Creates a work with only a key and title set.
    ///
    /// The key is normalized to the `/works/` form; the description stays empty
    /// until the work passes through enrichment.
    #[must_use]
    pub fn new(key: &str, title: impl Into<String>) -> Self {
        Self {
            key: normalize_work_key(key),
            title: title.into(),
            subtitle: None,
            first_publish_year: None,
            edition_count: None,
            cover_id: None,
            authors: Vec::new(),
            description: String::new(),
        }
    }

    /// Builds the synthetic work shown when a lookup cannot be completed.
    ///
    /// The title always names the requested id so the user can tell which
    /// lookup failed.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        let id = id.trim();
        let title = if id.is_empty() {
            "Unable to load work".to_string()
        } else {
            format!("Unable to load {id}")
        };
        Self {
            key: normalize_work_key(id),
            title,
            subtitle: None,
            first_publish_year: None,
            edition_count: None,
            cover_id: None,
            authors: Vec::new(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }

    /// Returns the bare id segment of the key (`OL45804W` for `/works/OL45804W`).
    ///
    /// This is the segment the detail route is parameterized by.
    #[must_use]
    pub fn id(&self) -> &str {
        self.key
            .strip_prefix(WORKS_PREFIX)
            .unwrap_or(&self.key)
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Returns the author names in credit order.
    #[must_use]
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|author| author.name.as_str()).collect()
    }

    /// Returns the cover image URL for this work, if it has a cover.
    #[must_use]
    pub fn cover_url(&self, size: CoverSize) -> Option<String> {
        self.cover_id.and_then(|id| cover_url(id, size))
    }
}

/// Size code understood by the cover image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    /// Thumbnail used in list rows.
    Medium,
    /// Full-size image used on the detail view.
    Large,
}

impl CoverSize {
    /// Returns the single-letter size code used in cover URLs.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Medium => "M",
            Self::Large => "L",
        }
    }
}

/// Derives a cover image URL from a numeric cover id.
///
/// Open Library uses non-positive ids to mean "no cover", so those yield `None`.
#[must_use]
pub fn cover_url(cover_id: i64, size: CoverSize) -> Option<String> {
    if cover_id <= 0 {
        return None;
    }
    Some(format!(
        "{COVERS_BASE_URL}/b/id/{cover_id}-{}.jpg",
        size.code()
    ))
}

/// Normalizes a raw upstream key or bare id into the `/works/{id}` form.
#[must_use]
pub fn normalize_work_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with(WORKS_PREFIX) {
        return trimmed.to_string();
    }
    let without_slashes = trimmed.trim_start_matches('/');
    let bare = without_slashes
        .strip_prefix("works/")
        .unwrap_or(without_slashes);
    format!("{WORKS_PREFIX}{bare}")
}
