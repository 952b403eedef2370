//! Typed upstream response shapes and their mapping into [`Work`].
//!
//! Open Library returns three different document shapes for the same kind of
//! entity: subject listing works, search documents and work detail records.
//! Each gets its own struct and a pure `into_work` mapping. Mapped works still
//! need [`enrich`](super::enrich::enrich) before they leave the client.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::work::{Author, Work, normalize_work_key};

use super::CatalogError;
use super::enrich::UNKNOWN_AUTHOR;

#[allow(clippy::expect_used)]
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})\b").expect("year regex is valid") // Static pattern, safe to panic
});

// ==================== Field shapes ====================

/// An author entry as it appears in any upstream payload.
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAuthor {
    /// `"Ursula K. Le Guin"`
    Name(String),
    /// `{"key": "/authors/OL1A", "name": "Ursula K. Le Guin"}`
    Named { name: String },
    /// `{"author": {"key": "/authors/OL1A"}, "type": {...}}` (work detail records)
    Role { author: AuthorRef },
    /// Anything else.
    Other(serde_json::Value),
}

/// The nested author reference used by work detail records.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthorRef {
    pub name: Option<String>,
}

impl RawAuthor {
    /// Resolves the entry into an author credit.
    ///
    /// Object entries without a usable name become [`UNKNOWN_AUTHOR`]; entries
    /// that are not author-like at all (null, numbers, arrays, blank strings)
    /// yield `None` and are dropped.
    pub(crate) fn resolve(&self) -> Option<Author> {
        match self {
            Self::Name(name) => non_blank(name).map(Author::new),
            Self::Named { name } => {
                Some(Author::new(non_blank(name).unwrap_or(UNKNOWN_AUTHOR)))
            }
            Self::Role { author } => Some(Author::new(
                author
                    .name
                    .as_deref()
                    .and_then(non_blank)
                    .unwrap_or(UNKNOWN_AUTHOR),
            )),
            Self::Other(serde_json::Value::Object(_)) => Some(Author::new(UNKNOWN_AUTHOR)),
            Self::Other(_) => None,
        }
    }
}

/// A description as it appears upstream: plain text or a typed value object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawDescription {
    /// `"A novel about..."`
    Text(String),
    /// `{"type": "/type/text", "value": "A novel about..."}`
    Wrapped { value: String },
    /// Anything else.
    Other(serde_json::Value),
}

impl RawDescription {
    /// Normalizes into plain text.
    ///
    /// Unexpected shapes are logged and treated as absent so enrichment can
    /// synthesize a replacement.
    pub(crate) fn into_text(self, origin: &str) -> Option<String> {
        match self {
            Self::Text(text) | Self::Wrapped { value: text } => {
                non_blank(&text).map(str::to_string)
            }
            Self::Other(serde_json::Value::Null) => None,
            Self::Other(other) => {
                let error = CatalogError::malformed(
                    "description",
                    origin,
                    &format!("expected string or {{value}} object, got {}", json_kind(&other)),
                );
                debug!(error = %error, "Ignoring malformed description");
                None
            }
        }
    }
}

// ==================== Subject listing ====================

/// Response of `/subjects/{subject}.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct SubjectResponse {
    #[serde(default)]
    pub works: Vec<ListingDoc>,
}

/// A work entry in a subject listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub first_publish_year: Option<i32>,
    pub edition_count: Option<u32>,
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
    pub description: Option<RawDescription>,
}

impl ListingDoc {
    /// Maps the listing entry into a [`Work`]; entries without a key are dropped.
    pub(crate) fn into_work(self) -> Option<Work> {
        let Some(key) = self.key.as_deref().and_then(non_blank) else {
            debug!(title = ?self.title, "Dropping listing entry without a key");
            return None;
        };
        let key = normalize_work_key(key);
        let description = self
            .description
            .and_then(|raw| raw.into_text(&key))
            .unwrap_or_default();

        Some(Work {
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            first_publish_year: self.first_publish_year,
            edition_count: Some(self.edition_count.unwrap_or(1)),
            cover_id: self.cover_id.filter(|id| *id > 0),
            authors: resolve_authors(&self.authors),
            description,
            key,
        })
    }
}

// ==================== Search ====================

/// Response of `/search.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// A search result document; field names differ from the listing shape.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub first_publish_year: Option<i32>,
    pub edition_count: Option<u32>,
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub description: Option<RawDescription>,
}

impl SearchDoc {
    /// Maps the search document into a [`Work`]; documents without a key are dropped.
    pub(crate) fn into_work(self) -> Option<Work> {
        let Some(key) = self.key.as_deref().and_then(non_blank) else {
            debug!(title = ?self.title, "Dropping search document without a key");
            return None;
        };
        let key = normalize_work_key(key);
        let description = self
            .description
            .and_then(|raw| raw.into_text(&key))
            .unwrap_or_default();

        Some(Work {
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            first_publish_year: self.first_publish_year,
            edition_count: Some(self.edition_count.unwrap_or(1)),
            cover_id: self.cover_i.filter(|id| *id > 0),
            authors: self
                .author_name
                .iter()
                .filter_map(|name| non_blank(name).map(Author::new))
                .collect(),
            description,
            key,
        })
    }
}

// ==================== Work detail ====================

/// Response of `/works/{id}.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkDetail {
    pub key: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<RawDescription>,
    #[serde(default)]
    pub covers: Vec<Option<i64>>,
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
    pub first_publish_year: Option<i32>,
    pub first_publish_date: Option<String>,
    pub edition_count: Option<u32>,
}

impl WorkDetail {
    /// Maps the detail record into a [`Work`].
    ///
    /// A record without its own key falls back to the requested id.
    pub(crate) fn into_work(self, requested_id: &str) -> Work {
        let key = normalize_work_key(
            self.key
                .as_deref()
                .and_then(non_blank)
                .unwrap_or(requested_id),
        );
        let description = self
            .description
            .and_then(|raw| raw.into_text(&key))
            .unwrap_or_default();
        let cover_id = self
            .cover_id
            .into_iter()
            .chain(self.covers.into_iter().flatten())
            .find(|id| *id > 0);
        let first_publish_year = self
            .first_publish_year
            .or_else(|| self.first_publish_date.as_deref().and_then(year_from_date));

        Work {
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            first_publish_year,
            edition_count: Some(self.edition_count.unwrap_or(1)),
            cover_id,
            authors: resolve_authors(&self.authors),
            description,
            key,
        }
    }
}

// ==================== Helpers ====================

/// Resolves a list of raw author entries, dropping unusable ones.
pub(crate) fn resolve_authors(raw: &[RawAuthor]) -> Vec<Author> {
    raw.iter().filter_map(RawAuthor::resolve).collect()
}

/// Extracts the first four-digit year from a free-form date ("March 1954").
pub(crate) fn year_from_date(date: &str) -> Option<i32> {
    YEAR_PATTERN
        .captures(date)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
