//! Post-fetch normalization applied to every work leaving the client.
//!
//! After enrichment a work always has a non-blank title and a non-blank plain
//! text description.

use crate::work::{UNTITLED, Work};

/// Author label used when a work carries no resolvable author credit.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Builds the descriptive sentence used when upstream supplies no description.
///
/// Format: `"{title} by {authors}{ (year)}. {Available in n edition(s).}"`
#[must_use]
pub fn synthesize_description(work: &Work) -> String {
    let authors = if work.authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        work.author_names().join(", ")
    };
    let year = work
        .first_publish_year
        .map(|year| format!(" ({year})"))
        .unwrap_or_default();

    let mut description = format!("{} by {authors}{year}.", work.title);
    if let Some(count) = work.edition_count {
        description.push_str(&format!(" Available in {count} edition(s)."));
    }
    description
}

/// Guarantees the title and description invariants on a mapped work.
#[must_use]
pub fn enrich(mut work: Work) -> Work {
    if work.title.trim().is_empty() {
        work.title = UNTITLED.to_string();
    }
    if work.description.trim().is_empty() {
        work.description = synthesize_description(&work);
    }
    work
}
