//! Local (in-memory) filtering over the loaded listing.

use crate::work::Work;

/// Allowed distance between a work's first publication year and the queried
/// year. Year metadata is often approximate across editions.
pub const YEAR_TOLERANCE: i32 = 2;

/// Returns `true` when `query` occurs case-insensitively in the work's title,
/// subtitle or description.
#[must_use]
pub fn matches_title(work: &Work, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(&needle);
    contains(&work.title)
        || work.subtitle.as_deref().is_some_and(contains)
        || contains(&work.description)
}

/// Returns `true` when the work's year is within [`YEAR_TOLERANCE`] of `year`.
/// Works without a year never match.
#[must_use]
pub fn matches_year(work: &Work, year: i32) -> bool {
    work.first_publish_year
        .is_some_and(|published| published.abs_diff(year) <= YEAR_TOLERANCE.unsigned_abs())
}

/// Works from `works` matching a title query, in their original order.
#[must_use]
pub fn filter_by_title(works: &[Work], query: &str) -> Vec<Work> {
    works
        .iter()
        .filter(|work| matches_title(work, query))
        .cloned()
        .collect()
}

/// Works from `works` published within the tolerance window of `year`.
#[must_use]
pub fn filter_by_year(works: &[Work], year: i32) -> Vec<Work> {
    works
        .iter()
        .filter(|work| matches_year(work, year))
        .cloned()
        .collect()
}
