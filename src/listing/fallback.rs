//! Built-in listing shown when the loaded catalog cannot be shaped for display.

use crate::catalog::enrich;
use crate::work::{Author, Work};

/// (id, title, author, first publish year, cover id)
const DEFAULT_ENTRIES: [(&str, &str, &str, i32, Option<i64>); 5] = [
    ("OL1968W-TAOCP", "The Art of Computer Programming", "Donald E. Knuth", 1968, None),
    ("OL1978W-KR", "The C Programming Language", "Brian W. Kernighan", 1978, None),
    ("OL1985W-SICP", "Structure and Interpretation of Computer Programs", "Harold Abelson", 1985, None),
    ("OL1975W-MMM", "The Mythical Man-Month", "Frederick P. Brooks", 1975, None),
    ("OL1979W-GEB", "Gödel, Escher, Bach", "Douglas R. Hofstadter", 1979, None),
];

/// Returns the default payload, enriched like any other listing.
#[must_use]
pub fn default_works() -> Vec<Work> {
    DEFAULT_ENTRIES
        .iter()
        .map(|(id, title, author, year, cover_id)| {
            let mut work = Work::new(id, *title);
            work.authors = vec![Author::new(*author)];
            work.first_publish_year = Some(*year);
            work.edition_count = Some(1);
            work.cover_id = *cover_id;
            enrich(work)
        })
        .collect()
}
