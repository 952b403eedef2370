//! Sort options and the stable sort applied to displayed lists.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::work::Work;

/// Field a list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Case-insensitive title order.
    Title,
    /// First publication year; a missing year sorts as 0.
    Year,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A field plus direction, written `title-asc`, `year-desc` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    /// Field to order by.
    pub field: SortField,
    /// Direction of the ordering.
    pub direction: SortDirection,
}

impl SortOption {
    /// `title-asc`, the initial sort.
    pub const TITLE_ASC: Self = Self::new(SortField::Title, SortDirection::Asc);
    /// `title-desc`.
    pub const TITLE_DESC: Self = Self::new(SortField::Title, SortDirection::Desc);
    /// `year-asc`.
    pub const YEAR_ASC: Self = Self::new(SortField::Year, SortDirection::Asc);
    /// `year-desc`.
    pub const YEAR_DESC: Self = Self::new(SortField::Year, SortDirection::Desc);

    /// Creates a sort option.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two works under this option.
    #[must_use]
    pub fn compare(self, a: &Work, b: &Work) -> Ordering {
        let ordering = match self.field {
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Year => a
                .first_publish_year
                .unwrap_or(0)
                .cmp(&b.first_publish_year.unwrap_or(0)),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sorts `works` in place. The sort is stable: works with equal keys keep
    /// their relative order in both directions.
    pub fn apply(self, works: &mut [Work]) {
        works.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for SortOption {
    fn default() -> Self {
        Self::TITLE_ASC
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::Title => "title",
            SortField::Year => "year",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{field}-{direction}")
    }
}

/// Error returned when parsing an unknown sort option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort option '{0}' (expected title-asc, title-desc, year-asc or year-desc)")]
pub struct ParseSortOptionError(String);

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title-asc" => Ok(Self::TITLE_ASC),
            "title-desc" => Ok(Self::TITLE_DESC),
            "year-asc" => Ok(Self::YEAR_ASC),
            "year-desc" => Ok(Self::YEAR_DESC),
            _ => Err(ParseSortOptionError(value.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn work(title: &str, year: Option<i32>) -> Work {
        let mut work = Work::new(&format!("OL{title}W"), title);
        work.first_publish_year = year;
        work
    }

    fn titles(works: &[Work]) -> Vec<&str> {
        works.iter().map(|w| w.title.as_str()).collect()
    }

    #[test]
    fn test_title_asc_orders_alphabetically() {
        let mut works = vec![work("B", Some(2000)), work("A", Some(1999))];
        SortOption::TITLE_ASC.apply(&mut works);
        assert_eq!(titles(&works), ["A", "B"]);
    }

    #[test]
    fn test_year_desc_orders_newest_first() {
        let mut works = vec![work("A", Some(1999)), work("B", Some(2000))];
        SortOption::YEAR_DESC.apply(&mut works);
        assert_eq!(titles(&works), ["B", "A"]);
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let mut works = vec![work("banana", None), work("Apple", None), work("cherry", None)];
        SortOption::TITLE_ASC.apply(&mut works);
        assert_eq!(titles(&works), ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_missing_year_sorts_as_zero() {
        let mut works = vec![work("Dated", Some(1850)), work("Undated", None)];
        SortOption::YEAR_ASC.apply(&mut works);
        assert_eq!(titles(&works), ["Undated", "Dated"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys_in_both_directions() {
        let original = vec![work("X", Some(2000)), work("Y", Some(2000)), work("Z", Some(1990))];

        let mut asc = original.clone();
        SortOption::YEAR_ASC.apply(&mut asc);
        assert_eq!(titles(&asc), ["Z", "X", "Y"]);

        let mut desc = original;
        SortOption::YEAR_DESC.apply(&mut desc);
        assert_eq!(titles(&desc), ["X", "Y", "Z"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut once = vec![work("b", Some(3)), work("A", Some(1)), work("c", Some(2))];
        SortOption::TITLE_DESC.apply(&mut once);
        let mut twice = once.clone();
        SortOption::TITLE_DESC.apply(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_option_round_trips_through_display() {
        for option in [
            SortOption::TITLE_ASC,
            SortOption::TITLE_DESC,
            SortOption::YEAR_ASC,
            SortOption::YEAR_DESC,
        ] {
            assert_eq!(option.to_string().parse::<SortOption>().unwrap(), option);
        }
    }

    #[test]
    fn test_sort_option_rejects_unknown_value() {
        let err = "rating-asc".parse::<SortOption>().unwrap_err();
        assert!(err.to_string().contains("rating-asc"));
    }

    #[test]
    fn test_sort_option_default_is_title_asc() {
        assert_eq!(SortOption::default(), SortOption::TITLE_ASC);
    }
}
