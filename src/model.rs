//! Core data types shared by the coverage engines and the ranking selector.
//!
//! An [`IntervalRecord`] is one reading session: a closed, inclusive page range
//! submitted for a book. Coverage is derived from a snapshot of these records
//! and never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoverageError, CoverageResult};

/// A page number. Pages start at 1.
pub type Page = u32;

/// Unique identifier for a book in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u64);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderId(pub u64);

impl std::fmt::Display for ReaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted reading session: pages `start_page..=end_page` of a book.
///
/// A well-formed record has `start_page >= 1` and `end_page > start_page`,
/// so it always covers at least two pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub book_id: BookId,
    pub start_page: Page,
    pub end_page: Page,
}

impl IntervalRecord {
    pub fn new(book_id: impl Into<BookId>, start_page: Page, end_page: Page) -> Self {
        Self {
            book_id: book_id.into(),
            start_page,
            end_page,
        }
    }

    /// Check the shape invariants, returning `InvalidInterval` on violation.
    pub fn validate(&self) -> CoverageResult<()> {
        let reason = if self.start_page == 0 {
            "page numbers start at 1"
        } else if self.end_page <= self.start_page {
            "end page must be greater than start page"
        } else {
            return Ok(());
        };
        Err(CoverageError::InvalidInterval {
            book_id: self.book_id.0,
            start_page: self.start_page,
            end_page: self.end_page,
            reason: reason.into(),
        })
    }

    /// Number of pages in this interval on its own.
    pub fn page_count(&self) -> u64 {
        u64::from(self.end_page.saturating_sub(self.start_page)) + 1
    }
}

/// Validate a whole batch, failing on the first malformed record.
pub fn validate_all(records: &[IntervalRecord]) -> CoverageResult<()> {
    records.iter().try_for_each(IntervalRecord::validate)
}

/// Per-book count of distinct pages read.
///
/// Only books with at least one interval have an entry.
pub type CoverageMap = BTreeMap<BookId, u64>;

/// A single entry of a [`CoverageMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCoverage {
    pub book_id: BookId,
    pub total_unique_pages_read: u64,
}

/// Iterate a coverage map as [`BookCoverage`] entries in book-id order.
pub fn coverage_entries(coverage: &CoverageMap) -> impl Iterator<Item = BookCoverage> + '_ {
    coverage
        .iter()
        .map(|(&book_id, &total_unique_pages_read)| BookCoverage {
            book_id,
            total_unique_pages_read,
        })
}

/// One row of the top-K recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub book_id: BookId,
    pub book_name: String,
    pub num_of_read_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_interval_validates() {
        assert!(IntervalRecord::new(1, 1, 2).validate().is_ok());
        assert!(IntervalRecord::new(1, 10, 20).validate().is_ok());
    }

    #[test]
    fn zero_start_is_rejected() {
        let err = IntervalRecord::new(4, 0, 5).validate().unwrap_err();
        assert!(matches!(
            err,
            CoverageError::InvalidInterval { book_id: 4, start_page: 0, .. }
        ));
    }

    #[test]
    fn non_increasing_range_is_rejected() {
        assert!(IntervalRecord::new(1, 7, 7).validate().is_err());
        assert!(IntervalRecord::new(1, 9, 3).validate().is_err());
    }

    #[test]
    fn validate_all_stops_at_first_bad_record() {
        let records = [
            IntervalRecord::new(1, 1, 5),
            IntervalRecord::new(2, 6, 6),
            IntervalRecord::new(3, 0, 1),
        ];
        let err = validate_all(&records).unwrap_err();
        assert!(matches!(err, CoverageError::InvalidInterval { book_id: 2, .. }));
    }

    #[test]
    fn page_count_is_inclusive() {
        assert_eq!(IntervalRecord::new(1, 10, 20).page_count(), 11);
        assert_eq!(IntervalRecord::new(1, 1, 2).page_count(), 2);
    }

    #[test]
    fn ranked_entry_serializes_with_wire_names() {
        let entry = RankedEntry {
            book_id: BookId(3),
            book_name: "Dune".into(),
            num_of_read_pages: 42,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"book_id": 3, "book_name": "Dune", "num_of_read_pages": 42})
        );
    }
}
