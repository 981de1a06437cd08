//! Reference coverage engine: enumerate every page explicitly.
//!
//! Cost is proportional to the summed interval lengths, so this is for
//! verification and small catalogs only.

use std::collections::{BTreeMap, BTreeSet};

use crate::coverage::CoverageEngine;
use crate::error::CoverageResult;
use crate::model::{BookId, CoverageMap, IntervalRecord, Page, validate_all};

/// Set-expansion coverage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCoverageEngine;

impl ReferenceCoverageEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CoverageEngine for ReferenceCoverageEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn compute_coverage(&self, intervals: &[IntervalRecord]) -> CoverageResult<CoverageMap> {
        validate_all(intervals)?;

        let mut pages: BTreeMap<BookId, BTreeSet<Page>> = BTreeMap::new();
        for iv in intervals {
            pages
                .entry(iv.book_id)
                .or_default()
                .extend(iv.start_page..=iv.end_page);
        }
        tracing::debug!(
            records = intervals.len(),
            books = pages.len(),
            "expanded interval pages"
        );

        Ok(pages
            .into_iter()
            .map(|(book, set)| (book, set.len() as u64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_distinct_pages() {
        let records = [
            IntervalRecord::new(1, 10, 20),
            IntervalRecord::new(1, 15, 25),
            IntervalRecord::new(1, 40, 41),
        ];
        let coverage = ReferenceCoverageEngine::new().compute_coverage(&records).unwrap();
        assert_eq!(coverage[&BookId(1)], 16 + 2);
    }

    #[test]
    fn books_without_intervals_are_absent() {
        let records = [IntervalRecord::new(5, 1, 2)];
        let coverage = ReferenceCoverageEngine::new().compute_coverage(&records).unwrap();
        assert_eq!(coverage.len(), 1);
        assert!(!coverage.contains_key(&BookId(4)));
    }

    #[test]
    fn rejects_malformed_records() {
        let records = [IntervalRecord::new(1, 0, 3)];
        assert!(ReferenceCoverageEngine::new().compute_coverage(&records).is_err());
    }
}
