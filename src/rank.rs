//! Top-K selection over per-book coverage.
//!
//! Books are ordered by coverage descending with ascending book id as the
//! tie-break, which gives a total order even when many books share the same
//! page count. Every covered book must have a name, whatever K is, but only
//! the selected books have their names copied into the result.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::error::{CoverageError, CoverageResult};
use crate::model::{BookId, CoverageMap, RankedEntry};

/// Default number of books in a recommendation list.
pub const DEFAULT_TOP_K: usize = 5;

/// Resolves a book id to its display name.
pub trait BookNameLookup {
    fn book_name(&self, id: BookId) -> Option<&str>;
}

impl BookNameLookup for HashMap<BookId, String> {
    fn book_name(&self, id: BookId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

impl BookNameLookup for BTreeMap<BookId, String> {
    fn book_name(&self, id: BookId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

impl<T: BookNameLookup + ?Sized> BookNameLookup for &T {
    fn book_name(&self, id: BookId) -> Option<&str> {
        (**self).book_name(id)
    }
}

/// Picks the K best-covered books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingSelector {
    k: usize,
}

impl Default for RankingSelector {
    fn default() -> Self {
        Self { k: DEFAULT_TOP_K }
    }
}

impl RankingSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Rank with this selector's K.
    pub fn select<N: BookNameLookup + ?Sized>(
        &self,
        coverage: &CoverageMap,
        names: &N,
    ) -> CoverageResult<Vec<RankedEntry>> {
        rank_top_k(coverage, names, self.k)
    }
}

/// Return at most `k` books ordered by coverage desc, then book id asc.
///
/// Fewer than `k` covered books yields all of them. Any covered book missing
/// from `names` is a `DataInconsistency` error, reported for the lowest such id.
pub fn rank_top_k<N: BookNameLookup + ?Sized>(
    coverage: &CoverageMap,
    names: &N,
    k: usize,
) -> CoverageResult<Vec<RankedEntry>> {
    if let Some(&book_id) = coverage.keys().find(|&&id| names.book_name(id).is_none()) {
        return Err(CoverageError::DataInconsistency { book_id: book_id.0 });
    }

    let mut order: Vec<(BookId, u64)> = coverage.iter().map(|(&id, &pages)| (id, pages)).collect();
    order.sort_unstable_by_key(|&(id, pages)| (Reverse(pages), id));
    order.truncate(k);

    order
        .into_iter()
        .map(|(book_id, num_of_read_pages)| {
            let book_name = names
                .book_name(book_id)
                .ok_or(CoverageError::DataInconsistency { book_id: book_id.0 })?;
            Ok(RankedEntry {
                book_id,
                book_name: book_name.to_owned(),
                num_of_read_pages,
            })
        })
        .collect()
}
