//! Production coverage engine: sort by start page, then sweep a frontier.
//!
//! For one book, intervals sorted by ascending start page are folded into a
//! running `(frontier, total)` pair. `frontier` is the highest page covered by
//! the prefix processed so far, so each interval either opens a new run past
//! the frontier, extends the current run, or is already covered. Pages below
//! the frontier are never revisited, which is only sound in start order.

use rayon::prelude::*;

use crate::coverage::{CoverageEngine, partition_by_book};
use crate::error::CoverageResult;
use crate::model::{CoverageMap, IntervalRecord, Page, validate_all};

/// Sort-and-sweep coverage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepCoverageEngine {
    parallel: bool,
}

impl SweepCoverageEngine {
    /// Sequential sweep.
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Sweep independent books on the rayon pool.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }
}

impl CoverageEngine for SweepCoverageEngine {
    fn name(&self) -> &'static str {
        if self.parallel { "sweep-parallel" } else { "sweep" }
    }

    fn compute_coverage(&self, intervals: &[IntervalRecord]) -> CoverageResult<CoverageMap> {
        validate_all(intervals)?;

        let partitions = partition_by_book(intervals);
        tracing::debug!(
            records = intervals.len(),
            books = partitions.len(),
            parallel = self.parallel,
            "sweeping interval partitions"
        );

        let coverage = if self.parallel {
            partitions
                .into_par_iter()
                .map(|(book, mut ranges)| (book, sorted_union_size(&mut ranges)))
                .collect()
        } else {
            partitions
                .into_iter()
                .map(|(book, mut ranges)| (book, sorted_union_size(&mut ranges)))
                .collect()
        };
        Ok(coverage)
    }
}

/// Sort `ranges` by start page and return the size of their union.
fn sorted_union_size(ranges: &mut [(Page, Page)]) -> u64 {
    ranges.sort_unstable_by_key(|&(start, _)| start);
    sweep(ranges)
}

/// Size of the union of closed ranges already sorted by start page.
fn sweep(sorted: &[(Page, Page)]) -> u64 {
    debug_assert!(sorted.windows(2).all(|w| w[0].0 <= w[1].0));

    let mut frontier: Page = 0;
    let mut total: u64 = 0;
    for &(start, end) in sorted {
        if start > frontier {
            total += u64::from(end - start) + 1;
            frontier = end;
        } else if end > frontier {
            total += u64::from(end - frontier);
            frontier = end;
        }
    }
    total
}
