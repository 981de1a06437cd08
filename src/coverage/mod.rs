//! Per-book coverage: the number of distinct pages read across all intervals.
//!
//! Two engines share the [`CoverageEngine`] contract:
//!
//! - [`SweepCoverageEngine`]: sort each book's intervals by start page and sweep
//!   a monotonic frontier. O(N log N), never materializes pages.
//! - [`ReferenceCoverageEngine`]: expands every interval into explicit pages and
//!   counts the set. Exact by construction, used to cross-check the sweep.
//!
//! Both validate every record first and return a map that contains exactly the
//! books with at least one interval.

pub mod reference;
pub mod sweep;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoverageResult;
use crate::model::{BookId, CoverageMap, IntervalRecord, Page};

pub use reference::ReferenceCoverageEngine;
pub use sweep::SweepCoverageEngine;

/// Computes per-book coverage from a snapshot of interval records.
pub trait CoverageEngine: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Map each book with at least one interval to its count of distinct pages.
    fn compute_coverage(&self, intervals: &[IntervalRecord]) -> CoverageResult<CoverageMap>;
}

/// Selects a coverage engine by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Sweep,
    Reference,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sweep => "sweep",
            Self::Reference => "reference",
        }
    }

    /// Build the engine. `parallel` only affects the sweep.
    pub fn build(self, parallel: bool) -> Box<dyn CoverageEngine> {
        match self {
            Self::Sweep if parallel => Box::new(SweepCoverageEngine::parallel()),
            Self::Sweep => Box::new(SweepCoverageEngine::new()),
            Self::Reference => Box::new(ReferenceCoverageEngine::new()),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sweep" => Ok(Self::Sweep),
            "reference" | "oracle" => Ok(Self::Reference),
            other => Err(format!("unknown engine \"{other}\" (expected sweep or reference)")),
        }
    }
}

/// Group `(start, end)` ranges by book. Books come out in id order.
pub(crate) fn partition_by_book(
    intervals: &[IntervalRecord],
) -> BTreeMap<BookId, Vec<(Page, Page)>> {
    let mut partitions: BTreeMap<BookId, Vec<(Page, Page)>> = BTreeMap::new();
    for iv in intervals {
        partitions
            .entry(iv.book_id)
            .or_default()
            .push((iv.start_page, iv.end_page));
    }
    partitions
}
