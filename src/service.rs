//! Recommendation service: snapshot → coverage → top-K.
//!
//! The service holds no state between calls. Each request takes one snapshot
//! from the injected [`IntervalSupply`] and recomputes everything from it.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ShelfConfig;
use crate::coverage::{CoverageEngine, ReferenceCoverageEngine, SweepCoverageEngine};
use crate::error::ShelfResult;
use crate::model::{BookId, CoverageMap, IntervalRecord, RankedEntry};
use crate::rank::{BookNameLookup, RankingSelector};

/// One consistent read of all intervals and book names.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub intervals: Vec<IntervalRecord>,
    pub names: BTreeMap<BookId, String>,
}

impl BookNameLookup for Snapshot {
    fn book_name(&self, id: BookId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Source of interval snapshots.
pub trait IntervalSupply {
    fn snapshot(&self) -> ShelfResult<Snapshot>;
}

impl IntervalSupply for Snapshot {
    fn snapshot(&self) -> ShelfResult<Snapshot> {
        Ok(self.clone())
    }
}

impl<T: IntervalSupply + ?Sized> IntervalSupply for &T {
    fn snapshot(&self) -> ShelfResult<Snapshot> {
        (**self).snapshot()
    }
}

/// One book on which the sweeps and the reference engine disagree.
///
/// `None` means that engine produced no entry for the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMismatch {
    pub book_id: BookId,
    pub sweep: Option<u64>,
    pub parallel: Option<u64>,
    pub reference: Option<u64>,
}

/// Outcome of cross-checking both sweeps against the reference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Books checked.
    pub books: usize,
    /// Intervals in the snapshot.
    pub intervals: usize,
    pub mismatches: Vec<EngineMismatch>,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Stateless facade over a supply, a coverage engine, and a selector.
pub struct RecommendationService<S> {
    supply: S,
    engine: Box<dyn CoverageEngine>,
    selector: RankingSelector,
}

impl<S: IntervalSupply> RecommendationService<S> {
    /// Service with the default sweep engine and K = 5.
    pub fn new(supply: S) -> Self {
        Self {
            supply,
            engine: Box::new(SweepCoverageEngine::new()),
            selector: RankingSelector::default(),
        }
    }

    /// Service configured from `config` (engine, parallelism, K).
    pub fn from_config(supply: S, config: &ShelfConfig) -> Self {
        Self {
            supply,
            engine: config.engine.build(config.parallel),
            selector: RankingSelector::new(config.top_k),
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn CoverageEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.selector = RankingSelector::new(k);
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn top_k(&self) -> usize {
        self.selector.k()
    }

    /// Per-book coverage of the current snapshot.
    pub fn coverage(&self) -> ShelfResult<CoverageMap> {
        let snapshot = self.supply.snapshot()?;
        Ok(self.engine.compute_coverage(&snapshot.intervals)?)
    }

    /// Top-K books of the current snapshot.
    pub fn top_books(&self) -> ShelfResult<Vec<RankedEntry>> {
        let snapshot = self.supply.snapshot()?;
        let coverage = self.engine.compute_coverage(&snapshot.intervals)?;
        let ranked = self.selector.select(&coverage, &snapshot)?;
        tracing::debug!(
            engine = self.engine.name(),
            covered_books = coverage.len(),
            ranked = ranked.len(),
            "computed recommendations"
        );
        Ok(ranked)
    }

    /// Run the sequential sweep, the parallel sweep, and the reference engine
    /// over one snapshot and report any disagreement.
    pub fn verify(&self) -> ShelfResult<VerificationReport> {
        let snapshot = self.supply.snapshot()?;
        let sweep = SweepCoverageEngine::new().compute_coverage(&snapshot.intervals)?;
        let parallel = SweepCoverageEngine::parallel().compute_coverage(&snapshot.intervals)?;
        let reference = ReferenceCoverageEngine::new().compute_coverage(&snapshot.intervals)?;

        let (books, mismatches) = compare(&sweep, &parallel, &reference);
        if !mismatches.is_empty() {
            tracing::warn!(books = mismatches.len(), "coverage engines disagree");
        }
        Ok(VerificationReport {
            books,
            intervals: snapshot.intervals.len(),
            mismatches,
        })
    }
}

/// Count the books seen by any engine and list those where either sweep
/// differs from the reference.
fn compare(
    sweep: &CoverageMap,
    parallel: &CoverageMap,
    reference: &CoverageMap,
) -> (usize, Vec<EngineMismatch>) {
    let books: BTreeSet<BookId> = sweep
        .keys()
        .chain(parallel.keys())
        .chain(reference.keys())
        .copied()
        .collect();

    let mismatches = books
        .iter()
        .map(|&book_id| EngineMismatch {
            book_id,
            sweep: sweep.get(&book_id).copied(),
            parallel: parallel.get(&book_id).copied(),
            reference: reference.get(&book_id).copied(),
        })
        .filter(|m| m.sweep != m.reference || m.parallel != m.reference)
        .collect();

    (books.len(), mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::EngineKind;
    use crate::error::{CoverageError, ShelfError};

    fn snapshot() -> Snapshot {
        Snapshot {
            intervals: vec![
                IntervalRecord::new(1, 10, 20),
                IntervalRecord::new(1, 15, 25),
                IntervalRecord::new(2, 1, 100),
                IntervalRecord::new(3, 5, 6),
            ],
            names: [
                (BookId(1), "Solaris".to_string()),
                (BookId(2), "Dune".to_string()),
                (BookId(3), "Ubik".to_string()),
                (BookId(4), "Unread".to_string()),
            ]
            .into(),
        }
    }

    #[test]
    fn top_books_ranks_snapshot() {
        let service = RecommendationService::new(snapshot());
        let ranked = service.top_books().unwrap();
        let ids: Vec<u64> = ranked.iter().map(|e| e.book_id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(ranked[1].num_of_read_pages, 16);
        assert_eq!(ranked[1].book_name, "Solaris");
    }

    #[test]
    fn unread_books_never_ranked() {
        let ranked = RecommendationService::new(snapshot()).with_top_k(10).top_books().unwrap();
        assert!(ranked.iter().all(|e| e.book_id != BookId(4)));
    }

    #[test]
    fn reference_engine_gives_same_ranking() {
        let sweep = RecommendationService::new(snapshot()).top_books().unwrap();
        let reference = RecommendationService::new(snapshot())
            .with_engine(EngineKind::Reference.build(false))
            .top_books()
            .unwrap();
        assert_eq!(sweep, reference);
    }

    #[test]
    fn from_config_applies_settings() {
        let config = ShelfConfig {
            top_k: 2,
            engine: EngineKind::Sweep,
            parallel: true,
            ..Default::default()
        };
        let service = RecommendationService::from_config(snapshot(), &config);
        assert_eq!(service.engine_name(), "sweep-parallel");
        assert_eq!(service.top_books().unwrap().len(), 2);
    }

    #[test]
    fn missing_name_surfaces_inconsistency() {
        let mut snap = snapshot();
        snap.names.remove(&BookId(3));
        let err = RecommendationService::new(snap).top_books().unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Coverage(CoverageError::DataInconsistency { book_id: 3 })
        ));
    }

    #[test]
    fn verify_reports_consistency() {
        let report = RecommendationService::new(snapshot()).verify().unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.books, 3);
        assert_eq!(report.intervals, 4);
    }

    #[test]
    fn compare_flags_a_disagreeing_parallel_sweep() {
        let agreed: CoverageMap = [(BookId(1), 11), (BookId(2), 4)].into();
        let parallel: CoverageMap = [(BookId(1), 11), (BookId(2), 5), (BookId(3), 2)].into();

        let (books, mismatches) = compare(&agreed, &parallel, &agreed);
        assert_eq!(books, 3);
        assert_eq!(
            mismatches,
            vec![
                EngineMismatch {
                    book_id: BookId(2),
                    sweep: Some(4),
                    parallel: Some(5),
                    reference: Some(4),
                },
                EngineMismatch {
                    book_id: BookId(3),
                    sweep: None,
                    parallel: Some(2),
                    reference: None,
                },
            ]
        );
    }

    #[test]
    fn compare_flags_a_disagreeing_sequential_sweep() {
        let reference: CoverageMap = [(BookId(1), 11)].into();
        let sweep: CoverageMap = [(BookId(1), 10)].into();
        let (_, mismatches) = compare(&sweep, &reference, &reference);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].sweep, Some(10));
        assert_eq!(mismatches[0].parallel, Some(11));
    }

    #[test]
    fn empty_snapshot_is_empty_ranking() {
        let service = RecommendationService::new(Snapshot::default());
        assert!(service.top_books().unwrap().is_empty());
        assert!(service.coverage().unwrap().is_empty());
    }
}
