//! Property tests for the coverage engines and the ranking selector.
//!
//! Inputs are generated by quickcheck as raw tuples and folded into valid
//! interval records, so every property runs on well-formed data.

use std::collections::BTreeMap;

use quickcheck::{QuickCheck, TestResult};
use rand::SeedableRng;
use rand::seq::SliceRandom;

use shelfrank::coverage::{CoverageEngine, ReferenceCoverageEngine, SweepCoverageEngine};
use shelfrank::model::{BookId, IntervalRecord};
use shelfrank::rank::rank_top_k;

/// `(book, start, extra length)` folded into a valid record on a few books.
fn records(raw: &[(u8, u16, u8)]) -> Vec<IntervalRecord> {
    raw.iter()
        .map(|&(book, start, extra)| {
            let start = u32::from(start % 500) + 1;
            let end = start + u32::from(extra % 120) + 1;
            IntervalRecord::new(u64::from(book % 8), start, end)
        })
        .collect()
}

fn names_for(books: impl IntoIterator<Item = BookId>) -> BTreeMap<BookId, String> {
    books.into_iter().map(|b| (b, format!("Book {b}"))).collect()
}

fn qc() -> QuickCheck {
    QuickCheck::new().tests(300)
}

#[test]
fn sweep_matches_reference() {
    fn prop(raw: Vec<(u8, u16, u8)>) -> bool {
        let recs = records(&raw);
        let sweep = SweepCoverageEngine::new().compute_coverage(&recs).unwrap();
        let reference = ReferenceCoverageEngine::new().compute_coverage(&recs).unwrap();
        sweep == reference
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>) -> bool);
}

#[test]
fn parallel_sweep_matches_reference() {
    fn prop(raw: Vec<(u8, u16, u8)>) -> bool {
        let recs = records(&raw);
        let sweep = SweepCoverageEngine::parallel().compute_coverage(&recs).unwrap();
        let reference = ReferenceCoverageEngine::new().compute_coverage(&recs).unwrap();
        sweep == reference
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>) -> bool);
}

#[test]
fn coverage_ignores_input_order() {
    fn prop(raw: Vec<(u8, u16, u8)>, seed: u64) -> bool {
        let recs = records(&raw);
        let mut shuffled = recs.clone();
        shuffled.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
        let mut reversed = recs.clone();
        reversed.reverse();

        let engine = SweepCoverageEngine::new();
        let base = engine.compute_coverage(&recs).unwrap();
        base == engine.compute_coverage(&shuffled).unwrap()
            && base == engine.compute_coverage(&reversed).unwrap()
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>, u64) -> bool);
}

#[test]
fn adding_an_interval_never_decreases_coverage() {
    fn prop(raw: Vec<(u8, u16, u8)>, extra: (u8, u16, u8)) -> bool {
        let mut recs = records(&raw);
        let added = records(&[extra])[0];
        let engine = SweepCoverageEngine::new();
        let before = engine.compute_coverage(&recs).unwrap();
        recs.push(added);
        let after = engine.compute_coverage(&recs).unwrap();

        let book = added.book_id;
        let grew = after[&book] >= before.get(&book).copied().unwrap_or(0);
        let others_unchanged = before
            .iter()
            .filter(|(b, _)| **b != book)
            .all(|(b, pages)| after[b] == *pages);
        grew && others_unchanged
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>, (u8, u16, u8)) -> bool);
}

#[test]
fn coverage_bounded_by_sum_and_max_of_lengths() {
    fn prop(raw: Vec<(u8, u16, u8)>) -> bool {
        let recs = records(&raw);
        let coverage = SweepCoverageEngine::new().compute_coverage(&recs).unwrap();
        coverage.iter().all(|(book, &pages)| {
            let lens: Vec<u64> = recs
                .iter()
                .filter(|r| r.book_id == *book)
                .map(IntervalRecord::page_count)
                .collect();
            let sum: u64 = lens.iter().sum();
            let max = lens.iter().copied().max().unwrap_or(0);
            pages <= sum && pages >= max
        })
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>) -> bool);
}

#[test]
fn ranking_size_and_order() {
    fn prop(raw: Vec<(u8, u16, u8)>, k: u8) -> TestResult {
        let k = usize::from(k % 12);
        let recs = records(&raw);
        let coverage = SweepCoverageEngine::new().compute_coverage(&recs).unwrap();
        let names = names_for(coverage.keys().copied());
        let ranked = rank_top_k(&coverage, &names, k).unwrap();

        if ranked.len() != k.min(coverage.len()) {
            return TestResult::failed();
        }
        let ordered = ranked.windows(2).all(|w| {
            w[0].num_of_read_pages > w[1].num_of_read_pages
                || (w[0].num_of_read_pages == w[1].num_of_read_pages && w[0].book_id < w[1].book_id)
        });
        // Every excluded book must not beat the last ranked one.
        let last = ranked.last().map(|e| (e.num_of_read_pages, e.book_id));
        let cutoff_holds = coverage.iter().all(|(book, &pages)| {
            ranked.iter().any(|e| e.book_id == *book)
                || last.is_none_or(|(lp, lb)| pages < lp || (pages == lp && *book > lb))
        });
        TestResult::from_bool(ordered && cutoff_holds)
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>, u8) -> TestResult);
}

#[test]
fn books_without_intervals_never_ranked() {
    fn prop(raw: Vec<(u8, u16, u8)>) -> bool {
        let recs = records(&raw);
        let coverage = SweepCoverageEngine::new().compute_coverage(&recs).unwrap();
        // Names for every possible book, read or not.
        let names = names_for((0..8).map(BookId));
        let ranked = rank_top_k(&coverage, &names, 8).unwrap();
        ranked
            .iter()
            .all(|e| recs.iter().any(|r| r.book_id == e.book_id))
    }
    qc().quickcheck(prop as fn(Vec<(u8, u16, u8)>) -> bool);
}
