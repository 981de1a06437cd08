//! Demo data: random readers, books, and overlapping intervals.

use rand::Rng;

use crate::library::catalog::Catalog;
use crate::library::error::LibraryResult;

/// How much demo data to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPlan {
    pub readers: usize,
    pub books: usize,
    /// Probability that a given reader has read a given book.
    pub read_probability: f64,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            readers: 10,
            books: 10,
            read_probability: 0.5,
        }
    }
}

/// What [`seed_catalog`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub readers: usize,
    pub books: usize,
    pub intervals: usize,
}

/// Populate `catalog` following `plan`.
///
/// Every sampled interval starts in `1..=50` and ends in `51..=100`, so ranges
/// from different readers overlap heavily. Book titles are numbered after the
/// books already present so reseeding never collides.
pub fn seed_catalog(
    catalog: &mut Catalog,
    plan: SeedPlan,
    rng: &mut impl Rng,
) -> LibraryResult<SeedSummary> {
    let offset = catalog.books(Default::default()).len();
    let reader_offset = catalog.readers().len();

    let mut readers = Vec::with_capacity(plan.readers);
    for i in 0..plan.readers {
        let n = reader_offset + i + 1;
        let reader = catalog.add_reader(&format!("Reader {n}"), &format!("reader{n}@example.org"))?;
        readers.push(reader.id);
    }

    let mut books = Vec::with_capacity(plan.books);
    for i in 0..plan.books {
        let pages = rng.gen_range(100..=600);
        let book = catalog.add_book(&format!("Sample Book {}", offset + i + 1), pages)?;
        books.push(book.id);
    }

    let mut intervals = 0;
    for &reader in &readers {
        for &book in &books {
            if rng.gen_bool(plan.read_probability) {
                let start = rng.gen_range(1..=50);
                let end = rng.gen_range(51..=100);
                catalog.submit_interval(reader, book, start, end)?;
                intervals += 1;
            }
        }
    }

    tracing::info!(
        readers = readers.len(),
        books = books.len(),
        intervals,
        "seeded catalog"
    );
    Ok(SeedSummary {
        readers: readers.len(),
        books: books.len(),
        intervals,
    })
}
