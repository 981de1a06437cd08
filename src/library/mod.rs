//! Reading catalog: books, readers, and submitted reading intervals.
//!
//! The catalog is the interval supply for the recommendation service. It
//! enforces admission rules on submissions, persists everything to a JSON
//! file, and hands out consistent snapshots for coverage computation.

pub mod catalog;
pub mod error;
pub mod model;
pub mod notify;
pub mod seed;

pub use catalog::Catalog;
pub use error::{LibraryError, LibraryResult};
pub use model::{ActiveFilter, BookRecord, ReaderRecord, Submission};
pub use notify::{NoopNotifier, SubmissionNotifier, TracingNotifier};
pub use seed::{SeedPlan, SeedSummary, seed_catalog};
