// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # shelfrank
//!
//! Reading coverage and book recommendations. For every book, count the
//! distinct pages read across all interval submissions from all readers, then
//! rank books by that coverage.
//!
//! ## Architecture
//!
//! - **Coverage** (`coverage`): sort-and-sweep engine for production, page
//!   enumeration engine as a correctness oracle
//! - **Ranking** (`rank`): deterministic top-K by coverage, then book id
//! - **Service** (`service`): stateless snapshot → coverage → ranking facade
//! - **Library** (`library`): JSON-backed catalog of books, readers, intervals
//!
//! ## Library usage
//!
//! ```
//! use shelfrank::coverage::{CoverageEngine, SweepCoverageEngine};
//! use shelfrank::model::{BookId, IntervalRecord};
//!
//! let intervals = [
//!     IntervalRecord::new(1, 10, 20),
//!     IntervalRecord::new(1, 15, 25),
//! ];
//! let coverage = SweepCoverageEngine::new().compute_coverage(&intervals).unwrap();
//! assert_eq!(coverage[&BookId(1)], 16);
//! ```

pub mod config;
pub mod coverage;
pub mod error;
pub mod library;
pub mod model;
pub mod paths;
pub mod rank;
pub mod service;
