//! Rich diagnostic error types for shelfrank.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know what went wrong and
//! where the fault lies (the core, the catalog, or the configuration).

use miette::Diagnostic;
use thiserror::Error;

use crate::model::Page;

/// Top-level error type for shelfrank.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ShelfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Library(#[from] crate::library::LibraryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),
}

/// Convenience alias for results across the crate.
pub type ShelfResult<T> = std::result::Result<T, ShelfError>;

// ---------------------------------------------------------------------------
// Coverage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CoverageError {
    #[error("invalid interval for book {book_id}: [{start_page}, {end_page}] ({reason})")]
    #[diagnostic(
        code(shelf::coverage::invalid_interval),
        help(
            "Intervals must satisfy 1 <= start_page < end_page. Malformed records \
             should be rejected before they reach the coverage engine; check the \
             component that supplied this snapshot."
        )
    )]
    InvalidInterval {
        book_id: u64,
        start_page: Page,
        end_page: Page,
        reason: String,
    },

    #[error("no book name found for book {book_id}")]
    #[diagnostic(
        code(shelf::coverage::data_inconsistency),
        help(
            "A book has reading intervals but is missing from the name lookup. \
             The interval snapshot and the book list are out of sync; check \
             referential integrity of the catalog."
        )
    )]
    DataInconsistency { book_id: u64 },
}

/// Result alias for the coverage core.
pub type CoverageResult<T> = std::result::Result<T, CoverageError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(shelf::config::read),
        help("Check that the file exists and is readable, or run `shelfrank init`.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(shelf::config::parse),
        help("The config file must be valid TOML. Compare it with the output of `shelfrank init`.")
    )]
    ConfigParse { path: String, message: String },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(shelf::config::write),
        help("Check that the parent directory is writable.")
    )]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(shelf::config::invalid))]
    Invalid { message: String },
}

/// Result alias for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
