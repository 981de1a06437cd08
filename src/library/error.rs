//! Rich diagnostic error types for the reading catalog.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::Page;

/// Errors from catalog operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("book not found: {id}")]
    #[diagnostic(
        code(shelf::library::book_not_found),
        help("No book with this ID exists in the catalog. List books with `shelfrank book list`.")
    )]
    BookNotFound { id: u64 },

    #[error("reader not found: {id}")]
    #[diagnostic(
        code(shelf::library::reader_not_found),
        help("No reader with this ID exists. List readers with `shelfrank reader list`.")
    )]
    ReaderNotFound { id: u64 },

    #[error("interval not found: {id}")]
    #[diagnostic(
        code(shelf::library::interval_not_found),
        help("List submitted intervals with `shelfrank interval list`.")
    )]
    IntervalNotFound { id: u64 },

    #[error("book {id} is not active")]
    #[diagnostic(
        code(shelf::library::book_inactive),
        help(
            "Intervals can only be submitted for active books. \
             Restore it with `shelfrank book restore {id}`."
        )
    )]
    BookInactive { id: u64 },

    #[error("duplicate title: \"{title}\" already exists in the catalog")]
    #[diagnostic(
        code(shelf::library::duplicate_title),
        help("Book titles are unique (case-insensitive). Choose a different title.")
    )]
    DuplicateTitle { title: String },

    #[error("reader {reader} already submitted pages {start_page}-{end_page} for book {book}")]
    #[diagnostic(
        code(shelf::library::duplicate_interval),
        help("Each reader can submit a given page range for a book only once.")
    )]
    DuplicateInterval {
        reader: u64,
        book: u64,
        start_page: Page,
        end_page: Page,
    },

    #[error("invalid page range {start_page}-{end_page}: {reason}")]
    #[diagnostic(
        code(shelf::library::invalid_range),
        help(
            "Page numbers run from 1 to the configured max_page, and the end \
             page must be greater than the start page."
        )
    )]
    InvalidRange {
        start_page: Page,
        end_page: Page,
        reason: String,
    },

    #[error("invalid book: {message}")]
    #[diagnostic(code(shelf::library::invalid_book))]
    InvalidBook { message: String },

    #[error("catalog I/O error: {message}")]
    #[diagnostic(
        code(shelf::library::catalog_io),
        help(
            "Failed to read or write the catalog. Check that the library \
             directory exists and has correct permissions."
        )
    )]
    CatalogIo { message: String },
}

/// Convenience alias for catalog operation results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
