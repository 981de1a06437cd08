//! Persistent reading catalog backed by `catalog.json`.
//!
//! The catalog holds books, readers, and every accepted interval submission.
//! Each mutation is applied to a copy of the catalog, written out, and only
//! then kept in memory, so a failed write leaves the catalog as it was.
//! Admission rules live here; the coverage core only ever sees the resulting
//! snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_PAGE, ShelfConfig};
use crate::error::ShelfResult;
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::{ActiveFilter, BookRecord, ReaderRecord, Submission};
use crate::library::notify::{SubmissionNotifier, TracingNotifier};
use crate::model::{BookId, IntervalRecord, Page, ReaderId};
use crate::rank::BookNameLookup;
use crate::service::{IntervalSupply, Snapshot};

/// Longest accepted book title, in characters.
pub const MAX_TITLE_LEN: usize = 1000;

/// On-disk catalog contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogData {
    books: Vec<BookRecord>,
    readers: Vec<ReaderRecord>,
    intervals: Vec<Submission>,
    next_book_id: u64,
    next_reader_id: u64,
    next_interval_id: u64,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            readers: Vec::new(),
            intervals: Vec::new(),
            next_book_id: 1,
            next_reader_id: 1,
            next_interval_id: 1,
        }
    }
}

impl CatalogData {
    fn book_mut(&mut self, id: BookId) -> LibraryResult<&mut BookRecord> {
        self.books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LibraryError::BookNotFound { id: id.0 })
    }

    fn submission_mut(&mut self, id: u64) -> LibraryResult<&mut Submission> {
        self.intervals
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(LibraryError::IntervalNotFound { id })
    }

    fn write(&self, path: &Path) -> LibraryResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LibraryError::CatalogIo {
                message: format!("create dir {}: {e}", parent.display()),
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| LibraryError::CatalogIo {
            message: format!("serialize catalog: {e}"),
        })?;
        std::fs::write(path, json).map_err(|e| LibraryError::CatalogIo {
            message: format!("write {}: {e}", path.display()),
        })
    }
}

/// Persistent index of books, readers, and reading intervals.
pub struct Catalog {
    path: PathBuf,
    data: CatalogData,
    max_page: Page,
    notifier: Box<dyn SubmissionNotifier>,
}

impl Catalog {
    /// Open or create a catalog at the given directory.
    ///
    /// The catalog file is `{dir}/catalog.json`. If it doesn't exist,
    /// starts empty.
    pub fn open(dir: &Path) -> LibraryResult<Self> {
        let path = dir.join("catalog.json");

        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| LibraryError::CatalogIo {
                message: format!("read {}: {e}", path.display()),
            })?;
            serde_json::from_str(&raw).map_err(|e| LibraryError::CatalogIo {
                message: format!("parse {}: {e}", path.display()),
            })?
        } else {
            CatalogData::default()
        };

        Ok(Self {
            path,
            data,
            max_page: DEFAULT_MAX_PAGE,
            notifier: Box::new(TracingNotifier),
        })
    }

    /// Open with admission limits taken from `config`.
    pub fn open_with(dir: &Path, config: &ShelfConfig) -> LibraryResult<Self> {
        let mut catalog = Self::open(dir)?;
        catalog.max_page = config.max_page;
        Ok(catalog)
    }

    pub fn with_notifier(mut self, notifier: Box<dyn SubmissionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Apply `change` to a copy of the catalog, write the copy, then keep it.
    ///
    /// If `change` or the write fails, the in-memory catalog is untouched.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut CatalogData) -> LibraryResult<T>,
    ) -> LibraryResult<T> {
        let mut next = self.data.clone();
        let out = change(&mut next)?;
        next.write(&self.path)?;
        self.data = next;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    /// Add an active book. Titles are unique ignoring case.
    pub fn add_book(&mut self, title: &str, number_of_pages: u32) -> LibraryResult<BookRecord> {
        let title = self.check_book(None, title, number_of_pages)?;
        let record = self.commit(|data| {
            let record = BookRecord {
                id: BookId(data.next_book_id),
                title,
                number_of_pages,
                is_active: true,
            };
            data.next_book_id += 1;
            data.books.push(record.clone());
            Ok(record)
        })?;
        tracing::info!(book = %record.id, title = %record.title, "book added");
        Ok(record)
    }

    /// Replace a book's title and page count.
    pub fn update_book(
        &mut self,
        id: BookId,
        title: &str,
        number_of_pages: u32,
    ) -> LibraryResult<BookRecord> {
        let title = self.check_book(Some(id), title, number_of_pages)?;
        self.commit(|data| {
            let book = data.book_mut(id)?;
            book.title = title;
            book.number_of_pages = number_of_pages;
            Ok(book.clone())
        })
    }

    /// Soft-delete a book. Its intervals still count toward coverage.
    pub fn deactivate_book(&mut self, id: BookId) -> LibraryResult<BookRecord> {
        self.set_active(id, false)
    }

    /// Undo [`Catalog::deactivate_book`].
    pub fn restore_book(&mut self, id: BookId) -> LibraryResult<BookRecord> {
        self.set_active(id, true)
    }

    fn set_active(&mut self, id: BookId, active: bool) -> LibraryResult<BookRecord> {
        let record = self.commit(|data| {
            let book = data.book_mut(id)?;
            book.is_active = active;
            Ok(book.clone())
        })?;
        tracing::info!(book = %id, active, "book status changed");
        Ok(record)
    }

    pub fn book(&self, id: BookId) -> Option<&BookRecord> {
        self.data.books.iter().find(|b| b.id == id)
    }

    /// Books matching `filter`, newest first.
    pub fn books(&self, filter: ActiveFilter) -> Vec<&BookRecord> {
        let mut books: Vec<_> = self.data.books.iter().filter(|b| filter.matches(b)).collect();
        books.sort_by(|a, b| b.id.cmp(&a.id));
        books
    }

    fn check_book(&self, id: Option<BookId>, title: &str, pages: u32) -> LibraryResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LibraryError::InvalidBook {
                message: "title must not be empty".into(),
            });
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(LibraryError::InvalidBook {
                message: format!("title longer than {MAX_TITLE_LEN} characters"),
            });
        }
        if pages == 0 || pages > self.max_page {
            return Err(LibraryError::InvalidBook {
                message: format!("number of pages must be between 1 and {}", self.max_page),
            });
        }
        let taken = self
            .data
            .books
            .iter()
            .any(|b| Some(b.id) != id && b.title.eq_ignore_ascii_case(title));
        if taken {
            return Err(LibraryError::DuplicateTitle {
                title: title.to_string(),
            });
        }
        Ok(title.to_string())
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn add_reader(&mut self, name: &str, email: &str) -> LibraryResult<ReaderRecord> {
        let record = self.commit(|data| {
            let record = ReaderRecord {
                id: ReaderId(data.next_reader_id),
                name: name.trim().to_string(),
                email: email.trim().to_string(),
            };
            data.next_reader_id += 1;
            data.readers.push(record.clone());
            Ok(record)
        })?;
        tracing::info!(reader = %record.id, "reader added");
        Ok(record)
    }

    pub fn reader(&self, id: ReaderId) -> Option<&ReaderRecord> {
        self.data.readers.iter().find(|r| r.id == id)
    }

    pub fn readers(&self) -> &[ReaderRecord] {
        &self.data.readers
    }

    // -----------------------------------------------------------------------
    // Intervals
    // -----------------------------------------------------------------------

    /// Accept a reading interval and notify.
    ///
    /// The reader and book must exist, the book must be active, the range must
    /// satisfy `1 <= start < end <= max_page`, and the reader must not have
    /// submitted the same range for this book before.
    pub fn submit_interval(
        &mut self,
        reader_id: ReaderId,
        book_id: BookId,
        start_page: Page,
        end_page: Page,
    ) -> LibraryResult<Submission> {
        let reader = self
            .reader(reader_id)
            .ok_or(LibraryError::ReaderNotFound { id: reader_id.0 })?
            .clone();
        let book = self
            .book(book_id)
            .ok_or(LibraryError::BookNotFound { id: book_id.0 })?
            .clone();
        if !book.is_active {
            return Err(LibraryError::BookInactive { id: book_id.0 });
        }
        self.check_range(start_page, end_page)?;

        let interval = IntervalRecord::new(book_id, start_page, end_page);
        self.check_unique(reader_id, &interval, None)?;

        let submission = self.commit(|data| {
            let submission = Submission {
                id: data.next_interval_id,
                reader_id,
                interval,
                submitted_at: now_secs(),
            };
            data.next_interval_id += 1;
            data.intervals.push(submission.clone());
            Ok(submission)
        })?;

        self.notifier.submitted(&reader, &book, &submission);
        Ok(submission)
    }

    /// Rewrite a stored submission.
    ///
    /// `reader_id` and `book_id` move the submission to another reader or
    /// book; `None` keeps the stored one. Both must exist, the range follows
    /// the submission rules, and the result must not duplicate another
    /// submission. Moving onto an inactive book is allowed.
    pub fn update_interval(
        &mut self,
        id: u64,
        reader_id: Option<ReaderId>,
        book_id: Option<BookId>,
        start_page: Page,
        end_page: Page,
    ) -> LibraryResult<Submission> {
        let current = self
            .submission(id)
            .ok_or(LibraryError::IntervalNotFound { id })?;
        let reader_id = reader_id.unwrap_or(current.reader_id);
        let book_id = book_id.unwrap_or(current.interval.book_id);

        if self.reader(reader_id).is_none() {
            return Err(LibraryError::ReaderNotFound { id: reader_id.0 });
        }
        if self.book(book_id).is_none() {
            return Err(LibraryError::BookNotFound { id: book_id.0 });
        }
        self.check_range(start_page, end_page)?;

        let interval = IntervalRecord::new(book_id, start_page, end_page);
        self.check_unique(reader_id, &interval, Some(id))?;

        let updated = self.commit(|data| {
            let submission = data.submission_mut(id)?;
            submission.reader_id = reader_id;
            submission.interval = interval;
            Ok(submission.clone())
        })?;
        tracing::info!(interval = id, reader = %reader_id, book = %book_id, "interval updated");
        Ok(updated)
    }

    /// Delete a submission, returning it.
    pub fn remove_interval(&mut self, id: u64) -> LibraryResult<Submission> {
        self.commit(|data| {
            let pos = data
                .intervals
                .iter()
                .position(|s| s.id == id)
                .ok_or(LibraryError::IntervalNotFound { id })?;
            Ok(data.intervals.remove(pos))
        })
    }

    pub fn submission(&self, id: u64) -> Option<&Submission> {
        self.data.intervals.iter().find(|s| s.id == id)
    }

    /// All submissions, newest first.
    pub fn intervals(&self) -> Vec<&Submission> {
        let mut all: Vec<_> = self.data.intervals.iter().collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all
    }

    fn check_range(&self, start_page: Page, end_page: Page) -> LibraryResult<()> {
        let reason = if start_page == 0 || end_page == 0 {
            "page numbers start at 1".to_string()
        } else if start_page > self.max_page || end_page > self.max_page {
            format!("page numbers may not exceed {}", self.max_page)
        } else if end_page <= start_page {
            "end page must be greater than start page".to_string()
        } else {
            return Ok(());
        };
        Err(LibraryError::InvalidRange {
            start_page,
            end_page,
            reason,
        })
    }

    fn check_unique(
        &self,
        reader_id: ReaderId,
        interval: &IntervalRecord,
        ignore: Option<u64>,
    ) -> LibraryResult<()> {
        let duplicate = self
            .data
            .intervals
            .iter()
            .any(|s| Some(s.id) != ignore && s.reader_id == reader_id && s.interval == *interval);
        if duplicate {
            return Err(LibraryError::DuplicateInterval {
                reader: reader_id.0,
                book: interval.book_id.0,
                start_page: interval.start_page,
                end_page: interval.end_page,
            });
        }
        Ok(())
    }
}

impl BookNameLookup for Catalog {
    fn book_name(&self, id: BookId) -> Option<&str> {
        self.book(id).map(|b| b.title.as_str())
    }
}

impl IntervalSupply for Catalog {
    /// All intervals and every book name, active or not.
    fn snapshot(&self) -> ShelfResult<Snapshot> {
        let intervals = self.data.intervals.iter().map(|s| s.interval).collect();
        let names: BTreeMap<BookId, String> = self
            .data
            .books
            .iter()
            .map(|b| (b.id, b.title.clone()))
            .collect();
        Ok(Snapshot { intervals, names })
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
