//! Persistent record types for the reading catalog.

use serde::{Deserialize, Serialize};

use crate::model::{BookId, IntervalRecord, ReaderId};

/// A book tracked by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    /// Unique (case-insensitive) title.
    pub title: String,
    pub number_of_pages: u32,
    /// Soft-delete flag. Inactive books accept no new intervals.
    pub is_active: bool,
}

/// Someone who submits reading intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderRecord {
    pub id: ReaderId,
    pub name: String,
    pub email: String,
}

/// One stored interval submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    pub reader_id: ReaderId,
    pub interval: IntervalRecord,
    /// Seconds since UNIX epoch.
    pub submitted_at: u64,
}

/// Which books a listing should include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn matches(self, book: &BookRecord) -> bool {
        match self {
            Self::All => true,
            Self::Active => book.is_active,
            Self::Inactive => !book.is_active,
        }
    }
}

impl std::str::FromStr for ActiveFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "-1" => Ok(Self::All),
            "active" | "1" => Ok(Self::Active),
            "inactive" | "0" => Ok(Self::Inactive),
            other => Err(format!("unknown status \"{other}\" (expected all, active, or inactive)")),
        }
    }
}
