//! Client-local preference models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the library list is ordered (after pinned problems).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPreference {
    LastAttempt,
    Importance,
    ReviewDue,
}

impl Default for SortPreference {
    fn default() -> Self {
        Self::LastAttempt
    }
}

impl SortPreference {
    /// Parse a stored preference string; unknown values fall back to
    /// the default ordering.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "importance" => Self::Importance,
            "review_due" => Self::ReviewDue,
            _ => Self::LastAttempt,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastAttempt => "last_attempt",
            Self::Importance => "importance",
            Self::ReviewDue => "review_due",
        }
    }
}

/// How many review prompts have been completed on a given calendar day.
/// Client-local only; never affects the server-side review count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewProgress {
    pub date: NaiveDate,
    pub count: u32,
}

impl ReviewProgress {
    pub fn zero(date: NaiveDate) -> Self {
        Self { date, count: 0 }
    }

    /// The progress as seen on `today`: a stored entry from another
    /// calendar day reads as zero completed.
    pub fn for_today(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self::zero(today)
        }
    }
}
