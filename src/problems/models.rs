//! Data models for tracked problems and attempts

use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

/// User-assigned priority tier controlling how often a problem comes up
/// for review. Higher importance means shorter review intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Default for Importance {
    fn default() -> Self {
        Self::Medium
    }
}

impl Importance {
    /// Parse a user- or wire-supplied importance string.
    ///
    /// Accepts the three tier names case-insensitively plus the legacy
    /// aliases `critical`/`crit` for High. Anything else maps to Medium.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" | "critical" | "crit" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Ordering rank for the importance sort (High > Medium > Low).
    /// Unknown importance deserializes as Medium, so it ranks as 1.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked practice problem with its attempt/review history summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    /// External catalog number (kept as text; some catalogs use suffixes)
    pub lc_num: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub importance: Importance,
    pub created_at: Option<NaiveDate>,
    pub last_attempt_at: Option<NaiveDate>,
    pub last_review_at: Option<NaiveDate>,
    pub snooze_until: Option<NaiveDate>,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub attempt_count: i64,
    /// Whole days since the last attempt, if any
    pub days_since: Option<i64>,
}

/// A single practice attempt with free-text notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub attempt_at: NaiveDate,
    pub notes: String,
    /// Notes rendered to HTML for display
    pub notes_html: String,
}

/// Request payload for logging an attempt (creates the problem if absent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttempt {
    pub lc_num: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub importance: Option<String>,
    pub notes: String,
}

/// Render attempt notes (markdown) to HTML.
pub fn render_notes_html(notes: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(notes, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_parse() {
        assert_eq!(Importance::parse("High"), Importance::High);
        assert_eq!(Importance::parse("  low "), Importance::Low);
        assert_eq!(Importance::parse("critical"), Importance::High);
        assert_eq!(Importance::parse("crit"), Importance::High);
        assert_eq!(Importance::parse("medium"), Importance::Medium);
        assert_eq!(Importance::parse("banana"), Importance::Medium);
        assert_eq!(Importance::parse(""), Importance::Medium);
    }

    #[test]
    fn test_importance_rank_order() {
        assert!(Importance::High.rank() > Importance::Medium.rank());
        assert!(Importance::Medium.rank() > Importance::Low.rank());
    }

    #[test]
    fn test_render_notes_html() {
        let html = render_notes_html("**bold** and `code`");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }
}
