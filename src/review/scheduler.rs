//! Review due-date scheduling
//!
//! Each importance tier has a fixed ladder of review intervals (days
//! until the next review at each successive review count). Higher
//! importance uses shorter intervals, so important problems come back
//! more often. A problem's due score is the number of days it is past
//! (positive) or short of (negative) its required interval; snoozed
//! problems are pushed out of the ranking entirely with a sentinel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::problems::{Importance, Problem};

/// Sentinel score for problems snoozed into the future; low enough to
/// sink below any real score.
pub const SNOOZED_SCORE: i64 = -9999;

const HIGH_INTERVALS: [i64; 7] = [1, 2, 4, 7, 15, 30, 60];
const MEDIUM_INTERVALS: [i64; 7] = [2, 4, 7, 15, 30, 60, 90];
const LOW_INTERVALS: [i64; 7] = [4, 8, 15, 30, 60, 120, 180];

/// The interval ladder for an importance tier.
pub fn intervals_for(importance: Importance) -> &'static [i64] {
    match importance {
        Importance::High => &HIGH_INTERVALS,
        Importance::Medium => &MEDIUM_INTERVALS,
        Importance::Low => &LOW_INTERVALS,
    }
}

/// The date the current review interval is measured from: the last
/// review, falling back to the last attempt, then the creation date.
fn base_date(problem: &Problem) -> Option<NaiveDate> {
    problem
        .last_review_at
        .or(problem.last_attempt_at)
        .or(problem.created_at)
}

/// Signed due score for a problem: `days elapsed - days required`.
///
/// A score >= 0 means the problem is due; more positive means more
/// overdue. A future snooze date returns [`SNOOZED_SCORE`] regardless
/// of everything else. Review counts past the end of the ladder clamp
/// to the longest interval, and a missing base date counts as zero
/// elapsed days so malformed rows are never spuriously due.
pub fn due_score(problem: &Problem, today: NaiveDate) -> i64 {
    if let Some(until) = problem.snooze_until {
        if until > today {
            return SNOOZED_SCORE;
        }
    }

    let ladder = intervals_for(problem.importance);
    let stage = (problem.review_count.max(0) as usize).min(ladder.len() - 1);
    let required_days = ladder[stage];

    let delta_days = base_date(problem)
        .map(|base| (today - base).num_days())
        .unwrap_or(0);

    delta_days - required_days
}

/// Whether a problem is due for review today.
pub fn is_due(problem: &Problem, today: NaiveDate) -> bool {
    due_score(problem, today) >= 0
}

/// Self-assessed recall quality at review time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Good,
    Easy,
}

impl Default for Grade {
    fn default() -> Self {
        Self::Good
    }
}

impl Grade {
    /// Parse a wire-supplied grade string; anything unknown is Good.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "again" => Self::Again,
            "easy" => Self::Easy,
            _ => Self::Good,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    /// The review count after grading: `again` restarts the ladder,
    /// `good` advances one stage, `easy` skips ahead one extra stage.
    pub fn next_review_count(self, current: i64) -> i64 {
        match self {
            Self::Again => 0,
            Self::Good => current.max(0) + 1,
            Self::Easy => current.max(0) + 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn problem(importance: Importance) -> Problem {
        Problem {
            id: 1,
            lc_num: "1".to_string(),
            title: "Two Sum".to_string(),
            tags: vec![],
            importance,
            created_at: Some(date(2026, 1, 1)),
            last_attempt_at: None,
            last_review_at: None,
            snooze_until: None,
            review_count: 0,
            attempt_count: 0,
            days_since: None,
        }
    }

    #[test]
    fn test_fresh_attempt_not_yet_due() {
        // review_count = 0 and last attempt today: score is exactly
        // -ladder[0], negative for every tier.
        let today = date(2026, 3, 10);
        for importance in [Importance::High, Importance::Medium, Importance::Low] {
            let mut p = problem(importance);
            p.last_attempt_at = Some(today);
            let expected = -intervals_for(importance)[0];
            assert_eq!(due_score(&p, today), expected);
            assert!(due_score(&p, today) < 0);
        }
    }

    #[test]
    fn test_ladders_strictly_ordered_by_importance() {
        let high = intervals_for(Importance::High);
        let medium = intervals_for(Importance::Medium);
        let low = intervals_for(Importance::Low);
        for i in 0..high.len() {
            assert!(high[i] < medium[i], "stage {}", i);
            assert!(medium[i] < low[i], "stage {}", i);
        }
    }

    #[test]
    fn test_future_snooze_suppresses() {
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::High);
        p.last_review_at = Some(date(2025, 1, 1));
        p.review_count = 5;
        p.snooze_until = Some(date(2026, 3, 11));
        assert_eq!(due_score(&p, today), SNOOZED_SCORE);
    }

    #[test]
    fn test_past_snooze_does_not_suppress() {
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::High);
        p.last_review_at = Some(date(2026, 1, 1));
        p.snooze_until = Some(date(2026, 3, 10));
        // Snooze date equal to today no longer suppresses.
        assert_ne!(due_score(&p, today), SNOOZED_SCORE);
    }

    #[test]
    fn test_exactly_due_at_stage_interval() {
        // High importance, review_count = 2, reviewed 4 days ago:
        // ladder[2] = 4, so score is exactly 0.
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::High);
        p.review_count = 2;
        p.last_review_at = Some(date(2026, 3, 6));
        assert_eq!(due_score(&p, today), 0);

        // Same dates at Low importance: ladder[2] = 15, score -11.
        p.importance = Importance::Low;
        assert_eq!(due_score(&p, today), -11);
    }

    #[test]
    fn test_review_count_clamps_to_ladder_end() {
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::Medium);
        p.review_count = 100;
        p.last_review_at = Some(date(2026, 3, 1));
        // Longest Medium interval is 90 days; 9 elapsed.
        assert_eq!(due_score(&p, today), 9 - 90);
    }

    #[test]
    fn test_missing_base_date_counts_zero_days() {
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::Medium);
        p.created_at = None;
        assert_eq!(due_score(&p, today), -intervals_for(Importance::Medium)[0]);
    }

    #[test]
    fn test_base_date_fallback_chain() {
        let today = date(2026, 3, 10);
        let mut p = problem(Importance::High);
        p.created_at = Some(date(2026, 3, 1));
        p.last_attempt_at = Some(date(2026, 3, 5));
        p.last_review_at = Some(date(2026, 3, 8));
        // last_review_at wins
        assert_eq!(due_score(&p, today), 2 - 1);

        p.last_review_at = None;
        assert_eq!(due_score(&p, today), 5 - 1);

        p.last_attempt_at = None;
        assert_eq!(due_score(&p, today), 9 - 1);
    }

    #[test]
    fn test_grade_advances_review_count() {
        assert_eq!(Grade::Again.next_review_count(4), 0);
        assert_eq!(Grade::Good.next_review_count(4), 5);
        assert_eq!(Grade::Easy.next_review_count(4), 6);
        assert_eq!(Grade::Good.next_review_count(-3), 1);
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!(Grade::parse("again"), Grade::Again);
        assert_eq!(Grade::parse("EASY"), Grade::Easy);
        assert_eq!(Grade::parse("good"), Grade::Good);
        assert_eq!(Grade::parse("whatever"), Grade::Good);
    }
}
