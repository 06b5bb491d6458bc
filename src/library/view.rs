//! Sorted view over the problem list
//!
//! Filtering (text search, tag selection) happens in the store query;
//! this module only orders what it is given. The order is total:
//! pinned problems first, then the active sort preference, then a
//! recency tie-break that applies regardless of preference.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::prefs::SortPreference;
use crate::problems::Problem;
use crate::review::scheduler::due_score;

/// Most recent activity date used for the default sort and the final
/// tie-break: the last attempt, falling back to creation.
fn recency(problem: &Problem) -> Option<NaiveDate> {
    problem.last_attempt_at.or(problem.created_at)
}

/// Order a problem collection: pinned before unpinned, then by the
/// sort preference, then most-recent-activity first. The sort is
/// stable, so toggling a pin never reorders other problems relative
/// to each other.
pub fn sorted_view(
    problems: &[Problem],
    pinned: &HashSet<i64>,
    preference: SortPreference,
    today: NaiveDate,
) -> Vec<Problem> {
    let mut view: Vec<Problem> = problems.to_vec();
    view.sort_by(|a, b| {
        let pin_order = pinned.contains(&b.id).cmp(&pinned.contains(&a.id));
        if pin_order != Ordering::Equal {
            return pin_order;
        }

        let preferred = match preference {
            SortPreference::Importance => b.importance.rank().cmp(&a.importance.rank()),
            SortPreference::ReviewDue => due_score(b, today).cmp(&due_score(a, today)),
            SortPreference::LastAttempt => recency(b).cmp(&recency(a)),
        };

        preferred.then_with(|| recency(b).cmp(&recency(a)))
    });
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Importance;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn problem(id: i64, importance: Importance, last_attempt: Option<NaiveDate>) -> Problem {
        Problem {
            id,
            lc_num: id.to_string(),
            title: format!("Problem {}", id),
            tags: vec![],
            importance,
            created_at: Some(date(2026, 1, 1)),
            last_attempt_at: last_attempt,
            last_review_at: None,
            snooze_until: None,
            review_count: 0,
            attempt_count: 0,
            days_since: None,
        }
    }

    fn ids(view: &[Problem]) -> Vec<i64> {
        view.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_default_sort_most_recent_first() {
        let problems = vec![
            problem(1, Importance::Medium, Some(date(2026, 3, 1))),
            problem(2, Importance::Medium, Some(date(2026, 3, 8))),
            problem(3, Importance::Medium, Some(date(2026, 3, 4))),
        ];
        let view = sorted_view(
            &problems,
            &HashSet::new(),
            SortPreference::LastAttempt,
            date(2026, 3, 10),
        );
        assert_eq!(ids(&view), vec![2, 3, 1]);
    }

    #[test]
    fn test_importance_sort_with_recency_tiebreak() {
        let problems = vec![
            problem(1, Importance::Low, Some(date(2026, 3, 9))),
            problem(2, Importance::High, Some(date(2026, 3, 1))),
            problem(3, Importance::Medium, Some(date(2026, 3, 5))),
            problem(4, Importance::High, Some(date(2026, 3, 3))),
        ];
        let view = sorted_view(
            &problems,
            &HashSet::new(),
            SortPreference::Importance,
            date(2026, 3, 10),
        );
        // High first (more recent of the two Highs leads), then Medium, Low.
        assert_eq!(ids(&view), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_review_due_sort_most_overdue_first() {
        let today = date(2026, 3, 10);
        // review_count 0: required days High=1, Medium=2, Low=4.
        let mut overdue = problem(1, Importance::High, Some(date(2026, 3, 1)));
        overdue.last_review_at = Some(date(2026, 3, 1)); // score 9 - 1 = 8
        let mut due = problem(2, Importance::Medium, Some(date(2026, 3, 8)));
        due.last_review_at = Some(date(2026, 3, 8)); // score 2 - 2 = 0
        let mut snoozed = problem(3, Importance::High, Some(date(2026, 3, 1)));
        snoozed.last_review_at = Some(date(2026, 3, 1));
        snoozed.snooze_until = Some(date(2026, 4, 1)); // sentinel

        let problems = vec![snoozed, due, overdue];
        let view = sorted_view(&problems, &HashSet::new(), SortPreference::ReviewDue, today);
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn test_pinned_before_unpinned() {
        let problems = vec![
            problem(1, Importance::Medium, Some(date(2026, 3, 9))),
            problem(2, Importance::Medium, Some(date(2026, 3, 8))),
            problem(3, Importance::Medium, Some(date(2026, 3, 7))),
        ];
        let pinned: HashSet<i64> = [3].into_iter().collect();
        let view = sorted_view(
            &problems,
            &pinned,
            SortPreference::LastAttempt,
            date(2026, 3, 10),
        );
        assert_eq!(ids(&view), vec![3, 1, 2]);
    }

    #[test]
    fn test_pin_toggle_is_stable() {
        let problems = vec![
            problem(1, Importance::Medium, Some(date(2026, 3, 9))),
            problem(2, Importance::Medium, Some(date(2026, 3, 8))),
            problem(3, Importance::Medium, Some(date(2026, 3, 7))),
            problem(4, Importance::Medium, Some(date(2026, 3, 6))),
        ];
        let today = date(2026, 3, 10);
        let before = sorted_view(&problems, &HashSet::new(), SortPreference::LastAttempt, today);

        // Pinning one problem moves it first and leaves the relative
        // order of every other pair unchanged.
        let pinned: HashSet<i64> = [3].into_iter().collect();
        let after = sorted_view(&problems, &pinned, SortPreference::LastAttempt, today);
        assert_eq!(after[0].id, 3);

        let rest: Vec<i64> = ids(&after).into_iter().filter(|id| *id != 3).collect();
        let expected: Vec<i64> = ids(&before).into_iter().filter(|id| *id != 3).collect();
        assert_eq!(rest, expected);
    }

    #[test]
    fn test_problems_without_dates_sink_to_bottom() {
        let problems = vec![
            {
                let mut p = problem(1, Importance::Medium, None);
                p.created_at = None;
                p
            },
            problem(2, Importance::Medium, Some(date(2026, 3, 8))),
        ];
        let view = sorted_view(
            &problems,
            &HashSet::new(),
            SortPreference::LastAttempt,
            date(2026, 3, 10),
        );
        assert_eq!(ids(&view), vec![2, 1]);
    }
}
