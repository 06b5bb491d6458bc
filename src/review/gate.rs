//! Daily review gate
//!
//! Limits how many review prompts are shown per calendar day. Progress
//! is persisted through the preference store as `{date, count}`; the
//! day rollover happens lazily at check time rather than on a timer.
//! The "one more" override lives only in memory and is consumed by the
//! next completed review or cleared when the day changes.

use chrono::NaiveDate;

use crate::prefs::{KvStore, Prefs, ReviewProgress};

/// Default number of review prompts per day.
pub const DEFAULT_DAILY_LIMIT: u32 = 1;

pub struct DailyGate {
    limit: u32,
    extra_allowed: bool,
    /// Day the override was granted; a rollover invalidates it.
    extra_granted_on: Option<NaiveDate>,
}

impl DailyGate {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            extra_allowed: false,
            extra_granted_on: None,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Reviews completed today as recorded in the preference store.
    /// Corrupt or missing state counts as zero; storage problems never
    /// lock the user out of reviewing.
    pub fn completed_today<S: KvStore>(&self, prefs: &Prefs<S>, today: NaiveDate) -> u32 {
        prefs.review_progress(today).count
    }

    /// Whether the daily allowance is used up.
    pub fn has_reached_limit<S: KvStore>(&mut self, prefs: &Prefs<S>, today: NaiveDate) -> bool {
        if self.extra_allowed && self.extra_granted_on != Some(today) {
            // Calendar day rolled over since the override was granted.
            self.extra_allowed = false;
            self.extra_granted_on = None;
        }
        if self.extra_allowed {
            return false;
        }
        self.completed_today(prefs, today) >= self.limit
    }

    /// Record one completed review prompt; consumes a pending override.
    pub fn record_review_completed<S: KvStore>(&mut self, prefs: &mut Prefs<S>, today: NaiveDate) {
        let progress = prefs.review_progress(today);
        prefs.set_review_progress(ReviewProgress {
            date: today,
            count: progress.count + 1,
        });
        self.extra_allowed = false;
        self.extra_granted_on = None;
    }

    /// Permit exactly one more review prompt past the limit.
    pub fn allow_one_extra(&mut self, today: NaiveDate) {
        self.extra_allowed = true;
        self.extra_granted_on = Some(today);
    }
}

impl Default for DailyGate {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_limit_reached_after_one_review_and_resets_next_day() {
        let mut prefs = Prefs::new(MemoryStore::new());
        let mut gate = DailyGate::new(1);
        let monday = date(2026, 3, 9);
        let tuesday = date(2026, 3, 10);

        assert!(!gate.has_reached_limit(&prefs, monday));
        gate.record_review_completed(&mut prefs, monday);
        assert!(gate.has_reached_limit(&prefs, monday));
        // No explicit reset call: the next day reads as zero.
        assert!(!gate.has_reached_limit(&prefs, tuesday));
    }

    #[test]
    fn test_override_permits_one_more() {
        let mut prefs = Prefs::new(MemoryStore::new());
        let mut gate = DailyGate::new(1);
        let today = date(2026, 3, 9);

        gate.record_review_completed(&mut prefs, today);
        assert!(gate.has_reached_limit(&prefs, today));

        gate.allow_one_extra(today);
        assert!(!gate.has_reached_limit(&prefs, today));

        // Completing the extra review consumes the override.
        gate.record_review_completed(&mut prefs, today);
        assert!(gate.has_reached_limit(&prefs, today));
    }

    #[test]
    fn test_override_cleared_on_rollover() {
        let mut prefs = Prefs::new(MemoryStore::new());
        let mut gate = DailyGate::new(1);
        let monday = date(2026, 3, 9);
        let tuesday = date(2026, 3, 10);

        gate.record_review_completed(&mut prefs, monday);
        gate.allow_one_extra(monday);

        // The new day has a fresh allowance; the stale override is
        // dropped rather than carried forward as a second free slot.
        assert!(!gate.has_reached_limit(&prefs, tuesday));
        gate.record_review_completed(&mut prefs, tuesday);
        assert!(gate.has_reached_limit(&prefs, tuesday));
    }

    #[test]
    fn test_corrupt_progress_fails_open() {
        let mut store = MemoryStore::new();
        store.set("review_progress", "not json at all");
        let prefs = Prefs::new(store);
        let mut gate = DailyGate::new(1);
        assert!(!gate.has_reached_limit(&prefs, date(2026, 3, 9)));
    }

    #[test]
    fn test_higher_limit() {
        let mut prefs = Prefs::new(MemoryStore::new());
        let mut gate = DailyGate::new(3);
        let today = date(2026, 3, 9);

        for _ in 0..2 {
            assert!(!gate.has_reached_limit(&prefs, today));
            gate.record_review_completed(&mut prefs, today);
        }
        assert!(!gate.has_reached_limit(&prefs, today));
        gate.record_review_completed(&mut prefs, today);
        assert!(gate.has_reached_limit(&prefs, today));
    }
}
