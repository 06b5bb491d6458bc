//! Preference persistence
//!
//! A small string key-value store behind the [`KvStore`] trait so the
//! gate and view model can be tested against an in-memory fake. Every
//! read degrades to a documented default on missing or corrupt data;
//! a broken preferences file must never block the user.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use super::models::{ReviewProgress, SortPreference};

const SORT_PREFERENCE_KEY: &str = "sort_preference";
const PINNED_IDS_KEY: &str = "pinned_ids";
const REVIEW_PROGRESS_KEY: &str = "review_progress";

/// String key-value storage capability.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// File-backed store persisting a flat JSON object of strings.
///
/// Loads once at construction; writes go through to disk immediately.
/// A missing or unparseable file is treated as empty.
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Failed to create prefs directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(&self.values) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    log::warn!("Failed to write prefs file: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize prefs: {}", e),
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.persist();
    }
}

/// Typed accessors over a [`KvStore`] for the client-local state:
/// sort preference, pinned problem ids, and daily review progress.
pub struct Prefs<S: KvStore> {
    store: S,
}

impl<S: KvStore> Prefs<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn sort_preference(&self) -> SortPreference {
        self.store
            .get(SORT_PREFERENCE_KEY)
            .map(|v| SortPreference::parse(&v))
            .unwrap_or_default()
    }

    pub fn set_sort_preference(&mut self, pref: SortPreference) {
        self.store.set(SORT_PREFERENCE_KEY, pref.as_str());
    }

    /// The pinned problem id set; empty on missing or corrupt data.
    pub fn pinned(&self) -> HashSet<i64> {
        self.store
            .get(PINNED_IDS_KEY)
            .and_then(|v| serde_json::from_str::<Vec<i64>>(&v).ok())
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    /// Toggle a pin; returns true if the id is now pinned.
    pub fn toggle_pin(&mut self, id: i64) -> bool {
        let mut pinned = self.pinned();
        let now_pinned = pinned.insert(id);
        if !now_pinned {
            pinned.remove(&id);
        }
        self.save_pinned(&pinned);
        now_pinned
    }

    pub fn set_pinned(&mut self, id: i64, pin: bool) {
        let mut pinned = self.pinned();
        if pin {
            pinned.insert(id);
        } else {
            pinned.remove(&id);
        }
        self.save_pinned(&pinned);
    }

    fn save_pinned(&mut self, pinned: &HashSet<i64>) {
        let mut ids: Vec<i64> = pinned.iter().copied().collect();
        ids.sort_unstable();
        match serde_json::to_string(&ids) {
            Ok(json) => self.store.set(PINNED_IDS_KEY, &json),
            Err(e) => log::warn!("Failed to serialize pinned ids: {}", e),
        }
    }

    /// Review progress as stored; corrupt or missing state reads as
    /// zero completed today (the gate must fail open).
    pub fn review_progress(&self, today: chrono::NaiveDate) -> ReviewProgress {
        self.store
            .get(REVIEW_PROGRESS_KEY)
            .and_then(|v| serde_json::from_str::<ReviewProgress>(&v).ok())
            .map(|p| p.for_today(today))
            .unwrap_or_else(|| ReviewProgress::zero(today))
    }

    pub fn set_review_progress(&mut self, progress: ReviewProgress) {
        match serde_json::to_string(&progress) {
            Ok(json) => self.store.set(REVIEW_PROGRESS_KEY, &json),
            Err(e) => log::warn!("Failed to serialize review progress: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prefs() -> Prefs<MemoryStore> {
        Prefs::new(MemoryStore::new())
    }

    #[test]
    fn test_defaults_when_empty() {
        let p = prefs();
        assert_eq!(p.sort_preference(), SortPreference::LastAttempt);
        assert!(p.pinned().is_empty());
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(p.review_progress(today), ReviewProgress::zero(today));
    }

    #[test]
    fn test_corrupt_values_fail_open() {
        let mut store = MemoryStore::new();
        store.set("sort_preference", "???");
        store.set("pinned_ids", "{not json");
        store.set("review_progress", "[1,2,3]");
        let p = Prefs::new(store);

        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(p.sort_preference(), SortPreference::LastAttempt);
        assert!(p.pinned().is_empty());
        assert_eq!(p.review_progress(today).count, 0);
    }

    #[test]
    fn test_toggle_pin_round_trip() {
        let mut p = prefs();
        assert!(p.toggle_pin(7));
        assert!(p.pinned().contains(&7));
        assert!(!p.toggle_pin(7));
        assert!(!p.pinned().contains(&7));
    }

    #[test]
    fn test_sort_preference_round_trip() {
        let mut p = prefs();
        p.set_sort_preference(SortPreference::ReviewDue);
        assert_eq!(p.sort_preference(), SortPreference::ReviewDue);
    }

    #[test]
    fn test_progress_resets_on_new_day() {
        let mut p = prefs();
        let monday = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        p.set_review_progress(ReviewProgress {
            date: monday,
            count: 3,
        });
        assert_eq!(p.review_progress(monday).count, 3);
        assert_eq!(p.review_progress(tuesday).count, 0);
    }

    #[test]
    fn test_file_store_survives_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{{{{").unwrap();

        let mut store = FileStore::new(path.clone());
        assert_eq!(store.get("sort_preference"), None);
        store.set("sort_preference", "importance");

        let reloaded = FileStore::new(path);
        assert_eq!(
            reloaded.get("sort_preference").as_deref(),
            Some("importance")
        );
    }
}
