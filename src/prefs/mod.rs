//! Client-local preferences: sort order, pinned problems, and daily
//! review progress. Persisted as a flat JSON key-value file; every
//! read fails open to a safe default.

pub mod models;
pub mod storage;

pub use models::{ReviewProgress, SortPreference};
pub use storage::{FileStore, KvStore, MemoryStore, Prefs};
