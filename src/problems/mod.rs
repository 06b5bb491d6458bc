//! Problem library
//!
//! This module provides:
//! - Data models for problems, attempts, and importance tiers
//! - The SQLite-backed store holding tags, problems, attempts, and the
//!   review log

pub mod models;
pub mod storage;

pub use models::{render_notes_html, Attempt, Importance, NewAttempt, Problem};
pub use storage::{ProblemStore, Result, StoreError};
