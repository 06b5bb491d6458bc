//! Spaced review system
//!
//! This module provides:
//! - Interval-ladder due-date scheduling by importance tier
//! - Snooze suppression and grade handling
//! - The client-local daily review gate

pub mod gate;
pub mod scheduler;

pub use gate::{DailyGate, DEFAULT_DAILY_LIMIT};
pub use scheduler::{due_score, intervals_for, is_due, Grade, SNOOZED_SCORE};
