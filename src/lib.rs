//! Kata: a personal coding-interview practice tracker.
//!
//! Problems are logged as attempts with markdown notes, tagged, and
//! ranked for spaced review by importance-tier interval ladders. The
//! crate exposes the storage and scheduling core plus the embedded
//! HTTP API server; binaries wire it to a web client and a CLI.

pub mod dashboard;
pub mod library;
pub mod prefs;
pub mod problems;
pub mod review;
pub mod server;
