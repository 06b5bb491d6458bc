//! Library view: client-side ordering of the problem list with pins
//! and a persisted sort preference.

pub mod view;

pub use view::sorted_view;
