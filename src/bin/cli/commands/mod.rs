pub mod add;
pub mod list;
pub mod review;
pub mod show;
pub mod stats;
pub mod tags;
