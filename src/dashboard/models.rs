//! Dashboard summary payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifetime totals across the whole library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    pub problems: i64,
    pub attempts: i64,
    pub reviews: i64,
}

/// Per-day activity for the recent window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub attempts: i64,
    pub reviews: i64,
}

/// Problem counts per importance tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportanceSplit {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

/// A tag and how many problems carry it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

/// Parallel label/attempts/reviews arrays for one trend range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub attempts: Vec<i64>,
    pub reviews: Vec<i64>,
}

/// Trend series per range bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trends {
    pub week: TrendSeries,
    pub month: TrendSeries,
    pub year: TrendSeries,
}

/// Everything the dashboard surface renders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub activity: Vec<ActivityDay>,
    pub importance: ImportanceSplit,
    pub top_tags: Vec<TagCount>,
    pub trends: Trends,
}
