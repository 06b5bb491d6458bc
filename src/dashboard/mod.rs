//! Dashboard aggregation
//!
//! This module provides:
//! - The summary payload served at `/api/dashboard` (totals, recent
//!   activity, importance split, top tags, time-bucketed trends)
//! - The pure trend projector mapping a series to plot coordinates

pub mod models;
pub mod trends;

pub use models::{DashboardSummary, TrendSeries, Trends};
pub use trends::{project, PlotPoint, TrendProjection};

use chrono::{Datelike, Duration, NaiveDate};

use crate::problems::storage::{ProblemStore, Result};
use models::{ActivityDay, TagCount};

/// How many tags the dashboard lists.
const TOP_TAG_LIMIT: usize = 8;

/// Build the full dashboard summary from the store.
pub fn summarize(store: &ProblemStore, today: NaiveDate) -> Result<DashboardSummary> {
    let totals = store.totals()?;
    let importance = store.importance_split()?;
    let top_tags: Vec<TagCount> = store.top_tags(TOP_TAG_LIMIT)?;

    let attempt_dates = store.attempt_dates()?;
    let review_dates = store.review_dates()?;

    let week = daily_series(&attempt_dates, &review_dates, today, 7);
    let month = daily_series(&attempt_dates, &review_dates, today, 30);
    let year = monthly_series(&attempt_dates, &review_dates, today, 12);

    let activity = week
        .labels
        .iter()
        .enumerate()
        .map(|(i, _)| ActivityDay {
            date: today - Duration::days((week.labels.len() - 1 - i) as i64),
            attempts: week.attempts[i],
            reviews: week.reviews[i],
        })
        .collect();

    Ok(DashboardSummary {
        totals,
        activity,
        importance,
        top_tags,
        trends: Trends { week, month, year },
    })
}

/// Bucket dated events into the trailing `days` calendar days, oldest
/// bucket first, labeled MM-DD.
fn daily_series(
    attempts: &[NaiveDate],
    reviews: &[NaiveDate],
    today: NaiveDate,
    days: i64,
) -> TrendSeries {
    let start = today - Duration::days(days - 1);
    let mut series = TrendSeries {
        labels: Vec::with_capacity(days as usize),
        attempts: vec![0; days as usize],
        reviews: vec![0; days as usize],
    };
    for offset in 0..days {
        let day = start + Duration::days(offset);
        series.labels.push(day.format("%m-%d").to_string());
    }

    let bucket = |date: &NaiveDate| -> Option<usize> {
        if *date < start || *date > today {
            return None;
        }
        Some((*date - start).num_days() as usize)
    };

    for date in attempts {
        if let Some(i) = bucket(date) {
            series.attempts[i] += 1;
        }
    }
    for date in reviews {
        if let Some(i) = bucket(date) {
            series.reviews[i] += 1;
        }
    }
    series
}

/// Bucket dated events into the trailing `months` calendar months
/// (including the current one), oldest first, labeled YYYY-MM.
fn monthly_series(
    attempts: &[NaiveDate],
    reviews: &[NaiveDate],
    today: NaiveDate,
    months: usize,
) -> TrendSeries {
    // Months counted back from the current one as (year, month) keys.
    let mut keys = Vec::with_capacity(months);
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..months {
        keys.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    keys.reverse();

    let mut series = TrendSeries {
        labels: keys
            .iter()
            .map(|(y, m)| format!("{:04}-{:02}", y, m))
            .collect(),
        attempts: vec![0; months],
        reviews: vec![0; months],
    };

    let bucket = |date: &NaiveDate| keys.iter().position(|&k| k == (date.year(), date.month()));

    for date in attempts {
        if let Some(i) = bucket(date) {
            series.attempts[i] += 1;
        }
    }
    for date in reviews {
        if let Some(i) = bucket(date) {
            series.reviews[i] += 1;
        }
    }
    series
}
