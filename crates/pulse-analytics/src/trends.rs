//! Day-by-day trend series.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use pulse_core::Feedback;

use crate::aggregate::round1;
use crate::window::Window;

/// One day of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// Calendar date (UTC).
    pub date: NaiveDate,
    /// Records submitted that day, always at least one.
    pub count: u64,
    /// Mean rating that day, rounded to one decimal.
    pub average_rating: f64,
}

/// Daily submission counts and mean ratings across `window`.
///
/// Only days with at least one submission appear, sorted ascending by
/// date. Quiet days are simply absent from the series.
pub fn daily_trends(records: &[&Feedback], window: &Window) -> Vec<DailyPoint> {
    let mut per_day: HashMap<NaiveDate, (u64, u64)> = HashMap::new();
    for record in records {
        if window.contains(record.created_at) {
            let entry = per_day.entry(record.created_at.date_naive()).or_default();
            entry.0 += 1;
            entry.1 += u64::from(record.rating);
        }
    }

    let mut series: Vec<DailyPoint> = per_day
        .into_iter()
        .map(|(date, (count, sum))| DailyPoint {
            date,
            count,
            average_rating: round1(sum as f64 / count as f64),
        })
        .collect();
    series.sort_by_key(|point| point.date);
    series
}
