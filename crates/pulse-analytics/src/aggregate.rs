//! Point-in-time aggregates over a set of feedback records.

use std::collections::HashMap;

use serde::Serialize;

use pulse_core::{Feedback, FeedbackStatus, Subject};

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Mean rating across `records`, rounded to one decimal. Empty input
/// yields `0.0`.
pub fn average_rating(records: &[&Feedback]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: u64 = records.iter().map(|r| u64::from(r.rating)).sum();
    round1(sum as f64 / records.len() as f64)
}

/// Count of records per star, index 0 holding one-star counts.
pub fn rating_distribution(records: &[&Feedback]) -> [u64; 5] {
    let mut dist = [0u64; 5];
    for record in records {
        // Ratings are validated to 1..=5 before storage.
        if let Some(slot) = dist.get_mut(usize::from(record.rating) - 1) {
            *slot += 1;
        }
    }
    dist
}

/// Record counts per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    /// Records awaiting review.
    pub pending: u64,
    /// Records the teacher has reviewed.
    pub reviewed: u64,
    /// Closed-out records.
    pub archived: u64,
}

/// Tally records by status.
pub fn status_breakdown(records: &[&Feedback]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for record in records {
        match record.status {
            FeedbackStatus::Pending => breakdown.pending += 1,
            FeedbackStatus::Reviewed => breakdown.reviewed += 1,
            FeedbackStatus::Archived => breakdown.archived += 1,
        }
    }
    breakdown
}

/// Per-subject count and mean rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    /// The subject.
    pub subject: Subject,
    /// Number of records for the subject.
    pub count: u64,
    /// Mean rating for the subject, rounded to one decimal.
    pub average_rating: f64,
}

/// Group records by subject.
///
/// Only subjects with at least one record appear. Sorted by count
/// descending, then subject name for a stable order.
pub fn subject_breakdown(records: &[&Feedback]) -> Vec<SubjectSummary> {
    let mut by_subject: HashMap<Subject, (u64, u64)> = HashMap::new();
    for record in records {
        let entry = by_subject.entry(record.subject).or_default();
        entry.0 += 1;
        entry.1 += u64::from(record.rating);
    }
    let mut summaries: Vec<SubjectSummary> = by_subject
        .into_iter()
        .map(|(subject, (count, sum))| SubjectSummary {
            subject,
            count,
            average_rating: round1(sum as f64 / count as f64),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.count.cmp(&a.count).then_with(|| a.subject.as_str().cmp(b.subject.as_str()))
    });
    summaries
}

/// Percentage of records the teacher has reviewed, rounded to one
/// decimal. Empty input yields `0.0`.
pub fn response_rate(records: &[&Feedback]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let reviewed = records.iter().filter(|r| r.status == FeedbackStatus::Reviewed).count();
    round1(reviewed as f64 * 100.0 / records.len() as f64)
}
