#![deny(missing_docs)]

//! # pulse-analytics — Feedback Aggregation
//!
//! Every function here is pure: it takes a slice of feedback records
//! (plus, where relevant, an explicit time window) and returns numbers.
//! No clock access, no storage access, no async. The API crate selects
//! the records an actor is entitled to see and hands them over; this
//! crate never reasons about authorization.
//!
//! Averages and percentages are rounded to one decimal place at the
//! edge of each function, so response payloads are stable regardless of
//! accumulation order.

pub mod aggregate;
pub mod growth;
pub mod trends;
pub mod window;

pub use aggregate::{
    average_rating, rating_distribution, response_rate, round1, status_breakdown,
    subject_breakdown, StatusBreakdown, SubjectSummary,
};
pub use growth::{change_percent, growth_percent};
pub use trends::{daily_trends, DailyPoint};
pub use window::{TimeRange, Window};
