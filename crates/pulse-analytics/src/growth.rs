//! Window-over-window growth figures.

use crate::aggregate::round1;

/// Percentage change from `prior` to `current`, rounded to one decimal.
///
/// A zero prior window has no meaningful baseline and always reads as
/// the `100.0` sentinel. Dashboards render it directly.
pub fn growth_percent(current: u64, prior: u64) -> f64 {
    if prior == 0 {
        return 100.0;
    }
    round1((current as f64 - prior as f64) * 100.0 / prior as f64)
}

/// Percentage change between two already-computed metrics (mean rating,
/// response rate). Unlike [`growth_percent`] there is no activity
/// sentinel: a zero baseline reads as `0.0`.
pub fn change_percent(current: f64, prior: f64) -> f64 {
    if prior == 0.0 {
        return 0.0;
    }
    round1((current - prior) * 100.0 / prior)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_growth() {
        assert_eq!(growth_percent(30, 20), 50.0);
        assert_eq!(growth_percent(10, 40), -75.0);
        assert_eq!(growth_percent(7, 3), 133.3);
    }

    #[test]
    fn flat_is_zero() {
        assert_eq!(growth_percent(25, 25), 0.0);
    }

    #[test]
    fn zero_prior_is_always_the_sentinel() {
        assert_eq!(growth_percent(0, 0), 100.0);
        assert_eq!(growth_percent(1, 0), 100.0);
        assert_eq!(growth_percent(500, 0), 100.0);
    }

    #[test]
    fn drop_to_zero_is_minus_hundred() {
        assert_eq!(growth_percent(0, 12), -100.0);
    }

    #[test]
    fn change_percent_zero_baseline_is_flat() {
        assert_eq!(change_percent(4.2, 0.0), 0.0);
        assert_eq!(change_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn change_percent_rounds() {
        assert_eq!(change_percent(4.5, 4.0), 12.5);
        assert_eq!(change_percent(3.0, 4.5), -33.3);
    }
}
