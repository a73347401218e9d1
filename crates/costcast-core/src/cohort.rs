//! Cohort-based active-user projection.
//!
//! Each year's new customers form a cohort that ages along a shared adoption
//! curve keyed by tenure (years since acquisition), not by calendar year.
//! Past the end of the curve the last defined rate holds.

use serde::{Deserialize, Serialize};

use crate::model::CustomerMetrics;
use crate::resolve::{percent, value_at};

/// Snapshot of the customer base in one projection year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortYear {
    /// 1-based projection year.
    pub year: usize,
    pub total_customers: f64,
    pub total_available_users: f64,
    pub active_users: u64,
}

/// Number of projected years: the longer of the two input sequences.
pub fn projection_horizon(metrics: &CustomerMetrics) -> usize {
    metrics
        .new_customers_per_year
        .len()
        .max(metrics.adoption_rate_by_year.len())
}

/// Adoption percent for a cohort of the given tenure.
///
/// Only a tenure beyond the curve falls back to the last entry; an explicit
/// 0 inside the curve stays 0. An empty curve means no adoption.
pub fn adoption_rate(curve: &[f64], tenure: usize) -> f64 {
    match curve.get(tenure) {
        Some(rate) => *rate,
        None => curve.last().copied().unwrap_or(0.0),
    }
}

/// Active users per projection year, rounded to whole users.
pub fn active_users_by_year(metrics: &CustomerMetrics) -> Vec<u64> {
    (0..projection_horizon(metrics))
        .map(|year| active_users_in_year(metrics, year))
        .collect()
}

/// Active users in 0-based projection year `year`.
pub fn active_users_in_year(metrics: &CustomerMetrics, year: usize) -> u64 {
    let total: f64 = (0..=year)
        .map(|cohort| {
            let customers = value_at(&metrics.new_customers_per_year, cohort);
            let rate = adoption_rate(&metrics.adoption_rate_by_year, year - cohort);
            customers * metrics.avg_users_per_customer * percent(rate)
        })
        .sum();
    round_users(total)
}

/// Customers acquired up to and including 0-based year `year`.
pub fn total_customers(metrics: &CustomerMetrics, year: usize) -> f64 {
    (0..=year)
        .map(|cohort| value_at(&metrics.new_customers_per_year, cohort))
        .sum()
}

/// Every seat owned by customers acquired so far, active or not.
pub fn total_available_users(metrics: &CustomerMetrics, year: usize) -> f64 {
    total_customers(metrics, year) * metrics.avg_users_per_customer
}

/// Full per-year view of the cohort model.
pub fn project_cohorts(metrics: &CustomerMetrics) -> Vec<CohortYear> {
    (0..projection_horizon(metrics))
        .map(|year| CohortYear {
            year: year + 1,
            total_customers: total_customers(metrics, year),
            total_available_users: total_available_users(metrics, year),
            active_users: active_users_in_year(metrics, year),
        })
        .collect()
}

fn round_users(total: f64) -> u64 {
    if total.is_finite() && total > 0.0 {
        total.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up_for_user_counts() {
        assert_eq!(round_users(2.5), 3);
        assert_eq!(round_users(2.49), 2);
        assert_eq!(round_users(-4.0), 0);
        assert_eq!(round_users(f64::NAN), 0);
    }
}
