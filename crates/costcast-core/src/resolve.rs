//! Resolve-or-default helpers used at every input boundary of the engine.
//!
//! Indexing past the end of a sequence yields 0 and dividing by 0 yields 0.
//! Model lookups live on [`PricingTable::get`](crate::model::PricingTable::get).

/// `values[index]`, or 0 when the index is out of range.
pub fn value_at(values: &[f64], index: usize) -> f64 {
    values.get(index).copied().unwrap_or(0.0)
}

/// `numerator / denominator`, or 0 unless the denominator is strictly positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Like [`ratio`], but returns `fallback` for a non-positive denominator.
pub fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        fallback
    }
}

/// Fraction for a percentage input.
pub fn percent(value: f64) -> f64 {
    value / 100.0
}
