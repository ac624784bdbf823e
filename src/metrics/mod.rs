//! Named derived-metric formulas.
//!
//! Each business ratio has exactly one definition here, applied uniformly
//! by every breakdown, summary, trend, and ranking. The zero-denominator
//! policy of each formula is part of its contract: no formula ever yields
//! `NaN` or `Infinity`, and each documents its no-data default.

pub mod rate;

pub use rate::Rate0To100;

use crate::config::DiscountRateBasis;

/// Attendance as a percentage of capacity. Zero capacity yields 0.
pub fn fill_rate(attendance: f64, capacity: f64) -> Rate0To100 {
    if capacity <= 0.0 {
        return Rate0To100::new(0.0);
    }
    Rate0To100::new(attendance / capacity * 100.0)
}

/// Discount as a percentage of the configured denominator basis.
///
/// `Gross` divides by revenue plus discount (share of pre-discount value),
/// `Net` divides by revenue alone. A zero denominator yields 0. May
/// legitimately exceed 100 under the `Net` basis, so the result is not
/// clamped.
pub fn discount_rate(discount: f64, revenue: f64, basis: DiscountRateBasis) -> f64 {
    let denominator = match basis {
        DiscountRateBasis::Gross => revenue + discount,
        DiscountRateBasis::Net => revenue,
    };
    if denominator <= 0.0 {
        return 0.0;
    }
    discount / denominator * 100.0
}

/// Share of transactions that received any discount. Zero total yields 0.
pub fn discount_penetration(discounted: usize, total: usize) -> Rate0To100 {
    if total == 0 {
        return Rate0To100::new(0.0);
    }
    Rate0To100::new(discounted as f64 / total as f64 * 100.0)
}

/// Average revenue per transaction. Zero transactions yields 0.
pub fn average_transaction_value(revenue: f64, transactions: usize) -> f64 {
    if transactions == 0 {
        return 0.0;
    }
    revenue / transactions as f64
}

/// Average revenue per unit sold. Zero units yields 0.
pub fn average_unit_value(revenue: f64, units: usize) -> f64 {
    if units == 0 {
        return 0.0;
    }
    revenue / units as f64
}

/// Average revenue per unique customer. Zero customers yields 0.
pub fn average_spend_per_customer(revenue: f64, customers: usize) -> f64 {
    if customers == 0 {
        return 0.0;
    }
    revenue / customers as f64
}

/// Units sold per transaction.
///
/// Zero transactions yields 1.0, not 0: "no data" reads as "one unit
/// typical" rather than an impossible zero-unit basket.
pub fn units_per_transaction(units: usize, transactions: usize) -> f64 {
    if transactions == 0 {
        return 1.0;
    }
    units as f64 / transactions as f64
}

/// Attendance consistency across a group's sessions, on a 0-100 scale.
///
/// Defined as 100 minus the coefficient of variation (population standard
/// deviation over mean, in percent), clamped to [0, 100]. A single sample
/// is maximally consistent (100); an all-zero or empty sample set is 0.
pub fn consistency(samples: &[f64]) -> Rate0To100 {
    if samples.is_empty() {
        return Rate0To100::new(0.0);
    }
    if samples.len() == 1 {
        return Rate0To100::new(100.0);
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    if mean <= 0.0 {
        return Rate0To100::new(0.0);
    }

    let variance = samples
        .iter()
        .map(|sample| (sample - mean).powi(2))
        .sum::<f64>()
        / samples.len() as f64;
    let coefficient_of_variation = variance.sqrt() / mean * 100.0;

    Rate0To100::new(100.0 - coefficient_of_variation)
}

/// Average attendance per session. Zero sessions yields 0.
pub fn class_average(attendance: f64, sessions: usize) -> f64 {
    if sessions == 0 {
        return 0.0;
    }
    attendance / sessions as f64
}

/// Revenue kept as a percentage of what revenue would have been with no
/// discounting. A zero denominator yields 0.
pub fn revenue_efficiency(revenue: f64, discount: f64) -> Rate0To100 {
    let gross = revenue + discount;
    if gross <= 0.0 {
        return Rate0To100::new(0.0);
    }
    Rate0To100::new(revenue / gross * 100.0)
}

/// Percentage change between adjacent periods.
///
/// A zero previous value is defined as 100 when the current value is
/// positive and 0 otherwise, so a series never carries `Infinity`.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rate_handles_zero_capacity() {
        assert_eq!(fill_rate(10.0, 0.0).value(), 0.0);
        assert_eq!(fill_rate(8.0, 10.0).value(), 80.0);
    }

    #[test]
    fn fill_rate_clamps_overbooked_sessions() {
        assert_eq!(fill_rate(15.0, 10.0).value(), 100.0);
    }

    #[test]
    fn discount_rate_respects_basis() {
        // 100 off a 1400 net spend.
        let gross = discount_rate(100.0, 1400.0, DiscountRateBasis::Gross);
        assert!((gross - 100.0 / 1500.0 * 100.0).abs() < 1e-9);

        let net = discount_rate(100.0, 1400.0, DiscountRateBasis::Net);
        assert!((net - 100.0 / 1400.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn discount_rate_handles_zero_denominator() {
        assert_eq!(discount_rate(0.0, 0.0, DiscountRateBasis::Gross), 0.0);
        assert_eq!(discount_rate(50.0, 0.0, DiscountRateBasis::Net), 0.0);
    }

    #[test]
    fn penetration_and_averages_handle_empty_groups() {
        assert_eq!(discount_penetration(0, 0).value(), 0.0);
        assert_eq!(average_transaction_value(0.0, 0), 0.0);
        assert_eq!(average_unit_value(0.0, 0), 0.0);
        assert_eq!(average_spend_per_customer(0.0, 0), 0.0);
        assert_eq!(class_average(0.0, 0), 0.0);
    }

    #[test]
    fn units_per_transaction_defaults_to_one() {
        assert_eq!(units_per_transaction(0, 0), 1.0);
        assert_eq!(units_per_transaction(6, 4), 1.5);
    }

    #[test]
    fn single_sample_is_maximally_consistent() {
        assert_eq!(consistency(&[10.0]).value(), 100.0);
    }

    #[test]
    fn identical_samples_are_maximally_consistent() {
        assert_eq!(consistency(&[7.0, 7.0, 7.0]).value(), 100.0);
    }

    #[test]
    fn zero_mean_attendance_has_zero_consistency() {
        assert_eq!(consistency(&[0.0, 0.0]).value(), 0.0);
        assert_eq!(consistency(&[]).value(), 0.0);
    }

    #[test]
    fn wildly_varying_attendance_scores_low() {
        let steady = consistency(&[10.0, 11.0, 9.0, 10.0]);
        let erratic = consistency(&[1.0, 20.0, 2.0, 19.0]);
        assert!(steady.value() > erratic.value());
    }

    #[test]
    fn revenue_efficiency_is_share_of_gross() {
        assert_eq!(revenue_efficiency(900.0, 100.0).value(), 90.0);
        assert_eq!(revenue_efficiency(0.0, 0.0).value(), 0.0);
        assert_eq!(revenue_efficiency(500.0, 0.0).value(), 100.0);
    }

    #[test]
    fn growth_rate_avoids_infinity_on_zero_previous() {
        assert_eq!(growth_rate(50.0, 0.0), 100.0);
        assert_eq!(growth_rate(0.0, 0.0), 0.0);
        assert_eq!(growth_rate(150.0, 100.0), 50.0);
        assert_eq!(growth_rate(75.0, 100.0), -25.0);
    }
}
