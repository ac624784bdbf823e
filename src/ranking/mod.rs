//! Ranking and top/bottom selection over finalized group rows.
//!
//! Sorting is stable, so rows with equal metric values keep their
//! group-enumeration order. Bottom-N is the tail of the descending order,
//! reversed, which degrades gracefully when N exceeds the number of
//! groups: both selections simply return every group.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::aggregation::{SalesGroupStats, SessionGroupStats};
use crate::errors::AnalyticsError;

/// Sort direction for a ranked listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Descending,
    Ascending,
}

/// Ranking metrics applicable to sales group rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalesRankingMetric {
    Revenue,
    Discount,
    DiscountRate,
    Transactions,
    Units,
    UniqueCustomers,
    AverageTransactionValue,
    AverageSpendPerCustomer,
}

impl SalesRankingMetric {
    /// The sort value this metric reads off a finalized row.
    pub fn value_of(&self, stats: &SalesGroupStats) -> f64 {
        match self {
            SalesRankingMetric::Revenue => stats.total_revenue,
            SalesRankingMetric::Discount => stats.total_discount,
            SalesRankingMetric::DiscountRate => stats.discount_rate,
            SalesRankingMetric::Transactions => stats.transaction_count as f64,
            SalesRankingMetric::Units => stats.unit_count as f64,
            SalesRankingMetric::UniqueCustomers => stats.unique_customers as f64,
            SalesRankingMetric::AverageTransactionValue => stats.atv,
            SalesRankingMetric::AverageSpendPerCustomer => stats.asv,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalesRankingMetric::Revenue => "revenue",
            SalesRankingMetric::Discount => "discount",
            SalesRankingMetric::DiscountRate => "discount-rate",
            SalesRankingMetric::Transactions => "transactions",
            SalesRankingMetric::Units => "units",
            SalesRankingMetric::UniqueCustomers => "unique-customers",
            SalesRankingMetric::AverageTransactionValue => "average-transaction-value",
            SalesRankingMetric::AverageSpendPerCustomer => "average-spend-per-customer",
        }
    }
}

impl fmt::Display for SalesRankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesRankingMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(SalesRankingMetric::Revenue),
            "discount" => Ok(SalesRankingMetric::Discount),
            "discount-rate" => Ok(SalesRankingMetric::DiscountRate),
            "transactions" => Ok(SalesRankingMetric::Transactions),
            "units" => Ok(SalesRankingMetric::Units),
            "unique-customers" => Ok(SalesRankingMetric::UniqueCustomers),
            "average-transaction-value" => Ok(SalesRankingMetric::AverageTransactionValue),
            "average-spend-per-customer" => Ok(SalesRankingMetric::AverageSpendPerCustomer),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Ranking metrics applicable to session group rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionRankingMetric {
    Attendance,
    FillRate,
    ClassAverage,
    Consistency,
    Revenue,
    Sessions,
}

impl SessionRankingMetric {
    /// The sort value this metric reads off a finalized row.
    pub fn value_of(&self, stats: &SessionGroupStats) -> f64 {
        match self {
            SessionRankingMetric::Attendance => stats.total_attendance as f64,
            SessionRankingMetric::FillRate => stats.fill_rate.value(),
            SessionRankingMetric::ClassAverage => stats.class_average,
            SessionRankingMetric::Consistency => stats.consistency.value(),
            SessionRankingMetric::Revenue => stats.total_revenue,
            SessionRankingMetric::Sessions => stats.session_count as f64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRankingMetric::Attendance => "attendance",
            SessionRankingMetric::FillRate => "fill-rate",
            SessionRankingMetric::ClassAverage => "class-average",
            SessionRankingMetric::Consistency => "consistency",
            SessionRankingMetric::Revenue => "revenue",
            SessionRankingMetric::Sessions => "sessions",
        }
    }
}

impl fmt::Display for SessionRankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionRankingMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attendance" => Ok(SessionRankingMetric::Attendance),
            "fill-rate" => Ok(SessionRankingMetric::FillRate),
            "class-average" => Ok(SessionRankingMetric::ClassAverage),
            "consistency" => Ok(SessionRankingMetric::Consistency),
            "revenue" => Ok(SessionRankingMetric::Revenue),
            "sessions" => Ok(SessionRankingMetric::Sessions),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Top and bottom slices of one ranked result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings<R: Clone> {
    /// Best N rows, best first
    pub top: Vector<R>,
    /// Worst N rows, worst first
    pub bottom: Vector<R>,
}

/// Sort rows by a metric value. Stable: ties preserve input order.
pub fn sorted_by_metric<R, F>(rows: &[R], value: F, direction: SortDirection) -> Vec<R>
where
    R: Clone,
    F: Fn(&R) -> f64,
{
    let mut ordered = rows.to_vec();
    ordered.sort_by(|a, b| {
        let descending = value(b).partial_cmp(&value(a)).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Descending => descending,
            SortDirection::Ascending => descending.reverse(),
        }
    });
    ordered
}

/// Rank rows by a metric value and slice out top-N and bottom-N.
///
/// Bottom-N is the last N of the descending order, reversed. When `n`
/// meets or exceeds the group count both slices contain every group, and
/// they overlap whenever `n` exceeds half of it.
pub fn rank_by<R, F>(rows: &[R], value: F, n: usize) -> Rankings<R>
where
    R: Clone,
    F: Fn(&R) -> f64,
{
    let ordered = sorted_by_metric(rows, &value, SortDirection::Descending);
    let top: Vector<R> = ordered.iter().take(n).cloned().collect();
    let start = ordered.len().saturating_sub(n);
    let bottom: Vector<R> = ordered[start..].iter().rev().cloned().collect();
    Rankings { top, bottom }
}

/// Rank sales group rows by a named metric.
pub fn rank_sales(
    rows: &[SalesGroupStats],
    metric: SalesRankingMetric,
    n: usize,
) -> Rankings<SalesGroupStats> {
    rank_by(rows, |row| metric.value_of(row), n)
}

/// Rank session group rows by a named metric.
pub fn rank_sessions(
    rows: &[SessionGroupStats],
    metric: SessionRankingMetric,
    n: usize,
) -> Rankings<SessionGroupStats> {
    rank_by(rows, |row| metric.value_of(row), n)
}

/// Drop records whose group has fewer than `min` occurrences.
///
/// Two passes over the records: count per key, then retain records whose
/// key meets the floor. Run this before grouping with the same key the
/// final aggregation will use, so sparsely-occurring slots never reach a
/// ranking at all.
pub fn filter_min_occurrences<T, K>(records: &[T], key_fn: K, min: usize) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> String,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(key_fn(record)).or_insert(0) += 1;
    }

    records
        .iter()
        .filter(|record| counts.get(&key_fn(record)).copied().unwrap_or(0) >= min)
        .cloned()
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn top_and_bottom_return_everything_when_n_exceeds_m(
            values in prop::collection::vec(0.0..1000.0f64, 0..20),
            extra in 0usize..10,
        ) {
            let n = values.len() + extra;
            let rankings = rank_by(&values, |v| *v, n);
            assert_eq!(rankings.top.len(), values.len());
            assert_eq!(rankings.bottom.len(), values.len());
        }

        #[test]
        fn bottom_is_the_reverse_of_the_descending_tail(
            values in prop::collection::vec(0.0..1000.0f64, 1..20),
            n in 1usize..25,
        ) {
            let rankings = rank_by(&values, |v| *v, n);
            let mut ascending = sorted_by_metric(&values, |v| *v, SortDirection::Descending);
            ascending.reverse();
            let expected: Vec<f64> = ascending.into_iter().take(n).collect();
            let bottom: Vec<f64> = rankings.bottom.iter().copied().collect();
            assert_eq!(bottom, expected);
        }
    }
}
