//! Overall (ungrouped) summaries and drill-down record selection.
//!
//! Summaries are date-agnostic: records whose dates cannot be parsed are
//! still counted here, even though dated outputs skip them.

use serde::{Deserialize, Serialize};

use crate::aggregation::{
    Accumulate, SalesAccumulator, SalesDimension, SessionAccumulator, SessionDimension,
};
use crate::config::AnalyticsConfig;
use crate::core::{SalesRecord, SessionRecord};
use crate::metrics::{self, Rate0To100};

/// Overall statistics for a (filtered) sales record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub unit_count: usize,
    pub transaction_count: usize,
    pub discounted_transaction_count: usize,
    pub unique_customers: usize,
    pub unique_members: usize,
    pub total_revenue: f64,
    pub total_discount: f64,
    pub total_mrp: f64,
    pub avg_discount: f64,
    pub discount_rate: f64,
    pub discount_penetration: Rate0To100,
    pub atv: f64,
    pub auv: f64,
    pub asv: f64,
    pub upt: f64,
    pub revenue_efficiency: Rate0To100,
}

/// Overall statistics for a (filtered) session record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_count: usize,
    pub empty_session_count: usize,
    pub total_attendance: u64,
    pub total_capacity: u64,
    pub total_booked: u64,
    pub total_late_cancelled: u64,
    pub total_revenue: f64,
    pub fill_rate: Rate0To100,
    pub class_average: f64,
    pub consistency: Rate0To100,
    pub revenue_per_session: f64,
}

/// Fold every record into one overall sales summary.
pub fn sales_summary(records: &[SalesRecord], config: &AnalyticsConfig) -> SalesSummary {
    let mut accumulator = SalesAccumulator::default();
    for record in records {
        accumulator.add(record);
    }

    let transactions = accumulator.transaction_count();
    let units = accumulator.unit_count();
    SalesSummary {
        unit_count: units,
        transaction_count: transactions,
        discounted_transaction_count: accumulator.discounted_transaction_count(),
        unique_customers: accumulator.unique_customers(),
        unique_members: accumulator.unique_members(),
        total_revenue: accumulator.total_revenue,
        total_discount: accumulator.total_discount,
        total_mrp: accumulator.total_mrp,
        avg_discount: metrics::average_unit_value(accumulator.total_discount, units),
        discount_rate: metrics::discount_rate(
            accumulator.total_discount,
            accumulator.total_revenue,
            config.discount_rate_basis,
        ),
        discount_penetration: metrics::discount_penetration(
            accumulator.discounted_transaction_count(),
            transactions,
        ),
        atv: metrics::average_transaction_value(accumulator.total_revenue, transactions),
        auv: metrics::average_unit_value(accumulator.total_revenue, units),
        asv: metrics::average_spend_per_customer(
            accumulator.total_revenue,
            accumulator.unique_customers(),
        ),
        upt: metrics::units_per_transaction(units, transactions),
        revenue_efficiency: metrics::revenue_efficiency(
            accumulator.total_revenue,
            accumulator.total_discount,
        ),
    }
}

/// Fold every record into one overall session summary.
pub fn session_summary(records: &[SessionRecord], config: &AnalyticsConfig) -> SessionSummary {
    let mut accumulator = SessionAccumulator::default();
    for record in records {
        accumulator.add(record);
    }

    let empty_threshold = f64::from(config.empty_session_attendance);
    let empty_session_count = accumulator
        .attendance_samples()
        .iter()
        .filter(|attendance| **attendance <= empty_threshold)
        .count();

    SessionSummary {
        session_count: accumulator.session_count,
        empty_session_count,
        total_attendance: accumulator.total_attendance,
        total_capacity: accumulator.total_capacity,
        total_booked: accumulator.total_booked,
        total_late_cancelled: accumulator.total_late_cancelled,
        total_revenue: accumulator.total_revenue,
        fill_rate: metrics::fill_rate(
            accumulator.total_attendance as f64,
            accumulator.total_capacity as f64,
        ),
        class_average: metrics::class_average(
            accumulator.total_attendance as f64,
            accumulator.session_count,
        ),
        consistency: metrics::consistency(accumulator.attendance_samples()),
        revenue_per_session: metrics::average_transaction_value(
            accumulator.total_revenue,
            accumulator.session_count,
        ),
    }
}

/// Raw sales records behind one aggregate row, for drill-down views.
pub fn sales_records_in_group<'a>(
    records: &'a [SalesRecord],
    dimension: SalesDimension,
    group: &str,
) -> Vec<&'a SalesRecord> {
    records
        .iter()
        .filter(|record| dimension.key_of(record) == group)
        .collect()
}

/// Raw session records behind one aggregate row, for drill-down views.
pub fn session_records_in_group<'a>(
    records: &'a [SessionRecord],
    dimension: SessionDimension,
    group: &str,
) -> Vec<&'a SessionRecord> {
    records
        .iter()
        .filter(|record| dimension.key_of(record) == group)
        .collect()
}
