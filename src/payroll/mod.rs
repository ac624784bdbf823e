//! Per-trainer payroll summaries.
//!
//! Payroll reporting is a trainer-dimension aggregate plus a monthly
//! breakdown per trainer, both built on the same grouping core and period
//! keys as every other view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregation::{group_and_accumulate, Accumulate, SessionAccumulator};
use crate::config::AnalyticsConfig;
use crate::core::SessionRecord;
use crate::metrics::{self, Rate0To100};
use crate::trends::Period;

/// One month of a trainer's payroll breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerMonthRow {
    /// Month sort key (`YYYY-MM`)
    pub month: String,
    pub label: String,
    pub session_count: usize,
    pub total_attendance: u64,
    pub total_revenue: f64,
    pub class_average: f64,
}

/// Payroll summary for one trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerPayroll {
    pub trainer: String,
    pub session_count: usize,
    pub empty_session_count: usize,
    pub total_attendance: u64,
    pub class_average: f64,
    pub fill_rate: Rate0To100,
    pub total_revenue: f64,
    pub revenue_per_session: f64,
    /// Chronological monthly breakdown; sessions with unparseable dates
    /// count in the totals above but cannot appear in a month
    pub monthly: Vec<TrainerMonthRow>,
}

/// Build per-trainer payroll summaries, sorted by trainer name.
pub fn trainer_payroll(
    records: &[SessionRecord],
    config: &AnalyticsConfig,
) -> Vec<TrainerPayroll> {
    let mut by_trainer: HashMap<String, Vec<&SessionRecord>> = HashMap::new();
    for record in records {
        by_trainer
            .entry(record.trainer_key())
            .or_default()
            .push(record);
    }

    let mut rows: Vec<TrainerPayroll> = by_trainer
        .into_iter()
        .map(|(trainer, sessions)| payroll_for(trainer, &sessions, config))
        .collect();
    rows.sort_by(|a, b| a.trainer.cmp(&b.trainer));
    rows
}

fn payroll_for(
    trainer: String,
    sessions: &[&SessionRecord],
    config: &AnalyticsConfig,
) -> TrainerPayroll {
    let mut accumulator = SessionAccumulator::default();
    for session in sessions {
        accumulator.add(session);
    }

    let empty_threshold = f64::from(config.empty_session_attendance);
    let empty_session_count = accumulator
        .attendance_samples()
        .iter()
        .filter(|attendance| **attendance <= empty_threshold)
        .count();

    let monthly_groups: HashMap<String, SessionAccumulator> =
        group_and_accumulate(sessions.iter().copied(), |record| {
            crate::core::dates::parse_flexible_date(&record.date)
                .map(|date| Period::Monthly.key_for(date))
                .unwrap_or_default()
        });

    let mut monthly: Vec<TrainerMonthRow> = monthly_groups
        .into_iter()
        .filter(|(month, _)| !month.is_empty())
        .map(|(month, accumulator)| TrainerMonthRow {
            label: Period::Monthly.label_for(&month),
            month,
            session_count: accumulator.session_count,
            total_attendance: accumulator.total_attendance,
            total_revenue: accumulator.total_revenue,
            class_average: metrics::class_average(
                accumulator.total_attendance as f64,
                accumulator.session_count,
            ),
        })
        .collect();
    monthly.sort_by(|a, b| a.month.cmp(&b.month));

    TrainerPayroll {
        trainer,
        session_count: accumulator.session_count,
        empty_session_count,
        total_attendance: accumulator.total_attendance,
        class_average: metrics::class_average(
            accumulator.total_attendance as f64,
            accumulator.session_count,
        ),
        fill_rate: metrics::fill_rate(
            accumulator.total_attendance as f64,
            accumulator.total_capacity as f64,
        ),
        total_revenue: accumulator.total_revenue,
        revenue_per_session: metrics::average_transaction_value(
            accumulator.total_revenue,
            accumulator.session_count,
        ),
        monthly,
    }
}
