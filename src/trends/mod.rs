//! Time-bucketed trend series.
//!
//! Records are keyed by calendar period and folded with the same reduction
//! core as every other breakdown; only the key selector differs. Period
//! keys are zero-padded so plain lexicographic order is chronological
//! order, and that key is the only thing ever sorted on. Display labels
//! are derived separately and never participate in ordering.
//!
//! Records whose date cannot be parsed are excluded here (they cannot be
//! bucketed); date-agnostic summaries still count them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregation::{group_and_accumulate, SalesAccumulator, SessionAccumulator};
use crate::aggregation::{SalesGroupStats, SessionGroupStats};
use crate::config::AnalyticsConfig;
use crate::core::dates::parse_flexible_date;
use crate::core::{SalesRecord, SessionRecord};
use crate::errors::AnalyticsError;
use crate::metrics;

/// Calendar bucketing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    /// `YYYY-MM`
    Monthly,
    /// `YYYY-Qn`
    Quarterly,
    /// `YYYY`
    Yearly,
    /// ISO week, keyed by the Monday that starts it (`YYYY-MM-DD`)
    Weekly,
}

impl Period {
    /// Sort key for the period containing `date`. Zero-padded; ascending
    /// lexicographic comparison of keys is the ordering contract.
    pub fn key_for(&self, date: NaiveDate) -> String {
        match self {
            Period::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Period::Quarterly => {
                format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1)
            }
            Period::Yearly => format!("{:04}", date.year()),
            Period::Weekly => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                let monday = date - Days::new(offset);
                monday.format("%Y-%m-%d").to_string()
            }
        }
    }

    /// Human-readable label for a sort key produced by [`Period::key_for`].
    ///
    /// Falls back to the key itself when it does not look like one of ours,
    /// so a label can always be rendered.
    pub fn label_for(&self, key: &str) -> String {
        match self {
            Period::Monthly => month_label(key).unwrap_or_else(|| key.to_string()),
            Period::Quarterly => quarter_label(key).unwrap_or_else(|| key.to_string()),
            Period::Yearly => key.to_string(),
            Period::Weekly => week_label(key).unwrap_or_else(|| key.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
            Period::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Period::Monthly),
            "quarterly" => Ok(Period::Quarterly),
            "yearly" => Ok(Period::Yearly),
            "weekly" => Ok(Period::Weekly),
            _ => Err(AnalyticsError::UnknownPeriod(s.to_string())),
        }
    }
}

fn month_label(key: &str) -> Option<String> {
    let (year, month) = key.split_once('-')?;
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    Some(date.format("%b %Y").to_string())
}

fn quarter_label(key: &str) -> Option<String> {
    let (year, quarter) = key.split_once('-')?;
    if !quarter.starts_with('Q') {
        return None;
    }
    Some(format!("{quarter} {year}"))
}

fn week_label(key: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    Some(format!("Week of {}", date.format("%d %b %Y")))
}

/// One period of a sales trend series.
///
/// The embedded stats row's `group` field holds the period sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPeriodPoint {
    pub label: String,
    /// Revenue growth versus the previous period; absent on the first one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    #[serde(flatten)]
    pub stats: SalesGroupStats,
}

impl SalesPeriodPoint {
    pub fn period_key(&self) -> &str {
        &self.stats.group
    }
}

/// One period of a session trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPeriodPoint {
    pub label: String,
    /// Attendance growth versus the previous period; absent on the first one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    #[serde(flatten)]
    pub stats: SessionGroupStats,
}

impl SessionPeriodPoint {
    pub fn period_key(&self) -> &str {
        &self.stats.group
    }
}

/// Chronological per-period sales aggregates with revenue growth.
pub fn sales_trend(
    records: &[SalesRecord],
    period: Period,
    config: &AnalyticsConfig,
) -> Vec<SalesPeriodPoint> {
    let dated: Vec<&SalesRecord> = records
        .iter()
        .filter(|record| parse_flexible_date(&record.payment_date).is_some())
        .collect();

    let groups: HashMap<String, SalesAccumulator> =
        group_and_accumulate(dated.iter().copied(), |record| {
            parse_flexible_date(&record.payment_date)
                .map(|date| period.key_for(date))
                .unwrap_or_default()
        });

    let mut rows: Vec<SalesGroupStats> = groups
        .into_iter()
        .map(|(key, accumulator)| accumulator.finalize(key, config))
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));

    let mut points = Vec::with_capacity(rows.len());
    let mut previous_revenue: Option<f64> = None;
    for stats in rows {
        let growth = previous_revenue
            .map(|previous| metrics::growth_rate(stats.total_revenue, previous));
        previous_revenue = Some(stats.total_revenue);
        points.push(SalesPeriodPoint {
            label: period.label_for(&stats.group),
            growth_rate: growth,
            stats,
        });
    }
    points
}

/// Chronological per-period session aggregates with attendance growth.
pub fn session_trend(
    records: &[SessionRecord],
    period: Period,
    config: &AnalyticsConfig,
) -> Vec<SessionPeriodPoint> {
    let dated: Vec<&SessionRecord> = records
        .iter()
        .filter(|record| parse_flexible_date(&record.date).is_some())
        .collect();

    let groups: HashMap<String, SessionAccumulator> =
        group_and_accumulate(dated.iter().copied(), |record| {
            parse_flexible_date(&record.date)
                .map(|date| period.key_for(date))
                .unwrap_or_default()
        });

    let mut rows: Vec<SessionGroupStats> = groups
        .into_iter()
        .map(|(key, accumulator)| accumulator.finalize(key, config))
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));

    let mut points = Vec::with_capacity(rows.len());
    let mut previous_attendance: Option<f64> = None;
    for stats in rows {
        let attendance = stats.total_attendance as f64;
        let growth = previous_attendance
            .map(|previous| metrics::growth_rate(attendance, previous));
        previous_attendance = Some(attendance);
        points.push(SessionPeriodPoint {
            label: period.label_for(&stats.group),
            growth_rate: growth,
            stats,
        });
    }
    points
}
