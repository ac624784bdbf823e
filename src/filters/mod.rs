//! Pure predicate composition for record filtering.
//!
//! Every criterion is optional: an empty list, an absent bound, or the
//! literal `"all"` entry constrains nothing. The composed predicate is
//! applied in one pass before any aggregation, and every breakdown within
//! a view must run on that same filtered set.
//!
//! Date-range checks fail closed: when a bound is set, a record whose
//! date cannot be parsed is excluded rather than silently kept.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::dates::parse_flexible_date;
use crate::core::{SalesRecord, SessionRecord};

/// Wildcard entry that makes a list criterion a no-op.
const ALL: &str = "all";

fn matches_list(selected: &[String], value: &str) -> bool {
    selected.is_empty()
        || selected.iter().any(|entry| entry.eq_ignore_ascii_case(ALL))
        || selected.iter().any(|entry| entry == value)
}

fn within_numeric_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

fn within_date_range(raw: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    match parse_flexible_date(raw) {
        Some(date) => {
            from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
        }
        None => false,
    }
}

/// Independently-optional filter criteria for sales records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesFilter {
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    pub products: Vec<String>,
    pub staff: Vec<String>,
    pub payment_methods: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_discount_amount: Option<f64>,
    pub max_discount_amount: Option<f64>,
    pub min_discount_percent: Option<f64>,
    pub max_discount_percent: Option<f64>,
}

impl SalesFilter {
    /// Whether no criterion constrains anything.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    /// Composed predicate over one record. List criteria match against the
    /// record's resolved group keys, so the `"Unknown"` bucket is
    /// selectable like any other.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        matches_list(&self.locations, &record.location_key())
            && matches_list(&self.categories, &record.category_key())
            && matches_list(&self.products, &record.product_key())
            && matches_list(&self.staff, &record.seller_key())
            && matches_list(&self.payment_methods, &record.payment_method_key())
            && within_date_range(&record.payment_date, self.date_from, self.date_to)
            && within_numeric_range(
                record.discount_amount(),
                self.min_discount_amount,
                self.max_discount_amount,
            )
            && within_numeric_range(
                record.discount_percentage(),
                self.min_discount_percent,
                self.max_discount_percent,
            )
    }

    /// One-pass application over a record set.
    pub fn apply(&self, records: &[SalesRecord]) -> Vec<SalesRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// Independently-optional filter criteria for session records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionFilter {
    pub locations: Vec<String>,
    pub trainers: Vec<String>,
    pub classes: Vec<String>,
    pub days_of_week: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SessionFilter {
    /// Whether no criterion constrains anything.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    /// Composed predicate over one record.
    pub fn matches(&self, record: &SessionRecord) -> bool {
        matches_list(&self.locations, &record.location_key())
            && matches_list(&self.trainers, &record.trainer_key())
            && matches_list(&self.classes, &record.class_key())
            && matches_list(&self.days_of_week, &record.day_key())
            && within_date_range(&record.date, self.date_from, self.date_to)
    }

    /// One-pass application over a record set.
    pub fn apply(&self, records: &[SessionRecord]) -> Vec<SessionRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
