//! Grouping/reduction core.
//!
//! One generic single-pass fold partitions records by a caller-chosen key
//! and feeds each partition into a running accumulator. Accumulators carry
//! live identity sets while accumulating; `finalize` then collapses them
//! into plain, serializable group rows carrying every applicable derived
//! metric. The two phases are deliberately separate: accumulate with sets,
//! finalize to numbers.

pub mod dimensions;

pub use dimensions::{SalesDimension, SessionDimension};

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::core::{SalesRecord, SessionRecord};
use crate::metrics::{self, Rate0To100};

/// A running per-group fold over records of type `T`.
pub trait Accumulate<T>: Default {
    /// Fold one record into the accumulator.
    fn add(&mut self, record: &T);
}

/// Partition records by key and fold each partition into an accumulator.
///
/// Single pass, no side effects; the accumulator for a never-seen key is
/// lazily initialized from `Default`. Empty input yields an empty map, and
/// consumers must cope with zero groups (rankings become empty, averages
/// become 0).
pub fn group_and_accumulate<'a, T, A, K, I>(records: I, key_fn: K) -> HashMap<String, A>
where
    T: 'a,
    A: Accumulate<T>,
    K: Fn(&T) -> String,
    I: IntoIterator<Item = &'a T>,
{
    let mut groups: HashMap<String, A> = HashMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().add(record);
    }
    groups
}

/// Running totals for a group of sales lines.
///
/// Identity sets stay live during accumulation and are collapsed to counts
/// by [`SalesAccumulator::finalize`]. Anonymous lines (no customer
/// identity) cannot be deduplicated, so each counts as its own
/// transaction and is excluded from the unique-customer count.
#[derive(Debug, Clone, Default)]
pub struct SalesAccumulator {
    pub line_count: usize,
    pub discounted_line_count: usize,
    pub total_revenue: f64,
    pub total_discount: f64,
    pub total_mrp: f64,
    customers: HashSet<String>,
    members: HashSet<String>,
    transactions: HashSet<String>,
    discounted_transactions: HashSet<String>,
    anonymous_lines: usize,
    discounted_anonymous_lines: usize,
}

impl Accumulate<SalesRecord> for SalesAccumulator {
    fn add(&mut self, record: &SalesRecord) {
        self.line_count += 1;
        self.total_revenue += record.payment_value;
        self.total_discount += record.discount_amount();
        self.total_mrp += record.mrp_post_tax();
        if record.is_discounted() {
            self.discounted_line_count += 1;
        }

        if let Some(customer) = record.customer_key() {
            self.customers.insert(customer);
        }
        if let Some(member) = record.member_key() {
            self.members.insert(member);
        }

        match record.transaction_key() {
            Some(key) => {
                if record.is_discounted() {
                    self.discounted_transactions.insert(key.clone());
                }
                self.transactions.insert(key);
            }
            None => {
                self.anonymous_lines += 1;
                if record.is_discounted() {
                    self.discounted_anonymous_lines += 1;
                }
            }
        }
    }
}

impl SalesAccumulator {
    /// Units sold; each line is one unit.
    pub fn unit_count(&self) -> usize {
        self.line_count
    }

    /// Distinct shopping visits, anonymous lines counted individually.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len() + self.anonymous_lines
    }

    /// Distinct shopping visits containing at least one discounted line.
    pub fn discounted_transaction_count(&self) -> usize {
        self.discounted_transactions.len() + self.discounted_anonymous_lines
    }

    pub fn unique_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn unique_members(&self) -> usize {
        self.members.len()
    }

    /// Collapse the accumulator into a plain group row.
    pub fn finalize(&self, group: String, config: &AnalyticsConfig) -> SalesGroupStats {
        let transactions = self.transaction_count();
        let units = self.unit_count();
        SalesGroupStats {
            group,
            unit_count: units,
            transaction_count: transactions,
            discounted_transaction_count: self.discounted_transaction_count(),
            unique_customers: self.unique_customers(),
            unique_members: self.unique_members(),
            total_revenue: self.total_revenue,
            total_discount: self.total_discount,
            total_mrp: self.total_mrp,
            avg_discount: metrics::average_unit_value(self.total_discount, units),
            discount_rate: metrics::discount_rate(
                self.total_discount,
                self.total_revenue,
                config.discount_rate_basis,
            ),
            discount_penetration: metrics::discount_penetration(
                self.discounted_transaction_count(),
                transactions,
            ),
            atv: metrics::average_transaction_value(self.total_revenue, transactions),
            auv: metrics::average_unit_value(self.total_revenue, units),
            asv: metrics::average_spend_per_customer(self.total_revenue, self.unique_customers()),
            upt: metrics::units_per_transaction(units, transactions),
            revenue_efficiency: metrics::revenue_efficiency(
                self.total_revenue,
                self.total_discount,
            ),
        }
    }
}

/// One finalized sales group row.
///
/// Serialized field names are the binding contract for dashboard tables
/// and charts; renaming one is a breaking change for hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGroupStats {
    pub group: String,
    pub unit_count: usize,
    pub transaction_count: usize,
    pub discounted_transaction_count: usize,
    pub unique_customers: usize,
    pub unique_members: usize,
    pub total_revenue: f64,
    pub total_discount: f64,
    pub total_mrp: f64,
    /// Average discount per unit across all lines, discounted or not
    pub avg_discount: f64,
    pub discount_rate: f64,
    pub discount_penetration: Rate0To100,
    pub atv: f64,
    pub auv: f64,
    pub asv: f64,
    pub upt: f64,
    pub revenue_efficiency: Rate0To100,
}

/// Running totals for a group of class sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionAccumulator {
    pub session_count: usize,
    pub total_attendance: u64,
    pub total_capacity: u64,
    pub total_booked: u64,
    pub total_late_cancelled: u64,
    pub total_revenue: f64,
    attendance_samples: Vec<f64>,
}

impl Accumulate<SessionRecord> for SessionAccumulator {
    fn add(&mut self, record: &SessionRecord) {
        self.session_count += 1;
        self.total_attendance += u64::from(record.checked_in_count);
        self.total_capacity += u64::from(record.capacity);
        self.total_booked += u64::from(record.booked_count);
        self.total_late_cancelled += u64::from(record.late_cancelled_count);
        self.total_revenue += record.total_paid;
        self.attendance_samples
            .push(f64::from(record.checked_in_count));
    }
}

impl SessionAccumulator {
    /// Per-session attendance values seen so far, in input order.
    pub fn attendance_samples(&self) -> &[f64] {
        &self.attendance_samples
    }

    /// Collapse the accumulator into a plain group row.
    pub fn finalize(&self, group: String, config: &AnalyticsConfig) -> SessionGroupStats {
        let empty_threshold = f64::from(config.empty_session_attendance);
        let empty_session_count = self
            .attendance_samples
            .iter()
            .filter(|attendance| **attendance <= empty_threshold)
            .count();

        SessionGroupStats {
            group,
            session_count: self.session_count,
            empty_session_count,
            total_attendance: self.total_attendance,
            total_capacity: self.total_capacity,
            total_booked: self.total_booked,
            total_late_cancelled: self.total_late_cancelled,
            total_revenue: self.total_revenue,
            fill_rate: metrics::fill_rate(self.total_attendance as f64, self.total_capacity as f64),
            class_average: metrics::class_average(
                self.total_attendance as f64,
                self.session_count,
            ),
            consistency: metrics::consistency(&self.attendance_samples),
            revenue_per_session: metrics::average_transaction_value(
                self.total_revenue,
                self.session_count,
            ),
        }
    }
}

/// One finalized class/session group row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGroupStats {
    pub group: String,
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

/// Group sales records along a dimension and finalize every group.
///
/// Rows come back sorted by group key so output is deterministic across
/// invocations of the same input.
pub fn sales_breakdown(
    records: &[SalesRecord],
    dimension: SalesDimension,
    config: &AnalyticsConfig,
) -> Vec<SalesGroupStats> {
    let groups: HashMap<String, SalesAccumulator> =
        group_and_accumulate(records, |record| dimension.key_of(record));
    let mut rows: Vec<SalesGroupStats> = groups
        .into_iter()
        .map(|(group, accumulator)| accumulator.finalize(group, config))
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));
    rows
}

/// Group session records along a dimension and finalize every group.
pub fn session_breakdown(
    records: &[SessionRecord],
    dimension: SessionDimension,
    config: &AnalyticsConfig,
) -> Vec<SessionGroupStats> {
    let groups: HashMap<String, SessionAccumulator> =
        group_and_accumulate(records, |record| dimension.key_of(record));
    let mut rows: Vec<SessionGroupStats> = groups
        .into_iter()
        .map(|(group, accumulator)| accumulator.finalize(group, config))
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sale(category: &str, email: &str, date: &str, value: f64, discount: Option<f64>) -> SalesRecord {
        SalesRecord {
            payment_date: date.to_string(),
            customer_email: Some(email.to_string()),
            cleaned_category: Some(category.to_string()),
            payment_value: value,
            discount_amount: discount,
            ..Default::default()
        }
    }

    fn session(trainer: &str, capacity: u32, checked_in: u32) -> SessionRecord {
        SessionRecord {
            trainer_name: Some(trainer.to_string()),
            capacity,
            checked_in_count: checked_in,
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups: HashMap<String, SalesAccumulator> =
            group_and_accumulate(&[] as &[SalesRecord], |r| r.category_key());
        assert!(groups.is_empty());

        let rows = sales_breakdown(&[], SalesDimension::Category, &AnalyticsConfig::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn one_category_group_accumulates_all_lines() {
        // One line discounted, one not, one with the discount field absent.
        let records = vec![
            sale("A", "x@y.z", "2024-01-05", 900.0, Some(100.0)),
            sale("A", "p@q.r", "2024-01-06", 500.0, Some(0.0)),
            sale("A", "m@n.o", "2024-01-07", 0.0, None),
        ];

        let rows = sales_breakdown(&records, SalesDimension::Category, &AnalyticsConfig::default());
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.group, "A");
        assert_eq!(row.total_discount, 100.0);
        assert_eq!(row.total_revenue, 1400.0);
        assert!((row.avg_discount - 100.0 / 3.0).abs() < 1e-9);
        assert!((row.discount_rate - 100.0 / 1500.0 * 100.0).abs() < 1e-9);
        assert_eq!(row.unique_customers, 3);
        assert_eq!(row.transaction_count, 3);
    }

    #[test]
    fn repeat_customer_same_day_is_one_transaction() {
        let records = vec![
            sale("A", "x@y.z", "2024-01-05", 100.0, None),
            sale("A", "x@y.z", "2024-01-05", 200.0, Some(20.0)),
            sale("A", "x@y.z", "2024-01-09", 300.0, None),
        ];

        let rows = sales_breakdown(&records, SalesDimension::Category, &AnalyticsConfig::default());
        let row = &rows[0];
        assert_eq!(row.unit_count, 3);
        assert_eq!(row.transaction_count, 2);
        assert_eq!(row.discounted_transaction_count, 1);
        assert_eq!(row.unique_customers, 1);
        assert_eq!(row.upt, 1.5);
        assert_eq!(row.atv, 300.0);
        assert_eq!(row.asv, 600.0);
        assert_eq!(row.auv, 200.0);
    }

    #[test]
    fn anonymous_lines_each_count_as_their_own_transaction() {
        let records = vec![
            SalesRecord {
                payment_value: 50.0,
                ..Default::default()
            },
            SalesRecord {
                payment_value: 70.0,
                discount_amount: Some(5.0),
                ..Default::default()
            },
        ];

        let rows = sales_breakdown(&records, SalesDimension::Category, &AnalyticsConfig::default());
        let row = &rows[0];
        assert_eq!(row.group, "Unknown");
        assert_eq!(row.transaction_count, 2);
        assert_eq!(row.discounted_transaction_count, 1);
        assert_eq!(row.unique_customers, 0);
        assert_eq!(row.asv, 0.0);
    }

    #[test]
    fn all_zero_capacity_group_has_zero_fill_rate() {
        let records = vec![session("Asha", 0, 0), session("Asha", 0, 0)];
        let rows =
            session_breakdown(&records, SessionDimension::Trainer, &AnalyticsConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fill_rate.value(), 0.0);
        assert_eq!(rows[0].class_average, 0.0);
    }

    #[test]
    fn session_group_rows_carry_every_sum() {
        let records = vec![
            SessionRecord {
                trainer_name: Some("Asha".to_string()),
                capacity: 20,
                checked_in_count: 15,
                booked_count: 18,
                late_cancelled_count: 2,
                total_paid: 4500.0,
                ..Default::default()
            },
            SessionRecord {
                trainer_name: Some("Asha".to_string()),
                capacity: 20,
                checked_in_count: 5,
                booked_count: 8,
                late_cancelled_count: 1,
                total_paid: 1500.0,
                ..Default::default()
            },
        ];

        let rows =
            session_breakdown(&records, SessionDimension::Trainer, &AnalyticsConfig::default());
        let row = &rows[0];
        assert_eq!(row.session_count, 2);
        assert_eq!(row.total_attendance, 20);
        assert_eq!(row.total_capacity, 40);
        assert_eq!(row.total_booked, 26);
        assert_eq!(row.total_late_cancelled, 3);
        assert_eq!(row.fill_rate.value(), 50.0);
        assert_eq!(row.class_average, 10.0);
        assert_eq!(row.revenue_per_session, 3000.0);
    }

    #[test]
    fn breakdown_rows_are_sorted_by_group_key() {
        let records = vec![
            sale("Zumba", "a@b.c", "2024-01-01", 10.0, None),
            sale("Apparel", "a@b.c", "2024-01-01", 20.0, None),
            sale("Memberships", "a@b.c", "2024-01-01", 30.0, None),
        ];
        let rows = sales_breakdown(&records, SalesDimension::Category, &AnalyticsConfig::default());
        let groups: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["Apparel", "Memberships", "Zumba"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            sale("A", "x@y.z", "2024-01-05", 900.0, Some(100.0)),
            sale("B", "p@q.r", "2024-01-06", 500.0, None),
        ];
        let config = AnalyticsConfig::default();
        let first = sales_breakdown(&records, SalesDimension::Category, &config);
        let second = sales_breakdown(&records, SalesDimension::Category, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn group_rows_serialize_with_stable_camel_case_names() {
        let rows = sales_breakdown(
            &[sale("A", "x@y.z", "2024-01-05", 900.0, Some(100.0))],
            SalesDimension::Category,
            &AnalyticsConfig::default(),
        );
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json.get("totalRevenue").is_some());
        assert!(json.get("discountPenetration").is_some());
        assert!(json.get("uniqueCustomers").is_some());
    }
}
