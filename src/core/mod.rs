//! Flat record types flowing through the aggregation engine.
//!
//! Records arrive from an external data-loading layer as immutable arrays,
//! one element per transaction line or per scheduled class occurrence. The
//! engine never mutates them; every accessor below resolves the upstream
//! export's quirks (absent numerics, empty key fields, seller sentinel)
//! into the values aggregation actually works with.
//!
//! Field names serialize in camelCase and are a stable contract: dashboard
//! tables and charts bind to them by name.

pub mod dates;

use serde::{Deserialize, Serialize};

/// Fallback group key for records missing a grouping field.
///
/// Exactly one such bucket exists per grouping dimension; empty strings,
/// whitespace, and absent fields all collapse into it.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Seller shown for sales the upstream system recorded without a person.
pub const ONLINE_SELLER: &str = "Online/System";

/// Sentinel the upstream export writes when no seller was involved.
const SELLER_SENTINEL: &str = "-";

fn key_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => UNKNOWN_KEY.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One purchase line from the sales export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    /// Raw payment date; several encodings occur (see [`dates`])
    #[serde(default)]
    pub payment_date: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub cleaned_product: Option<String>,
    #[serde(default)]
    pub cleaned_category: Option<String>,
    #[serde(default)]
    pub calculated_location: Option<String>,
    /// Staff member credited with the sale; `"-"` means online/system
    #[serde(default)]
    pub sold_by: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Currency amount discounted off this line; absent means none
    #[serde(default)]
    pub discount_amount: Option<f64>,
    /// Discount as a percentage of the pre-discount price (0-100)
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    /// Net amount actually paid for this line
    #[serde(default)]
    pub payment_value: f64,
    /// Pre-discount reference price including tax
    #[serde(default)]
    pub mrp_post_tax: Option<f64>,
}

impl SalesRecord {
    /// Discount amount with the absent-means-zero default applied.
    pub fn discount_amount(&self) -> f64 {
        self.discount_amount.unwrap_or(0.0)
    }

    /// Discount percentage with the absent-means-zero default applied.
    pub fn discount_percentage(&self) -> f64 {
        self.discount_percentage.unwrap_or(0.0)
    }

    /// Pre-discount reference price with the absent-means-zero default applied.
    pub fn mrp_post_tax(&self) -> f64 {
        self.mrp_post_tax.unwrap_or(0.0)
    }

    /// Whether this line carries any discount.
    pub fn is_discounted(&self) -> bool {
        self.discount_amount() > 0.0
    }

    pub fn category_key(&self) -> String {
        key_or_unknown(self.cleaned_category.as_deref())
    }

    pub fn product_key(&self) -> String {
        key_or_unknown(self.cleaned_product.as_deref())
    }

    pub fn location_key(&self) -> String {
        key_or_unknown(self.calculated_location.as_deref())
    }

    pub fn payment_method_key(&self) -> String {
        key_or_unknown(self.payment_method.as_deref())
    }

    /// Staff grouping key. The upstream sentinel `"-"` resolves to
    /// [`ONLINE_SELLER`]; an absent seller resolves to [`UNKNOWN_KEY`].
    pub fn seller_key(&self) -> String {
        match non_empty(self.sold_by.as_deref()) {
            Some(SELLER_SENTINEL) => ONLINE_SELLER.to_string(),
            Some(name) => name.to_string(),
            None => UNKNOWN_KEY.to_string(),
        }
    }

    /// Customer identity for uniqueness counting: the first non-empty of
    /// email, member id, and name. `None` when the line is anonymous.
    pub fn customer_key(&self) -> Option<String> {
        non_empty(self.customer_email.as_deref())
            .or_else(|| non_empty(self.member_id.as_deref()))
            .or_else(|| non_empty(self.customer_name.as_deref()))
            .map(str::to_string)
    }

    /// Member identity for uniqueness counting.
    pub fn member_key(&self) -> Option<String> {
        non_empty(self.member_id.as_deref()).map(str::to_string)
    }

    /// Transaction identity: one shopping visit, i.e. all lines a customer
    /// paid on the same raw date. `None` for anonymous lines, which each
    /// count as their own transaction.
    pub fn transaction_key(&self) -> Option<String> {
        self.customer_key()
            .map(|customer| format!("{customer}|{}", self.payment_date.trim()))
    }
}

/// One scheduled class occurrence from the attendance export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Raw session date; same encodings as sales dates
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub trainer_name: Option<String>,
    #[serde(default)]
    pub cleaned_class: Option<String>,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    /// Attendance actually checked in
    #[serde(default)]
    pub checked_in_count: u32,
    #[serde(default)]
    pub booked_count: u32,
    #[serde(default)]
    pub late_cancelled_count: u32,
    /// Revenue attributed to this session
    #[serde(default)]
    pub total_paid: f64,
}

impl SessionRecord {
    pub fn trainer_key(&self) -> String {
        key_or_unknown(self.trainer_name.as_deref())
    }

    pub fn class_key(&self) -> String {
        key_or_unknown(self.cleaned_class.as_deref())
    }

    pub fn location_key(&self) -> String {
        key_or_unknown(self.location.as_deref())
    }

    pub fn day_key(&self) -> String {
        key_or_unknown(self.day_of_week.as_deref())
    }

    pub fn time_key(&self) -> String {
        key_or_unknown(self.time.as_deref())
    }

    /// Composite slot key used by schedule rankings.
    pub fn class_day_time_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.class_key(),
            self.day_key(),
            self.time_key()
        )
    }
}
