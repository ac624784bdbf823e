//! Grouping-dimension selectors.
//!
//! Dimensions are the public enumeration of "group by what" choices. An
//! unrecognized selector string is a caller programming error, not a
//! data-quality issue, so `FromStr` fails fast instead of degrading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::dates::parse_flexible_date;
use crate::core::{SalesRecord, SessionRecord, UNKNOWN_KEY};
use crate::errors::AnalyticsError;
use crate::trends::Period;

/// Grouping dimensions for sales breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalesDimension {
    Category,
    Product,
    Location,
    Staff,
    PaymentMethod,
    /// Calendar month of the payment date. Records whose date does not
    /// parse land in the `"Unknown"` bucket; for a chronological series
    /// use the trends module, which excludes them instead.
    Month,
}

impl SalesDimension {
    /// Grouping key for one record along this dimension.
    pub fn key_of(&self, record: &SalesRecord) -> String {
        match self {
            SalesDimension::Category => record.category_key(),
            SalesDimension::Product => record.product_key(),
            SalesDimension::Location => record.location_key(),
            SalesDimension::Staff => record.seller_key(),
            SalesDimension::PaymentMethod => record.payment_method_key(),
            SalesDimension::Month => parse_flexible_date(&record.payment_date)
                .map(|date| Period::Monthly.key_for(date))
                .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalesDimension::Category => "category",
            SalesDimension::Product => "product",
            SalesDimension::Location => "location",
            SalesDimension::Staff => "staff",
            SalesDimension::PaymentMethod => "payment-method",
            SalesDimension::Month => "month",
        }
    }
}

impl fmt::Display for SalesDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesDimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(SalesDimension::Category),
            "product" => Ok(SalesDimension::Product),
            "location" => Ok(SalesDimension::Location),
            "staff" => Ok(SalesDimension::Staff),
            "payment-method" => Ok(SalesDimension::PaymentMethod),
            "month" => Ok(SalesDimension::Month),
            _ => Err(AnalyticsError::UnknownDimension(s.to_string())),
        }
    }
}

/// Grouping dimensions for class-session breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionDimension {
    Trainer,
    Class,
    Location,
    DayOfWeek,
    TimeSlot,
    /// Composite schedule-slot key (class, weekday, start time), the
    /// grouping used for slot rankings with a minimum-occurrence floor.
    ClassDayTime,
}

impl SessionDimension {
    /// Grouping key for one record along this dimension.
    pub fn key_of(&self, record: &SessionRecord) -> String {
        match self {
            SessionDimension::Trainer => record.trainer_key(),
            SessionDimension::Class => record.class_key(),
            SessionDimension::Location => record.location_key(),
            SessionDimension::DayOfWeek => record.day_key(),
            SessionDimension::TimeSlot => record.time_key(),
            SessionDimension::ClassDayTime => record.class_day_time_key(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionDimension::Trainer => "trainer",
            SessionDimension::Class => "class",
            SessionDimension::Location => "location",
            SessionDimension::DayOfWeek => "day-of-week",
            SessionDimension::TimeSlot => "time-slot",
            SessionDimension::ClassDayTime => "class-day-time",
        }
    }
}

impl fmt::Display for SessionDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionDimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trainer" => Ok(SessionDimension::Trainer),
            "class" => Ok(SessionDimension::Class),
            "location" => Ok(SessionDimension::Location),
            "day-of-week" => Ok(SessionDimension::DayOfWeek),
            "time-slot" => Ok(SessionDimension::TimeSlot),
            "class-day-time" => Ok(SessionDimension::ClassDayTime),
            _ => Err(AnalyticsError::UnknownDimension(s.to_string())),
        }
    }
}
