// Export modules for library usage
pub mod aggregation;
pub mod config;
pub mod core;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod payroll;
pub mod ranking;
pub mod summary;
pub mod trends;

// Re-export commonly used types
pub use crate::aggregation::{
    sales_breakdown, session_breakdown, Accumulate, SalesAccumulator, SalesDimension,
    SalesGroupStats, SessionAccumulator, SessionDimension, SessionGroupStats,
};
pub use crate::config::{AnalyticsConfig, DiscountRateBasis};
pub use crate::core::{SalesRecord, SessionRecord, ONLINE_SELLER, UNKNOWN_KEY};
pub use crate::errors::{AnalyticsError, Result};
pub use crate::filters::{SalesFilter, SessionFilter};
pub use crate::metrics::Rate0To100;
pub use crate::payroll::{trainer_payroll, TrainerMonthRow, TrainerPayroll};
pub use crate::ranking::{
    filter_min_occurrences, rank_by, rank_sales, rank_sessions, sorted_by_metric, Rankings,
    SalesRankingMetric, SessionRankingMetric, SortDirection,
};
pub use crate::summary::{
    sales_records_in_group, sales_summary, session_records_in_group, session_summary,
    SalesSummary, SessionSummary,
};
pub use crate::trends::{
    sales_trend, session_trend, Period, SalesPeriodPoint, SessionPeriodPoint,
};
