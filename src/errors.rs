//! Shared error types for the analytics engine.
//!
//! Data-quality problems (missing numerics, unparseable dates) are never
//! errors here; they are recovered locally with documented defaults. The
//! variants below cover caller-contract violations only, which must fail
//! fast at the API boundary.

use thiserror::Error;

/// Main error type for analytics operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// A grouping-dimension selector string matched no known dimension
    #[error("unknown grouping dimension: {0}")]
    UnknownDimension(String),

    /// A ranking-metric selector string matched no known metric
    #[error("unknown ranking metric: {0}")]
    UnknownMetric(String),

    /// A period selector string matched no known calendar period
    #[error("unknown period: {0}")]
    UnknownPeriod(String),

    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Convenience alias for results carrying an [`AnalyticsError`].
pub type Result<T> = std::result::Result<T, AnalyticsError>;
