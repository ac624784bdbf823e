//! Clamped percentage scale for display-bounded rates.
//!
//! Fill rate, consistency, revenue efficiency, and discount penetration
//! are defined on a 0-100 display range; encoding that range in a newtype
//! keeps out-of-range and non-finite values from ever reaching a chart.
//! Ratios that may legitimately exceed 100 (ATV, ASV, discount rate) stay
//! plain `f64` and must not be wrapped in this type.

use serde::{Deserialize, Serialize};

/// Percentage clamped to the [0.0, 100.0] display range.
///
/// Non-finite input collapses to 0.0 so a ratio can never leak `NaN` or
/// `Infinity` into serialized output.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Rate0To100(f64);

impl Rate0To100 {
    /// Create a new rate, clamping to [0.0, 100.0].
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 100.0))
        } else {
            Self(0.0)
        }
    }

    /// Get the raw percentage value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Rate0To100 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}
