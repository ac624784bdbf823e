//! Engine configuration.
//!
//! All options carry serde defaults so hosts can supply a partial TOML or
//! JSON document and get sensible behavior for everything they omit.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Denominator used by the discount-rate formula.
///
/// The upstream dashboards disagreed on this formula between views, so the
/// choice is explicit configuration rather than a hardcoded constant. Every
/// discount-rate call site routes through the same function, keyed by this
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountRateBasis {
    /// discount / (revenue + discount): share of the gross (pre-discount) value
    Gross,
    /// discount / revenue: markup relative to what was actually paid
    Net,
}

/// Tunable knobs for the aggregation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Denominator basis for the discount rate
    #[serde(default = "default_discount_rate_basis")]
    pub discount_rate_basis: DiscountRateBasis,

    /// Group count returned by rankings when the caller does not say
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Minimum sessions a slot must have to appear in slot rankings
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Sessions with attendance at or below this count as empty
    #[serde(default = "default_empty_session_attendance")]
    pub empty_session_attendance: u32,
}

fn default_discount_rate_basis() -> DiscountRateBasis {
    DiscountRateBasis::Gross
}

fn default_top_n() -> usize {
    10
}

fn default_min_occurrences() -> usize {
    2
}

fn default_empty_session_attendance() -> u32 {
    0
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            discount_rate_basis: default_discount_rate_basis(),
            default_top_n: default_top_n(),
            min_occurrences: default_min_occurrences(),
            empty_session_attendance: default_empty_session_attendance(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate option ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_top_n == 0 {
            return Err("default_top_n must be at least 1".to_string());
        }
        if self.min_occurrences == 0 {
            return Err("min_occurrences must be at least 1".to_string());
        }
        Ok(())
    }

    /// Parse and validate a configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(raw).context("failed to parse analytics configuration")?;
        config
            .validate()
            .map_err(|message| anyhow::anyhow!("invalid analytics configuration: {message}"))?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}
