//! Configuration for a classification run.

use serde::{Deserialize, Serialize};
use sfc_core::Currency;

/// Configuration for a classification run.
///
/// Controls parallelism and the handful of business constants that differ
/// between deployments (reporting currency, money-market jurisdiction,
/// sentinel strings in the market-data feed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum position count to trigger parallel processing.
    pub parallel_threshold: usize,

    /// Currency all market values are converted into.
    pub reporting_currency: Currency,

    /// Country code assigned to money-market instruments.
    pub money_market_country: String,

    /// Name prefix that flags a private (non-listed) security.
    pub private_security_marker: String,

    /// Rating strings that mean "not available". Matched as prefixes.
    pub rating_unavailable_markers: Vec<String>,

    /// Minimum aggregate rating score that counts as investment grade.
    pub investment_grade_threshold: u32,

    /// Allowed deviation of the liquidity percentage sum from 1.
    pub percentage_tolerance: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 100,
            reporting_currency: Currency::USD,
            money_market_country: "HK".to_string(),
            private_security_marker: "*".to_string(),
            rating_unavailable_markers: vec!["#N/A".to_string(), "N.A.".to_string()],
            investment_grade_threshold: 12,
            percentage_tolerance: 1e-7,
        }
    }
}

impl ClassifyConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the reporting currency.
    #[must_use]
    pub fn with_reporting_currency(mut self, currency: Currency) -> Self {
        self.reporting_currency = currency;
        self
    }

    /// Sets the money-market country code.
    #[must_use]
    pub fn with_money_market_country(mut self, country: impl Into<String>) -> Self {
        self.money_market_country = country.into();
        self
    }

    /// Sets the private security name prefix.
    #[must_use]
    pub fn with_private_security_marker(mut self, marker: impl Into<String>) -> Self {
        self.private_security_marker = marker.into();
        self
    }

    /// Sets the investment grade threshold.
    #[must_use]
    pub fn with_investment_grade_threshold(mut self, threshold: u32) -> Self {
        self.investment_grade_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Returns true if the raw rating string means "no rating".
    #[must_use]
    pub fn is_rating_unavailable(&self, rating: &str) -> bool {
        let rating = rating.trim();
        rating.is_empty()
            || self
                .rating_unavailable_markers
                .iter()
                .any(|marker| rating.starts_with(marker.as_str()))
    }
}
