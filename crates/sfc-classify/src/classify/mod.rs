//! Per-position classification rules.
//!
//! Every rule is a pure function of a position and a
//! [`ClassificationContext`] holding the read-only inputs of the run.
//!
//! - [`asset_type`] - cascading asset-type rules
//! - [`country`] - country code and country group
//! - [`rating`] - aggregate agency rating score
//! - [`liquidity`] - liquidity bucket

pub mod asset_type;
pub mod country;
pub mod liquidity;
pub mod rating;

pub use asset_type::{asset_type_from_market_data, classify_asset_type, ratings_applicable};
pub use country::{country_code, country_group, resolve_country_code, to_country_group};
pub use liquidity::{
    concentration_score, liquidity_category, maturity_score, rating_factor_score,
    special_case_category,
};
pub use rating::{
    aggregate_scores, agency_scores, average_rating_score, default_on_no_rating,
    is_investment_grade,
};

use crate::reference::ReferenceDataStore;
use crate::types::{ClassifyConfig, MarketDataSet};

/// Read-only inputs shared by every classification call in a run.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    /// Reference tables.
    pub reference: &'a ReferenceDataStore,
    /// Market data keyed by identity.
    pub market_data: &'a MarketDataSet,
    /// Run configuration.
    pub config: &'a ClassifyConfig,
}

impl<'a> ClassificationContext<'a> {
    /// Bundles the inputs of a run.
    #[must_use]
    pub fn new(
        reference: &'a ReferenceDataStore,
        market_data: &'a MarketDataSet,
        config: &'a ClassifyConfig,
    ) -> Self {
        Self {
            reference,
            market_data,
            config,
        }
    }
}
