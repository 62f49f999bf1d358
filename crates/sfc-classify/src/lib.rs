//! # SFC Classify
//!
//! Classification and aggregation engine for SFC regulatory portfolio
//! reporting.
//!
//! This crate provides:
//!
//! - **Types**: [`Position`] (ledger or market-data feed), [`AssetType`],
//!   [`LiquidityCategory`], [`FxTable`], [`ClassifyConfig`]
//! - **Reference data**: [`ReferenceDataStore`] with country groups, rating
//!   scores and the special-case tables
//! - **Classification**: asset type, country group, rating score and
//!   liquidity bucket for a single position
//! - **Allocation**: the country-group x asset-type matrix and the liquidity
//!   distribution
//! - **Batch**: classification of whole position lists with a manual review
//!   list
//!
//! All classification is pure: inputs are passed in through a
//! [`ClassificationContext`] and nothing is cached between calls.
//!
//! ## Example
//!
//! ```rust
//! use sfc_classify::prelude::*;
//!
//! let reference = ReferenceDataStore::new().with_country_group("HK", "China - Hong Kong");
//! let market_data = MarketDataSet::new().with_record(
//!     MarketDataRecord::new("1299 HK Equity")
//!         .with_market_sector("Equity")
//!         .with_exchange_status("ACTV")
//!         .with_country_of_issue("HK"),
//! );
//! let config = ClassifyConfig::default();
//! let ctx = ClassificationContext::new(&reference, &market_data, &config);
//!
//! let position: Position = LedgerPosition::new("12229", "1299 HK", "Common Stock").into();
//! let asset_type = classify_asset_type(&ctx, &position).unwrap();
//! assert_eq!(asset_type.to_string(), "(Equity | Listed Equities)");
//! assert_eq!(country_group(&ctx, &position).unwrap().as_deref(), Some("China - Hong Kong"));
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: classify large position lists on rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod allocation;
pub mod batch;
pub mod classify;
pub mod error;
pub mod reference;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::allocation::{
        allocate, liquidity_distribution, AllocationMatrix, AssetTypeFilter,
        LiquidityDistribution, PositionAttributes, ReportTemplate,
    };
    pub use crate::batch::{classify_batch, BatchClassification, LiquidityInputs};
    pub use crate::classify::{
        average_rating_score, classify_asset_type, country_group, default_on_no_rating,
        liquidity_category, ClassificationContext,
    };
    pub use crate::error::{ClassifyError, ClassifyResult};
    pub use crate::reference::{AssetTypeOverride, LiquiditySpecialCase, ReferenceDataStore};
    pub use crate::types::{
        AssetType, ClassifyConfig, FxTable, LedgerPosition, LiquidityCategory, LqaDataSet,
        LqaRecord, MarketDataPosition, MarketDataRecord, MarketDataSet, Position, RatingAgency,
    };
    pub use sfc_core::prelude::*;
}

// Re-export commonly used types at crate root
pub use classify::ClassificationContext;
pub use error::{ClassifyError, ClassifyResult};
pub use reference::ReferenceDataStore;
pub use types::{
    AssetType, ClassifyConfig, FxTable, LiquidityCategory, Position, RatingAgency,
};
