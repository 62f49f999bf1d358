//! Core types for classification: positions, asset types, market data,
//! liquidity categories, FX and configuration.

pub mod asset_type;
mod config;
mod fx;
mod liquidity;
mod market_data;
mod position;
mod rating;

pub use asset_type::{labels, AssetType};
pub use config::ClassifyConfig;
pub use fx::FxTable;
pub use liquidity::LiquidityCategory;
pub use market_data::{LqaDataSet, LqaRecord, MarketDataRecord, MarketDataSet};
pub use position::{
    FundKind, LedgerPosition, MarketDataPosition, Position, SourceKind, SourceTag,
};
pub use rating::RatingAgency;
