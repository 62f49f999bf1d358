//! Reference data tables shared read-only by all classifiers.

mod store;

pub use store::{AssetTypeOverride, LiquiditySpecialCase, ReferenceDataStore};
