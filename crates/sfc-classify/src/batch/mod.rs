//! Batch helpers: parallel mapping and the manual review workflow.

mod parallel;
mod review;

pub use parallel::maybe_parallel_map;
pub use review::{
    classify_batch, lookup_identities, securities_without_rating, BatchClassification,
    LiquidityInputs, PositionClassification, ReviewItem,
};
