//! Core domain types.

mod currency;
mod date;
mod identity;

pub use currency::Currency;
pub use date::Date;
pub use identity::{IdType, Identity};
