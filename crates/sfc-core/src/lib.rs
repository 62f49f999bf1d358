//! # SFC Core
//!
//! Foundation types shared by the SFC reporting crates.
//!
//! - **Types**: [`Date`], [`Currency`], [`Identity`] / [`IdType`]
//! - **Errors**: [`CoreError`] and the [`CoreResult`] alias
//!
//! ## Example
//!
//! ```rust
//! use sfc_core::prelude::*;
//!
//! let date = Date::parse_compact("20200429").unwrap();
//! assert_eq!(date.to_string(), "2020-04-29");
//!
//! let id = Identity::ticker("1299 HK Equity");
//! assert_eq!(id.to_string(), "1299 HK Equity (TICKER)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, Date, IdType, Identity};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, IdType, Identity};
