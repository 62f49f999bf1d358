//! # SFC Ext File
//!
//! File loaders for the SFC classification engine.
//!
//! This crate builds the engine inputs from the CSV and JSON files of a
//! reporting run:
//! - Reference tables into a `ReferenceDataStore`
//! - Bloomberg reference fields, LQA results and FX tables
//! - The regulator's report template
//! - The engine configuration
//!
//! Loaders read whole files eagerly; a missing file is an I/O error.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
pub mod error;
mod market_data;
mod reader;
mod reference_data;
mod template;

pub use config::*;
pub use error::{FileError, FileResult};
pub use market_data::*;
pub use reference_data::*;
pub use template::*;
