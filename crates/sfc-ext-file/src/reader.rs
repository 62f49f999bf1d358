//! Shared CSV reading and cell parsing.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sfc_core::Date;

use crate::error::{FileError, FileResult};

fn open(path: &Path, has_headers: bool) -> FileResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| FileError::io(path, e.to_string()))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Deserializes every record of a headed CSV file.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path) -> FileResult<Vec<T>> {
    let mut reader = open(path, true)?;
    reader
        .deserialize()
        .map(|result| result.map_err(|e| FileError::from_csv(path, &e)))
        .collect()
}

/// Reads every row of a CSV file as raw cells, without a header.
pub(crate) fn read_rows(path: &Path) -> FileResult<Vec<Vec<String>>> {
    let mut reader = open(path, false)?;
    reader
        .records()
        .map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|e| FileError::from_csv(path, &e))
        })
        .collect()
}

/// True for a blank cell or a Bloomberg "no data" marker.
pub(crate) fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.starts_with("#N/A") || cell == "N.A."
}

/// Parses a date cell in `YYYY-MM-DD` or `YYYYMMDD` form. A trailing time
/// part (`2021-01-15 00:00:00`) is ignored.
pub(crate) fn parse_date(path: &Path, cell: &str) -> FileResult<Date> {
    let day = cell.split_whitespace().next().unwrap_or_default();
    Date::parse_flexible(day).map_err(|e| FileError::parse(path, None, e.to_string()))
}

/// Parses a decimal cell, accepting scientific notation.
pub(crate) fn parse_decimal(path: &Path, cell: &str) -> FileResult<Decimal> {
    let cell = cell.trim().replace(',', "");
    Decimal::from_str(&cell)
        .or_else(|_| Decimal::from_scientific(&cell))
        .map_err(|e| FileError::parse(path, None, format!("'{cell}': {e}")))
}

/// Normalizes a whole number written by a spreadsheet as a float
/// (`19437.0` -> `19437`). Anything else is returned trimmed.
pub(crate) fn normalize_integer_cell(cell: &str) -> String {
    let cell = cell.trim();
    match cell.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && fraction.bytes().all(|b| b == b'0') =>
        {
            whole.to_string()
        }
        _ => cell.to_string(),
    }
}
