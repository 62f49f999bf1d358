//! Regulator report template.
//!
//! The template sheet has a header row starting with
//! `By asset class / by region` followed by the country groups up to
//! `Total`. Each row below it holds an asset-type tuple in its first five
//! cells, until the `Others` row. A row whose first cell is blank inherits
//! the blank leading cells from the row above.

use std::path::Path;

use sfc_classify::allocation::{AssetTypeFilter, ReportTemplate};

use crate::error::{FileError, FileResult};
use crate::reader::read_rows;

const HEADER_PREFIX: &str = "By asset class / by region";
const LAST_ROW: &str = "Others";
const TOTAL_COLUMN: &str = "Total";
const TUPLE_CELLS: usize = 5;

fn header_groups(row: &[String]) -> Vec<String> {
    row.iter()
        .skip(1)
        .skip_while(|c| c.is_empty())
        .take_while(|c| c.as_str() != TOTAL_COLUMN)
        .map(|c| c.trim().to_string())
        .collect()
}

/// First five cells without trailing blanks; a repeated last cell is
/// dropped.
fn row_cells(row: &[String]) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().take(TUPLE_CELLS).cloned().collect();
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    let n = cells.len();
    if n >= 2 && cells[n - 1] == cells[n - 2] {
        cells.pop();
    }
    cells
}

fn fill_from_previous(previous: &[String], cells: Vec<String>) -> Vec<String> {
    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| match previous.get(i) {
            Some(above) if cell.is_empty() => above.clone(),
            _ => cell,
        })
        .collect()
}

/// Parses template rows (already split into cells).
pub fn parse_report_template(path: &Path, rows: &[Vec<String>]) -> FileResult<ReportTemplate> {
    let start = rows
        .iter()
        .position(|r| r.first().is_some_and(|c| c.starts_with(HEADER_PREFIX)))
        .ok_or_else(|| FileError::invalid(path, format!("no '{HEADER_PREFIX}' header row")))?;
    let groups = header_groups(&rows[start]);
    if groups.is_empty() {
        return Err(FileError::invalid(path, "header row lists no country groups"));
    }

    let mut filters = Vec::new();
    let mut previous: Vec<String> = Vec::new();
    for row in &rows[start + 1..] {
        if row.iter().all(String::is_empty) || row.first().is_some_and(|c| c == LAST_ROW) {
            break;
        }
        let cells = row_cells(row);
        let cells = if cells.first().is_some_and(String::is_empty) {
            fill_from_previous(&previous, cells)
        } else {
            cells
        };
        let filter = AssetTypeFilter::parse(&cells)
            .map_err(|e| FileError::invalid(path, e.to_string()))?;
        filters.push(filter);
        previous = cells;
    }

    Ok(ReportTemplate::new(groups, filters))
}

/// Loads the report template from a CSV export of the template sheet.
pub fn load_report_template(path: impl AsRef<Path>) -> FileResult<ReportTemplate> {
    let path = path.as_ref();
    parse_report_template(path, &read_rows(path)?)
}
