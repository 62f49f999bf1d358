//! File-based market data: Bloomberg reference fields, LQA results and FX
//! tables.

use std::path::Path;

use serde::Deserialize;
use sfc_classify::types::{FxTable, LqaDataSet, LqaRecord, MarketDataRecord, MarketDataSet};
use sfc_core::{Currency, Date};
use tracing::{debug, warn};

use crate::error::{FileError, FileResult};
use crate::reader::{is_missing, parse_date, parse_decimal, read_records, read_rows};

// =============================================================================
// BLOOMBERG REFERENCE FIELDS
// =============================================================================

/// Raw Bloomberg row. Every column is optional so partial extracts load.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlpRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "MARKET_SECTOR_DES")]
    market_sector: String,
    #[serde(rename = "CNTRY_ISSUE_ISO")]
    country_of_issue: String,
    #[serde(rename = "CNTRY_OF_RISK")]
    country_of_risk: String,
    #[serde(rename = "CAPITAL_CONTINGENT_SECURITY")]
    capital_contingent: String,
    #[serde(rename = "EXCH_MARKET_STATUS")]
    exchange_status: String,
    #[serde(rename = "INDUSTRY_SECTOR")]
    industry_sector: String,
    #[serde(rename = "RTG_SP")]
    rating_sp: String,
    #[serde(rename = "RTG_MOODY")]
    rating_moody: String,
    #[serde(rename = "RTG_FITCH")]
    rating_fitch: String,
    #[serde(rename = "SFC_AUTHORIZED_FUND")]
    sfc_authorized: String,
    #[serde(rename = "CALC_MATURITY")]
    maturity: String,
    #[serde(rename = "AMT_OUTSTANDING")]
    amount_outstanding: String,
}

fn text(cell: String) -> Option<String> {
    (!cell.is_empty()).then_some(cell)
}

impl BlpRecord {
    fn into_record(self, path: &Path) -> FileResult<MarketDataRecord> {
        let maturity = if is_missing(&self.maturity) {
            None
        } else {
            Some(parse_date(path, &self.maturity)?)
        };
        let amount_outstanding = if is_missing(&self.amount_outstanding) {
            None
        } else {
            Some(parse_decimal(path, &self.amount_outstanding)?)
        };

        // Rating sentinels such as "#N/A N/A" are kept; the rating scorer
        // decides what is unavailable.
        Ok(MarketDataRecord {
            id: self.id,
            market_sector: text(self.market_sector),
            country_of_issue: text(self.country_of_issue),
            country_of_risk: text(self.country_of_risk),
            capital_contingent: text(self.capital_contingent),
            exchange_status: text(self.exchange_status),
            industry_sector: text(self.industry_sector),
            rating_sp: text(self.rating_sp),
            rating_moody: text(self.rating_moody),
            rating_fitch: text(self.rating_fitch),
            sfc_authorized: text(self.sfc_authorized),
            maturity,
            amount_outstanding,
        })
    }
}

/// Loads Bloomberg reference fields keyed by `ID`.
pub fn load_market_data(path: impl AsRef<Path>) -> FileResult<MarketDataSet> {
    let path = path.as_ref();
    let records: Vec<BlpRecord> = read_records(path)?;
    let set = records
        .into_iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| r.into_record(path))
        .collect::<FileResult<MarketDataSet>>()?;
    debug!(path = %path.display(), records = set.len(), "market data loaded");
    Ok(set)
}

// =============================================================================
// LQA RESULTS
// =============================================================================

const START_OF_DATA: &str = "START-OF-DATA";
const END_OF_DATA: &str = "END-OF-DATA";

fn column(path: &Path, header: &[String], name: &str) -> FileResult<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| FileError::invalid(path, format!("missing column '{name}'")))
}

fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map_or("", String::as_str)
}

fn time_to_cash(error_code: &str, value: &str) -> Option<f64> {
    let failed = !error_code.is_empty() && error_code.parse::<f64>().map_or(true, |c| c != 0.0);
    if failed || is_missing(value) {
        return None;
    }
    value.parse::<f64>().ok()
}

/// Loads an LQA response.
///
/// Columns `SECURITIES`, `ERROR CODE` and `LQA_TIME_TO_CASH` are required.
/// When the file is framed by `START-OF-DATA` / `END-OF-DATA` lines, only
/// the rows in between are read. A non-zero error code or `N.A.` gives a
/// record without a time to cash.
pub fn load_lqa(path: impl AsRef<Path>) -> FileResult<LqaDataSet> {
    let path = path.as_ref();
    let rows = read_rows(path)?;

    let mut rows = match rows.iter().position(|r| r.first().is_some_and(|c| c == START_OF_DATA)) {
        Some(start) => rows[start + 1..]
            .iter()
            .take_while(|r| r.first().map_or(true, |c| c != END_OF_DATA))
            .cloned()
            .collect::<Vec<_>>(),
        None => rows,
    }
    .into_iter()
    .filter(|r| r.iter().any(|c| !c.is_empty()));

    let header = rows
        .next()
        .ok_or_else(|| FileError::invalid(path, "no header row"))?;
    let id_col = column(path, &header, "SECURITIES")?;
    let error_col = column(path, &header, "ERROR CODE")?;
    let value_col = column(path, &header, "LQA_TIME_TO_CASH")?;

    let set: LqaDataSet = rows
        .map(|row| {
            LqaRecord::new(
                cell(&row, id_col),
                time_to_cash(cell(&row, error_col), cell(&row, value_col)),
            )
        })
        .filter(|r| !r.id.is_empty())
        .collect();

    debug!(path = %path.display(), records = set.len(), "LQA results loaded");
    Ok(set)
}

// =============================================================================
// FX
// =============================================================================

#[derive(Debug, Deserialize)]
struct FxRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Reporting Currency")]
    reporting_currency: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "FX")]
    rate: String,
}

/// Loads the FX table for one date and reporting currency.
///
/// Rates are units of each currency per unit of the reporting currency.
/// Rows for other dates or reporting currencies are skipped, as are
/// currencies this library does not model. The reporting currency itself
/// is always 1.
pub fn load_fx(
    path: impl AsRef<Path>,
    date: Date,
    reporting_currency: Currency,
) -> FileResult<FxTable> {
    let path = path.as_ref();
    let records: Vec<FxRecord> = read_records(path)?;
    let mut table = FxTable::new(date, reporting_currency);

    for record in records {
        if Currency::from_code(&record.reporting_currency) != Some(reporting_currency)
            || parse_date(path, &record.date)? != date
        {
            continue;
        }
        let Some(currency) = Currency::from_code(&record.currency) else {
            warn!(currency = %record.currency, "skipping FX rate for unsupported currency");
            continue;
        };
        table.insert(currency, parse_decimal(path, &record.rate)?);
    }

    debug!(%date, reporting = %reporting_currency, rates = table.len(), "FX table loaded");
    Ok(table)
}
