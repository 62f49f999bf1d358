//! File-based reference tables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sfc_classify::reference::{AssetTypeOverride, LiquiditySpecialCase, ReferenceDataStore};
use sfc_classify::types::{AssetType, RatingAgency};
use tracing::debug;

use crate::error::{FileError, FileResult};
use crate::reader::{is_missing, normalize_integer_cell, parse_date, parse_decimal, read_records};

// =============================================================================
// COUNTRY GROUPS
// =============================================================================

#[derive(Debug, Deserialize)]
struct CountryGroupRecord {
    #[serde(rename = "Country Code", default)]
    code: String,
    #[serde(rename = "Country Group", default)]
    group: String,
}

/// Loads `(country code, country group)` pairs. Reading stops at the first
/// row with a blank code.
pub fn load_country_groups(path: impl AsRef<Path>) -> FileResult<Vec<(String, String)>> {
    let path = path.as_ref();
    let records: Vec<CountryGroupRecord> = read_records(path)?;
    Ok(records
        .into_iter()
        .take_while(|r| !r.code.is_empty())
        .map(|r| (r.code, r.group))
        .collect())
}

// =============================================================================
// RATING SCORES
// =============================================================================

#[derive(Debug, Deserialize)]
struct RatingScoreRecord {
    #[serde(rename = "Agency", default)]
    agency: String,
    #[serde(rename = "Rating", default)]
    rating: String,
    #[serde(rename = "Score", default)]
    score: String,
}

/// Loads `(agency, rating, score)` triples. Reading stops at the first row
/// with a blank agency.
pub fn load_rating_scores(path: impl AsRef<Path>) -> FileResult<Vec<(RatingAgency, String, u32)>> {
    let path = path.as_ref();
    let records: Vec<RatingScoreRecord> = read_records(path)?;
    records
        .into_iter()
        .take_while(|r| !r.agency.is_empty())
        .map(|r| {
            let agency = RatingAgency::parse(&r.agency)
                .ok_or_else(|| FileError::invalid(path, format!("unknown agency '{}'", r.agency)))?;
            let score = normalize_integer_cell(&r.score).parse::<u32>().map_err(|e| {
                FileError::parse(path, None, format!("score '{}' for {}: {e}", r.score, r.rating))
            })?;
            Ok((agency, r.rating, score))
        })
        .collect()
}

// =============================================================================
// ASSET TYPE SPECIAL CASES, FUND TYPES, COUNTRY OVERRIDES
// =============================================================================

#[derive(Debug, Deserialize)]
struct AssetTypeSpecialCaseRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Portfolio", default)]
    portfolio: String,
    #[serde(rename = "AssetType")]
    asset_type: String,
}

fn parse_asset_type(path: &Path, id: &str, cell: &str) -> FileResult<AssetType> {
    AssetType::parse(cell).map_err(|e| FileError::invalid(path, format!("{id}: {e}")))
}

/// Loads asset-type special cases. The asset type is a comma-separated
/// tuple; a blank portfolio applies to every portfolio.
pub fn load_asset_type_special_cases(path: impl AsRef<Path>) -> FileResult<Vec<AssetTypeOverride>> {
    let path = path.as_ref();
    let records: Vec<AssetTypeSpecialCaseRecord> = read_records(path)?;
    records
        .into_iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| {
            let asset_type = parse_asset_type(path, &r.id, &r.asset_type)?;
            Ok(AssetTypeOverride::new(r.id, asset_type)
                .for_portfolio(normalize_integer_cell(&r.portfolio)))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct FundTypeRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "AssetType")]
    asset_type: String,
}

/// Loads the open-end fund id to asset type table.
pub fn load_fund_types(path: impl AsRef<Path>) -> FileResult<Vec<(String, AssetType)>> {
    let path = path.as_ref();
    let records: Vec<FundTypeRecord> = read_records(path)?;
    records
        .into_iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| {
            let asset_type = parse_asset_type(path, &r.id, &r.asset_type)?;
            Ok((r.id, asset_type))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CountryOverrideRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Country")]
    country: String,
}

/// Loads the id to country code table for Commodity / Fund / Others.
pub fn load_country_overrides(path: impl AsRef<Path>) -> FileResult<Vec<(String, String)>> {
    let records: Vec<CountryOverrideRecord> = read_records(path.as_ref())?;
    Ok(records
        .into_iter()
        .filter(|r| !r.id.is_empty() && !r.country.is_empty())
        .map(|r| (r.id, r.country))
        .collect())
}

// =============================================================================
// LIQUIDITY SPECIAL CASES
// =============================================================================

#[derive(Debug, Deserialize)]
struct LiquiditySpecialCaseRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "CALC_MATURITY")]
    maturity: String,
    #[serde(rename = "AMT_OUTSTANDING")]
    amount_outstanding: String,
}

/// Loads liquidity special cases (bonds scored without LQA).
///
/// Blank `CALC_MATURITY` or `AMT_OUTSTANDING` cells are left for the
/// market-data record to fill.
pub fn load_liquidity_special_cases(
    path: impl AsRef<Path>,
) -> FileResult<Vec<LiquiditySpecialCase>> {
    let path = path.as_ref();
    let records: Vec<LiquiditySpecialCaseRecord> = read_records(path)?;
    records
        .into_iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| {
            let mut special = LiquiditySpecialCase::from_market_data(r.id);
            if !is_missing(&r.maturity) {
                special.maturity = Some(parse_date(path, &r.maturity)?);
            }
            if !is_missing(&r.amount_outstanding) {
                special.amount_outstanding = Some(parse_decimal(path, &r.amount_outstanding)?);
            }
            Ok(special)
        })
        .collect()
}

// =============================================================================
// STORE ASSEMBLY
// =============================================================================

/// Locations of the reference tables. Country groups and rating scores are
/// required; the special-case tables are optional.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataPaths {
    /// Country code to country group.
    pub country_groups: PathBuf,
    /// Agency rating to score.
    pub rating_scores: PathBuf,
    /// Asset-type special cases.
    pub asset_type_special_cases: Option<PathBuf>,
    /// Open-end fund types.
    pub fund_types: Option<PathBuf>,
    /// Country overrides for Commodity / Fund / Others.
    pub country_overrides: Option<PathBuf>,
    /// Liquidity special cases.
    pub liquidity_special_cases: Option<PathBuf>,
}

impl ReferenceDataPaths {
    /// Creates paths with the two required tables.
    pub fn new(country_groups: impl Into<PathBuf>, rating_scores: impl Into<PathBuf>) -> Self {
        Self {
            country_groups: country_groups.into(),
            rating_scores: rating_scores.into(),
            ..Self::default()
        }
    }

    /// Resolves the conventional file names inside a directory.
    pub fn in_directory(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            country_groups: dir.join("CountryGroup.csv"),
            rating_scores: dir.join("RatingScore.csv"),
            asset_type_special_cases: Some(dir.join("AssetTypeSpecialCase.csv")),
            fund_types: Some(dir.join("FundType.csv")),
            country_overrides: Some(dir.join("CountryOverride.csv")),
            liquidity_special_cases: Some(dir.join("LiquiditySpecialCase.csv")),
        }
    }

    /// Sets the asset-type special case table.
    #[must_use]
    pub fn with_asset_type_special_cases(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_type_special_cases = Some(path.into());
        self
    }

    /// Sets the fund type table.
    #[must_use]
    pub fn with_fund_types(mut self, path: impl Into<PathBuf>) -> Self {
        self.fund_types = Some(path.into());
        self
    }

    /// Sets the country override table.
    #[must_use]
    pub fn with_country_overrides(mut self, path: impl Into<PathBuf>) -> Self {
        self.country_overrides = Some(path.into());
        self
    }

    /// Sets the liquidity special case table.
    #[must_use]
    pub fn with_liquidity_special_cases(mut self, path: impl Into<PathBuf>) -> Self {
        self.liquidity_special_cases = Some(path.into());
        self
    }
}

/// Loads every configured table into a [`ReferenceDataStore`].
///
/// An optional table that is configured but missing on disk is an error.
pub fn load_reference_data(paths: &ReferenceDataPaths) -> FileResult<ReferenceDataStore> {
    let mut store = ReferenceDataStore::new();

    for (code, group) in load_country_groups(&paths.country_groups)? {
        store = store.with_country_group(&code, group);
    }
    for (agency, rating, score) in load_rating_scores(&paths.rating_scores)? {
        store = store.with_rating_score(agency, &rating, score);
    }
    if let Some(path) = &paths.asset_type_special_cases {
        for entry in load_asset_type_special_cases(path)? {
            store = store.with_asset_type_override(entry);
        }
    }
    if let Some(path) = &paths.fund_types {
        for (id, asset_type) in load_fund_types(path)? {
            store = store.with_fund_type(id, asset_type);
        }
    }
    if let Some(path) = &paths.country_overrides {
        for (id, country) in load_country_overrides(path)? {
            store = store.with_country_override(id, &country);
        }
    }
    if let Some(path) = &paths.liquidity_special_cases {
        for entry in load_liquidity_special_cases(path)? {
            store = store.with_liquidity_special_case(entry);
        }
    }

    debug!(
        groups = store.country_groups().len(),
        rating_scores = store.rating_score_count(),
        "reference data loaded"
    );
    Ok(store)
}
