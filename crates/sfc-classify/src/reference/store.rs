//! Reference data store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sfc_core::{Date, Identity};
use std::collections::HashMap;

use crate::types::{AssetType, RatingAgency};

/// Manually curated asset-type override.
///
/// A `None` portfolio applies to every portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTypeOverride {
    /// Security id the override applies to.
    pub id: String,
    /// Portfolio scope, `None` for all portfolios.
    pub portfolio: Option<String>,
    /// Asset type to return verbatim.
    pub asset_type: AssetType,
}

impl AssetTypeOverride {
    /// Creates an override for every portfolio.
    pub fn new(id: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            id: id.into(),
            portfolio: None,
            asset_type,
        }
    }

    /// Restricts the override to one portfolio. A blank portfolio keeps the
    /// wildcard scope.
    #[must_use]
    pub fn for_portfolio(mut self, portfolio: impl Into<String>) -> Self {
        let portfolio = portfolio.into();
        let portfolio = portfolio.trim();
        self.portfolio = (!portfolio.is_empty()).then(|| portfolio.to_string());
        self
    }
}

/// A bond scored with the three-factor liquidity formula.
///
/// Issue details left blank here are taken from the bond's market-data
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySpecialCase {
    /// Security id.
    pub id: String,
    /// Maturity date (`CALC_MATURITY`).
    pub maturity: Option<Date>,
    /// Amount outstanding (`AMT_OUTSTANDING`).
    pub amount_outstanding: Option<Decimal>,
}

impl LiquiditySpecialCase {
    /// Creates a special case entry with its issue details.
    pub fn new(id: impl Into<String>, maturity: Date, amount_outstanding: Decimal) -> Self {
        Self {
            id: id.into(),
            maturity: Some(maturity),
            amount_outstanding: Some(amount_outstanding),
        }
    }

    /// Creates a special case entry whose issue details come from market data.
    pub fn from_market_data(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            maturity: None,
            amount_outstanding: None,
        }
    }
}

/// Immutable lookup tables for one reporting run.
///
/// Built once (usually by the file loaders) and shared by reference with
/// every classifier call. Tables are keyed by security id; country codes are
/// matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataStore {
    country_groups: HashMap<String, String>,
    group_order: Vec<String>,
    rating_scores: HashMap<(RatingAgency, String), u32>,
    asset_type_overrides: HashMap<String, Vec<AssetTypeOverride>>,
    fund_types: HashMap<String, AssetType>,
    country_overrides: HashMap<String, String>,
    liquidity_special_cases: HashMap<String, LiquiditySpecialCase>,
}

impl ReferenceDataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Maps a country code to its country group.
    #[must_use]
    pub fn with_country_group(mut self, code: &str, group: impl Into<String>) -> Self {
        let group = group.into().trim().to_string();
        if !self.group_order.contains(&group) {
            self.group_order.push(group.clone());
        }
        self.country_groups
            .insert(code.trim().to_uppercase(), group);
        self
    }

    /// Adds a rating score. The rating string is trimmed.
    #[must_use]
    pub fn with_rating_score(mut self, agency: RatingAgency, rating: &str, score: u32) -> Self {
        self.rating_scores
            .insert((agency, rating.trim().to_string()), score);
        self
    }

    /// Adds an asset-type override.
    #[must_use]
    pub fn with_asset_type_override(mut self, entry: AssetTypeOverride) -> Self {
        self.asset_type_overrides
            .entry(entry.id.clone())
            .or_default()
            .push(entry);
        self
    }

    /// Maps an open-end fund id to its asset type.
    #[must_use]
    pub fn with_fund_type(mut self, id: impl Into<String>, asset_type: AssetType) -> Self {
        self.fund_types.insert(id.into(), asset_type);
        self
    }

    /// Maps a Commodity / Fund / Others security id to a country code.
    #[must_use]
    pub fn with_country_override(mut self, id: impl Into<String>, country: &str) -> Self {
        self.country_overrides
            .insert(id.into(), country.trim().to_uppercase());
        self
    }

    /// Adds a liquidity special case.
    #[must_use]
    pub fn with_liquidity_special_case(mut self, entry: LiquiditySpecialCase) -> Self {
        self.liquidity_special_cases.insert(entry.id.clone(), entry);
        self
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Country group for a country code.
    #[must_use]
    pub fn country_group(&self, code: &str) -> Option<&str> {
        self.country_groups
            .get(&code.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Distinct country groups in load order.
    #[must_use]
    pub fn country_groups(&self) -> &[String] {
        &self.group_order
    }

    /// Score for an agency rating string.
    #[must_use]
    pub fn rating_score(&self, agency: RatingAgency, rating: &str) -> Option<u32> {
        self.rating_scores
            .get(&(agency, rating.trim().to_string()))
            .copied()
    }

    /// Asset-type override for an identity within a portfolio.
    ///
    /// A row scoped to exactly `portfolio` wins over a wildcard row.
    #[must_use]
    pub fn asset_type_override(&self, identity: &Identity, portfolio: &str) -> Option<&AssetType> {
        let entries = self.asset_type_overrides.get(identity.as_str())?;
        let portfolio = portfolio.trim();
        entries
            .iter()
            .find(|e| e.portfolio.as_deref() == Some(portfolio))
            .or_else(|| entries.iter().find(|e| e.portfolio.is_none()))
            .map(|e| &e.asset_type)
    }

    /// Asset type for an open-end fund.
    #[must_use]
    pub fn fund_type(&self, identity: &Identity) -> Option<&AssetType> {
        self.fund_types.get(identity.as_str())
    }

    /// Country code override for an identity.
    #[must_use]
    pub fn country_override(&self, identity: &Identity) -> Option<&str> {
        self.country_overrides
            .get(identity.as_str())
            .map(String::as_str)
    }

    /// Liquidity special case for an identity.
    #[must_use]
    pub fn liquidity_special_case(&self, identity: &Identity) -> Option<&LiquiditySpecialCase> {
        self.liquidity_special_cases.get(identity.as_str())
    }

    /// Number of rating score entries.
    #[must_use]
    pub fn rating_score_count(&self) -> usize {
        self.rating_scores.len()
    }
}
