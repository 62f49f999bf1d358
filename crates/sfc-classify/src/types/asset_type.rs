//! Asset-type tuple.
//!
//! An asset type is an ordered tuple of up to four labels, least specific
//! first: category, subcategory, grade, sector. A shorter tuple names a
//! category that covers every longer tuple sharing its prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassifyError, ClassifyResult};

/// Maximum number of components in an asset-type tuple.
pub const MAX_DEPTH: usize = 4;

/// Labels produced by the asset-type rules.
pub mod labels {
    /// Cash.
    pub const CASH: &str = "Cash";
    /// FX forwards.
    pub const FX_DERIVATIVES: &str = "Foreign Exchange Derivatives";
    /// Fixed income category.
    pub const FIXED_INCOME: &str = "Fixed Income";
    /// Money-market instruments.
    pub const CASH_EQUIVALENTS: &str = "Cash Equivalents";
    /// Corporate bonds.
    pub const CORPORATE: &str = "Corporate";
    /// Government bonds.
    pub const GOVERNMENT: &str = "Government";
    /// AT1 / CoCo bonds.
    pub const CONTINGENT_CONVERTIBLES: &str = "Additional Tier 1, Contingent Convertibles";
    /// Credit derivatives.
    pub const CREDIT_DERIVATIVES: &str = "Credit Derivatives";
    /// Asset-backed securities.
    pub const ASSET_BACKED: &str = "Asset-Backed";
    /// Equity category.
    pub const EQUITY: &str = "Equity";
    /// Actively traded equities.
    pub const LISTED_EQUITIES: &str = "Listed Equities";
    /// Equities not actively traded.
    pub const UNLISTED_EQUITIES: &str = "Unlisted Equities";
    /// Commodity category.
    pub const COMMODITY: &str = "Commodity";
    /// Commodity derivatives.
    pub const DERIVATIVES: &str = "Derivatives";
    /// Fund category.
    pub const FUND: &str = "Fund";
    /// ETFs.
    pub const EXCHANGE_TRADED_FUNDS: &str = "Exchange Traded Funds";
    /// REITs.
    pub const REITS: &str = "Real Estate Investment Trusts";
    /// Catch-all category.
    pub const OTHERS: &str = "Others";
}

/// An asset-type tuple of 0 to 4 labels, least specific first.
///
/// # Example
///
/// ```rust
/// use sfc_classify::types::AssetType;
///
/// let corp = AssetType::new(["Fixed Income", "Corporate"]).unwrap();
/// assert_eq!(corp.category(), Some("Fixed Income"));
/// assert!(corp.starts_with(&AssetType::fixed_income()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AssetType(Vec<String>);

impl AssetType {
    /// Builds an asset type from its components.
    ///
    /// Components are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidAssetType` if there are more than four
    /// components or a component is blank.
    pub fn new<I, S>(parts: I) -> ClassifyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = parts
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .collect();

        if parts.len() > MAX_DEPTH {
            return Err(ClassifyError::invalid_asset_type(
                parts.join(", "),
                format!("more than {MAX_DEPTH} components"),
            ));
        }
        if parts.iter().any(String::is_empty) {
            return Err(ClassifyError::invalid_asset_type(
                parts.join(", "),
                "blank component",
            ));
        }
        Ok(Self(parts))
    }

    /// Parses the comma-separated form used in override tables,
    /// e.g. `"Equity, Listed Equities"`.
    ///
    /// # Errors
    ///
    /// Same as [`AssetType::new`].
    pub fn parse(s: &str) -> ClassifyResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ClassifyError::invalid_asset_type(s, "empty"));
        }
        Self::new(s.split(','))
    }

    fn fixed(parts: &[&str]) -> Self {
        Self(parts.iter().map(|p| (*p).to_string()).collect())
    }

    /// `("Cash",)`
    #[must_use]
    pub fn cash() -> Self {
        Self::fixed(&[labels::CASH])
    }

    /// `("Foreign Exchange Derivatives",)`
    #[must_use]
    pub fn fx_derivatives() -> Self {
        Self::fixed(&[labels::FX_DERIVATIVES])
    }

    /// `("Fixed Income",)`
    #[must_use]
    pub fn fixed_income() -> Self {
        Self::fixed(&[labels::FIXED_INCOME])
    }

    /// `("Fixed Income", "Cash Equivalents")`
    #[must_use]
    pub fn cash_equivalents() -> Self {
        Self::fixed(&[labels::FIXED_INCOME, labels::CASH_EQUIVALENTS])
    }

    /// `("Fixed Income", "Corporate")`
    #[must_use]
    pub fn corporate_bond() -> Self {
        Self::fixed(&[labels::FIXED_INCOME, labels::CORPORATE])
    }

    /// `("Fixed Income", "Government")`
    #[must_use]
    pub fn government_bond() -> Self {
        Self::fixed(&[labels::FIXED_INCOME, labels::GOVERNMENT])
    }

    /// `("Fixed Income", "Additional Tier 1, Contingent Convertibles")`
    #[must_use]
    pub fn contingent_convertible() -> Self {
        Self::fixed(&[labels::FIXED_INCOME, labels::CONTINGENT_CONVERTIBLES])
    }

    /// `("Equity", "Listed Equities")`
    #[must_use]
    pub fn listed_equity() -> Self {
        Self::fixed(&[labels::EQUITY, labels::LISTED_EQUITIES])
    }

    /// `("Equity", "Unlisted Equities")`
    #[must_use]
    pub fn unlisted_equity() -> Self {
        Self::fixed(&[labels::EQUITY, labels::UNLISTED_EQUITIES])
    }

    /// `("Commodity", "Derivatives")`
    #[must_use]
    pub fn commodity_derivatives() -> Self {
        Self::fixed(&[labels::COMMODITY, labels::DERIVATIVES])
    }

    /// `("Fund", "Exchange Traded Funds")`
    #[must_use]
    pub fn exchange_traded_fund() -> Self {
        Self::fixed(&[labels::FUND, labels::EXCHANGE_TRADED_FUNDS])
    }

    /// `("Fund", "Real Estate Investment Trusts")`
    #[must_use]
    pub fn reit() -> Self {
        Self::fixed(&[labels::FUND, labels::REITS])
    }

    /// Returns the components, least specific first.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Returns the component at `depth`, if present.
    #[must_use]
    pub fn get(&self, depth: usize) -> Option<&str> {
        self.0.get(depth).map(String::as_str)
    }

    /// Returns the top-level category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.get(0)
    }

    /// Returns the subcategory.
    #[must_use]
    pub fn subcategory(&self) -> Option<&str> {
        self.get(1)
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty tuple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `prefix` is a component-wise exact prefix of `self`.
    #[must_use]
    pub fn starts_with(&self, prefix: &AssetType) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True if the category is `label`.
    #[must_use]
    pub fn is_category(&self, label: &str) -> bool {
        self.category() == Some(label)
    }

    /// Cash and FX derivatives have no country and are excluded from the
    /// allocation matrix.
    #[must_use]
    pub fn is_country_not_applicable(&self) -> bool {
        self.is_category(labels::CASH) || self.is_category(labels::FX_DERIVATIVES)
    }

    /// Cash, FX derivatives and cash equivalents count as L0 unconditionally.
    #[must_use]
    pub fn is_cash_type(&self) -> bool {
        self.is_country_not_applicable() || self.starts_with(&Self::cash_equivalents())
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{part}")?;
        }
        write!(f, ")")
    }
}

impl TryFrom<Vec<String>> for AssetType {
    type Error = ClassifyError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(parts)
    }
}

impl From<AssetType> for Vec<String> {
    fn from(asset_type: AssetType) -> Self {
        asset_type.0
    }
}
