//! Error types for classification and allocation.
//!
//! Classification fails loud: a position that no rule covers raises rather
//! than landing in a default bucket. Missing agency ratings are the one
//! exception and are handled by the `on_no_rating` hook instead.

use sfc_core::{CoreError, Identity};
use thiserror::Error;

/// Result type for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Errors that can occur while classifying or aggregating positions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// No asset-type rule matches the position.
    #[error("Cannot classify asset type of {identity}: {reason}")]
    UnclassifiableAssetType {
        /// The position identity.
        identity: Identity,
        /// What the rules could not decide on.
        reason: String,
    },

    /// The country code has no country group.
    #[error("Unsupported country code '{country}' for {identity}")]
    UnsupportedCountryCode {
        /// The position identity.
        identity: Identity,
        /// The country code as resolved.
        country: String,
    },

    /// Private (non-listed) securities have no general rule yet.
    #[error("Private security not supported: {identity}")]
    PrivateSecurityUnsupported {
        /// The position identity.
        identity: Identity,
    },

    /// Repo positions have no rule yet.
    #[error("Repo not supported: {identity}")]
    RepoUnsupported {
        /// The position identity.
        identity: Identity,
    },

    /// Open-end fund missing from the fund-type table.
    #[error("Fund {identity} not found in fund type table")]
    UnmappedFund {
        /// The position identity.
        identity: Identity,
    },

    /// Commodity / Fund / Others position missing from the country table.
    #[error("No country override for {identity}")]
    MissingCountryOverride {
        /// The position identity.
        identity: Identity,
    },

    /// No market-data record for the identity.
    #[error("No market data for {identity}")]
    MissingMarketData {
        /// The position identity.
        identity: Identity,
    },

    /// A required field is absent from a source record.
    #[error("Missing field '{field}' for {identity}")]
    MissingField {
        /// The position identity.
        identity: Identity,
        /// The field name.
        field: String,
    },

    /// A rating string that is neither a sentinel nor in the score table.
    #[error("Unknown {agency} rating '{rating}' for {identity}")]
    UnknownRating {
        /// The position identity.
        identity: Identity,
        /// The rating agency.
        agency: String,
        /// The raw rating string.
        rating: String,
    },

    /// No time-to-cash figure for a position that needs one.
    #[error("No liquidity data for {identity}")]
    MissingLiquidityData {
        /// The position identity.
        identity: Identity,
    },

    /// FX table has no rate for the currency.
    #[error("No FX rate for {currency}")]
    MissingFxRate {
        /// The currency code.
        currency: String,
    },

    /// FX rate is zero or negative.
    #[error("Invalid FX rate for {currency}: {rate}")]
    InvalidFxRate {
        /// The currency code.
        currency: String,
        /// The invalid rate value.
        rate: String,
    },

    /// FX table converts into a different currency than the run reports in.
    #[error("FX table reports in {fx}, configured reporting currency is {configured}")]
    ReportingCurrencyMismatch {
        /// Reporting currency from the configuration.
        configured: String,
        /// Reporting currency of the FX table.
        fx: String,
    },

    /// Asset-type tuple could not be built.
    #[error("Invalid asset type '{value}': {reason}")]
    InvalidAssetType {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Liquidity distribution percentages do not sum to one.
    #[error("Liquidity percentages sum to {sum}, expected 1")]
    PercentageSumViolation {
        /// The computed sum.
        sum: f64,
    },

    /// Liquidity distribution over a zero total.
    #[error("Liquidity distribution has zero total market value")]
    EmptyDistribution,

    /// Error from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClassifyError {
    /// Create an unclassifiable asset type error.
    #[must_use]
    pub fn unclassifiable(identity: &Identity, reason: impl Into<String>) -> Self {
        Self::UnclassifiableAssetType {
            identity: identity.clone(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported country code error.
    #[must_use]
    pub fn unsupported_country(identity: &Identity, country: impl Into<String>) -> Self {
        Self::UnsupportedCountryCode {
            identity: identity.clone(),
            country: country.into(),
        }
    }

    /// Create a missing market data error.
    #[must_use]
    pub fn missing_market_data(identity: &Identity) -> Self {
        Self::MissingMarketData {
            identity: identity.clone(),
        }
    }

    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(identity: &Identity, field: impl Into<String>) -> Self {
        Self::MissingField {
            identity: identity.clone(),
            field: field.into(),
        }
    }

    /// Create an invalid asset type error.
    #[must_use]
    pub fn invalid_asset_type(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAssetType {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing FX rate error.
    #[must_use]
    pub fn missing_fx_rate(currency: impl Into<String>) -> Self {
        Self::MissingFxRate {
            currency: currency.into(),
        }
    }

    /// Returns the identity of the position the error refers to, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::UnclassifiableAssetType { identity, .. }
            | Self::UnsupportedCountryCode { identity, .. }
            | Self::PrivateSecurityUnsupported { identity }
            | Self::RepoUnsupported { identity }
            | Self::UnmappedFund { identity }
            | Self::MissingCountryOverride { identity }
            | Self::MissingMarketData { identity }
            | Self::MissingField { identity, .. }
            | Self::UnknownRating { identity, .. }
            | Self::MissingLiquidityData { identity } => Some(identity),
            _ => None,
        }
    }

    /// True for rule gaps and missing reference entries, which belong on the
    /// manual review list. False for data-integrity failures.
    #[must_use]
    pub fn is_manual_review(&self) -> bool {
        matches!(
            self,
            Self::UnclassifiableAssetType { .. }
                | Self::UnsupportedCountryCode { .. }
                | Self::PrivateSecurityUnsupported { .. }
                | Self::RepoUnsupported { .. }
                | Self::UnmappedFund { .. }
                | Self::MissingCountryOverride { .. }
                | Self::MissingMarketData { .. }
                | Self::UnknownRating { .. }
                | Self::MissingLiquidityData { .. }
        )
    }
}
