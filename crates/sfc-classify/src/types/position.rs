//! Positions from the two source systems.
//!
//! Positions arrive either from the portfolio accounting ledger or from the
//! market-data/pricing feed. Both shapes are wrapped in [`Position`], whose
//! accessors give every classifier the same view of either source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sfc_core::{Currency, Date, Identity};
use tracing::debug;

use crate::error::{ClassifyError, ClassifyResult};

/// Which system a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    /// Portfolio accounting ledger.
    Ledger,
    /// Market-data / pricing feed.
    MarketData,
}

/// Fund flavour as stated by the source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundKind {
    /// Exchange traded fund.
    ExchangeTraded,
    /// Real estate investment trust.
    RealEstateInvestmentTrust,
    /// Open-end / mutual fund; needs the fund-type table.
    OpenEnd,
}

/// Structural kind of a position as stated by its source record, before any
/// market-data lookup.
///
/// Variants are listed in the order the asset-type rules test them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Non-listed security.
    Private,
    /// Cash or cash balance.
    Cash,
    /// FX forward.
    FxForward,
    /// Fixed deposit / money-market instrument.
    MoneyMarket,
    /// Repo.
    Repo,
    /// Fund of the given kind.
    Fund(FundKind),
    /// Anything else; resolved through market data.
    Other,
}

// =============================================================================
// Ledger positions
// =============================================================================

const LEDGER_EQUITY_SORT_KEYS: [&str; 4] = [
    "Common Stock",
    "Real Estate Investment Trust",
    "Stapled Security",
    "Exchange Trade Fund",
];

/// Position from the portfolio accounting ledger.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerPosition {
    /// Portfolio id.
    pub portfolio: String,
    /// Ledger investment id.
    pub invest_id: String,
    /// Security description.
    pub description: String,
    /// Ledger asset class ("Common Stock", "Corporate Bond", ...).
    pub sort_key: String,
    /// Quantity held.
    pub quantity: Option<Decimal>,
    /// Market value in book currency, excluding accrued interest.
    pub market_value_book: Option<Decimal>,
    /// Accrued interest in book currency.
    pub accrued_interest: Option<Decimal>,
    /// Book currency.
    pub book_currency: Option<Currency>,
    /// Period end date of the ledger report.
    pub period_end_date: Option<Date>,
}

impl LedgerPosition {
    /// Creates a ledger position with the fields needed for identity.
    pub fn new(
        portfolio: impl Into<String>,
        invest_id: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        Self {
            portfolio: portfolio.into(),
            invest_id: invest_id.into(),
            sort_key: sort_key.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets market value (book) and accrued interest.
    #[must_use]
    pub fn with_market_value(
        mut self,
        market_value_book: Decimal,
        accrued_interest: Decimal,
    ) -> Self {
        self.market_value_book = Some(market_value_book);
        self.accrued_interest = Some(accrued_interest);
        self
    }

    /// Sets the book currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.book_currency = Some(currency);
        self
    }

    /// Sets the period end date.
    #[must_use]
    pub fn with_date(mut self, date: Date) -> Self {
        self.period_end_date = Some(date);
        self
    }

    fn identity(&self) -> Identity {
        let sort_key = self.sort_key.trim();
        if LEDGER_EQUITY_SORT_KEYS.contains(&sort_key) {
            return Identity::ticker(format!("{} Equity", self.invest_id));
        }
        if sort_key.split_whitespace().last() == Some("Bond") {
            return match self.invest_id.get(..12) {
                Some(isin) => Identity::isin(isin),
                None => {
                    debug!(invest_id = %self.invest_id, "short bond invest id used as ISIN");
                    Identity::isin(self.invest_id.clone())
                }
            };
        }
        debug!(invest_id = %self.invest_id, sort_key, "unresolved ledger identity");
        Identity::unresolved(self.invest_id.clone())
    }

    fn source_kind(&self, private_marker: &str) -> SourceKind {
        if !private_marker.is_empty() && self.description.starts_with(private_marker) {
            return SourceKind::Private;
        }
        match self.sort_key.trim() {
            "Cash and Equivalents" => SourceKind::Cash,
            "FX Forward" => SourceKind::FxForward,
            "Fixed Deposit" => SourceKind::MoneyMarket,
            "Exchange Trade Fund" => SourceKind::Fund(FundKind::ExchangeTraded),
            "Real Estate Investment Trust" => SourceKind::Fund(FundKind::RealEstateInvestmentTrust),
            "Open-End Fund" => SourceKind::Fund(FundKind::OpenEnd),
            _ => SourceKind::Other,
        }
    }
}

// =============================================================================
// Market-data feed positions
// =============================================================================

/// Position from the market-data / pricing feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketDataPosition {
    /// Account (portfolio) code.
    pub account_code: String,
    /// Security name; the ticker stem for equities.
    pub name: String,
    /// ISIN, when the feed provides one.
    pub isin: Option<String>,
    /// Feed asset type ("Equity", "Cash", "Money Market", ...).
    pub asset_type: String,
    /// Quantity held.
    pub position: Option<Decimal>,
    /// Market value in position currency.
    pub market_value: Option<Decimal>,
    /// Position currency.
    pub currency: Option<Currency>,
    /// As-of date of the feed.
    pub as_of_date: Option<Date>,
}

impl MarketDataPosition {
    /// Creates a feed position with the fields needed for identity.
    pub fn new(
        account_code: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            name: name.into(),
            asset_type: asset_type.into(),
            ..Self::default()
        }
    }

    /// Sets the ISIN.
    #[must_use]
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.position = Some(quantity);
        self
    }

    /// Sets the market value.
    #[must_use]
    pub fn with_market_value(mut self, market_value: Decimal) -> Self {
        self.market_value = Some(market_value);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Sets the as-of date.
    #[must_use]
    pub fn with_date(mut self, date: Date) -> Self {
        self.as_of_date = Some(date);
        self
    }

    fn identity(&self) -> Identity {
        if self.asset_type.trim() == "Equity" {
            return Identity::ticker(format!("{} Equity", self.name));
        }
        match self.isin.as_deref().map(str::trim) {
            Some(isin) if !isin.is_empty() => Identity::isin(isin),
            _ => {
                debug!(name = %self.name, "feed position without ISIN");
                Identity::unresolved(self.name.clone())
            }
        }
    }

    fn source_kind(&self, private_marker: &str) -> SourceKind {
        let asset_type = self.asset_type.trim();
        if asset_type == "Private Security"
            || (!private_marker.is_empty() && self.name.starts_with(private_marker))
        {
            return SourceKind::Private;
        }
        match asset_type {
            "Cash" => SourceKind::Cash,
            "Foreign Exchange Forward" => SourceKind::FxForward,
            "Money Market" => SourceKind::MoneyMarket,
            "Repo Liability" => SourceKind::Repo,
            "Exchange Trade Fund" => SourceKind::Fund(FundKind::ExchangeTraded),
            "Real Estate Investment Trust" => SourceKind::Fund(FundKind::RealEstateInvestmentTrust),
            "Open-End Fund" | "Mutual Fund" => SourceKind::Fund(FundKind::OpenEnd),
            _ => SourceKind::Other,
        }
    }
}

// =============================================================================
// Uniform view
// =============================================================================

/// A position from either source.
///
/// # Example
///
/// ```rust
/// use sfc_classify::types::{LedgerPosition, Position, SourceTag};
///
/// let p = Position::from(LedgerPosition::new("12229", "XS1684793018 Perp", "Corporate Bond"));
/// assert_eq!(p.source_tag(), SourceTag::Ledger);
/// assert_eq!(p.identity().id, "XS1684793018");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Ledger position.
    Ledger(LedgerPosition),
    /// Feed position.
    MarketData(MarketDataPosition),
}

impl Position {
    /// Source system tag.
    #[must_use]
    pub fn source_tag(&self) -> SourceTag {
        match self {
            Self::Ledger(_) => SourceTag::Ledger,
            Self::MarketData(_) => SourceTag::MarketData,
        }
    }

    /// `(id, idType)` used for every lookup. Never fails; falls back to an
    /// `Unresolved` identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        match self {
            Self::Ledger(p) => p.identity(),
            Self::MarketData(p) => p.identity(),
        }
    }

    /// Portfolio id.
    #[must_use]
    pub fn portfolio_id(&self) -> &str {
        match self {
            Self::Ledger(p) => &p.portfolio,
            Self::MarketData(p) => &p.account_code,
        }
    }

    /// Security description or name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ledger(p) => &p.description,
            Self::MarketData(p) => &p.name,
        }
    }

    /// Quantity held.
    ///
    /// # Errors
    ///
    /// `MissingField` if the source record has no quantity.
    pub fn quantity(&self) -> ClassifyResult<Decimal> {
        let (value, field) = match self {
            Self::Ledger(p) => (p.quantity, "Quantity"),
            Self::MarketData(p) => (p.position, "Position"),
        };
        value.ok_or_else(|| ClassifyError::missing_field(&self.identity(), field))
    }

    /// Market value in book currency. Ledger market value includes accrued
    /// interest.
    ///
    /// # Errors
    ///
    /// `MissingField` if any contributing field is absent.
    pub fn market_value(&self) -> ClassifyResult<Decimal> {
        match self {
            Self::Ledger(p) => {
                let mv = p.market_value_book.ok_or_else(|| {
                    ClassifyError::missing_field(&self.identity(), "MarketValueBook")
                })?;
                let ai = p.accrued_interest.ok_or_else(|| {
                    ClassifyError::missing_field(&self.identity(), "AccruedInterest")
                })?;
                Ok(mv + ai)
            }
            Self::MarketData(p) => p
                .market_value
                .ok_or_else(|| ClassifyError::missing_field(&self.identity(), "Market Value")),
        }
    }

    /// Book currency.
    ///
    /// # Errors
    ///
    /// `MissingField` if the source record has no currency.
    pub fn book_currency(&self) -> ClassifyResult<Currency> {
        let (value, field) = match self {
            Self::Ledger(p) => (p.book_currency, "BookCurrency"),
            Self::MarketData(p) => (p.currency, "Currency"),
        };
        value.ok_or_else(|| ClassifyError::missing_field(&self.identity(), field))
    }

    /// As-of date of the position.
    ///
    /// # Errors
    ///
    /// `MissingField` if the source record has no date.
    pub fn position_date(&self) -> ClassifyResult<Date> {
        let (value, field) = match self {
            Self::Ledger(p) => (p.period_end_date, "PeriodEndDate"),
            Self::MarketData(p) => (p.as_of_date, "AsOfDate"),
        };
        value.ok_or_else(|| ClassifyError::missing_field(&self.identity(), field))
    }

    /// Structural kind from the source record alone.
    #[must_use]
    pub fn source_kind(&self, private_marker: &str) -> SourceKind {
        match self {
            Self::Ledger(p) => p.source_kind(private_marker),
            Self::MarketData(p) => p.source_kind(private_marker),
        }
    }
}

impl From<LedgerPosition> for Position {
    fn from(p: LedgerPosition) -> Self {
        Self::Ledger(p)
    }
}

impl From<MarketDataPosition> for Position {
    fn from(p: MarketDataPosition) -> Self {
        Self::MarketData(p)
    }
}
