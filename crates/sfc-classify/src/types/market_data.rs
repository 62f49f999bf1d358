//! Market-data and liquidity-analytics records keyed by security identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sfc_core::{Date, Identity};
use std::collections::HashMap;

use super::RatingAgency;
use crate::error::{ClassifyError, ClassifyResult};

/// Bloomberg reference fields for one security.
///
/// Field names follow the Bloomberg mnemonics when serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketDataRecord {
    /// Security id (ticker or ISIN).
    #[serde(rename = "ID")]
    pub id: String,
    /// Market sector ("Equity", "Corp", "Govt", "Comdty", ...).
    #[serde(rename = "MARKET_SECTOR_DES")]
    pub market_sector: Option<String>,
    /// Country of issue.
    #[serde(rename = "CNTRY_ISSUE_ISO")]
    pub country_of_issue: Option<String>,
    /// Country of risk.
    #[serde(rename = "CNTRY_OF_RISK")]
    pub country_of_risk: Option<String>,
    /// Capital contingent flag (`Y`/`N`).
    #[serde(rename = "CAPITAL_CONTINGENT_SECURITY")]
    pub capital_contingent: Option<String>,
    /// Exchange status (`ACTV`, ...).
    #[serde(rename = "EXCH_MARKET_STATUS")]
    pub exchange_status: Option<String>,
    /// Industry sector ("Financial", ...).
    #[serde(rename = "INDUSTRY_SECTOR")]
    pub industry_sector: Option<String>,
    /// S&P rating.
    #[serde(rename = "RTG_SP")]
    pub rating_sp: Option<String>,
    /// Moody's rating.
    #[serde(rename = "RTG_MOODY")]
    pub rating_moody: Option<String>,
    /// Fitch rating.
    #[serde(rename = "RTG_FITCH")]
    pub rating_fitch: Option<String>,
    /// SFC authorized fund flag (`Y`/`N`).
    #[serde(rename = "SFC_AUTHORIZED_FUND")]
    pub sfc_authorized: Option<String>,
    /// Maturity used for liquidity scoring.
    #[serde(rename = "CALC_MATURITY")]
    pub maturity: Option<Date>,
    /// Amount outstanding of the issue.
    #[serde(rename = "AMT_OUTSTANDING")]
    pub amount_outstanding: Option<Decimal>,
}

fn flag_is(value: Option<&String>, expected: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
}

impl MarketDataRecord {
    /// Creates an empty record for an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the market sector.
    #[must_use]
    pub fn with_market_sector(mut self, sector: impl Into<String>) -> Self {
        self.market_sector = Some(sector.into());
        self
    }

    /// Sets the country of issue.
    #[must_use]
    pub fn with_country_of_issue(mut self, country: impl Into<String>) -> Self {
        self.country_of_issue = Some(country.into());
        self
    }

    /// Sets the country of risk.
    #[must_use]
    pub fn with_country_of_risk(mut self, country: impl Into<String>) -> Self {
        self.country_of_risk = Some(country.into());
        self
    }

    /// Sets the capital contingent flag.
    #[must_use]
    pub fn with_capital_contingent(mut self, contingent: bool) -> Self {
        self.capital_contingent = Some(if contingent { "Y" } else { "N" }.to_string());
        self
    }

    /// Sets the exchange status.
    #[must_use]
    pub fn with_exchange_status(mut self, status: impl Into<String>) -> Self {
        self.exchange_status = Some(status.into());
        self
    }

    /// Sets the industry sector.
    #[must_use]
    pub fn with_industry_sector(mut self, sector: impl Into<String>) -> Self {
        self.industry_sector = Some(sector.into());
        self
    }

    /// Sets one agency rating.
    #[must_use]
    pub fn with_rating(mut self, agency: RatingAgency, rating: impl Into<String>) -> Self {
        let slot = match agency {
            RatingAgency::SP => &mut self.rating_sp,
            RatingAgency::Moody => &mut self.rating_moody,
            RatingAgency::Fitch => &mut self.rating_fitch,
        };
        *slot = Some(rating.into());
        self
    }

    /// Sets the SFC authorized flag.
    #[must_use]
    pub fn with_sfc_authorized(mut self, authorized: bool) -> Self {
        self.sfc_authorized = Some(if authorized { "Y" } else { "N" }.to_string());
        self
    }

    /// Sets maturity and amount outstanding.
    #[must_use]
    pub fn with_issue_details(mut self, maturity: Date, amount_outstanding: Decimal) -> Self {
        self.maturity = Some(maturity);
        self.amount_outstanding = Some(amount_outstanding);
        self
    }

    /// Raw rating string for an agency.
    #[must_use]
    pub fn rating(&self, agency: RatingAgency) -> Option<&str> {
        match agency {
            RatingAgency::SP => self.rating_sp.as_deref(),
            RatingAgency::Moody => self.rating_moody.as_deref(),
            RatingAgency::Fitch => self.rating_fitch.as_deref(),
        }
    }

    /// `CAPITAL_CONTINGENT_SECURITY == "Y"`.
    #[must_use]
    pub fn is_capital_contingent(&self) -> bool {
        flag_is(self.capital_contingent.as_ref(), "Y")
    }

    /// `EXCH_MARKET_STATUS == "ACTV"`.
    #[must_use]
    pub fn is_exchange_active(&self) -> bool {
        flag_is(self.exchange_status.as_ref(), "ACTV")
    }

    /// `INDUSTRY_SECTOR == "Financial"`.
    #[must_use]
    pub fn is_financial(&self) -> bool {
        flag_is(self.industry_sector.as_ref(), "Financial")
    }

    /// `SFC_AUTHORIZED_FUND == "Y"`.
    #[must_use]
    pub fn is_sfc_authorized(&self) -> bool {
        flag_is(self.sfc_authorized.as_ref(), "Y")
    }
}

/// Market-data records keyed by security id.
#[derive(Debug, Clone, Default)]
pub struct MarketDataSet {
    records: HashMap<String, MarketDataRecord>,
}

impl MarketDataSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, replacing any previous record with the same id.
    pub fn insert(&mut self, record: MarketDataRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Adds a record (builder style).
    #[must_use]
    pub fn with_record(mut self, record: MarketDataRecord) -> Self {
        self.insert(record);
        self
    }

    /// Looks up the record for an identity.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&MarketDataRecord> {
        self.records.get(identity.as_str())
    }

    /// Looks up the record for an identity, raising if absent.
    ///
    /// # Errors
    ///
    /// `MissingMarketData` if the identity has no record.
    pub fn require(&self, identity: &Identity) -> ClassifyResult<&MarketDataRecord> {
        self.get(identity)
            .ok_or_else(|| ClassifyError::missing_market_data(identity))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<MarketDataRecord> for MarketDataSet {
    fn from_iter<I: IntoIterator<Item = MarketDataRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Liquidity-analytics (LQA) result for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LqaRecord {
    /// Security id.
    pub id: String,
    /// Days to liquidate; `None` when the analytics returned an error.
    pub time_to_cash: Option<f64>,
}

impl LqaRecord {
    /// Creates a record.
    pub fn new(id: impl Into<String>, time_to_cash: Option<f64>) -> Self {
        Self {
            id: id.into(),
            time_to_cash,
        }
    }
}

/// LQA records keyed by security id.
#[derive(Debug, Clone, Default)]
pub struct LqaDataSet {
    records: HashMap<String, LqaRecord>,
}

impl LqaDataSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record.
    pub fn insert(&mut self, record: LqaRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Adds a record (builder style).
    #[must_use]
    pub fn with_record(mut self, record: LqaRecord) -> Self {
        self.insert(record);
        self
    }

    /// Time to cash for an identity, if known.
    #[must_use]
    pub fn time_to_cash(&self, identity: &Identity) -> Option<f64> {
        self.records
            .get(identity.as_str())
            .and_then(|r| r.time_to_cash)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<LqaRecord> for LqaDataSet {
    fn from_iter<I: IntoIterator<Item = LqaRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}
