//! FX table for converting book-currency values into the reporting currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sfc_core::{Currency, Date};
use std::collections::HashMap;

use crate::error::{ClassifyError, ClassifyResult};

/// FX rates for one date and reporting currency.
///
/// Each rate is the number of units of a currency per one unit of the
/// reporting currency, so a book-currency value converts as `value / rate`.
/// The reporting currency itself always has rate 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxTable {
    date: Date,
    reporting_currency: Currency,
    rates: HashMap<Currency, Decimal>,
}

impl FxTable {
    /// Creates a table holding only the reporting currency.
    #[must_use]
    pub fn new(date: Date, reporting_currency: Currency) -> Self {
        let mut rates = HashMap::new();
        rates.insert(reporting_currency, dec!(1));
        Self {
            date,
            reporting_currency,
            rates,
        }
    }

    /// Sets the rate for a currency. The reporting currency stays at 1.
    pub fn insert(&mut self, currency: Currency, rate: Decimal) {
        if currency != self.reporting_currency {
            self.rates.insert(currency, rate);
        }
    }

    /// Sets the rate for a currency (builder style).
    #[must_use]
    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.insert(currency, rate);
        self
    }

    /// Date the rates apply to.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Reporting currency.
    #[must_use]
    pub fn reporting_currency(&self) -> Currency {
        self.reporting_currency
    }

    /// Checks that the table converts into the currency the run reports in.
    ///
    /// # Errors
    ///
    /// `ReportingCurrencyMismatch` if the currencies differ.
    pub fn ensure_reporting_currency(&self, configured: Currency) -> ClassifyResult<()> {
        if self.reporting_currency == configured {
            return Ok(());
        }
        Err(ClassifyError::ReportingCurrencyMismatch {
            configured: configured.code().to_string(),
            fx: self.reporting_currency.code().to_string(),
        })
    }

    /// Rate for a currency.
    ///
    /// # Errors
    ///
    /// `MissingFxRate` if absent, `InvalidFxRate` if zero or negative.
    pub fn rate(&self, currency: Currency) -> ClassifyResult<Decimal> {
        let rate = *self
            .rates
            .get(&currency)
            .ok_or_else(|| ClassifyError::missing_fx_rate(currency.code()))?;
        if rate <= Decimal::ZERO {
            return Err(ClassifyError::InvalidFxRate {
                currency: currency.code().to_string(),
                rate: rate.to_string(),
            });
        }
        Ok(rate)
    }

    /// Converts a book-currency amount into the reporting currency.
    ///
    /// # Errors
    ///
    /// Same as [`FxTable::rate`].
    pub fn to_reporting(&self, amount: Decimal, currency: Currency) -> ClassifyResult<Decimal> {
        Ok(amount / self.rate(currency)?)
    }

    /// Number of currencies with a rate, including the reporting currency.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false; the reporting currency is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FxTable {
        FxTable::new(Date::from_ymd(2020, 4, 29).unwrap(), Currency::USD)
            .with_rate(Currency::HKD, dec!(7.75))
            .with_rate(Currency::SGD, dec!(0))
    }

    #[test]
    fn test_reporting_currency_is_one() {
        let fx = table().with_rate(Currency::USD, dec!(3));
        assert_eq!(fx.rate(Currency::USD).unwrap(), dec!(1));
        assert_eq!(fx.to_reporting(dec!(100), Currency::USD).unwrap(), dec!(100));
    }

    #[test]
    fn test_conversion() {
        let fx = table();
        assert_eq!(fx.to_reporting(dec!(775), Currency::HKD).unwrap(), dec!(100));
    }

    #[test]
    fn test_missing_and_invalid() {
        let fx = table();
        assert!(matches!(
            fx.rate(Currency::EUR),
            Err(ClassifyError::MissingFxRate { .. })
        ));
        assert!(matches!(
            fx.rate(Currency::SGD),
            Err(ClassifyError::InvalidFxRate { .. })
        ));
    }

    #[test]
    fn test_ensure_reporting_currency() {
        let fx = table();
        assert!(fx.ensure_reporting_currency(Currency::USD).is_ok());
        assert_eq!(
            fx.ensure_reporting_currency(Currency::HKD).unwrap_err(),
            ClassifyError::ReportingCurrencyMismatch {
                configured: "HKD".to_string(),
                fx: "USD".to_string(),
            }
        );
    }
}
