//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO 4217 currency codes.
///
/// Covers the book currencies found in the ledger and market-data feeds,
/// which are weighted towards Greater China and the rest of Asia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Hong Kong Dollar
    HKD,
    /// Chinese Yuan Renminbi (onshore)
    CNY,
    /// Chinese Yuan Renminbi (offshore)
    CNH,
    /// Macanese Pataca
    MOP,
    /// Singapore Dollar
    SGD,
    /// New Taiwan Dollar
    TWD,
    /// South Korean Won
    KRW,
    /// Japanese Yen
    JPY,
    /// Indian Rupee
    INR,
    /// Indonesian Rupiah
    IDR,
    /// Malaysian Ringgit
    MYR,
    /// Thai Baht
    THB,
    /// Philippine Peso
    PHP,
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
}

impl Currency {
    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::HKD => "HKD",
            Currency::CNY => "CNY",
            Currency::CNH => "CNH",
            Currency::MOP => "MOP",
            Currency::SGD => "SGD",
            Currency::TWD => "TWD",
            Currency::KRW => "KRW",
            Currency::JPY => "JPY",
            Currency::INR => "INR",
            Currency::IDR => "IDR",
            Currency::MYR => "MYR",
            Currency::THB => "THB",
            Currency::PHP => "PHP",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
        }
    }

    /// Returns the full currency name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "United States Dollar",
            Currency::HKD => "Hong Kong Dollar",
            Currency::CNY => "Chinese Yuan Renminbi",
            Currency::CNH => "Chinese Yuan Renminbi (Offshore)",
            Currency::MOP => "Macanese Pataca",
            Currency::SGD => "Singapore Dollar",
            Currency::TWD => "New Taiwan Dollar",
            Currency::KRW => "South Korean Won",
            Currency::JPY => "Japanese Yen",
            Currency::INR => "Indian Rupee",
            Currency::IDR => "Indonesian Rupiah",
            Currency::MYR => "Malaysian Ringgit",
            Currency::THB => "Thai Baht",
            Currency::PHP => "Philippine Peso",
            Currency::AUD => "Australian Dollar",
            Currency::NZD => "New Zealand Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound Sterling",
            Currency::CHF => "Swiss Franc",
            Currency::CAD => "Canadian Dollar",
        }
    }

    /// Parses a currency from a string code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "HKD" => Some(Currency::HKD),
            "CNY" => Some(Currency::CNY),
            "CNH" => Some(Currency::CNH),
            "MOP" => Some(Currency::MOP),
            "SGD" => Some(Currency::SGD),
            "TWD" => Some(Currency::TWD),
            "KRW" => Some(Currency::KRW),
            "JPY" => Some(Currency::JPY),
            "INR" => Some(Currency::INR),
            "IDR" => Some(Currency::IDR),
            "MYR" => Some(Currency::MYR),
            "THB" => Some(Currency::THB),
            "PHP" => Some(Currency::PHP),
            "AUD" => Some(Currency::AUD),
            "NZD" => Some(Currency::NZD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CHF" => Some(Currency::CHF),
            "CAD" => Some(Currency::CAD),
            _ => None,
        }
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CoreError::unknown_currency(s))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
