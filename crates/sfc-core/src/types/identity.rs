//! Security identity used for every market-data and reference lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of identifier carried by an [`Identity`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum IdType {
    /// Bloomberg ticker, e.g. `1299 HK Equity`.
    #[serde(rename = "TICKER")]
    Ticker,
    /// ISIN, e.g. `XS2125922349`.
    #[serde(rename = "ISIN")]
    Isin,
    /// Best-effort fallback when the source record does not say which.
    #[serde(rename = "UNRESOLVED")]
    Unresolved,
}

impl IdType {
    /// Returns the label used in market-data request files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Ticker => "TICKER",
            IdType::Isin => "ISIN",
            IdType::Unresolved => "UNRESOLVED",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(id, idType)` pair identifying a security.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Identifier string.
    pub id: String,
    /// Identifier kind.
    pub id_type: IdType,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(id: impl Into<String>, id_type: IdType) -> Self {
        Self {
            id: id.into(),
            id_type,
        }
    }

    /// Creates a ticker identity.
    pub fn ticker(id: impl Into<String>) -> Self {
        Self::new(id, IdType::Ticker)
    }

    /// Creates an ISIN identity.
    pub fn isin(id: impl Into<String>) -> Self {
        Self::new(id, IdType::Isin)
    }

    /// Creates a fallback identity.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self::new(id, IdType::Unresolved)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.id_type)
    }
}
