//! Rating agencies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credit rating agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingAgency {
    /// S&P Global Ratings.
    SP,
    /// Moody's.
    Moody,
    /// Fitch Ratings.
    Fitch,
}

impl RatingAgency {
    /// Agencies in lookup order.
    pub const ALL: [RatingAgency; 3] = [Self::SP, Self::Moody, Self::Fitch];

    /// Parses the agency names used in the rating score table.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "S&P" | "SP" | "STANDARD & POOR'S" => Some(Self::SP),
            "MOODY'S" | "MOODY" | "MOODYS" => Some(Self::Moody),
            "FITCH" => Some(Self::Fitch),
            _ => None,
        }
    }

    /// Market-data field holding this agency's rating.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::SP => "RTG_SP",
            Self::Moody => "RTG_MOODY",
            Self::Fitch => "RTG_FITCH",
        }
    }
}

impl fmt::Display for RatingAgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SP => "S&P",
            Self::Moody => "Moody's",
            Self::Fitch => "Fitch",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(RatingAgency::parse("S&P"), Some(RatingAgency::SP));
        assert_eq!(RatingAgency::parse("Moody's"), Some(RatingAgency::Moody));
        assert_eq!(RatingAgency::parse(" fitch "), Some(RatingAgency::Fitch));
        assert_eq!(RatingAgency::parse("DBRS"), None);
    }

    #[test]
    fn test_field_name() {
        assert_eq!(RatingAgency::Moody.field_name(), "RTG_MOODY");
        assert_eq!(RatingAgency::SP.to_string(), "S&P");
    }
}
