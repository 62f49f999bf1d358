//! Liquidity categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Liquidity bucket, from most to least liquid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiquidityCategory {
    /// Highly liquid.
    L0,
    /// Medium liquid.
    L1,
    /// Low liquid.
    L2,
    /// Illiquid.
    L3,
}

impl LiquidityCategory {
    /// All categories in report order.
    pub const ALL: [LiquidityCategory; 4] = [Self::L0, Self::L1, Self::L2, Self::L3];

    /// Maps an LQA time-to-cash (days) to a category.
    ///
    /// `<= 3` is L0, `<= 7` is L1, `<= 10` is L2, anything longer is L3.
    #[must_use]
    pub fn from_time_to_cash(days: f64) -> Self {
        if days <= 3.0 {
            Self::L0
        } else if days <= 7.0 {
            Self::L1
        } else if days <= 10.0 {
            Self::L2
        } else {
            Self::L3
        }
    }

    /// Maps a three-factor score (3 to 12) to a category.
    #[must_use]
    pub fn from_special_case_score(score: u32) -> Self {
        match score {
            s if s >= 12 => Self::L0,
            s if s >= 9 => Self::L1,
            s if s >= 6 => Self::L2,
            _ => Self::L3,
        }
    }

    /// Position in [`LiquidityCategory::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::L0 => "L0",
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
        }
    }
}

impl fmt::Display for LiquidityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
