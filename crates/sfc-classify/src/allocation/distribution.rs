//! Liquidity distribution: value and share of the portfolio per bucket.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sfc_core::Date;

use super::market_value_in_reporting;
use crate::batch::maybe_parallel_map;
use crate::classify::{liquidity_category, ClassificationContext};
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{FxTable, LiquidityCategory, LqaDataSet, Position};

/// One bucket of the distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRow {
    /// The bucket.
    pub category: LiquidityCategory,
    /// Value in reporting currency.
    pub total: Decimal,
    /// Share of the grand total.
    pub percentage: f64,
}

/// Liquidity distribution in L0..L3 order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityDistribution {
    rows: Vec<LiquidityRow>,
    total: Decimal,
}

impl LiquidityDistribution {
    /// Builds the distribution from per-position `(category, value)` pairs.
    ///
    /// # Errors
    ///
    /// `EmptyDistribution` for a zero total, `PercentageSumViolation` if the
    /// shares do not sum to 1 within `tolerance`.
    pub fn from_values<I>(values: I, tolerance: f64) -> ClassifyResult<Self>
    where
        I: IntoIterator<Item = (LiquidityCategory, Decimal)>,
    {
        let mut totals = [Decimal::ZERO; 4];
        for (category, value) in values {
            totals[category.index()] += value;
        }
        let total: Decimal = totals.iter().sum();
        if total.is_zero() {
            return Err(ClassifyError::EmptyDistribution);
        }

        let rows: Vec<LiquidityRow> = LiquidityCategory::ALL
            .iter()
            .zip(totals)
            .map(|(&category, bucket)| LiquidityRow {
                category,
                total: bucket,
                percentage: (bucket / total).to_f64().unwrap_or(f64::NAN),
            })
            .collect();

        let sum: f64 = rows.iter().map(|r| r.percentage).sum();
        if sum.is_nan() || (sum - 1.0).abs() > tolerance {
            return Err(ClassifyError::PercentageSumViolation { sum });
        }

        Ok(Self { rows, total })
    }

    /// Rows in L0..L3 order.
    #[must_use]
    pub fn rows(&self) -> &[LiquidityRow] {
        &self.rows
    }

    /// Row for a category.
    #[must_use]
    pub fn row(&self, category: LiquidityCategory) -> &LiquidityRow {
        &self.rows[category.index()]
    }

    /// Grand total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Categorizes every position and builds the liquidity distribution.
///
/// # Errors
///
/// `ReportingCurrencyMismatch` if the FX table does not convert into the
/// configured reporting currency, the first categorization or FX error in
/// input order, then the checks of [`LiquidityDistribution::from_values`].
pub fn liquidity_distribution(
    ctx: &ClassificationContext<'_>,
    lqa: &LqaDataSet,
    fx: &FxTable,
    date: Date,
    positions: &[Position],
) -> ClassifyResult<LiquidityDistribution> {
    fx.ensure_reporting_currency(ctx.config.reporting_currency)?;
    let values = maybe_parallel_map(
        positions,
        ctx.config,
        |_, position| -> ClassifyResult<(LiquidityCategory, Decimal)> {
            Ok((
                liquidity_category(ctx, lqa, date, position)?,
                market_value_in_reporting(fx, position)?,
            ))
        },
    )
    .into_iter()
    .collect::<ClassifyResult<Vec<_>>>()?;

    LiquidityDistribution::from_values(values, ctx.config.percentage_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_values() {
        let dist = LiquidityDistribution::from_values(
            vec![
                (LiquidityCategory::L0, dec!(50)),
                (LiquidityCategory::L2, dec!(30)),
                (LiquidityCategory::L0, dec!(10)),
                (LiquidityCategory::L3, dec!(10)),
            ],
            1e-7,
        )
        .unwrap();
        assert_eq!(dist.total(), dec!(100));
        assert_eq!(dist.rows().len(), 4);
        assert_relative_eq!(dist.row(LiquidityCategory::L0).percentage, 0.6, epsilon = 1e-12);
        assert_eq!(dist.row(LiquidityCategory::L1).total, Decimal::ZERO);
        assert_relative_eq!(dist.row(LiquidityCategory::L2).percentage, 0.3, epsilon = 1e-12);
        let sum: f64 = dist.rows().iter().map(|r| r.percentage).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_thirds_within_tolerance() {
        let dist = LiquidityDistribution::from_values(
            vec![
                (LiquidityCategory::L0, dec!(1)),
                (LiquidityCategory::L1, dec!(1)),
                (LiquidityCategory::L2, dec!(1)),
            ],
            1e-7,
        )
        .unwrap();
        assert_eq!(dist.row(LiquidityCategory::L3).percentage, 0.0);
    }

    #[test]
    fn test_empty_distribution() {
        assert_eq!(
            LiquidityDistribution::from_values(Vec::new(), 1e-7).unwrap_err(),
            ClassifyError::EmptyDistribution
        );
        assert_eq!(
            LiquidityDistribution::from_values(
                vec![(LiquidityCategory::L0, dec!(5)), (LiquidityCategory::L1, dec!(-5))],
                1e-7
            )
            .unwrap_err(),
            ClassifyError::EmptyDistribution
        );
    }

    #[test]
    fn test_distribution_rejects_fx_in_other_currency() {
        use crate::reference::ReferenceDataStore;
        use crate::types::{ClassifyConfig, MarketDataSet};
        use sfc_core::Currency;

        let (reference, md) = (ReferenceDataStore::new(), MarketDataSet::new());
        let config = ClassifyConfig::default().with_reporting_currency(Currency::HKD);
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let date = Date::from_ymd(2020, 4, 29).unwrap();
        let fx = FxTable::new(date, Currency::USD);

        assert!(matches!(
            liquidity_distribution(&ctx, &LqaDataSet::new(), &fx, date, &[]),
            Err(ClassifyError::ReportingCurrencyMismatch { .. })
        ));
    }
}
