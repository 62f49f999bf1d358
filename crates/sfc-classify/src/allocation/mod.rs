//! Aggregation of classified positions.
//!
//! - [`filter`] - template rows and country-group matching
//! - [`matrix`] - first-match allocation matrix and single-cell queries
//! - [`distribution`] - liquidity distribution

pub mod distribution;
pub mod filter;
pub mod matrix;

pub use distribution::{liquidity_distribution, LiquidityDistribution, LiquidityRow};
pub use filter::{country_group_matches, AssetTypeFilter, AttributePredicate, PositionAttributes};
pub use matrix::{
    allocate_classified, total_for_asset_type, total_for_country_and_asset_type,
    totals_by_country_group, AllocationCell, AllocationMatrix, AllocationRow, Unallocated,
    UnallocatedReason,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sfc_core::Identity;

use crate::batch::maybe_parallel_map;
use crate::classify::{
    average_rating_score, classify_asset_type, default_on_no_rating, is_investment_grade,
    ratings_applicable, resolve_country_code, to_country_group, ClassificationContext,
};
use crate::error::ClassifyResult;
use crate::types::{AssetType, FxTable, Position};

/// Rows and columns of the regulator's allocation template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportTemplate {
    /// Requested country groups, in column order.
    pub groups: Vec<String>,
    /// Asset-type rows, in priority order.
    pub rows: Vec<AssetTypeFilter>,
}

impl ReportTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(groups: Vec<String>, rows: Vec<AssetTypeFilter>) -> Self {
        Self { groups, rows }
    }

    /// True if any row tests the investment grade predicates.
    #[must_use]
    pub fn needs_rating(&self) -> bool {
        self.rows.iter().any(AssetTypeFilter::needs_rating)
    }
}

/// A position with everything the allocation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPosition {
    /// Index into the input positions.
    pub index: usize,
    /// Position identity.
    pub identity: Identity,
    /// Asset type.
    pub asset_type: AssetType,
    /// Country group, `None` for Cash and FX derivatives.
    pub country_group: Option<String>,
    /// Predicate attributes.
    pub attributes: PositionAttributes,
    /// Market value in reporting currency.
    pub value: Decimal,
}

/// Market value of a position converted into the reporting currency.
///
/// # Errors
///
/// `MissingField` for absent value or currency, FX errors from the table.
pub fn market_value_in_reporting(fx: &FxTable, position: &Position) -> ClassifyResult<Decimal> {
    fx.to_reporting(position.market_value()?, position.book_currency()?)
}

/// Classifies one position for allocation.
///
/// The rating is only computed when `with_rating` is set and ratings apply
/// to the asset type.
///
/// # Errors
///
/// Any asset-type, country, rating or FX error for the position.
pub fn classify_for_allocation(
    ctx: &ClassificationContext<'_>,
    fx: &FxTable,
    index: usize,
    position: &Position,
    with_rating: bool,
) -> ClassifyResult<ClassifiedPosition> {
    let identity = position.identity();
    let asset_type = classify_asset_type(ctx, position)?;
    let value = market_value_in_reporting(fx, position)?;

    let country_group = match resolve_country_code(ctx, position, &asset_type)? {
        Some(code) => Some(to_country_group(ctx, &identity, &code)?),
        None => None,
    };

    let investment_grade = if with_rating && ratings_applicable(&asset_type) {
        let score = average_rating_score(ctx, position, default_on_no_rating)?;
        Some(is_investment_grade(score, ctx.config))
    } else {
        None
    };

    let record = ctx.market_data.get(&identity);
    let attributes = PositionAttributes {
        investment_grade,
        financial: record.is_some_and(|r| r.is_financial()),
        sfc_authorized: record.is_some_and(|r| r.is_sfc_authorized()),
    };

    Ok(ClassifiedPosition {
        index,
        identity,
        asset_type,
        country_group,
        attributes,
        value,
    })
}

/// Classifies every position and builds the allocation matrix.
///
/// # Errors
///
/// `ReportingCurrencyMismatch` if the FX table does not convert into the
/// configured reporting currency, then the first classification error in
/// input order.
pub fn allocate(
    ctx: &ClassificationContext<'_>,
    fx: &FxTable,
    template: &ReportTemplate,
    positions: &[Position],
) -> ClassifyResult<AllocationMatrix> {
    fx.ensure_reporting_currency(ctx.config.reporting_currency)?;
    let with_rating = template.needs_rating();
    let classified = maybe_parallel_map(positions, ctx.config, |i, p| {
        classify_for_allocation(ctx, fx, i, p, with_rating)
    })
    .into_iter()
    .collect::<ClassifyResult<Vec<_>>>()?;

    Ok(allocate_classified(&template.rows, &template.groups, &classified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use crate::reference::ReferenceDataStore;
    use crate::types::{
        ClassifyConfig, LedgerPosition, MarketDataRecord, MarketDataSet, RatingAgency,
    };
    use rust_decimal_macros::dec;
    use sfc_core::{Currency, Date};

    fn fx() -> FxTable {
        FxTable::new(Date::from_ymd(2020, 4, 29).unwrap(), Currency::USD)
            .with_rate(Currency::HKD, dec!(7.75))
    }

    fn reference() -> ReferenceDataStore {
        ReferenceDataStore::new()
            .with_country_group("HK", "China - Hong Kong")
            .with_country_group("CN", "China - Mainland")
            .with_rating_score(RatingAgency::SP, "A", 15)
            .with_rating_score(RatingAgency::SP, "BB", 10)
    }

    fn market_data() -> MarketDataSet {
        MarketDataSet::new()
            .with_record(
                MarketDataRecord::new("XS0000000001")
                    .with_market_sector("Corp")
                    .with_country_of_risk("CN")
                    .with_industry_sector("Financial")
                    .with_rating(RatingAgency::SP, "A"),
            )
            .with_record(
                MarketDataRecord::new("XS0000000002")
                    .with_market_sector("Corp")
                    .with_country_of_risk("HK")
                    .with_rating(RatingAgency::SP, "BB"),
            )
    }

    fn bond(isin: &str, mv: Decimal) -> Position {
        LedgerPosition::new("12229", isin, "Corporate Bond")
            .with_market_value(mv, dec!(0))
            .with_currency(Currency::USD)
            .into()
    }

    #[test]
    fn test_classify_for_allocation() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let position = bond("XS0000000001", dec!(100));
        let c = classify_for_allocation(&ctx, &fx(), 7, &position, true).unwrap();
        assert_eq!(c.index, 7);
        assert_eq!(c.asset_type, AssetType::corporate_bond());
        assert_eq!(c.country_group.as_deref(), Some("China - Mainland"));
        assert_eq!(c.attributes.investment_grade, Some(true));
        assert!(c.attributes.financial);

        let c = classify_for_allocation(&ctx, &fx(), 0, &position, false).unwrap();
        assert_eq!(c.attributes.investment_grade, None);
    }

    #[test]
    fn test_allocate_with_predicates() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let template = ReportTemplate::new(
            vec!["China - Hong Kong".into(), "China - Mainland".into()],
            vec![
                AssetTypeFilter::parse(["Fixed Income", "Corporate", "Investment Grade"]).unwrap(),
                AssetTypeFilter::parse(["Fixed Income", "Corporate", "Non-investment grade"])
                    .unwrap(),
            ],
        );
        let cash: Position = LedgerPosition::new("12229", "HKD", "Cash and Equivalents")
            .with_market_value(dec!(775), dec!(0))
            .with_currency(Currency::HKD)
            .into();
        let positions = vec![bond("XS0000000001", dec!(100)), bond("XS0000000002", dec!(40)), cash];

        let matrix = allocate(&ctx, &fx(), &template, &positions).unwrap();
        assert_eq!(matrix.cell_total(0, 1), dec!(100));
        assert_eq!(matrix.cell_total(1, 0), dec!(40));
        assert_eq!(matrix.excluded().total, dec!(100));
        assert_eq!(matrix.grand_total(), dec!(240));
    }

    #[test]
    fn test_allocate_fails_loud() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let template = ReportTemplate::new(
            vec!["China".into()],
            vec![AssetTypeFilter::parse(["Fixed Income"]).unwrap()],
        );
        let positions = vec![bond("XS0000000001", dec!(100)), bond("XS9999999999", dec!(1))];
        assert!(matches!(
            allocate(&ctx, &fx(), &template, &positions),
            Err(ClassifyError::MissingMarketData { .. })
        ));
    }

    #[test]
    fn test_allocate_rejects_fx_in_other_currency() {
        let (reference, md) = (reference(), market_data());
        let config = ClassifyConfig::default().with_reporting_currency(Currency::HKD);
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let template = ReportTemplate::new(
            vec!["China".into()],
            vec![AssetTypeFilter::parse(["Fixed Income"]).unwrap()],
        );
        let positions = vec![bond("XS0000000001", dec!(100))];
        assert!(matches!(
            allocate(&ctx, &fx(), &template, &positions),
            Err(ClassifyError::ReportingCurrencyMismatch { .. })
        ));
    }
}
