//! Liquidity categorization.
//!
//! Rules, in order:
//!
//! 1. Cash-type asset or zero quantity: L0.
//! 2. Liquidity special case: three-factor score.
//! 3. Otherwise: LQA time to cash.
//!
//! The three-factor score adds a maturity, a rating and a concentration
//! score (each 1 to 4) and maps the sum: `>= 12` L0, `>= 9` L1, `>= 6` L2,
//! else L3.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sfc_core::Date;
use tracing::debug;

use super::{average_rating_score, classify_asset_type, default_on_no_rating, ClassificationContext};
use crate::error::{ClassifyError, ClassifyResult};
use crate::reference::LiquiditySpecialCase;
use crate::types::{LiquidityCategory, LqaDataSet, Position};

/// Liquidity category of a position on a reporting date.
///
/// # Errors
///
/// - any asset-type error
/// - `MissingField` without a quantity
/// - `MissingLiquidityData` when no LQA time to cash is available
pub fn liquidity_category(
    ctx: &ClassificationContext<'_>,
    lqa: &LqaDataSet,
    date: Date,
    position: &Position,
) -> ClassifyResult<LiquidityCategory> {
    let asset_type = classify_asset_type(ctx, position)?;
    if asset_type.is_cash_type() || position.quantity()?.is_zero() {
        return Ok(LiquidityCategory::L0);
    }

    let identity = position.identity();
    if let Some(special) = ctx.reference.liquidity_special_case(&identity) {
        return special_case_category(ctx, date, position, special);
    }

    lqa.time_to_cash(&identity)
        .map(LiquidityCategory::from_time_to_cash)
        .ok_or(ClassifyError::MissingLiquidityData { identity })
}

/// Three-factor category for a bond without LQA coverage.
///
/// # Errors
///
/// Maturity and amount outstanding come from the special-case entry, or from
/// the market-data record where the entry leaves them blank.
///
/// # Errors
///
/// Rating errors from [`average_rating_score`], `MissingField` without a
/// quantity, without issue details in either source, or with a non-positive
/// amount outstanding.
pub fn special_case_category(
    ctx: &ClassificationContext<'_>,
    date: Date,
    position: &Position,
    special: &LiquiditySpecialCase,
) -> ClassifyResult<LiquidityCategory> {
    let identity = position.identity();
    let record = ctx.market_data.get(&identity);

    let maturity_date = special
        .maturity
        .or_else(|| record.and_then(|r| r.maturity))
        .ok_or_else(|| ClassifyError::missing_field(&identity, "CALC_MATURITY"))?;
    let amount_outstanding = special
        .amount_outstanding
        .or_else(|| record.and_then(|r| r.amount_outstanding))
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or_else(|| ClassifyError::missing_field(&identity, "AMT_OUTSTANDING"))?;

    let maturity = maturity_score(date, maturity_date);
    let rating = rating_factor_score(average_rating_score(ctx, position, default_on_no_rating)?);
    let concentration = concentration_score(position.quantity()?, amount_outstanding);
    let total = maturity + rating + concentration;

    debug!(
        %identity,
        maturity,
        rating,
        concentration,
        total,
        "liquidity special case scored"
    );
    Ok(LiquidityCategory::from_special_case_score(total))
}

/// Maturity score from whole years to maturity (days / 365, floored):
/// `< 1` 4, `< 3` 3, `< 5` 2, else 1.
#[must_use]
pub fn maturity_score(date: Date, maturity: Date) -> u32 {
    let years = date.days_between(&maturity).div_euclid(365);
    match years {
        y if y < 1 => 4,
        y if y < 3 => 3,
        y if y < 5 => 2,
        _ => 1,
    }
}

/// Rating score: `>= 15` 4, `>= 12` 3, `>= 6` 2, else 1.
#[must_use]
pub fn rating_factor_score(score: u32) -> u32 {
    match score {
        s if s >= 15 => 4,
        s if s >= 12 => 3,
        s if s >= 6 => 2,
        _ => 1,
    }
}

/// Concentration score from the holding as a percentage of the amount
/// outstanding: `< 5%` 4, `< 10%` 3, `< 20%` 2, else 1.
#[must_use]
pub fn concentration_score(quantity: Decimal, amount_outstanding: Decimal) -> u32 {
    // Overflow and a zero amount outstanding saturate to the lowest score.
    let percentage = quantity
        .checked_div(amount_outstanding)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|p| p.to_f64())
        .unwrap_or(f64::INFINITY);
    match percentage {
        p if p < 5.0 => 4,
        p if p < 10.0 => 3,
        p if p < 20.0 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceDataStore;
    use crate::types::{
        ClassifyConfig, LedgerPosition, LqaRecord, MarketDataRecord, MarketDataSet, RatingAgency,
    };
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_maturity_score() {
        let today = date(2020, 4, 29);
        assert_eq!(maturity_score(today, date(2020, 12, 31)), 4);
        assert_eq!(maturity_score(today, date(2021, 4, 29)), 3);
        assert_eq!(maturity_score(today, date(2023, 4, 28)), 3);
        assert_eq!(maturity_score(today, date(2024, 4, 29)), 2);
        assert_eq!(maturity_score(today, date(2030, 1, 1)), 1);
        assert_eq!(maturity_score(today, date(2019, 1, 1)), 4);
    }

    #[test]
    fn test_rating_factor_score() {
        assert_eq!(rating_factor_score(15), 4);
        assert_eq!(rating_factor_score(14), 3);
        assert_eq!(rating_factor_score(12), 3);
        assert_eq!(rating_factor_score(6), 2);
        assert_eq!(rating_factor_score(5), 1);
        assert_eq!(rating_factor_score(0), 1);
    }

    #[test]
    fn test_concentration_score() {
        assert_eq!(concentration_score(dec!(4), dec!(100)), 4);
        assert_eq!(concentration_score(dec!(5), dec!(100)), 3);
        assert_eq!(concentration_score(dec!(10), dec!(100)), 2);
        assert_eq!(concentration_score(dec!(20), dec!(100)), 1);
        assert_eq!(concentration_score(dec!(1), dec!(0)), 1);
        assert_eq!(concentration_score(Decimal::MAX, dec!(1)), 1);
        assert_eq!(concentration_score(Decimal::MAX, dec!(0.5)), 1);
    }

    struct Fixture {
        reference: ReferenceDataStore,
        market_data: MarketDataSet,
        lqa: LqaDataSet,
        config: ClassifyConfig,
    }

    fn fixture() -> Fixture {
        let reference = ReferenceDataStore::new()
            .with_rating_score(RatingAgency::SP, "A", 15)
            .with_liquidity_special_case(LiquiditySpecialCase::new(
                "XS0000000002",
                date(2021, 1, 31),
                dec!(100000000),
            ))
            .with_liquidity_special_case(LiquiditySpecialCase::from_market_data("XS0000000003"))
            .with_liquidity_special_case(LiquiditySpecialCase::from_market_data("XS0000000004"));
        let market_data = MarketDataSet::new()
            .with_record(
                MarketDataRecord::new("1299 HK Equity")
                    .with_market_sector("Equity")
                    .with_exchange_status("ACTV"),
            )
            .with_record(MarketDataRecord::new("XS0000000001").with_market_sector("Corp"))
            .with_record(
                MarketDataRecord::new("XS0000000002")
                    .with_market_sector("Corp")
                    .with_rating(RatingAgency::SP, "A"),
            )
            .with_record(
                MarketDataRecord::new("XS0000000003")
                    .with_market_sector("Corp")
                    .with_rating(RatingAgency::SP, "A")
                    .with_issue_details(date(2024, 4, 29), dec!(100000000)),
            )
            .with_record(
                MarketDataRecord::new("XS0000000004")
                    .with_market_sector("Corp")
                    .with_rating(RatingAgency::SP, "A"),
            );
        let lqa = LqaDataSet::new()
            .with_record(LqaRecord::new("1299 HK Equity", Some(4.0)))
            .with_record(LqaRecord::new("XS0000000001", None));
        Fixture {
            reference,
            market_data,
            lqa,
            config: ClassifyConfig::default(),
        }
    }

    #[test]
    fn test_lqa_lookup() {
        let f = fixture();
        let ctx = ClassificationContext::new(&f.reference, &f.market_data, &f.config);
        let p = LedgerPosition::new("1", "1299 HK", "Common Stock")
            .with_quantity(dec!(400))
            .into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &p).unwrap(),
            LiquidityCategory::L1
        );
    }

    #[test]
    fn test_cash_and_zero_quantity_are_l0() {
        let f = fixture();
        let ctx = ClassificationContext::new(&f.reference, &f.market_data, &f.config);
        let cash = LedgerPosition::new("1", "USD", "Cash and Equivalents").into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &cash).unwrap(),
            LiquidityCategory::L0
        );
        let flat = LedgerPosition::new("1", "XS0000000001", "Corporate Bond")
            .with_quantity(Decimal::ZERO)
            .into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &flat).unwrap(),
            LiquidityCategory::L0
        );
    }

    #[test]
    fn test_missing_lqa_raises() {
        let f = fixture();
        let ctx = ClassificationContext::new(&f.reference, &f.market_data, &f.config);
        let p = LedgerPosition::new("1", "XS0000000001", "Corporate Bond")
            .with_quantity(dec!(1000000))
            .into();
        assert!(matches!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &p),
            Err(ClassifyError::MissingLiquidityData { .. })
        ));
    }

    #[test]
    fn test_special_case_three_factor() {
        let f = fixture();
        let ctx = ClassificationContext::new(&f.reference, &f.market_data, &f.config);
        // < 1 year (4) + rating 15 (4) + 2% of issue (4) = 12
        let small = LedgerPosition::new("1", "XS0000000002", "Corporate Bond")
            .with_quantity(dec!(2000000))
            .into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &small).unwrap(),
            LiquidityCategory::L0
        );
        // 4 + 4 + 25% of issue (1) = 9
        let large = LedgerPosition::new("1", "XS0000000002", "Corporate Bond")
            .with_quantity(dec!(25000000))
            .into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &large).unwrap(),
            LiquidityCategory::L1
        );
    }

    #[test]
    fn test_special_case_issue_details_from_market_data() {
        let f = fixture();
        let ctx = ClassificationContext::new(&f.reference, &f.market_data, &f.config);
        // 4 years (2) + rating 15 (4) + 2% of issue (4) = 10
        let p = LedgerPosition::new("1", "XS0000000003", "Corporate Bond")
            .with_quantity(dec!(2000000))
            .into();
        assert_eq!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &p).unwrap(),
            LiquidityCategory::L1
        );

        let bare = LedgerPosition::new("1", "XS0000000004", "Corporate Bond")
            .with_quantity(dec!(2000000))
            .into();
        assert!(matches!(
            liquidity_category(&ctx, &f.lqa, date(2020, 4, 29), &bare),
            Err(ClassifyError::MissingField { ref field, .. }) if field == "CALC_MATURITY"
        ));
    }
}
