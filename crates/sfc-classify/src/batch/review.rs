//! Batch classification with a manual review list, plus the pre-flight
//! checks run before building a report.

use serde::{Deserialize, Serialize};
use sfc_core::{Date, Identity};
use std::collections::HashSet;

use super::maybe_parallel_map;
use crate::classify::{
    average_rating_score, classify_asset_type, default_on_no_rating, liquidity_category,
    ratings_applicable, resolve_country_code, to_country_group, ClassificationContext,
};
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{AssetType, ClassifyConfig, LiquidityCategory, LqaDataSet, Position, SourceKind};

/// Full classification of one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionClassification {
    /// Index into the input positions.
    pub index: usize,
    /// Position identity.
    pub identity: Identity,
    /// Asset type.
    pub asset_type: AssetType,
    /// Country group, `None` for Cash and FX derivatives.
    pub country_group: Option<String>,
    /// Aggregate rating score, `None` when ratings do not apply.
    pub rating_score: Option<u32>,
    /// Liquidity bucket, `None` when liquidity was not requested.
    pub liquidity: Option<LiquidityCategory>,
}

/// A position that could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    /// Index into the input positions.
    pub index: usize,
    /// Position identity.
    pub identity: Identity,
    /// The failure.
    pub error: ClassifyError,
}

/// Result of [`classify_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchClassification {
    /// Positions classified successfully, in input order.
    pub classified: Vec<PositionClassification>,
    /// Positions that failed, in input order.
    pub needs_review: Vec<ReviewItem>,
}

impl BatchClassification {
    /// True if every position was classified.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.needs_review.is_empty()
    }

    /// Failures that point at bad source data rather than a rule gap.
    pub fn data_errors(&self) -> impl Iterator<Item = &ReviewItem> {
        self.needs_review
            .iter()
            .filter(|item| !item.error.is_manual_review())
    }
}

/// LQA inputs for liquidity categorization.
#[derive(Debug, Clone, Copy)]
pub struct LiquidityInputs<'a> {
    /// LQA time-to-cash records.
    pub lqa: &'a LqaDataSet,
    /// Reporting date.
    pub date: Date,
}

fn classify_one(
    ctx: &ClassificationContext<'_>,
    liquidity: Option<LiquidityInputs<'_>>,
    index: usize,
    position: &Position,
) -> ClassifyResult<PositionClassification> {
    let identity = position.identity();
    let asset_type = classify_asset_type(ctx, position)?;
    let country_group = match resolve_country_code(ctx, position, &asset_type)? {
        Some(code) => Some(to_country_group(ctx, &identity, &code)?),
        None => None,
    };
    let rating_score = if ratings_applicable(&asset_type) {
        Some(average_rating_score(ctx, position, default_on_no_rating)?)
    } else {
        None
    };
    let liquidity = match liquidity {
        Some(inputs) => Some(liquidity_category(ctx, inputs.lqa, inputs.date, position)?),
        None => None,
    };

    Ok(PositionClassification {
        index,
        identity,
        asset_type,
        country_group,
        rating_score,
        liquidity,
    })
}

/// Classifies every position, collecting failures instead of aborting.
#[must_use]
pub fn classify_batch(
    ctx: &ClassificationContext<'_>,
    liquidity: Option<LiquidityInputs<'_>>,
    positions: &[Position],
) -> BatchClassification {
    let results = maybe_parallel_map(positions, ctx.config, |i, p| {
        classify_one(ctx, liquidity, i, p).map_err(|error| ReviewItem {
            index: i,
            identity: p.identity(),
            error,
        })
    });

    let mut batch = BatchClassification::default();
    for result in results {
        match result {
            Ok(c) => batch.classified.push(c),
            Err(item) => batch.needs_review.push(item),
        }
    }
    batch
}

/// Distinct identities that need a market-data lookup, in first-seen
/// order. Private, cash, money-market, repo and FX forward positions are
/// skipped.
#[must_use]
pub fn lookup_identities(config: &ClassifyConfig, positions: &[Position]) -> Vec<Identity> {
    let mut seen = HashSet::new();
    positions
        .iter()
        .filter(|p| {
            !matches!(
                p.source_kind(&config.private_security_marker),
                SourceKind::Private
                    | SourceKind::Cash
                    | SourceKind::MoneyMarket
                    | SourceKind::Repo
                    | SourceKind::FxForward
            )
        })
        .map(Position::identity)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Distinct identities of rating-applicable positions with no usable
/// agency rating, in first-seen order.
///
/// # Errors
///
/// Asset-type and rating errors propagate.
pub fn securities_without_rating(
    ctx: &ClassificationContext<'_>,
    positions: &[Position],
) -> ClassifyResult<Vec<Identity>> {
    let mut missing = Vec::new();
    let mut seen = HashSet::new();
    for position in positions {
        if !ratings_applicable(&classify_asset_type(ctx, position)?) {
            continue;
        }
        let mut unrated = false;
        average_rating_score(ctx, position, |_| {
            unrated = true;
            0
        })?;
        let identity = position.identity();
        if unrated && seen.insert(identity.clone()) {
            missing.push(identity);
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceDataStore;
    use crate::types::{
        LedgerPosition, LqaRecord, MarketDataPosition, MarketDataRecord, MarketDataSet,
        RatingAgency,
    };
    use rust_decimal_macros::dec;

    fn reference() -> ReferenceDataStore {
        ReferenceDataStore::new()
            .with_country_group("HK", "China - Hong Kong")
            .with_rating_score(RatingAgency::Moody, "Baa1", 13)
    }

    fn market_data() -> MarketDataSet {
        MarketDataSet::new()
            .with_record(
                MarketDataRecord::new("1299 HK Equity")
                    .with_market_sector("Equity")
                    .with_exchange_status("ACTV")
                    .with_country_of_issue("HK"),
            )
            .with_record(
                MarketDataRecord::new("XS0000000001")
                    .with_market_sector("Corp")
                    .with_country_of_risk("HK")
                    .with_rating(RatingAgency::Moody, "Baa1"),
            )
            .with_record(
                MarketDataRecord::new("XS0000000002")
                    .with_market_sector("Corp")
                    .with_country_of_risk("HK")
                    .with_rating(RatingAgency::SP, "#N/A N/A"),
            )
    }

    fn positions() -> Vec<Position> {
        vec![
            LedgerPosition::new("12229", "1299 HK", "Common Stock")
                .with_quantity(dec!(100))
                .into(),
            LedgerPosition::new("12229", "XS0000000001", "Corporate Bond")
                .with_quantity(dec!(100))
                .into(),
            LedgerPosition::new("12229", "XS0000000002", "Corporate Bond")
                .with_quantity(dec!(100))
                .into(),
            LedgerPosition::new("12229", "USD", "Cash and Equivalents").into(),
            LedgerPosition::new("12229", "*ABC", "Corporate Bond")
                .with_description("*ABC private note")
                .into(),
            MarketDataPosition::new("40006", "1299 HK", "Equity").into(),
        ]
    }

    #[test]
    fn test_classify_batch_collects_failures() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::sequential());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let batch = classify_batch(&ctx, None, &positions());

        assert_eq!(batch.classified.len(), 5);
        assert_eq!(batch.needs_review.len(), 1);
        assert_eq!(batch.needs_review[0].index, 4);
        assert!(matches!(
            batch.needs_review[0].error,
            ClassifyError::PrivateSecurityUnsupported { .. }
        ));
        assert_eq!(batch.data_errors().count(), 0);
        assert!(!batch.is_complete());

        let bond = &batch.classified[1];
        assert_eq!(bond.rating_score, Some(13));
        assert_eq!(bond.country_group.as_deref(), Some("China - Hong Kong"));
        let cash = &batch.classified[3];
        assert_eq!(cash.country_group, None);
        assert_eq!(cash.rating_score, None);
        assert_eq!(cash.liquidity, None);
    }

    #[test]
    fn test_classify_batch_with_liquidity() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::sequential());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let lqa = LqaDataSet::new()
            .with_record(LqaRecord::new("1299 HK Equity", Some(1.0)))
            .with_record(LqaRecord::new("XS0000000001", Some(9.5)));
        let inputs = LiquidityInputs {
            lqa: &lqa,
            date: Date::from_ymd(2020, 4, 29).unwrap(),
        };
        let batch = classify_batch(&ctx, Some(inputs), &positions()[..3]);

        assert_eq!(batch.classified.len(), 2);
        assert_eq!(batch.classified[0].liquidity, Some(LiquidityCategory::L0));
        assert_eq!(batch.classified[1].liquidity, Some(LiquidityCategory::L2));
        assert!(matches!(
            batch.needs_review[0].error,
            ClassifyError::MissingLiquidityData { .. }
        ));
    }

    #[test]
    fn test_lookup_identities() {
        let ids = lookup_identities(&ClassifyConfig::default(), &positions());
        assert_eq!(
            ids,
            vec![
                Identity::ticker("1299 HK Equity"),
                Identity::isin("XS0000000001"),
                Identity::isin("XS0000000002"),
            ]
        );
    }

    #[test]
    fn test_securities_without_rating() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let without = securities_without_rating(&ctx, &positions()[..4]).unwrap();
        assert_eq!(without, vec![Identity::isin("XS0000000002")]);
    }
}
