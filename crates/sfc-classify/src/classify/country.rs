//! Country code and country group resolution.
//!
//! The field used depends on the asset type: equities use the country of
//! issue, fixed income the country of risk, and commodities, funds and
//! "Others" go through the per-identity override table.

use sfc_core::Identity;

use super::{classify_asset_type, ClassificationContext};
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{labels, AssetType, Position, SourceKind};

/// Resolves the country code of a position whose asset type is known.
///
/// Returns `Ok(None)` for Cash and FX derivatives, which have no country.
/// Money-market instruments take the configured jurisdiction; every other
/// position follows the rule of its asset-type category.
///
/// # Errors
///
/// - `MissingCountryOverride` for Commodity / Fund / Others without a table entry
/// - `MissingMarketData`, `MissingField` for equities and fixed income
/// - `UnclassifiableAssetType` for a category with no country rule
pub fn resolve_country_code(
    ctx: &ClassificationContext<'_>,
    position: &Position,
    asset_type: &AssetType,
) -> ClassifyResult<Option<String>> {
    if asset_type.is_country_not_applicable() {
        return Ok(None);
    }

    if position.source_kind(&ctx.config.private_security_marker) == SourceKind::MoneyMarket {
        return Ok(Some(ctx.config.money_market_country.clone()));
    }

    // Private securities and repos only get an asset type through a special
    // case override; the overridden category picks the country field.
    let identity = position.identity();

    let code = match asset_type.category() {
        Some(labels::COMMODITY | labels::FUND | labels::OTHERS) => ctx
            .reference
            .country_override(&identity)
            .map(str::to_string)
            .ok_or(ClassifyError::MissingCountryOverride {
                identity: identity.clone(),
            })?,
        Some(labels::EQUITY) => {
            let record = ctx.market_data.require(&identity)?;
            required_field(&identity, record.country_of_issue.as_deref(), "CNTRY_ISSUE_ISO")?
        }
        Some(labels::FIXED_INCOME) => {
            let record = ctx.market_data.require(&identity)?;
            required_field(&identity, record.country_of_risk.as_deref(), "CNTRY_OF_RISK")?
        }
        _ => {
            return Err(ClassifyError::unclassifiable(
                &identity,
                format!("no country rule for asset type {asset_type}"),
            ))
        }
    };
    Ok(Some(code))
}

fn required_field(identity: &Identity, value: Option<&str>, field: &str) -> ClassifyResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ClassifyError::missing_field(identity, field)),
    }
}

/// Resolves the country code of a position, classifying its asset type first.
///
/// # Errors
///
/// Any error from [`classify_asset_type`] or [`resolve_country_code`].
pub fn country_code(
    ctx: &ClassificationContext<'_>,
    position: &Position,
) -> ClassifyResult<Option<String>> {
    let asset_type = classify_asset_type(ctx, position)?;
    resolve_country_code(ctx, position, &asset_type)
}

/// Maps a country code to its country group.
///
/// # Errors
///
/// `UnsupportedCountryCode` if the code is not in the country table.
pub fn to_country_group(
    ctx: &ClassificationContext<'_>,
    identity: &Identity,
    code: &str,
) -> ClassifyResult<String> {
    ctx.reference
        .country_group(code)
        .map(str::to_string)
        .ok_or_else(|| ClassifyError::unsupported_country(identity, code))
}

/// Country group of a position, `None` for Cash and FX derivatives.
///
/// # Errors
///
/// Any error from [`country_code`] or [`to_country_group`].
pub fn country_group(
    ctx: &ClassificationContext<'_>,
    position: &Position,
) -> ClassifyResult<Option<String>> {
    match country_code(ctx, position)? {
        Some(code) => to_country_group(ctx, &position.identity(), &code).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{AssetTypeOverride, ReferenceDataStore};
    use crate::types::{
        ClassifyConfig, LedgerPosition, MarketDataPosition, MarketDataRecord, MarketDataSet,
    };

    fn reference() -> ReferenceDataStore {
        ReferenceDataStore::new()
            .with_country_group("HK", "China - Hong Kong")
            .with_country_group("CN", "China - Mainland")
            .with_country_group("US", "America - United States")
            .with_country_override("GC1 Comdty", "US")
    }

    fn market_data() -> MarketDataSet {
        MarketDataSet::new()
            .with_record(
                MarketDataRecord::new("1299 HK Equity")
                    .with_market_sector("Equity")
                    .with_exchange_status("ACTV")
                    .with_country_of_issue("HK")
                    .with_country_of_risk("CN"),
            )
            .with_record(
                MarketDataRecord::new("XS1684793018")
                    .with_market_sector("Corp")
                    .with_country_of_issue("KY")
                    .with_country_of_risk("CN"),
            )
            .with_record(MarketDataRecord::new("GC1 Comdty").with_market_sector("Comdty"))
            .with_record(MarketDataRecord::new("SI1 Comdty").with_market_sector("Comdty"))
            .with_record(
                MarketDataRecord::new("5 HK Equity")
                    .with_market_sector("Equity")
                    .with_country_of_issue("GB"),
            )
    }

    #[test]
    fn test_equity_uses_country_of_issue() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p = LedgerPosition::new("12229", "1299 HK", "Common Stock").into();
        assert_eq!(country_code(&ctx, &p).unwrap().as_deref(), Some("HK"));
        assert_eq!(
            country_group(&ctx, &p).unwrap().as_deref(),
            Some("China - Hong Kong")
        );
    }

    #[test]
    fn test_fixed_income_uses_country_of_risk() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p = LedgerPosition::new("12229", "XS1684793018", "Corporate Bond").into();
        assert_eq!(country_code(&ctx, &p).unwrap().as_deref(), Some("CN"));
    }

    #[test]
    fn test_commodity_override_table() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let gold = MarketDataPosition::new("40006", "GC1", "Commodity").with_isin("GC1 Comdty");
        assert_eq!(
            country_group(&ctx, &gold.into()).unwrap().as_deref(),
            Some("America - United States")
        );
        let silver = MarketDataPosition::new("40006", "SI1", "Commodity").with_isin("SI1 Comdty");
        assert!(matches!(
            country_code(&ctx, &silver.into()),
            Err(ClassifyError::MissingCountryOverride { .. })
        ));
    }

    #[test]
    fn test_cash_and_money_market() {
        let (reference, md) = (reference(), market_data());
        let config = ClassifyConfig::default().with_money_market_country("HK");
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let cash = LedgerPosition::new("1", "USD", "Cash and Equivalents").into();
        assert_eq!(country_group(&ctx, &cash).unwrap(), None);
        let deposit = LedgerPosition::new("1", "FD", "Fixed Deposit").into();
        assert_eq!(
            country_group(&ctx, &deposit).unwrap().as_deref(),
            Some("China - Hong Kong")
        );
    }

    #[test]
    fn test_unsupported_country() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p = LedgerPosition::new("1", "5 HK", "Common Stock").into();
        assert_eq!(
            country_group(&ctx, &p).unwrap_err(),
            ClassifyError::unsupported_country(&Identity::ticker("5 HK Equity"), "GB")
        );
    }

    #[test]
    fn test_missing_country_field() {
        let reference = reference();
        let md = MarketDataSet::new()
            .with_record(MarketDataRecord::new("XS0000000009").with_market_sector("Govt"));
        let config = ClassifyConfig::default();
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p = LedgerPosition::new("1", "XS0000000009", "Government Bond").into();
        assert!(matches!(
            country_code(&ctx, &p),
            Err(ClassifyError::MissingField { ref field, .. }) if field == "CNTRY_OF_RISK"
        ));
    }

    #[test]
    fn test_private_security_with_override_uses_category_rule() {
        let reference = reference().with_asset_type_override(AssetTypeOverride::new(
            "XS0000000009",
            AssetType::corporate_bond(),
        ));
        let md = MarketDataSet::new().with_record(
            MarketDataRecord::new("XS0000000009")
                .with_market_sector("Corp")
                .with_country_of_risk("HK"),
        );
        let config = ClassifyConfig::default();
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p: Position = LedgerPosition::new("12229", "XS0000000009", "Corporate Bond")
            .with_description("*Private Note")
            .into();

        assert_eq!(classify_asset_type(&ctx, &p).unwrap(), AssetType::corporate_bond());
        assert_eq!(
            country_group(&ctx, &p).unwrap().as_deref(),
            Some("China - Hong Kong")
        );
    }

    #[test]
    fn test_private_security_without_override_still_fails() {
        let (reference, md, config) = (reference(), market_data(), ClassifyConfig::default());
        let ctx = ClassificationContext::new(&reference, &md, &config);
        let p = LedgerPosition::new("12229", "XS0000000009", "Corporate Bond")
            .with_description("*Private Note")
            .into();
        assert!(matches!(
            country_group(&ctx, &p),
            Err(ClassifyError::PrivateSecurityUnsupported { .. })
        ));
    }
}
