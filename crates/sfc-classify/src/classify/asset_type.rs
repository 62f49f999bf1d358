//! Asset-type classification.
//!
//! Rules are tried top to bottom and the first match wins:
//!
//! 1. special-case override (exact portfolio row, then wildcard row)
//! 2. private security, raises
//! 3. cash
//! 4. FX forward
//! 5. money market
//! 6. repo, raises
//! 7. fund, by source fund kind
//! 8. everything else, by market sector

use sfc_core::Identity;
use tracing::debug;

use super::ClassificationContext;
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{labels, AssetType, FundKind, MarketDataRecord, Position, SourceKind};

/// Classifies a position into its asset type.
///
/// # Errors
///
/// - `PrivateSecurityUnsupported`, `RepoUnsupported` for rule gaps
/// - `UnmappedFund` for open-end funds missing from the fund table
/// - `MissingMarketData`, `UnclassifiableAssetType` from the market-sector rule
pub fn classify_asset_type(
    ctx: &ClassificationContext<'_>,
    position: &Position,
) -> ClassifyResult<AssetType> {
    let identity = position.identity();

    if let Some(asset_type) = ctx
        .reference
        .asset_type_override(&identity, position.portfolio_id())
    {
        debug!(
            %identity,
            %asset_type,
            portfolio = position.portfolio_id(),
            "asset type special case"
        );
        return Ok(asset_type.clone());
    }

    match position.source_kind(&ctx.config.private_security_marker) {
        SourceKind::Private => Err(ClassifyError::PrivateSecurityUnsupported { identity }),
        SourceKind::Cash => Ok(AssetType::cash()),
        SourceKind::FxForward => Ok(AssetType::fx_derivatives()),
        SourceKind::MoneyMarket => Ok(AssetType::cash_equivalents()),
        SourceKind::Repo => Err(ClassifyError::RepoUnsupported { identity }),
        SourceKind::Fund(kind) => fund_asset_type(ctx, &identity, kind),
        SourceKind::Other => {
            let record = ctx.market_data.require(&identity)?;
            asset_type_from_market_data(&identity, record)
        }
    }
}

fn fund_asset_type(
    ctx: &ClassificationContext<'_>,
    identity: &Identity,
    kind: FundKind,
) -> ClassifyResult<AssetType> {
    match kind {
        FundKind::ExchangeTraded => Ok(AssetType::exchange_traded_fund()),
        FundKind::RealEstateInvestmentTrust => Ok(AssetType::reit()),
        FundKind::OpenEnd => ctx
            .reference
            .fund_type(identity)
            .cloned()
            .ok_or_else(|| ClassifyError::UnmappedFund {
                identity: identity.clone(),
            }),
    }
}

/// Asset type from the market sector of a market-data record.
///
/// The capital contingent flag is checked before the Corp/Govt split.
///
/// # Errors
///
/// `MissingField` without a market sector, `UnclassifiableAssetType` for
/// sectors with no rule.
pub fn asset_type_from_market_data(
    identity: &Identity,
    record: &MarketDataRecord,
) -> ClassifyResult<AssetType> {
    let sector = record
        .market_sector
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| ClassifyError::missing_field(identity, "MARKET_SECTOR_DES"))?;

    match sector {
        "Equity" if record.is_exchange_active() => Ok(AssetType::listed_equity()),
        "Equity" => Ok(AssetType::unlisted_equity()),
        "Comdty" => Ok(AssetType::commodity_derivatives()),
        "Corp" | "Govt" if record.is_capital_contingent() => {
            Ok(AssetType::contingent_convertible())
        }
        "Corp" => Ok(AssetType::corporate_bond()),
        "Govt" => Ok(AssetType::government_bond()),
        other => Err(ClassifyError::unclassifiable(
            identity,
            format!("market sector '{other}'"),
        )),
    }
}

/// True when credit ratings apply to the asset type: fixed income other than
/// cash equivalents, credit derivatives and asset-backed.
#[must_use]
pub fn ratings_applicable(asset_type: &AssetType) -> bool {
    asset_type.is_category(labels::FIXED_INCOME)
        && asset_type.subcategory().is_some_and(|sub| {
            ![
                labels::CASH_EQUIVALENTS,
                labels::CREDIT_DERIVATIVES,
                labels::ASSET_BACKED,
            ]
            .contains(&sub)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{AssetTypeOverride, ReferenceDataStore};
    use crate::types::{ClassifyConfig, LedgerPosition, MarketDataPosition, MarketDataSet};

    fn classify(
        reference: &ReferenceDataStore,
        market_data: &MarketDataSet,
        position: Position,
    ) -> ClassifyResult<AssetType> {
        let config = ClassifyConfig::default();
        let ctx = ClassificationContext::new(reference, market_data, &config);
        classify_asset_type(&ctx, &position)
    }

    #[test]
    fn test_listed_equity() {
        let md = MarketDataSet::new().with_record(
            MarketDataRecord::new("1299 HK Equity")
                .with_market_sector("Equity")
                .with_exchange_status("ACTV"),
        );
        let p = LedgerPosition::new("12229", "1299 HK", "Common Stock").into();
        assert_eq!(
            classify(&ReferenceDataStore::new(), &md, p).unwrap(),
            AssetType::listed_equity()
        );
    }

    #[test]
    fn test_unlisted_equity() {
        let md = MarketDataSet::new().with_record(
            MarketDataRecord::new("8 HK Equity")
                .with_market_sector("Equity")
                .with_exchange_status("DLST"),
        );
        let p = MarketDataPosition::new("40006", "8 HK", "Equity").into();
        assert_eq!(
            classify(&ReferenceDataStore::new(), &md, p).unwrap(),
            AssetType::unlisted_equity()
        );
    }

    #[test]
    fn test_coco_beats_corp() {
        let md = MarketDataSet::new().with_record(
            MarketDataRecord::new("XS2125922349")
                .with_market_sector("Corp")
                .with_capital_contingent(true),
        );
        let p = LedgerPosition::new("12229", "XS2125922349", "Corporate Bond").into();
        let at = classify(&ReferenceDataStore::new(), &md, p).unwrap();
        assert_eq!(at, AssetType::contingent_convertible());
        assert_ne!(at, AssetType::corporate_bond());
    }

    #[test]
    fn test_corp_govt_comdty() {
        let md = MarketDataSet::new()
            .with_record(MarketDataRecord::new("XS0000000001").with_market_sector("Corp"))
            .with_record(MarketDataRecord::new("US912828YK08").with_market_sector("Govt"))
            .with_record(MarketDataRecord::new("HK0000000003").with_market_sector("Mtge"));
        let reference = ReferenceDataStore::new();
        let bond = |isin: &str| {
            Position::from(MarketDataPosition::new("40006", "bond", "Fixed Income").with_isin(isin))
        };
        assert_eq!(
            classify(&reference, &md, bond("XS0000000001")).unwrap(),
            AssetType::corporate_bond()
        );
        assert_eq!(
            classify(&reference, &md, bond("US912828YK08")).unwrap(),
            AssetType::government_bond()
        );
        assert!(matches!(
            classify(&reference, &md, bond("HK0000000003")),
            Err(ClassifyError::UnclassifiableAssetType { .. })
        ));
        assert!(matches!(
            classify(&reference, &md, bond("XS9999999999")),
            Err(ClassifyError::MissingMarketData { .. })
        ));

        let comdty = MarketDataRecord::new("GC1 Comdty").with_market_sector("Comdty");
        assert_eq!(
            asset_type_from_market_data(&Identity::ticker("GC1 Comdty"), &comdty).unwrap(),
            AssetType::commodity_derivatives()
        );
    }

    #[test]
    fn test_structural_kinds() {
        let md = MarketDataSet::new();
        let reference = ReferenceDataStore::new();
        let ledger = |sort_key: &str| Position::from(LedgerPosition::new("1", "X", sort_key));
        assert_eq!(
            classify(&reference, &md, ledger("Cash and Equivalents")).unwrap(),
            AssetType::cash()
        );
        assert_eq!(
            classify(&reference, &md, ledger("FX Forward")).unwrap(),
            AssetType::fx_derivatives()
        );
        assert_eq!(
            classify(&reference, &md, ledger("Fixed Deposit")).unwrap(),
            AssetType::cash_equivalents()
        );
        assert!(matches!(
            classify(&reference, &md, MarketDataPosition::new("1", "R", "Repo Liability").into()),
            Err(ClassifyError::RepoUnsupported { .. })
        ));
        assert!(matches!(
            classify(
                &reference,
                &md,
                LedgerPosition::new("1", "X", "Corporate Bond")
                    .with_description("*Private Note")
                    .into()
            ),
            Err(ClassifyError::PrivateSecurityUnsupported { .. })
        ));
    }

    #[test]
    fn test_funds() {
        let reference = ReferenceDataStore::new().with_fund_type(
            "CLFLDIF HK Equity",
            AssetType::new(["Fund", "Bond Fund"]).unwrap(),
        );
        let md = MarketDataSet::new();
        let etf = LedgerPosition::new("1", "2800 HK", "Exchange Trade Fund").into();
        assert_eq!(
            classify(&reference, &md, etf).unwrap(),
            AssetType::exchange_traded_fund()
        );
        let reit = LedgerPosition::new("1", "823 HK", "Real Estate Investment Trust").into();
        assert_eq!(classify(&reference, &md, reit).unwrap(), AssetType::reit());
        assert_eq!(
            classify(&reference, &md, MarketDataPosition::new("1", "CLFLDIF HK", "Equity").into())
                .unwrap_err(),
            ClassifyError::MissingMarketData {
                identity: Identity::ticker("CLFLDIF HK Equity")
            }
        );
        let unmapped = LedgerPosition::new("1", "XYZ", "Open-End Fund").into();
        assert!(matches!(
            classify(&reference, &md, unmapped),
            Err(ClassifyError::UnmappedFund { .. })
        ));
    }

    #[test]
    fn test_special_case_precedes_rules() {
        let reference = ReferenceDataStore::new().with_asset_type_override(
            AssetTypeOverride::new("823 HK Equity", AssetType::listed_equity())
                .for_portfolio("19437"),
        );
        let md = MarketDataSet::new();
        let reit = |portfolio: &str| {
            Position::from(LedgerPosition::new(portfolio, "823 HK", "Real Estate Investment Trust"))
        };
        assert_eq!(
            classify(&reference, &md, reit("19437")).unwrap(),
            AssetType::listed_equity()
        );
        assert_eq!(classify(&reference, &md, reit("12229")).unwrap(), AssetType::reit());
    }

    #[test]
    fn test_ratings_applicable() {
        assert!(ratings_applicable(&AssetType::corporate_bond()));
        assert!(ratings_applicable(&AssetType::contingent_convertible()));
        assert!(!ratings_applicable(&AssetType::cash_equivalents()));
        assert!(!ratings_applicable(&AssetType::fixed_income()));
        assert!(!ratings_applicable(&AssetType::listed_equity()));
        assert!(!ratings_applicable(
            &AssetType::new(["Fixed Income", "Asset-Backed"]).unwrap()
        ));
    }
}
