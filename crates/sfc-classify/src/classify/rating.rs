//! Aggregate credit rating score.
//!
//! Each agency rating maps to a score through the rating table. Zero means
//! "no rating". The non-zero scores are combined as:
//!
//! | non-zero scores | aggregate |
//! |---|---|
//! | 0 | `on_no_rating(position)` |
//! | 1 | that score |
//! | 2 | the lower score |
//! | 3 | the median |

use sfc_core::Identity;
use tracing::warn;

use super::ClassificationContext;
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{ClassifyConfig, MarketDataRecord, Position, RatingAgency};

/// Strips credit-watch suffixes such as `" *+"` or `" *-"`.
fn strip_watch(rating: &str) -> &str {
    match rating.find(" *") {
        Some(idx) => rating[..idx].trim_end(),
        None => rating,
    }
}

/// Per-agency scores in S&P, Moody's, Fitch order. Unavailable ratings
/// score 0.
///
/// # Errors
///
/// `UnknownRating` for a rating string that is neither a sentinel nor in
/// the rating table.
pub fn agency_scores(
    ctx: &ClassificationContext<'_>,
    identity: &Identity,
    record: &MarketDataRecord,
) -> ClassifyResult<[u32; 3]> {
    let mut scores = [0u32; 3];
    for (slot, agency) in scores.iter_mut().zip(RatingAgency::ALL) {
        let Some(raw) = record.rating(agency) else {
            continue;
        };
        if ctx.config.is_rating_unavailable(raw) {
            continue;
        }
        let rating = strip_watch(raw.trim());
        *slot = ctx
            .reference
            .rating_score(agency, rating)
            .ok_or_else(|| ClassifyError::UnknownRating {
                identity: identity.clone(),
                agency: agency.to_string(),
                rating: raw.to_string(),
            })?;
    }
    Ok(scores)
}

/// Combines agency scores; `None` when every score is zero.
///
/// # Example
///
/// ```rust
/// use sfc_classify::classify::aggregate_scores;
///
/// assert_eq!(aggregate_scores(&[11, 0, 13]), Some(11));
/// assert_eq!(aggregate_scores(&[11, 13, 15]), Some(13));
/// assert_eq!(aggregate_scores(&[0, 0, 0]), None);
/// ```
#[must_use]
pub fn aggregate_scores(scores: &[u32]) -> Option<u32> {
    let mut nonzero: Vec<u32> = scores.iter().copied().filter(|&s| s > 0).collect();
    nonzero.sort_unstable();
    match nonzero.len() {
        0 => None,
        1 | 2 => nonzero.first().copied(),
        n => nonzero.get(n / 2).copied(),
    }
}

/// Default `on_no_rating` hook: logs a warning and returns 0.
pub fn default_on_no_rating(position: &Position) -> u32 {
    warn!(identity = %position.identity(), "no agency rating available, using score 0");
    0
}

/// Aggregate rating score of a position.
///
/// # Errors
///
/// `MissingMarketData` without a market-data record, `UnknownRating` for an
/// unrecognized rating string.
pub fn average_rating_score<F>(
    ctx: &ClassificationContext<'_>,
    position: &Position,
    on_no_rating: F,
) -> ClassifyResult<u32>
where
    F: FnOnce(&Position) -> u32,
{
    let identity = position.identity();
    let record = ctx.market_data.require(&identity)?;
    let scores = agency_scores(ctx, &identity, record)?;
    Ok(aggregate_scores(&scores).unwrap_or_else(|| on_no_rating(position)))
}

/// Investment grade test against the configured threshold.
#[must_use]
pub fn is_investment_grade(score: u32, config: &ClassifyConfig) -> bool {
    score >= config.investment_grade_threshold
}
