//! Template filters: asset-type rows and country-group columns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassifyError, ClassifyResult};
use crate::types::asset_type::MAX_DEPTH;
use crate::types::AssetType;

/// Cross-cutting attribute tested as a boolean filter instead of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributePredicate {
    /// Aggregate rating at or above the investment grade threshold.
    InvestmentGrade,
    /// Aggregate rating below the threshold.
    NonInvestmentGrade,
    /// Issuer industry sector is "Financial".
    Financial,
    /// Issuer industry sector is not "Financial".
    NonFinancial,
    /// Fund authorized by the SFC.
    SfcAuthorized,
    /// Fund not authorized by the SFC.
    NonSfcAuthorized,
}

impl AttributePredicate {
    /// Recognizes a template label as a predicate.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = normalize(label).replace('-', " ");
        let normalized = normalized.trim_end_matches('s');
        match normalized {
            "investment grade" => Some(Self::InvestmentGrade),
            "non investment grade" => Some(Self::NonInvestmentGrade),
            "financial" | "financial institution" => Some(Self::Financial),
            "non financial" | "non financial institution" => Some(Self::NonFinancial),
            "sfc authorized" | "sfc authorised" => Some(Self::SfcAuthorized),
            "non sfc authorized" | "non sfc authorised" => Some(Self::NonSfcAuthorized),
            _ => None,
        }
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn evaluate(self, attributes: &PositionAttributes) -> bool {
        match self {
            Self::InvestmentGrade => attributes.investment_grade == Some(true),
            Self::NonInvestmentGrade => attributes.investment_grade == Some(false),
            Self::Financial => attributes.financial,
            Self::NonFinancial => !attributes.financial,
            Self::SfcAuthorized => attributes.sfc_authorized,
            Self::NonSfcAuthorized => !attributes.sfc_authorized,
        }
    }
}

/// Attributes a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionAttributes {
    /// `None` when ratings do not apply to the asset type.
    pub investment_grade: Option<bool>,
    /// Issuer is a financial institution.
    pub financial: bool,
    /// SFC authorized fund.
    pub sfc_authorized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum FilterComponent {
    Label(String),
    Predicate(AttributePredicate),
}

/// Removes `(Note n)` annotations, trims and lowercases.
fn normalize(label: &str) -> String {
    let mut out = label.to_string();
    while let Some(start) = out.to_ascii_lowercase().find("(note") {
        match out[start..].find(')') {
            Some(len) => out.replace_range(start..=start + len, ""),
            None => out.truncate(start),
        }
    }
    out.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn labels_match(filter: &str, component: &str) -> bool {
    let component = normalize(component);
    component.starts_with(filter) || filter.starts_with(component.as_str())
}

/// One asset-type row of the report template.
///
/// Label components match the position's component at the same depth when
/// either (normalized) label is a prefix of the other. Predicate components
/// test position attributes instead.
///
/// # Example
///
/// ```rust
/// use sfc_classify::allocation::{AssetTypeFilter, PositionAttributes};
/// use sfc_classify::types::AssetType;
///
/// let row = AssetTypeFilter::parse(["Fixed Income", "Government / Municipal (Note 2)"]).unwrap();
/// let govt = AssetType::new(["Fixed Income", "Government"]).unwrap();
/// assert!(row.matches(&govt, &PositionAttributes::default()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTypeFilter {
    labels: Vec<String>,
    components: Vec<FilterComponent>,
}

impl AssetTypeFilter {
    /// Parses template cells. Blank cells are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidAssetType` if no cell is left or there are more than four.
    pub fn parse<I, S>(cells: I) -> ClassifyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = cells
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        if labels.is_empty() || labels.len() > MAX_DEPTH {
            return Err(ClassifyError::invalid_asset_type(
                labels.join(", "),
                format!("template row needs 1 to {MAX_DEPTH} cells"),
            ));
        }

        let components = labels
            .iter()
            .map(|label| match AttributePredicate::parse(label) {
                Some(p) => FilterComponent::Predicate(p),
                None => FilterComponent::Label(normalize(label)),
            })
            .collect();

        Ok(Self { labels, components })
    }

    /// Filter matching exactly an asset type's labels.
    #[must_use]
    pub fn from_asset_type(asset_type: &AssetType) -> Self {
        Self {
            labels: asset_type.components().to_vec(),
            components: asset_type
                .components()
                .iter()
                .map(|c| FilterComponent::Label(normalize(c)))
                .collect(),
        }
    }

    /// Template cells as given.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// True if any component is a rating predicate.
    #[must_use]
    pub fn needs_rating(&self) -> bool {
        self.components.iter().any(|c| {
            matches!(
                c,
                FilterComponent::Predicate(
                    AttributePredicate::InvestmentGrade | AttributePredicate::NonInvestmentGrade
                )
            )
        })
    }

    /// Tests a position's asset type and attributes against the row.
    #[must_use]
    pub fn matches(&self, asset_type: &AssetType, attributes: &PositionAttributes) -> bool {
        self.components
            .iter()
            .enumerate()
            .all(|(depth, component)| match component {
                FilterComponent::Predicate(p) => p.evaluate(attributes),
                FilterComponent::Label(label) => asset_type
                    .get(depth)
                    .is_some_and(|c| labels_match(label, c)),
            })
    }
}

impl fmt::Display for AssetTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(" | "))
    }
}

/// True when a position's country group falls under a requested group
/// (case-insensitive prefix).
#[must_use]
pub fn country_group_matches(requested: &str, group: &str) -> bool {
    let requested = requested.trim().to_lowercase();
    !requested.is_empty() && group.trim().to_lowercase().starts_with(&requested)
}
