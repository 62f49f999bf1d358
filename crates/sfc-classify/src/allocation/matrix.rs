//! Country-group x asset-type allocation matrix.
//!
//! Positions are partitioned in two first-match passes: by template row
//! (asset-type filter), then by requested country group. Every input
//! position ends up in exactly one of: a cell, the Cash/FX excluded set, or
//! the unallocated list with a reason.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::filter::{country_group_matches, AssetTypeFilter};
use super::ClassifiedPosition;

/// Why a classified position has no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnallocatedReason {
    /// No template row matches the asset type.
    NoAssetTypeMatch,
    /// The country group is not one of the requested columns.
    CountryGroupNotRequested,
}

/// A position left out of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unallocated {
    /// Index into the input positions.
    pub index: usize,
    /// Why it was left out.
    pub reason: UnallocatedReason,
    /// Value in reporting currency.
    pub value: Decimal,
}

/// One matrix cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationCell {
    /// Sum of reporting-currency values.
    pub total: Decimal,
    /// Indices of member positions.
    pub positions: Vec<usize>,
}

impl AllocationCell {
    fn add(&mut self, index: usize, value: Decimal) {
        self.total += value;
        self.positions.push(index);
    }
}

/// One template row with a cell per requested country group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// The row's filter.
    pub filter: AssetTypeFilter,
    /// Cells in country-group order.
    pub cells: Vec<AllocationCell>,
}

impl AllocationRow {
    /// Sum across the row.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cells.iter().map(|c| c.total).sum()
    }
}

/// Result of [`allocate_classified`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationMatrix {
    groups: Vec<String>,
    rows: Vec<AllocationRow>,
    excluded: AllocationCell,
    unallocated: Vec<Unallocated>,
}

impl AllocationMatrix {
    /// Requested country groups (columns).
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Rows in template order.
    #[must_use]
    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    /// Cell by row and column index.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&AllocationCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    /// Total of a cell; zero for an empty cell or out-of-range index.
    #[must_use]
    pub fn cell_total(&self, row: usize, column: usize) -> Decimal {
        self.cell(row, column).map_or(Decimal::ZERO, |c| c.total)
    }

    /// Sum down a country-group column.
    #[must_use]
    pub fn group_total(&self, column: usize) -> Decimal {
        self.rows
            .iter()
            .filter_map(|r| r.cells.get(column))
            .map(|c| c.total)
            .sum()
    }

    /// Sum over every cell.
    #[must_use]
    pub fn allocated_total(&self) -> Decimal {
        self.rows.iter().map(AllocationRow::total).sum()
    }

    /// Cash and FX derivative positions (no country).
    #[must_use]
    pub fn excluded(&self) -> &AllocationCell {
        &self.excluded
    }

    /// Positions with no cell.
    #[must_use]
    pub fn unallocated(&self) -> &[Unallocated] {
        &self.unallocated
    }

    /// Sum of unallocated values.
    #[must_use]
    pub fn unallocated_total(&self) -> Decimal {
        self.unallocated.iter().map(|u| u.value).sum()
    }

    /// Cells + excluded + unallocated; equals the total input value.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.allocated_total() + self.excluded.total + self.unallocated_total()
    }
}

/// Partitions classified positions into the matrix.
///
/// Cash and FX derivatives go to the excluded set. Other positions go to
/// the first row whose filter matches, then to the first requested group
/// their country group falls under.
#[must_use]
pub fn allocate_classified(
    filters: &[AssetTypeFilter],
    groups: &[String],
    positions: &[ClassifiedPosition],
) -> AllocationMatrix {
    let mut rows: Vec<AllocationRow> = filters
        .iter()
        .map(|filter| AllocationRow {
            filter: filter.clone(),
            cells: vec![AllocationCell::default(); groups.len()],
        })
        .collect();
    let mut excluded = AllocationCell::default();
    let mut unallocated = Vec::new();

    for position in positions {
        if position.asset_type.is_country_not_applicable() {
            excluded.add(position.index, position.value);
            continue;
        }

        let Some(row) = rows
            .iter_mut()
            .find(|r| r.filter.matches(&position.asset_type, &position.attributes))
        else {
            unallocated.push(Unallocated {
                index: position.index,
                reason: UnallocatedReason::NoAssetTypeMatch,
                value: position.value,
            });
            continue;
        };

        let column = position
            .country_group
            .as_deref()
            .and_then(|group| groups.iter().position(|g| country_group_matches(g, group)));
        match column {
            Some(column) => row.cells[column].add(position.index, position.value),
            None => unallocated.push(Unallocated {
                index: position.index,
                reason: UnallocatedReason::CountryGroupNotRequested,
                value: position.value,
            }),
        }
    }

    AllocationMatrix {
        groups: groups.to_vec(),
        rows,
        excluded,
        unallocated,
    }
}

// =============================================================================
// Single-cell queries
// =============================================================================

/// Sum over positions matching a filter, regardless of country.
#[must_use]
pub fn total_for_asset_type(positions: &[ClassifiedPosition], filter: &AssetTypeFilter) -> Decimal {
    positions
        .iter()
        .filter(|p| filter.matches(&p.asset_type, &p.attributes))
        .map(|p| p.value)
        .sum()
}

/// Sum over positions matching a filter whose country group falls under
/// `group`.
#[must_use]
pub fn total_for_country_and_asset_type(
    positions: &[ClassifiedPosition],
    group: &str,
    filter: &AssetTypeFilter,
) -> Decimal {
    positions
        .iter()
        .filter(|p| {
            p.country_group
                .as_deref()
                .is_some_and(|g| country_group_matches(group, g))
        })
        .filter(|p| filter.matches(&p.asset_type, &p.attributes))
        .map(|p| p.value)
        .sum()
}

/// Sum per country group, excluding Cash and FX derivatives.
#[must_use]
pub fn totals_by_country_group(positions: &[ClassifiedPosition]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for position in positions {
        if let Some(group) = &position.country_group {
            *totals.entry(group.clone()).or_insert(Decimal::ZERO) += position.value;
        }
    }
    totals
}
