//! Rollup aggregation
//!
//! Two report shapes are built from the same feed:
//!
//! * the category report sums opening/debit/credit/closing per category
//!   over the flat row list ([`aggregate_by_category`]);
//! * the cost center pivot sums each cost center column per bucket over the
//!   normalized account lines ([`aggregate_pivot`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tbrollup_config::RollupConfig;

use crate::models::{GroupedAccountRow, LedgerRow, PivotTable};
use crate::types::{accumulate, Category, Totals};

// ==================== Category Report ====================

/// Category report settings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryOptions {
    /// Count `Other` rows as their own category and in the grand totals
    pub include_other: bool,
}

impl From<&RollupConfig> for CategoryOptions {
    fn from(config: &RollupConfig) -> Self {
        Self {
            include_other: config.include_other,
        }
    }
}

/// Per-category and grand totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRollup {
    pub category_totals: BTreeMap<Category, Totals>,
    pub grand_totals: Totals,
    /// Rows left out because they classified as `Other`
    pub excluded_rows: usize,
}

impl CategoryRollup {
    pub fn totals_for(&self, category: Category) -> Option<&Totals> {
        self.category_totals.get(&category)
    }
}

/// Sum row amounts per category.
///
/// Assets, Expenditure, Liabilities and Revenue are always present, zeroed
/// when the feed has no rows for them. Rows classified `Other` contribute to
/// nothing unless `include_other` is set.
pub fn aggregate_by_category(rows: &[LedgerRow], options: &CategoryOptions) -> CategoryRollup {
    let mut category_totals: BTreeMap<Category, Totals> = Category::TRACKED
        .iter()
        .map(|category| (*category, Totals::default()))
        .collect();
    let mut excluded_rows = 0;

    for row in rows {
        let category = row.category();
        if !category.is_tracked() && !options.include_other {
            excluded_rows += 1;
            continue;
        }
        category_totals.entry(category).or_default().add_row(row);
    }

    if excluded_rows > 0 {
        log::debug!("{} rows outside the tracked categories left out of totals", excluded_rows);
    }

    let grand_totals = category_totals.values().fold(Totals::default(), |mut grand, totals| {
        grand.merge(totals);
        grand
    });

    CategoryRollup {
        category_totals,
        grand_totals,
        excluded_rows,
    }
}

/// A run of adjacent rows sharing one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    pub category: Category,
    /// Index of the first row; a category header goes before it
    pub start: usize,
    /// One past the last row; a category subtotal goes before it
    pub end: usize,
}

impl CategorySection {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split rows into maximal runs of equal category.
///
/// A header belongs wherever a row's category differs from the previous
/// row's, and a subtotal wherever it differs from the next row's. On input
/// that is not sorted by account code the same category can open more than
/// one section.
pub fn category_sections(rows: &[LedgerRow]) -> Vec<CategorySection> {
    let mut sections: Vec<CategorySection> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let category = row.category();
        match sections.last_mut() {
            Some(section) if section.category == category => section.end = index + 1,
            _ => sections.push(CategorySection {
                category,
                start: index,
                end: index + 1,
            }),
        }
    }

    sections
}

// ==================== Cost Center Pivot ====================

/// Bucket order of the pivot report
pub const PIVOT_BUCKETS: [Category; 3] = [Category::Assets, Category::Expenditure, Category::Other];

/// Account lines of one pivot bucket with their column sums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotBucket {
    pub category: Category,
    pub rows: Vec<GroupedAccountRow>,
    /// Sum per cost center column over `rows`
    pub column_totals: BTreeMap<String, Decimal>,
    /// Sum of the rows' totals
    pub total: Decimal,
}

impl PivotBucket {
    fn new(category: Category, cost_centers: &[String]) -> Self {
        Self {
            category,
            rows: Vec::new(),
            column_totals: zeroed_columns(cost_centers),
            total: Decimal::ZERO,
        }
    }

    fn push(&mut self, row: &GroupedAccountRow) {
        for (cost_center, balance) in &row.balances {
            accumulate(self.column_totals.entry(cost_center.clone()).or_default(), *balance);
        }
        accumulate(&mut self.total, row.total);
        self.rows.push(row.clone());
    }
}

/// Cost center pivot with bucket and grand totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRollup {
    pub cost_centers: Vec<String>,
    /// Assets, Expenditure, Other, always in that order
    pub buckets: Vec<PivotBucket>,
    /// Sum per cost center column over every bucket
    pub column_totals: BTreeMap<String, Decimal>,
    /// Sum of the bucket totals
    pub grand_total: Decimal,
}

impl PivotRollup {
    /// Account lines in report order
    pub fn groups(&self) -> impl Iterator<Item = &GroupedAccountRow> {
        self.buckets.iter().flat_map(|bucket| bucket.rows.iter())
    }

    pub fn bucket(&self, category: Category) -> Option<&PivotBucket> {
        self.buckets.iter().find(|bucket| bucket.category == category)
    }
}

fn zeroed_columns(cost_centers: &[String]) -> BTreeMap<String, Decimal> {
    cost_centers
        .iter()
        .map(|cost_center| (cost_center.clone(), Decimal::ZERO))
        .collect()
}

fn bucket_index(category: Category) -> usize {
    match category {
        Category::Assets => 0,
        Category::Expenditure => 1,
        _ => 2,
    }
}

/// Split normalized account lines into Assets, Expenditure and Other buckets
/// and total every cost center column.
///
/// Liabilities, Revenue and unclassified accounts all land in `Other`. Rows
/// keep their normalized order inside each bucket.
pub fn aggregate_pivot(table: &PivotTable) -> PivotRollup {
    let mut buckets: Vec<PivotBucket> = PIVOT_BUCKETS
        .iter()
        .map(|category| PivotBucket::new(*category, &table.cost_centers))
        .collect();

    for group in &table.groups {
        buckets[bucket_index(group.category())].push(group);
    }

    let mut column_totals = zeroed_columns(&table.cost_centers);
    let mut grand_total = Decimal::ZERO;
    for bucket in &buckets {
        for (cost_center, sum) in &bucket.column_totals {
            accumulate(column_totals.entry(cost_center.clone()).or_default(), *sum);
        }
        accumulate(&mut grand_total, bucket.total);
    }

    PivotRollup {
        cost_centers: table.cost_centers.clone(),
        buckets,
        column_totals,
        grand_total,
    }
}

// ==================== Tests ====================
