//! Basic types for the rollup engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LedgerRow;

/// Account category
///
/// Ordering follows declaration order, which is also the order the
/// category report prints its sections in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Assets,
    Expenditure,
    Liabilities,
    Revenue,
    Other,
}

impl Category {
    /// Categories the category report always shows, even when empty
    pub const TRACKED: [Category; 4] = [
        Category::Assets,
        Category::Expenditure,
        Category::Liabilities,
        Category::Revenue,
    ];

    pub fn is_tracked(self) -> bool {
        self != Category::Other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Assets => "Assets",
            Category::Expenditure => "Expenditure",
            Category::Liabilities => "Liabilities",
            Category::Revenue => "Revenue",
            Category::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assets" | "asset" => Ok(Category::Assets),
            "expenditure" | "expenditures" => Ok(Category::Expenditure),
            "liabilities" | "liability" => Ok(Category::Liabilities),
            "revenue" | "revenues" => Ok(Category::Revenue),
            "other" => Ok(Category::Other),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opening/debit/credit/closing sums over a set of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub opening: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub closing: Decimal,
    pub count: usize,
}

impl Totals {
    /// Accumulate one ledger row
    pub fn add_row(&mut self, row: &LedgerRow) {
        accumulate(&mut self.opening, row.opening_balance);
        accumulate(&mut self.debit, row.debit_amount);
        accumulate(&mut self.credit, row.credit_amount);
        accumulate(&mut self.closing, row.closing_balance);
        self.count += 1;
    }

    /// Accumulate another set of totals
    pub fn merge(&mut self, other: &Totals) {
        accumulate(&mut self.opening, other.opening);
        accumulate(&mut self.debit, other.debit);
        accumulate(&mut self.credit, other.credit);
        accumulate(&mut self.closing, other.closing);
        self.count += other.count;
    }
}

/// Saturating in-place addition; totals never panic on overflow.
pub(crate) fn accumulate(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}
