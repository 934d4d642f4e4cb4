//! Core data models for the rollup engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tbrollup_parser::FeedRow;

use crate::classify::{classify, classify_with_flag};
use crate::types::Category;

/// Canonical ledger row, one per account and cost center for a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Account code; its first character decides the category
    pub account_code: String,
    /// Display name, possibly with trailing whitespace
    pub account_name: String,
    /// Explicit category hint from the backend ("A", "E", ...), may be empty
    pub title_flag: String,
    /// Raw cost center label, e.g. "CC -North"
    pub cost_center: String,
    pub opening_balance: Decimal,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub closing_balance: Decimal,
}

impl LedgerRow {
    /// Category under the account code prefix rule
    pub fn category(&self) -> Category {
        classify(&self.account_code)
    }

    /// Title flag, if the backend sent a non-blank one
    pub fn title_flag(&self) -> Option<&str> {
        let flag = self.title_flag.trim();
        if flag.is_empty() {
            None
        } else {
            Some(flag)
        }
    }
}

impl From<FeedRow> for LedgerRow {
    fn from(row: FeedRow) -> Self {
        if row.is_malformed() {
            log::warn!(
                "Feed row without account code (name '{}', cost center '{}'); amounts zeroed",
                row.account_name.trim(),
                row.cost_center.trim()
            );
            return LedgerRow {
                account_code: String::new(),
                account_name: row.account_name,
                title_flag: row.title_flag,
                cost_center: row.cost_center,
                ..Default::default()
            };
        }

        LedgerRow {
            account_code: row.account_code,
            account_name: row.account_name,
            title_flag: row.title_flag,
            cost_center: row.cost_center,
            opening_balance: row.opening_balance,
            debit_amount: row.debit_amount,
            credit_amount: row.credit_amount,
            closing_balance: row.closing_balance,
        }
    }
}

/// One account line of the cost center pivot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedAccountRow {
    pub account_code: String,
    pub account_name: String,
    /// Title flag of the first row seen for this account
    pub title_flag: String,
    /// Closing balance per cost center key
    pub balances: BTreeMap<String, Decimal>,
    /// Sum of `balances`
    pub total: Decimal,
}

impl GroupedAccountRow {
    pub fn new(account_code: &str, account_name: &str, title_flag: &str) -> Self {
        Self {
            account_code: account_code.to_string(),
            account_name: account_name.to_string(),
            title_flag: title_flag.to_string(),
            balances: BTreeMap::new(),
            total: Decimal::ZERO,
        }
    }

    /// Category under the pivot rule (title flag first, then numeric code)
    pub fn category(&self) -> Category {
        let flag = self.title_flag.trim();
        classify_with_flag(&self.account_code, (!flag.is_empty()).then_some(flag))
    }

    /// Balance for a cost center column, zero when the account has none
    pub fn balance(&self, cost_center: &str) -> Decimal {
        self.balances.get(cost_center).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Normalizer output: pivot columns and account lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Stripped cost center labels, sorted and unique
    pub cost_centers: Vec<String>,
    /// Account lines in order of first appearance
    pub groups: Vec<GroupedAccountRow>,
    /// Number of repeated (account, cost center) cells seen
    pub duplicate_cells: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_feed_row() {
        let feed = FeedRow {
            account_code: "A100".to_string(),
            account_name: "Cash ".to_string(),
            title_flag: "A".to_string(),
            cost_center: "CC -North".to_string(),
            closing_balance: Decimal::from(100),
            ..Default::default()
        };
        let row = LedgerRow::from(feed);
        assert_eq!(row.account_code, "A100");
        assert_eq!(row.category(), Category::Assets);
        assert_eq!(row.title_flag(), Some("A"));
        assert_eq!(row.closing_balance, Decimal::from(100));
    }

    #[test]
    fn test_malformed_feed_row_is_zeroed() {
        let feed = FeedRow {
            account_name: "Orphan".to_string(),
            closing_balance: Decimal::from(999),
            debit_amount: Decimal::from(5),
            ..Default::default()
        };
        let row = LedgerRow::from(feed);
        assert_eq!(row.category(), Category::Other);
        assert_eq!(row.closing_balance, Decimal::ZERO);
        assert_eq!(row.debit_amount, Decimal::ZERO);
        assert_eq!(row.account_name, "Orphan");
    }

    #[test]
    fn test_grouped_row_category_and_balance() {
        let mut group = GroupedAccountRow::new("4100", "Fuel", "");
        group.balances.insert("North".to_string(), Decimal::from(7));
        assert_eq!(group.category(), Category::Expenditure);
        assert_eq!(group.balance("North"), Decimal::from(7));
        assert_eq!(group.balance("South"), Decimal::ZERO);

        let flagged = GroupedAccountRow::new("9000", "Stores", "A");
        assert_eq!(flagged.category(), Category::Assets);
    }
}
