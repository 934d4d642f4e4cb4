//! Ledger row normalizer: group by account, pivot cost centers into columns

use rust_decimal::Decimal;
use std::collections::btree_map::Entry;
use std::collections::{BTreeSet, HashMap};
use tbrollup_config::{DuplicatePolicy, RollupConfig};

use crate::models::{GroupedAccountRow, LedgerRow, PivotTable};

/// Normalizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    /// Literal stripped from the front of cost center labels
    pub cost_center_prefix: String,
    /// What to do with a repeated (account, cost center) cell
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&RollupConfig::default())
    }
}

impl From<&RollupConfig> for NormalizeOptions {
    fn from(config: &RollupConfig) -> Self {
        Self {
            cost_center_prefix: config.cost_center_prefix.clone(),
            duplicate_policy: config.duplicate_policy,
        }
    }
}

/// Pivot column key for a raw cost center label.
///
/// `"CC -North"` and `" CC - North "` both become `"North"`.
pub fn cost_center_key(label: &str, prefix: &str) -> String {
    let trimmed = label.trim();
    let stripped = if prefix.is_empty() {
        trimmed
    } else {
        trimmed.strip_prefix(prefix).unwrap_or(trimmed)
    };
    stripped.trim().to_string()
}

/// Group rows by (account code, account name) and pivot closing balances by
/// cost center.
///
/// Groups keep the order in which each account first appears; cost center
/// columns are sorted.
pub fn normalize(rows: &[LedgerRow], options: &NormalizeOptions) -> PivotTable {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<GroupedAccountRow> = Vec::new();
    let mut cost_centers: BTreeSet<String> = BTreeSet::new();
    let mut duplicate_cells = 0;

    for row in rows {
        let code = row.account_code.trim();
        let name = row.account_name.trim();
        let key = cost_center_key(&row.cost_center, &options.cost_center_prefix);
        cost_centers.insert(key.clone());

        let slot = *index
            .entry((code.to_string(), name.to_string()))
            .or_insert_with(|| {
                groups.push(GroupedAccountRow::new(code, name, &row.title_flag));
                groups.len() - 1
            });

        match groups[slot].balances.entry(key) {
            Entry::Vacant(cell) => {
                cell.insert(row.closing_balance);
            }
            Entry::Occupied(mut cell) => {
                duplicate_cells += 1;
                log::warn!(
                    "Duplicate cell for account {} / cost center '{}' ({} then {}), applying {} policy",
                    code,
                    cell.key(),
                    cell.get(),
                    row.closing_balance,
                    options.duplicate_policy
                );
                match options.duplicate_policy {
                    DuplicatePolicy::Overwrite => {
                        cell.insert(row.closing_balance);
                    }
                    DuplicatePolicy::Sum => {
                        let value = cell.get_mut();
                        *value = value.saturating_add(row.closing_balance);
                    }
                }
            }
        }
    }

    for group in &mut groups {
        group.total = group
            .balances
            .values()
            .fold(Decimal::ZERO, |sum, value| sum.saturating_add(*value));
    }

    log::debug!(
        "Normalized {} rows into {} accounts across {} cost centers",
        rows.len(),
        groups.len(),
        cost_centers.len()
    );

    PivotTable {
        cost_centers: cost_centers.into_iter().collect(),
        groups,
        duplicate_cells,
    }
}
