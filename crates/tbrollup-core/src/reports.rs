//! Report structures handed to presenters

use chrono::{Datelike, Month, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{CategoryRollup, CategorySection, PivotRollup};
use crate::error::{CoreError, CoreResult};
use crate::models::LedgerRow;

/// Month number of the year-end adjustment period
pub const ADJUSTMENT_PERIOD: u32 = 13;

/// Reporting period (year and month, month 13 being the adjustment period)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    /// Create a period, rejecting months outside 1..=13
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        if !(1..=ADJUSTMENT_PERIOD).contains(&month) {
            return Err(CoreError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The current calendar month
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Month label: "January" .. "December", or "13th Period"
    pub fn month_label(&self) -> String {
        if self.month == ADJUSTMENT_PERIOD {
            return "13th Period".to_string();
        }
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| format!("Month {}", self.month))
    }

    pub fn is_adjustment_period(&self) -> bool {
        self.month == ADJUSTMENT_PERIOD
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month_label().to_uppercase(), self.year)
    }
}

/// Category trial balance: rows, section boundaries and totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub period: ReportPeriod,
    pub rows: Vec<LedgerRow>,
    pub sections: Vec<CategorySection>,
    pub rollup: CategoryRollup,
}

/// Cost center trial balance pivot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotReport {
    pub period: ReportPeriod,
    pub rollup: PivotRollup,
    /// Repeated (account, cost center) cells found while pivoting
    pub duplicate_cells: usize,
}
