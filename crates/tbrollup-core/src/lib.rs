//! Trial balance classification, pivoting and rollups
//!
//! Data flow: feed rows → [`normalize`] (group + pivot) → [`aggregate_pivot`],
//! or feed rows → [`aggregate_by_category`] directly. Every result is
//! recomputed from the rows on demand; nothing is updated incrementally.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod models;
pub mod normalize;
pub mod reports;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;
use tbrollup_config::Config;
use tbrollup_parser::FeedParserTrait;

pub use aggregate::{
    aggregate_by_category, aggregate_pivot, category_sections, CategoryOptions, CategoryRollup,
    CategorySection, PivotBucket, PivotRollup, PIVOT_BUCKETS,
};
pub use classify::{classify, classify_with_flag};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{GroupedAccountRow, LedgerRow, PivotTable};
pub use normalize::{cost_center_key, normalize, NormalizeOptions};
pub use reports::{CategoryReport, PivotReport, ReportPeriod};
pub use types::{Category, Totals};

/// Parser reference type
pub type ParserRef = Arc<dyn FeedParserTrait>;

// ==================== Trial Balance ====================

/// A loaded trial balance and the reports built from it
pub struct TrialBalance {
    config: Config,
    parser: ParserRef,
    rows: Vec<LedgerRow>,
    source: Option<PathBuf>,
}

impl TrialBalance {
    pub fn new(config: Config, parser: ParserRef) -> Self {
        Self {
            config,
            parser,
            rows: Vec::new(),
            source: None,
        }
    }

    /// Load a feed file, replacing any rows loaded before
    pub async fn load(&mut self, path: PathBuf) -> Result<(), CoreError> {
        let display = path.display().to_string();
        let feed = self
            .parser
            .parse_file(path.clone())
            .await
            .map_err(|e| CoreError::from_parse(e, Some(&display)))?;

        self.set_rows(feed.into_iter().map(LedgerRow::from).collect());
        self.source = Some(path);
        log::info!("Loaded {} trial balance rows from {}", self.rows.len(), display);
        Ok(())
    }

    /// Load feed text, replacing any rows loaded before
    pub async fn load_str(&mut self, content: &str) -> Result<(), CoreError> {
        let feed = self.parser.parse(content).await?;
        self.set_rows(feed.into_iter().map(LedgerRow::from).collect());
        self.source = None;
        Ok(())
    }

    /// Re-read the file given to the last [`TrialBalance::load`]
    pub async fn reload(&mut self) -> Result<(), CoreError> {
        match self.source.clone() {
            Some(path) => self.load(path).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    /// Replace the rows with an already-canonical set
    pub fn set_rows(&mut self, mut rows: Vec<LedgerRow>) {
        if self.config.input.sort_by_account_code {
            rows.sort_by(|a, b| a.account_code.cmp(&b.account_code));
        }
        self.rows = rows;
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn category_rollup(&self) -> CategoryRollup {
        aggregate_by_category(&self.rows, &CategoryOptions::from(&self.config.rollup))
    }

    pub fn sections(&self) -> Vec<CategorySection> {
        category_sections(&self.rows)
    }

    pub fn pivot_table(&self) -> PivotTable {
        normalize(&self.rows, &NormalizeOptions::from(&self.config.rollup))
    }

    pub fn pivot_rollup(&self) -> PivotRollup {
        aggregate_pivot(&self.pivot_table())
    }

    /// Category report for a period
    pub fn category_report(&self, period: ReportPeriod) -> CategoryReport {
        CategoryReport {
            period,
            rows: self.rows.clone(),
            sections: self.sections(),
            rollup: self.category_rollup(),
        }
    }

    /// Cost center pivot report for a period
    pub fn pivot_report(&self, period: ReportPeriod) -> PivotReport {
        let table = self.pivot_table();
        PivotReport {
            period,
            rollup: aggregate_pivot(&table),
            duplicate_cells: table.duplicate_cells,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tbrollup_config::DuplicatePolicy;
    use tbrollup_parser::DefaultFeedParser;

    const COST_CENTER_FEED: &str = r#"[
        {"AcCd": "L100", "GlName": "Payables ", "TitleFlag": "", "OpSbal": -10, "DrSamt": 0, "CrSamt": 5, "ClSbal": -15, "CctName": "CC -North"},
        {"AcCd": "A100", "GlName": "Cash", "TitleFlag": "A", "OpSbal": 50, "DrSamt": 70, "CrSamt": 20, "ClSbal": 100, "CctName": "CC -North"},
        {"AcCd": "X900", "GlName": "Suspense", "TitleFlag": "", "OpSbal": 1, "DrSamt": 1, "CrSamt": 1, "ClSbal": 999, "CctName": "CC -North"},
        {"AcCd": "E200", "GlName": "Wages", "TitleFlag": "E", "OpSbal": 0, "DrSamt": 40, "CrSamt": 0, "ClSbal": -40, "CctName": "CC -North"}
    ]"#;

    const PROVINCIAL_FEED: &str = r#"{"data": [
        {"AccountCode": "1001", "AccountName": "Cash", "TitleFlag": "A", "CostCenter": "CC -North", "ClosingBalance": 100},
        {"AccountCode": "1001", "AccountName": "Cash", "TitleFlag": "A", "CostCenter": "CC -South", "ClosingBalance": 50},
        {"AccountCode": "4001", "AccountName": "Fuel", "TitleFlag": "E", "CostCenter": "CC -South", "ClosingBalance": 20},
        {"AccountCode": "2001", "AccountName": "Loans", "TitleFlag": "L", "CostCenter": "CC -North", "ClosingBalance": -60}
    ]}"#;

    fn trial_balance(config: Config) -> TrialBalance {
        TrialBalance::new(config, Arc::new(DefaultFeedParser))
    }

    #[tokio::test]
    async fn test_load_sorts_rows_by_account_code() {
        let mut tb = trial_balance(Config::default());
        tb.load_str(COST_CENTER_FEED).await.unwrap();

        let codes: Vec<&str> = tb.rows().iter().map(|r| r.account_code.as_str()).collect();
        assert_eq!(codes, vec!["A100", "E200", "L100", "X900"]);

        let categories: Vec<Category> = tb.sections().iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![Category::Assets, Category::Expenditure, Category::Liabilities, Category::Other]
        );
    }

    #[tokio::test]
    async fn test_unsorted_when_disabled() {
        let mut config = Config::default();
        config.input.sort_by_account_code = false;
        let mut tb = trial_balance(config);
        tb.load_str(COST_CENTER_FEED).await.unwrap();
        assert_eq!(tb.rows()[0].account_code, "L100");
    }

    #[tokio::test]
    async fn test_category_report() {
        let mut tb = trial_balance(Config::default());
        tb.load_str(COST_CENTER_FEED).await.unwrap();

        let report = tb.category_report(ReportPeriod::new(2025, 6).unwrap());
        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rollup.grand_totals.closing, Decimal::from(45));
        assert_eq!(report.rollup.excluded_rows, 1);
        assert_eq!(report.rollup.grand_totals.count, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["rollup"]["category_totals"]["Assets"].is_object());
    }

    #[tokio::test]
    async fn test_category_report_include_other() {
        let mut config = Config::default();
        config.rollup.include_other = true;
        let mut tb = trial_balance(config);
        tb.load_str(COST_CENTER_FEED).await.unwrap();

        let rollup = tb.category_rollup();
        assert_eq!(rollup.grand_totals.closing, Decimal::from(1044));
    }

    #[tokio::test]
    async fn test_pivot_report() {
        let mut tb = trial_balance(Config::default());
        tb.load_str(PROVINCIAL_FEED).await.unwrap();

        let report = tb.pivot_report(ReportPeriod::new(2025, 13).unwrap());
        let rollup = &report.rollup;
        assert_eq!(rollup.cost_centers, vec!["North", "South"]);
        assert_eq!(rollup.bucket(Category::Assets).unwrap().total, Decimal::from(150));
        assert_eq!(rollup.bucket(Category::Expenditure).unwrap().total, Decimal::from(20));
        assert_eq!(rollup.bucket(Category::Other).unwrap().total, Decimal::from(-60));
        assert_eq!(rollup.grand_total, Decimal::from(110));
        assert_eq!(report.duplicate_cells, 0);
    }

    #[tokio::test]
    async fn test_pivot_duplicate_policy_from_config() {
        let feed = r#"[
            {"AccountCode": "1001", "AccountName": "Cash", "CostCenter": "CC -North", "ClosingBalance": 10},
            {"AccountCode": "1001", "AccountName": "Cash", "CostCenter": "CC -North", "ClosingBalance": 15}
        ]"#;

        let mut tb = trial_balance(Config::default());
        tb.load_str(feed).await.unwrap();
        assert_eq!(tb.pivot_rollup().grand_total, Decimal::from(15));

        let mut config = Config::default();
        config.rollup.duplicate_policy = DuplicatePolicy::Sum;
        let mut tb = trial_balance(config);
        tb.load_str(feed).await.unwrap();
        assert_eq!(tb.pivot_rollup().grand_total, Decimal::from(25));
        assert_eq!(tb.pivot_table().duplicate_cells, 1);
    }

    #[tokio::test]
    async fn test_reload_without_source() {
        let mut tb = trial_balance(Config::default());
        assert!(tb.is_empty());
        assert!(matches!(tb.reload().await, Err(CoreError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let mut tb = trial_balance(Config::default());
        let result = tb.load(PathBuf::from("/nonexistent/trial.json")).await;
        assert!(matches!(result, Err(CoreError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_replaces_rows() {
        let mut tb = trial_balance(Config::default());
        tb.load_str(COST_CENTER_FEED).await.unwrap();
        tb.load_str(r#"[{"AcCd": "R1", "ClSbal": -5}]"#).await.unwrap();
        assert_eq!(tb.rows().len(), 1);
        assert_eq!(tb.category_rollup().grand_totals.closing, Decimal::from(-5));
    }
}
