//! tbrollup main entry point

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tbrollup_config::Config;
use tbrollup_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use tbrollup_core::{CategoryReport, PivotReport, ReportPeriod, TrialBalance};
use tbrollup_parser::DefaultFeedParser;
use tbrollup_utils::format_amount;
use tokio::runtime::Runtime;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "tbrollup")]
#[command(version = "0.1.0")]
#[command(about = "Trial balance rollups: category totals and cost center pivots", long_about = None)]
struct Args {
    /// Configuration file path (defaults to ./config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trial balance feed (JSON as returned by the backend)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Report month, 1-12, or 13 for the adjustment period
    #[arg(long)]
    month: Option<u32>,

    /// Report layout
    #[arg(long, value_enum, default_value_t = View::Category)]
    view: View,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    /// Rows grouped by category with subtotals
    Category,
    /// Accounts by cost center column
    Pivot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, tbrollup_config::ConfigError> {
    match path {
        Some(path) => Config::load(path.clone()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                Config::load(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(args.config.as_ref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e.to_details());
            return Err(e).context("failed to load configuration");
        }
    };

    let Some(input) = args.input.clone() else {
        bail!("no feed given; pass --input <file>");
    };

    let period = match (args.year, args.month) {
        (None, None) => ReportPeriod::current(),
        (year, month) => {
            let current = ReportPeriod::current();
            ReportPeriod::new(year.unwrap_or(current.year), month.unwrap_or(current.month))?
        }
    };

    let rt = Runtime::new()?;
    let trial_balance = rt.block_on(async {
        let mut trial_balance = TrialBalance::new(config, Arc::new(DefaultFeedParser));
        if let Err(e) = trial_balance.load(input.clone()).await {
            let context = ErrorContext::new("load".to_string())
                .with_source(input.display().to_string());
            DefaultErrorLogger.log_error(&e, &context);
            return Err(e);
        }
        Ok(trial_balance)
    })?;

    if trial_balance.is_empty() {
        log::warn!("Feed {} contains no rows", input.display());
    }

    let config = trial_balance.config();
    let output = match (args.view, args.format) {
        (View::Category, OutputFormat::Json) => {
            serde_json::to_string_pretty(&trial_balance.category_report(period))?
        }
        (View::Pivot, OutputFormat::Json) => {
            serde_json::to_string_pretty(&trial_balance.pivot_report(period))?
        }
        (View::Category, OutputFormat::Text) => {
            render_category(&trial_balance.category_report(period), config)
        }
        (View::Pivot, OutputFormat::Text) => {
            render_pivot(&trial_balance.pivot_report(period), config)
        }
    };

    println!("{}", output);
    Ok(())
}

// ==================== Text Rendering ====================

fn amount(value: Decimal, config: &Config) -> String {
    format_amount(
        value,
        config.currency.decimal_places,
        &config.currency.thousands_separator,
    )
}

fn render_category(report: &CategoryReport, config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&format!("MONTHLY TRIAL BALANCE - {}\n\n", report.period));
    out.push_str(&format!(
        "{:<12} {:<36} {:>18} {:>18} {:>18} {:>18}\n",
        "Code", "Description", "Opening", "Debit", "Credit", "Closing"
    ));

    for section in &report.sections {
        out.push_str(&format!("\n{}\n", section.category));
        for row in &report.rows[section.start..section.end] {
            out.push_str(&format!(
                "{:<12} {:<36} {:>18} {:>18} {:>18} {:>18}\n",
                row.account_code,
                row.account_name.trim(),
                amount(row.opening_balance, config),
                amount(row.debit_amount, config),
                amount(row.credit_amount, config),
                amount(row.closing_balance, config),
            ));
        }

        match report.rollup.totals_for(section.category) {
            Some(totals) => out.push_str(&format!(
                "{:<49} {:>18} {:>18} {:>18} {:>18}\n",
                format!("Total {}", section.category),
                amount(totals.opening, config),
                amount(totals.debit, config),
                amount(totals.credit, config),
                amount(totals.closing, config),
            )),
            None => out.push_str(&format!("Total {}: not included in totals\n", section.category)),
        }
    }

    let grand = &report.rollup.grand_totals;
    out.push_str(&format!(
        "\n{:<49} {:>18} {:>18} {:>18} {:>18}\n",
        "Grand Total",
        amount(grand.opening, config),
        amount(grand.debit, config),
        amount(grand.credit, config),
        amount(grand.closing, config),
    ));
    out
}

fn render_pivot(report: &PivotReport, config: &Config) -> String {
    let rollup = &report.rollup;
    let mut out = String::new();
    out.push_str(&format!("PROVINCIAL TRIAL BALANCE - {}\n\n", report.period));

    let mut header = format!("{:<12} {:<36}", "Code", "Account");
    for cost_center in &rollup.cost_centers {
        header.push_str(&format!(" {:>16}", cost_center));
    }
    header.push_str(&format!(" {:>18}\n", "Total"));
    out.push_str(&header);

    for bucket in rollup.buckets.iter().filter(|b| !b.rows.is_empty()) {
        out.push_str(&format!("\n{}\n", bucket.category.as_str().to_uppercase()));
        for row in &bucket.rows {
            let mut line = format!("{:<12} {:<36}", row.account_code, row.account_name);
            for cost_center in &rollup.cost_centers {
                line.push_str(&format!(" {:>16}", amount(row.balance(cost_center), config)));
            }
            line.push_str(&format!(" {:>18}\n", amount(row.total, config)));
            out.push_str(&line);
        }

        let mut line = format!("{:<49}", format!("Total {}", bucket.category));
        for cost_center in &rollup.cost_centers {
            let sum = bucket.column_totals.get(cost_center).copied().unwrap_or_default();
            line.push_str(&format!(" {:>16}", amount(sum, config)));
        }
        line.push_str(&format!(" {:>18}\n", amount(bucket.total, config)));
        out.push_str(&line);
    }

    let mut line = format!("\n{:<49}", "Grand Total");
    for cost_center in &rollup.cost_centers {
        let sum = rollup.column_totals.get(cost_center).copied().unwrap_or_default();
        line.push_str(&format!(" {:>16}", amount(sum, config)));
    }
    line.push_str(&format!(" {:>18}\n", amount(rollup.grand_total, config)));
    out.push_str(&line);

    if report.duplicate_cells > 0 {
        out.push_str(&format!(
            "\nNote: {} repeated account/cost center cells ({} policy)\n",
            report.duplicate_cells, config.rollup.duplicate_policy
        ));
    }
    out
}
