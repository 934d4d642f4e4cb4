//! Configuration management for tbrollup
//!
//! This module handles loading, validation, and management of
//! tbrollup configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Rollup engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Literal stripped from cost center labels (e.g. "CC -North" -> "North")
    #[serde(default = "default_cost_center_prefix")]
    pub cost_center_prefix: String,
    /// Handling of repeated (account, cost center) cells in the pivot
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Include rows outside the four tracked categories in category totals
    #[serde(default = "default_false")]
    pub include_other: bool,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            cost_center_prefix: default_cost_center_prefix(),
            duplicate_policy: DuplicatePolicy::default(),
            include_other: false,
        }
    }
}

fn default_cost_center_prefix() -> String {
    "CC -".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Duplicate pivot cell policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last row wins
    Overwrite,
    /// Repeated cells are added together
    Sum,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Overwrite
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            "sum" => Ok(DuplicatePolicy::Sum),
            _ => Err(format!("Invalid duplicate policy: {}", s)),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Overwrite => write!(f, "overwrite"),
            DuplicatePolicy::Sum => write!(f, "sum"),
        }
    }
}

/// Feed input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Sort rows by account code after loading
    #[serde(default = "default_true")]
    pub sort_by_account_code: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sort_by_account_code: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            thousands_separator: ",".to_string(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Rollup engine settings
    #[serde(default)]
    pub rollup: RollupConfig,
    /// Feed input settings
    #[serde(default)]
    pub input: InputConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.rollup.cost_center_prefix;
        if !prefix.is_empty() && prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "rollup.cost_center_prefix".to_string(),
                reason: "Prefix must be empty or contain non-whitespace characters".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
