//! Feed row types and lenient field decoding

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// One trial balance line as delivered by the backend.
///
/// Both endpoint flavours are accepted: the cost center endpoint uses the
/// short names (`AcCd`, `GlName`, `OpSbal`, ...) while the provincial
/// endpoint spells them out (`AccountCode`, `AccountName`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "AccountCode", alias = "AcCd", default, deserialize_with = "lenient_string")]
    pub account_code: String,
    #[serde(rename = "AccountName", alias = "GlName", default, deserialize_with = "lenient_string")]
    pub account_name: String,
    #[serde(rename = "TitleFlag", default, deserialize_with = "lenient_string")]
    pub title_flag: String,
    #[serde(rename = "CostCenter", alias = "CctName", default, deserialize_with = "lenient_string")]
    pub cost_center: String,
    #[serde(rename = "CompanyName", default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(rename = "OpeningBalance", alias = "OpSbal", default, deserialize_with = "lenient_amount")]
    pub opening_balance: Decimal,
    #[serde(rename = "DebitAmount", alias = "DrSamt", default, deserialize_with = "lenient_amount")]
    pub debit_amount: Decimal,
    #[serde(rename = "CreditAmount", alias = "CrSamt", default, deserialize_with = "lenient_amount")]
    pub credit_amount: Decimal,
    #[serde(rename = "ClosingBalance", alias = "ClSbal", default, deserialize_with = "lenient_amount")]
    pub closing_balance: Decimal,
}

/// Field names that identify an object as a feed row
pub const ACCOUNT_CODE_FIELDS: [&str; 2] = ["AccountCode", "AcCd"];

impl FeedRow {
    /// A row without an account code cannot be classified or grouped
    pub fn is_malformed(&self) -> bool {
        self.account_code.trim().is_empty()
    }
}

/// Coerce a JSON value into an amount; anything non-numeric becomes zero.
pub fn coerce_amount(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => parse_decimal(s.trim()),
        Value::Null => return Decimal::ZERO,
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::debug!("Coercing non-numeric amount {} to zero", value);
        Decimal::ZERO
    })
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_amount).unwrap_or(Decimal::ZERO))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
