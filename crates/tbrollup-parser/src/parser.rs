//! JSON feed parser
//!
//! The backend answers with either a bare array of rows, an envelope object
//! (`{"data": [...]}` or `{"result": [...]}`), or a single row object.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::{FeedRow, ACCOUNT_CODE_FIELDS};

const ENVELOPE_KEYS: [&str; 2] = ["data", "result"];

/// Stateless JSON feed parser
pub struct JsonFeedParser;

impl JsonFeedParser {
    /// Parse feed text into rows.
    ///
    /// Only an unreadable document fails; individual bad rows are kept as
    /// empty rows so the rest of the report still renders.
    pub fn parse(content: &str) -> Result<Vec<FeedRow>, ParseError> {
        let value: Value = serde_json::from_str(content).map_err(|e| ParseError::InvalidJson {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;

        let items = Self::unwrap_envelope(value)?;
        let rows: Vec<FeedRow> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Self::parse_row(index, item))
            .collect();

        log::debug!("Parsed {} feed rows", rows.len());
        Ok(rows)
    }

    fn unwrap_envelope(value: Value) -> Result<Vec<Value>, ParseError> {
        match value {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => {
                for key in ENVELOPE_KEYS {
                    if matches!(map.get(key), Some(Value::Array(_))) {
                        if let Some(Value::Array(items)) = map.remove(key) {
                            return Ok(items);
                        }
                    }
                }

                if Self::looks_like_row(&map) {
                    Ok(vec![Value::Object(map)])
                } else {
                    Err(ParseError::UnexpectedShape {
                        found: "object without a row list or account code".to_string(),
                    })
                }
            }
            other => Err(ParseError::UnexpectedShape {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    fn looks_like_row(map: &Map<String, Value>) -> bool {
        ACCOUNT_CODE_FIELDS.iter().any(|field| map.contains_key(*field))
    }

    fn parse_row(index: usize, item: Value) -> FeedRow {
        if !item.is_object() {
            log::warn!("Feed row {} is {}, not an object; keeping it as an empty row", index, json_kind(&item));
            return FeedRow::default();
        }

        match serde_json::from_value::<FeedRow>(item) {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Feed row {} could not be decoded ({}); keeping it as an empty row", index, e);
                FeedRow::default()
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_bare_array() {
        let input = r#"[
            {"AcCd": "A100", "GlName": "Cash", "ClSbal": 100, "CctName": "CC -North"},
            {"AcCd": "E200", "GlName": "Wages", "ClSbal": -40, "CctName": "CC -North"}
        ]"#;
        let rows = JsonFeedParser::parse(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].account_code, "E200");
        assert_eq!(rows[1].closing_balance, Decimal::from(-40));
    }

    #[test]
    fn test_parse_data_envelope() {
        let input = r#"{"data": [{"AccountCode": "1001", "ClosingBalance": 5}]}"#;
        let rows = JsonFeedParser::parse(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_code, "1001");
    }

    #[test]
    fn test_parse_result_envelope() {
        let input = r#"{"status": "ok", "result": [{"AccountCode": "4001"}, {"AccountCode": "5001"}]}"#;
        let rows = JsonFeedParser::parse(input).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_single_object() {
        let input = r#"{"AcCd": "L300", "GlName": "Payables", "ClSbal": -10}"#;
        let rows = JsonFeedParser::parse(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_name, "Payables");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(JsonFeedParser::parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(matches!(
            JsonFeedParser::parse("42"),
            Err(ParseError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            JsonFeedParser::parse(r#"{"message": "no rows"}"#),
            Err(ParseError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = JsonFeedParser::parse("[{\"AcCd\": ").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { line: 1, .. }));
    }

    #[test]
    fn test_non_object_rows_are_kept_empty() {
        let rows = JsonFeedParser::parse(r#"[{"AcCd": "A1", "ClSbal": 3}, 17, null]"#).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_malformed());
        assert_eq!(rows[2], FeedRow::default());
    }

    #[test]
    fn test_malformed_amount_coerced() {
        let rows = JsonFeedParser::parse(r#"[{"AcCd": "A1", "ClSbal": "not-a-number"}]"#).unwrap();
        assert_eq!(rows[0].closing_balance, Decimal::ZERO);
    }
}
