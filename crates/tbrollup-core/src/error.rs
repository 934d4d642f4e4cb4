//! Error types for tbrollup-core
//!
//! The rollup engine itself never fails. Errors come from the edges: reading
//! and decoding a feed, and validating report parameters.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use tbrollup_parser::ParseError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No feed loaded yet
    NotLoaded,
    /// Feed could not be decoded
    ParseError,
    /// Feed decoded but has no usable row list
    InvalidFormat,
    /// File not found
    FileNotFound,
    /// IO error
    IoError,
    /// Report period out of range
    InvalidPeriod,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InvalidPeriod => write!(f, "INVALID_PERIOD"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for tbrollup-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No trial balance loaded")]
    NotLoaded,

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Invalid report period: {year}/{month} (month must be 1-13)")]
    InvalidPeriod { year: i32, month: u32 },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InvalidPeriod { .. } => ErrorCode::InvalidPeriod,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::InvalidPeriod { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ParseError { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "Check that the feed is the JSON body returned by the trial balance endpoint.".to_string()
                );
            }
            CoreError::InvalidFormat { .. } => {
                details = details.with_suggestion(
                    "Expected an array of rows, a {\"data\": [...]} or {\"result\": [...]} envelope, or a single row.".to_string()
                );
            }
            CoreError::FileNotFound { .. } => {
                details = details.with_suggestion(
                    "Check if the file path is correct.".to_string()
                );
            }
            CoreError::InvalidPeriod { .. } => {
                details = details.with_suggestion(
                    "Use months 1-12, or 13 for the year-end adjustment period.".to_string()
                );
            }
            _ => {}
        }

        details
    }

    /// Convert a feed parser error, attributing I/O failures to `path`
    pub fn from_parse(error: ParseError, path: Option<&str>) -> Self {
        match error {
            ParseError::InvalidJson { .. } => CoreError::ParseError {
                message: error.to_string(),
            },
            ParseError::UnexpectedShape { found } => CoreError::InvalidFormat { message: found },
            ParseError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => CoreError::FileNotFound {
                path: path.unwrap_or("<unknown>").to_string(),
            },
            ParseError::IoError(_) => CoreError::IoError,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<ParseError> for CoreError {
    fn from(error: ParseError) -> Self {
        CoreError::from_parse(error, None)
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Feed file involved, if any
    pub source: Option<String>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            operation,
            source: None,
            data: serde_json::json!({}),
        }
    }

    /// Add the feed file
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let details = error.to_details();
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "tbrollup::error",
                "WARNING [{}] {} - Operation: {} - Source: {:?} - Data: {}",
                error.code(),
                details,
                context.operation,
                context.source,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "tbrollup::error",
                "ERROR [{}] {} - Operation: {} - Source: {:?} - Data: {}",
                error.code(),
                details,
                context.operation,
                context.source,
                context.data
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "tbrollup::error",
            "WARNING: {} - Operation: {} - Source: {:?}",
            message,
            context.operation,
            context.source
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotLoaded.to_string(), "NOT_LOADED");
        assert_eq!(ErrorCode::InvalidPeriod.to_string(), "INVALID_PERIOD");
        assert_eq!(ErrorCode::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::NotLoaded.severity(), ErrorSeverity::Warning);
        assert_eq!(CoreError::IoError.severity(), ErrorSeverity::Error);
        let error = CoreError::InvalidPeriod { year: 2025, month: 14 };
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_from_parse_error() {
        let error = CoreError::from(ParseError::UnexpectedShape { found: "a number".to_string() });
        assert_eq!(error.code(), ErrorCode::InvalidFormat);

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = CoreError::from_parse(ParseError::IoError(missing), Some("feed.json"));
        assert!(matches!(error, CoreError::FileNotFound { ref path } if path == "feed.json"));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert_eq!(CoreError::from(ParseError::IoError(denied)).code(), ErrorCode::IoError);
    }

    #[test]
    fn test_error_details_parse_error() {
        let error = CoreError::ParseError { message: "trailing comma".to_string() };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::ParseError);
        assert!(details.details.is_some());
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("load".to_string())
            .with_source("feed.json".to_string())
            .with_data("rows", serde_json::json!(12));

        assert_eq!(context.operation, "load");
        assert_eq!(context.source, Some("feed.json".to_string()));
        assert_eq!(context.data["rows"], 12);
    }
}
