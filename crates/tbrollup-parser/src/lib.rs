//! Trial balance feed adapter
//!
//! Turns the backend's JSON trial balance payloads into [`FeedRow`]s with a
//! single field naming scheme and well-formed amounts.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub mod types;
pub mod parser;

pub use error::ParseError;
pub use parser::JsonFeedParser;
pub use types::{coerce_amount, FeedRow};

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn FeedParserTrait>;

/// Trait for trial balance feed parsers
#[async_trait]
pub trait FeedParserTrait: Send + Sync {
    /// Parse feed text and return rows
    async fn parse(&self, content: &str) -> Result<Vec<FeedRow>, ParseError>;

    /// Parse a feed stored on disk
    async fn parse_file(&self, path: PathBuf) -> Result<Vec<FeedRow>, ParseError>;
}

/// Default parser implementation
#[derive(Debug, Default)]
pub struct DefaultFeedParser;

#[async_trait]
impl FeedParserTrait for DefaultFeedParser {
    async fn parse(&self, content: &str) -> Result<Vec<FeedRow>, ParseError> {
        JsonFeedParser::parse(content)
    }

    async fn parse_file(&self, path: PathBuf) -> Result<Vec<FeedRow>, ParseError> {
        let content = tokio::fs::read_to_string(&path).await?;
        log::info!("Read feed file {} ({} bytes)", path.display(), content.len());
        self.parse(&content).await
    }
}
