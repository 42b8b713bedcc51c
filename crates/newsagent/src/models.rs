//! Records produced by the data sources

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder used when an upstream record has no title
pub const NO_TITLE: &str = "No title";

/// Placeholder used when an upstream record has no link
pub const NO_URL: &str = "#";

/// A news article as fetched from the news provider
///
/// This is also the record layout of the persisted articles file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub url: String,
    /// Provider timestamp, usually RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl Article {
    /// Create an article, substituting placeholders for missing fields
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        url: Option<String>,
        published_at: Option<String>,
    ) -> Self {
        Self {
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            content: content.unwrap_or_default(),
            url: url.unwrap_or_else(|| NO_URL.to_string()),
            published_at,
        }
    }

    /// The text scored for sentiment: the content, or the title when there is none
    pub fn sentiment_text(&self) -> &str {
        if self.content.trim().is_empty() {
            &self.title
        } else {
            &self.content
        }
    }
}

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDate,
    pub close: f64,
}

/// A document from the federal regulations registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryDocument {
    pub title: String,
    pub document_type: String,
    pub posted_date: String,
    pub docket_id: String,
    pub url: String,
}

/// A short summary of one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    pub url: String,
}
