//! SerpAPI client for real-time Google search

use crate::api::{ensure_success, http_client};
use crate::error::{NewsError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "SerpAPI";
const SEARCH_URL: &str = "https://serpapi.com/search.json";

/// Number of organic results kept in a rendered answer
const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawAnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawOrganic {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    answer_box: Option<RawAnswerBox>,
    #[serde(default)]
    organic_results: Vec<RawOrganic>,
}

/// One organic search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Parsed search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Direct answer, when Google shows an answer box
    pub answer: Option<String>,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// Whether the search produced anything worth showing
    pub fn is_empty(&self) -> bool {
        self.answer.is_none() && self.hits.is_empty()
    }

    /// Plain-text rendering: answer box first, then top organic results
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(answer) = &self.answer {
            lines.push(answer.clone());
        }
        for hit in self.hits.iter().take(MAX_RESULTS) {
            lines.push(format!("- {}: {} ({})", hit.title, hit.snippet, hit.link));
        }
        lines.join("\n")
    }
}

/// SerpAPI client
pub struct SerpApiClient {
    client: Client,
    api_key: String,
}

impl SerpApiClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
        })
    }

    /// Run a Google search
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let params = [
            ("engine", "google"),
            ("q", query),
            ("api_key", self.api_key.as_str()),
        ];

        let response = self.client.get(SEARCH_URL).query(&params).send().await?;
        let body: RawSearchResponse = ensure_success(PROVIDER, response).await?.json().await?;
        let results = parse_search(body)?;
        debug!("{PROVIDER} returned {} organic results", results.hits.len());
        Ok(results)
    }
}

fn parse_search(body: RawSearchResponse) -> Result<SearchResults> {
    if let Some(error) = body.error {
        return Err(NewsError::upstream(PROVIDER, error));
    }

    let answer = body
        .answer_box
        .and_then(|b| b.answer.or(b.snippet))
        .filter(|a| !a.trim().is_empty());

    let hits = body
        .organic_results
        .into_iter()
        .filter_map(|r| {
            Some(SearchHit {
                title: r.title?,
                link: r.link.unwrap_or_default(),
                snippet: r.snippet.unwrap_or_default(),
            })
        })
        .collect();

    Ok(SearchResults { answer, hits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_answer_box() {
        let json = r#"{
            "answer_box": {"answer": "$67,120.00"},
            "organic_results": [
                {"title": "Bitcoin price today", "link": "https://a.io", "snippet": "BTC trades at..."},
                {"link": "https://no-title.io"}
            ]
        }"#;
        let body: RawSearchResponse = serde_json::from_str(json).unwrap();
        let results = parse_search(body).unwrap();

        assert_eq!(results.answer.as_deref(), Some("$67,120.00"));
        assert_eq!(results.hits.len(), 1);
        assert_eq!(
            results.render(),
            "$67,120.00\n- Bitcoin price today: BTC trades at... (https://a.io)"
        );
    }

    #[test]
    fn test_parse_search_error() {
        let json = r#"{"error": "Invalid API key."}"#;
        let body: RawSearchResponse = serde_json::from_str(json).unwrap();
        assert!(parse_search(body).is_err());
    }

    #[test]
    fn test_empty_results() {
        let body: RawSearchResponse = serde_json::from_str("{}").unwrap();
        let results = parse_search(body).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.render(), "");
    }
}
