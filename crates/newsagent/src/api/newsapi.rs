//! NewsAPI client for cryptocurrency headlines
//!
//! Endpoint: https://newsapi.org/v2/everything
//! Free tier is limited per day, so requests go through a per-minute limiter.

use crate::api::{ensure_success, http_client};
use crate::error::{NewsError, Result};
use crate::models::Article;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const PROVIDER: &str = "NewsAPI";
const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Raw article as returned by NewsAPI
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

/// NewsAPI response envelope
#[derive(Debug, Clone, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// NewsAPI client with rate limiting
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsApiClient {
    /// Create a new NewsAPI client
    ///
    /// # Arguments
    /// * `api_key` - NewsAPI key
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Search all articles matching `query`
    #[instrument(skip(self))]
    pub async fn everything(&self, query: &str) -> Result<Vec<Article>> {
        self.rate_limiter.until_ready().await;

        let params = [("q", query), ("apiKey", self.api_key.as_str())];
        let response = self
            .client
            .get(NEWSAPI_BASE_URL)
            .query(&params)
            .send()
            .await?;

        let body: EverythingResponse = ensure_success(PROVIDER, response).await?.json().await?;
        let articles = parse_everything(body)?;
        debug!("NewsAPI returned {} articles", articles.len());
        Ok(articles)
    }
}

fn parse_everything(body: EverythingResponse) -> Result<Vec<Article>> {
    if body.status != "ok" {
        return Err(NewsError::upstream(
            PROVIDER,
            body.message.unwrap_or_else(|| format!("status {}", body.status)),
        ));
    }

    Ok(body
        .articles
        .into_iter()
        .map(|raw| Article::new(raw.title, raw.description, raw.url, raw.published_at))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NewsApiClient::new("test_key", 0, Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_parse_everything() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "Bitcoin climbs", "description": "BTC up 4%", "url": "https://n.io/1", "publishedAt": "2024-05-01T08:00:00Z"},
                {"title": null, "description": null, "url": null, "publishedAt": null}
            ]
        }"#;
        let body: EverythingResponse = serde_json::from_str(json).unwrap();
        let articles = parse_everything(body).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].content, "BTC up 4%");
        assert_eq!(articles[0].published_at.as_deref(), Some("2024-05-01T08:00:00Z"));
        assert_eq!(articles[1].title, "No title");
        assert_eq!(articles[1].url, "#");
    }

    #[test]
    fn test_parse_error_status() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let body: EverythingResponse = serde_json::from_str(json).unwrap();
        let err = parse_everything(body).unwrap_err();
        assert!(err.to_string().contains("Your API key is invalid."));
    }

    #[tokio::test]
    #[ignore] // Requires NEWSAPI_KEY and network access
    async fn test_everything_live() {
        let key = std::env::var("NEWSAPI_KEY").unwrap();
        let client = NewsApiClient::new(key, 30, Duration::from_secs(30)).unwrap();
        let articles = client.everything("cryptocurrency").await.unwrap();
        assert!(!articles.is_empty());
    }
}
