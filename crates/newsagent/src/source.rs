//! Upstream data access behind one trait
//!
//! Every fetch degrades to an empty result on failure. Callers turn an empty
//! result into a "no data" message; nothing here ever surfaces an error.

use crate::api::{FinancialDatasetsClient, NewsApiClient, RegulationsGovClient};
use crate::cache::{ArticleStore, PriceCache, PriceKey};
use crate::config::{NewsAgentConfig, env_keys};
use crate::error::Result;
use crate::models::{Article, PriceBar, RegulatoryDocument};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

/// Source of news, prices and regulatory documents
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Latest crypto news; empty on failure
    async fn fetch_news(&self) -> Vec<Article>;

    /// Daily closes for `ticker` (e.g. `BTC-USD`), ascending; empty on failure
    async fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<PriceBar>;

    /// Regulatory documents matching `query`; empty on failure
    async fn fetch_regulatory_news(&self, query: &str, page_size: u32) -> Vec<RegulatoryDocument>;
}

/// Data source backed by the live HTTP providers
///
/// Providers whose key is missing are left out and their fetches return
/// nothing.
pub struct LiveDataSource {
    news: Option<NewsApiClient>,
    prices: Option<FinancialDatasetsClient>,
    regulations: Option<RegulationsGovClient>,
    store: Option<ArticleStore>,
    price_cache: PriceCache,
    news_query: String,
}

impl LiveDataSource {
    /// Build the providers that have credentials
    ///
    /// Fetched news is persisted to `config.articles_path`.
    pub fn from_config(config: &NewsAgentConfig) -> Result<Self> {
        let news = NewsAgentConfig::gated(
            &config.newsapi_key,
            env_keys::NEWSAPI_KEY,
            "News fetching",
            |key| NewsApiClient::new(key, config.newsapi_rate_limit, config.request_timeout),
        )?;
        let prices = NewsAgentConfig::gated(
            &config.financial_datasets_api_key,
            env_keys::FINANCIAL_DATASETS_API_KEY,
            "Price lookup",
            |key| FinancialDatasetsClient::new(key, config.request_timeout),
        )?;
        let regulations = NewsAgentConfig::gated(
            &config.regulations_gov_api_key,
            env_keys::REGULATIONS_GOV_API_KEY,
            "Regulatory news",
            |key| RegulationsGovClient::new(key, config.request_timeout),
        )?;

        Ok(Self {
            news,
            prices,
            regulations,
            store: Some(ArticleStore::new(&config.articles_path)),
            price_cache: PriceCache::new(config.price_cache_ttl),
            news_query: config.news_query.clone(),
        })
    }

    /// Stop persisting fetched news
    pub fn without_store(mut self) -> Self {
        self.store = None;
        self
    }
}

#[async_trait]
impl DataSource for LiveDataSource {
    async fn fetch_news(&self) -> Vec<Article> {
        let Some(client) = &self.news else {
            return Vec::new();
        };

        let articles = match client.everything(&self.news_query).await {
            Ok(articles) => articles,
            Err(e) => {
                error!("News fetch failed: {e}");
                return Vec::new();
            }
        };
        info!("Fetched {} articles", articles.len());

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&articles).await {
                warn!("Could not persist articles: {e}");
            }
        }

        articles
    }

    async fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<PriceBar> {
        let Some(client) = &self.prices else {
            return Vec::new();
        };

        let key = PriceKey::new(ticker, start_date, end_date);
        if let Some(bars) = self.price_cache.get(&key).await {
            debug!("Price cache hit for {ticker}");
            return bars;
        }

        match client.daily_prices(ticker, start_date, end_date).await {
            Ok(bars) => {
                info!("Fetched {} price bars for {ticker}", bars.len());
                self.price_cache.insert(key, bars.clone()).await;
                bars
            }
            Err(e) => {
                error!("Price fetch for {ticker} failed: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_regulatory_news(&self, query: &str, page_size: u32) -> Vec<RegulatoryDocument> {
        let Some(client) = &self.regulations else {
            debug!("Regulatory news is disabled, skipping '{query}'");
            return Vec::new();
        };

        match client.search_documents(query, page_size).await {
            Ok(documents) => documents,
            Err(e) => {
                error!("Regulatory fetch failed: {e}");
                Vec::new()
            }
        }
    }
}
