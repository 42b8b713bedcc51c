//! Configuration for the news agent

use crate::error::{NewsError, Result};
use newsagent_utils::{mask_secret, non_empty_var};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Environment variable names
pub mod env_keys {
    pub const NEWSAPI_KEY: &str = "NEWSAPI_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const FINANCIAL_DATASETS_API_KEY: &str = "FINANCIAL_DATASETS_API_KEY";
    pub const SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";
    pub const REGULATIONS_GOV_API_KEY: &str = "REGULATIONS_GOV_API_KEY";
    pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const NEWS_QUERY: &str = "NEWS_QUERY";
    pub const ARTICLES_PATH: &str = "ARTICLES_PATH";
}

/// Configuration for the news agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsAgentConfig {
    /// NewsAPI key (news fetching)
    #[serde(default, skip_serializing)]
    pub newsapi_key: Option<String>,

    /// OpenAI key (summaries, retrieval answers, LLM tool selection)
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Financial Datasets key (price history)
    #[serde(default, skip_serializing)]
    pub financial_datasets_api_key: Option<String>,

    /// SerpAPI key (real-time web search)
    #[serde(default, skip_serializing)]
    pub serpapi_api_key: Option<String>,

    /// Regulations.gov key (regulatory documents)
    #[serde(default, skip_serializing)]
    pub regulations_gov_api_key: Option<String>,

    /// Override for the OpenAI-compatible endpoint
    pub openai_api_base: Option<String>,

    /// Chat model name
    pub openai_model: String,

    /// Search term sent to the news provider
    pub news_query: String,

    /// Location of the persisted articles file
    pub articles_path: PathBuf,

    /// How long fetched price series stay cached
    pub price_cache_ttl: Duration,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Interval between collection runs
    pub collection_interval: Duration,

    /// How often the scheduler checks whether a run is due
    pub poll_interval: Duration,

    /// NewsAPI requests allowed per minute
    pub newsapi_rate_limit: u32,
}

impl Default for NewsAgentConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            openai_api_key: None,
            financial_datasets_api_key: None,
            serpapi_api_key: None,
            regulations_gov_api_key: None,
            openai_api_base: None,
            openai_model: "gpt-4o-mini".to_string(),
            news_query: "cryptocurrency".to_string(),
            articles_path: PathBuf::from("data/articles.json"),
            price_cache_ttl: Duration::from_secs(300),    // 5 minutes
            request_timeout: Duration::from_secs(30),
            collection_interval: Duration::from_secs(3600), // hourly
            poll_interval: Duration::from_secs(60),
            newsapi_rate_limit: 30,
        }
    }
}

impl NewsAgentConfig {
    /// Create a new configuration builder
    pub fn builder() -> NewsAgentConfigBuilder {
        NewsAgentConfigBuilder::default()
    }

    /// Defaults overlaid with the process environment, validated
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Load API keys from the environment
    pub fn with_env_api_keys(mut self) -> Self {
        self.newsapi_key = non_empty_var(env_keys::NEWSAPI_KEY).or(self.newsapi_key);
        self.openai_api_key = non_empty_var(env_keys::OPENAI_API_KEY).or(self.openai_api_key);
        self.financial_datasets_api_key =
            non_empty_var(env_keys::FINANCIAL_DATASETS_API_KEY).or(self.financial_datasets_api_key);
        self.serpapi_api_key = non_empty_var(env_keys::SERPAPI_API_KEY).or(self.serpapi_api_key);
        self.regulations_gov_api_key =
            non_empty_var(env_keys::REGULATIONS_GOV_API_KEY).or(self.regulations_gov_api_key);
        self
    }

    /// Load endpoint, model, query and path overrides from the environment
    pub fn with_env_settings(mut self) -> Self {
        if let Some(base) = non_empty_var(env_keys::OPENAI_API_BASE) {
            self.openai_api_base = Some(base);
        }
        if let Some(model) = non_empty_var(env_keys::OPENAI_MODEL) {
            self.openai_model = model;
        }
        if let Some(query) = non_empty_var(env_keys::NEWS_QUERY) {
            self.news_query = query;
        }
        if let Some(path) = non_empty_var(env_keys::ARTICLES_PATH) {
            self.articles_path = PathBuf::from(path);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.collection_interval.is_zero() {
            return Err(NewsError::ConfigError(
                "collection_interval must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval.is_zero() || self.poll_interval > self.collection_interval {
            return Err(NewsError::ConfigError(
                "poll_interval must be non-zero and no longer than collection_interval".to_string(),
            ));
        }

        if self.newsapi_rate_limit == 0 {
            return Err(NewsError::ConfigError(
                "newsapi_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.openai_model.trim().is_empty() {
            return Err(NewsError::ConfigError("openai_model must not be empty".to_string()));
        }

        Ok(())
    }

    /// Fetch a credential, failing with `ConfigurationMissing` when absent
    pub fn require<'a>(key: &'a Option<String>, name: &str) -> Result<&'a str> {
        key.as_deref()
            .ok_or_else(|| NewsError::ConfigurationMissing(name.to_string()))
    }

    /// Build the client that a credential gates
    ///
    /// A missing credential disables `capability` with a warning and yields
    /// `None`; errors from `build` still propagate.
    pub fn gated<C>(
        key: &Option<String>,
        name: &str,
        capability: &str,
        build: impl FnOnce(&str) -> Result<C>,
    ) -> Result<Option<C>> {
        match Self::require(key, name) {
            Ok(key) => build(key).map(Some),
            Err(NewsError::ConfigurationMissing(name)) => {
                warn!("{capability} is disabled because {name} is missing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Which credentials are loaded, masked for display
    pub fn key_report(&self) -> Vec<(&'static str, Option<String>)> {
        [
            (env_keys::NEWSAPI_KEY, &self.newsapi_key),
            (env_keys::OPENAI_API_KEY, &self.openai_api_key),
            (env_keys::FINANCIAL_DATASETS_API_KEY, &self.financial_datasets_api_key),
            (env_keys::SERPAPI_API_KEY, &self.serpapi_api_key),
            (env_keys::REGULATIONS_GOV_API_KEY, &self.regulations_gov_api_key),
        ]
        .into_iter()
        .map(|(name, key)| (name, key.as_deref().map(mask_secret)))
        .collect()
    }
}

/// Builder for NewsAgentConfig
#[derive(Debug, Default)]
pub struct NewsAgentConfigBuilder {
    base: Option<NewsAgentConfig>,
    newsapi_key: Option<String>,
    openai_api_key: Option<String>,
    financial_datasets_api_key: Option<String>,
    serpapi_api_key: Option<String>,
    regulations_gov_api_key: Option<String>,
    openai_model: Option<String>,
    news_query: Option<String>,
    articles_path: Option<PathBuf>,
    price_cache_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    collection_interval: Option<Duration>,
    poll_interval: Option<Duration>,
    newsapi_rate_limit: Option<u32>,
}

impl NewsAgentConfigBuilder {
    /// Start from the environment instead of the plain defaults
    ///
    /// Values set explicitly on the builder still win.
    pub fn with_env(mut self) -> Self {
        self.base = Some(
            NewsAgentConfig::default()
                .with_env_api_keys()
                .with_env_settings(),
        );
        self
    }

    /// Set the NewsAPI key
    pub fn newsapi_key(mut self, key: impl Into<String>) -> Self {
        self.newsapi_key = Some(key.into());
        self
    }

    /// Set the OpenAI key
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the Financial Datasets key
    pub fn financial_datasets_api_key(mut self, key: impl Into<String>) -> Self {
        self.financial_datasets_api_key = Some(key.into());
        self
    }

    /// Set the SerpAPI key
    pub fn serpapi_api_key(mut self, key: impl Into<String>) -> Self {
        self.serpapi_api_key = Some(key.into());
        self
    }

    /// Set the Regulations.gov key
    pub fn regulations_gov_api_key(mut self, key: impl Into<String>) -> Self {
        self.regulations_gov_api_key = Some(key.into());
        self
    }

    /// Set the chat model
    pub fn openai_model(mut self, model: impl Into<String>) -> Self {
        self.openai_model = Some(model.into());
        self
    }

    /// Set the news search term
    pub fn news_query(mut self, query: impl Into<String>) -> Self {
        self.news_query = Some(query.into());
        self
    }

    /// Set the articles file location
    pub fn articles_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.articles_path = Some(path.into());
        self
    }

    /// Set the price cache TTL
    pub fn price_cache_ttl(mut self, duration: Duration) -> Self {
        self.price_cache_ttl = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the collection interval
    pub fn collection_interval(mut self, duration: Duration) -> Self {
        self.collection_interval = Some(duration);
        self
    }

    /// Set the scheduler poll interval
    pub fn poll_interval(mut self, duration: Duration) -> Self {
        self.poll_interval = Some(duration);
        self
    }

    /// Set the NewsAPI rate limit (requests per minute)
    pub fn newsapi_rate_limit(mut self, per_minute: u32) -> Self {
        self.newsapi_rate_limit = Some(per_minute);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<NewsAgentConfig> {
        let defaults = self.base.unwrap_or_default();

        let config = NewsAgentConfig {
            newsapi_key: self.newsapi_key.or(defaults.newsapi_key),
            openai_api_key: self.openai_api_key.or(defaults.openai_api_key),
            financial_datasets_api_key: self
                .financial_datasets_api_key
                .or(defaults.financial_datasets_api_key),
            serpapi_api_key: self.serpapi_api_key.or(defaults.serpapi_api_key),
            regulations_gov_api_key: self
                .regulations_gov_api_key
                .or(defaults.regulations_gov_api_key),
            openai_api_base: defaults.openai_api_base,
            openai_model: self.openai_model.unwrap_or(defaults.openai_model),
            news_query: self.news_query.unwrap_or(defaults.news_query),
            articles_path: self.articles_path.unwrap_or(defaults.articles_path),
            price_cache_ttl: self.price_cache_ttl.unwrap_or(defaults.price_cache_ttl),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            collection_interval: self.collection_interval.unwrap_or(defaults.collection_interval),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            newsapi_rate_limit: self.newsapi_rate_limit.unwrap_or(defaults.newsapi_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}
