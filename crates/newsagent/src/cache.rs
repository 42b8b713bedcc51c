//! Article persistence and in-memory price caching

use crate::error::Result;
use crate::models::{Article, PriceBar};
use cached::{Cached, TimedCache};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Flat JSON file holding the most recent batch of articles
///
/// Each save overwrites the whole file.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    path: PathBuf,
}

impl ArticleStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Replace the stored batch
    pub async fn save(&self, articles: &[Article]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(articles)?;
        tokio::fs::write(&self.path, json).await?;
        info!("Saved {} articles to {}", articles.len(), self.path.display());
        Ok(())
    }

    /// Read the stored batch; a missing file is an empty batch
    pub async fn load(&self) -> Result<Vec<Article>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No articles file at {}", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Cache key for a price series request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PriceKey {
    pub fn new(ticker: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start_date,
            end_date,
        }
    }
}

/// Thread-safe, time-limited cache of price series
pub struct PriceCache {
    cache: RwLock<TimedCache<PriceKey, Vec<PriceBar>>>,
}

impl PriceCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: RwLock::new(TimedCache::with_lifespan(ttl)),
        }
    }

    /// Get a series from the cache
    pub async fn get(&self, key: &PriceKey) -> Option<Vec<PriceBar>> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a series into the cache
    ///
    /// Empty series are not cached so a failed fetch is retried next time.
    pub async fn insert(&self, key: PriceKey, bars: Vec<PriceBar>) {
        if bars.is_empty() {
            return;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, bars);
    }
}
