//! Financial Datasets client for historical crypto prices
//!
//! Endpoint: https://api.financialdatasets.ai/crypto/prices
//! Authentication: `X-API-KEY` header

use crate::aligner::parse_event_date;
use crate::api::{ensure_success, http_client};
use crate::error::Result;
use crate::models::PriceBar;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PROVIDER: &str = "Financial Datasets";
const PRICES_URL: &str = "https://api.financialdatasets.ai/crypto/prices";

/// Maximum bars requested per call
const PRICE_LIMIT: u32 = 5000;

#[derive(Debug, Clone, Deserialize)]
struct RawPrice {
    time: String,
    close: f64,
}

/// The provider has returned both a flat and a nested `prices` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PriceList {
    Nested { prices: Vec<RawPrice> },
    Flat(Vec<RawPrice>),
}

#[derive(Debug, Clone, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: Option<PriceList>,
}

/// Financial Datasets API client
pub struct FinancialDatasetsClient {
    client: Client,
    api_key: String,
}

impl FinancialDatasetsClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
        })
    }

    /// Daily closing prices for `ticker` (e.g. `BTC-USD`) between two dates inclusive
    #[instrument(skip(self))]
    pub async fn daily_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let start = start_date.format("%Y-%m-%d").to_string();
        let end = end_date.format("%Y-%m-%d").to_string();
        let limit = PRICE_LIMIT.to_string();
        let params = [
            ("ticker", ticker),
            ("interval", "day"),
            ("interval_multiplier", "1"),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
            ("limit", limit.as_str()),
        ];

        let response = self
            .client
            .get(PRICES_URL)
            .header("X-API-KEY", &self.api_key)
            .query(&params)
            .send()
            .await?;

        let body: PricesResponse = ensure_success(PROVIDER, response).await?.json().await?;
        let bars = parse_prices(body);
        debug!("{PROVIDER} returned {} bars for {ticker}", bars.len());
        Ok(bars)
    }
}

/// Convert the raw response into bars sorted ascending by date
fn parse_prices(body: PricesResponse) -> Vec<PriceBar> {
    let raw = match body.prices {
        Some(PriceList::Nested { prices } | PriceList::Flat(prices)) => prices,
        None => Vec::new(),
    };

    let mut bars: Vec<PriceBar> = raw
        .into_iter()
        .filter_map(|p| match parse_event_date(&p.time) {
            Some(timestamp) => Some(PriceBar {
                timestamp,
                close: p.close,
            }),
            None => {
                warn!("Skipping price with unparseable time '{}'", p.time);
                None
            }
        })
        .collect();

    bars.sort_by_key(|bar| bar.timestamp);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_nested_prices() {
        let json = r#"{"prices": {"prices": [
            {"time": "2024-01-02T00:00:00Z", "close": 45000.5, "open": 1.0},
            {"time": "2024-01-01T00:00:00Z", "close": 44000.0}
        ]}}"#;
        let body: PricesResponse = serde_json::from_str(json).unwrap();
        let bars = parse_prices(body);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, date("2024-01-01"));
        assert_eq!(bars[1].close, 45000.5);
    }

    #[test]
    fn test_parse_flat_prices_and_bad_times() {
        let json = r#"{"prices": [
            {"time": "2024-02-10", "close": 10.0},
            {"time": "yesterday", "close": 11.0}
        ]}"#;
        let body: PricesResponse = serde_json::from_str(json).unwrap();
        let bars = parse_prices(body);

        assert_eq!(bars, vec![PriceBar { timestamp: date("2024-02-10"), close: 10.0 }]);
    }

    #[test]
    fn test_parse_missing_prices() {
        let body: PricesResponse = serde_json::from_str("{}").unwrap();
        assert!(parse_prices(body).is_empty());
    }
}
