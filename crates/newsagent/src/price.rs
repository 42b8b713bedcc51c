//! Coin resolution and latest-price lookups

use crate::source::DataSource;
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Days of history fetched to find the latest close
pub const PRICE_LOOKBACK_DAYS: i64 = 7;

/// Coin names accepted in queries, with their tickers
pub const KNOWN_COINS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("litecoin", "LTC"),
    ("ripple", "XRP"),
    ("cardano", "ADA"),
];

static TICKER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,5}\b").ok());

/// Resolve the first word naming a known coin, by name or ticker, to its ticker
///
/// Matching is case-insensitive and ignores surrounding punctuation.
pub fn resolve_coin(text: &str) -> Option<&'static str> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .find_map(|word| {
            KNOWN_COINS.iter().find_map(|&(name, ticker)| {
                (word.eq_ignore_ascii_case(name) || word.eq_ignore_ascii_case(ticker))
                    .then_some(ticker)
            })
        })
}

/// Pull a ticker out of free text
///
/// The first run of 2-5 capital letters wins; otherwise a known coin name.
pub fn extract_ticker(text: &str) -> Option<String> {
    TICKER_PATTERN
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().to_string())
        .or_else(|| resolve_coin(text).map(str::to_string))
}

/// Latest daily close for `symbol` over the past week, as a sentence
pub async fn latest_price_message(source: &dyn DataSource, symbol: &str, today: NaiveDate) -> String {
    let ticker = format!("{symbol}-USD");
    let start = today - Duration::days(PRICE_LOOKBACK_DAYS);
    let bars = source.fetch_prices(&ticker, start, today).await;
    debug!("{} bars for {ticker} since {start}", bars.len());

    match bars.last() {
        Some(bar) => format!("The latest price for {symbol} is ${:.2} USD.", bar.close),
        None => format!("No price data available for {symbol} in the selected date range."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, PriceBar, RegulatoryDocument};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn test_resolve_coin() {
        assert_eq!(resolve_coin("What's the price of bitcoin?"), Some("BTC"));
        assert_eq!(resolve_coin("eth value please"), Some("ETH"));
        assert_eq!(resolve_coin("Cardano, then Ripple"), Some("ADA"));
        assert_eq!(resolve_coin("price of dogecoin"), None);
        assert_eq!(resolve_coin(""), None);
    }

    #[test]
    fn test_extract_ticker() {
        assert_eq!(extract_ticker("What is the price of SOL today?").as_deref(), Some("SOL"));
        assert_eq!(extract_ticker("ETH or BTC").as_deref(), Some("ETH"));
        assert_eq!(extract_ticker("how is litecoin doing").as_deref(), Some("LTC"));
        assert_eq!(extract_ticker("how is it doing"), None);
        assert_eq!(extract_ticker("I want A price"), None);
    }

    struct RecordingSource {
        bars: Vec<PriceBar>,
        requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    #[async_trait]
    impl DataSource for RecordingSource {
        async fn fetch_news(&self) -> Vec<Article> {
            Vec::new()
        }

        async fn fetch_prices(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
            self.requests.lock().unwrap().push((ticker.to_string(), start, end));
            self.bars.clone()
        }

        async fn fetch_regulatory_news(&self, _: &str, _: u32) -> Vec<RegulatoryDocument> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_latest_price_message() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let source = RecordingSource {
            bars: vec![
                PriceBar { timestamp: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(), close: 69000.0 },
                PriceBar { timestamp: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(), close: 69420.456 },
            ],
            requests: Mutex::new(Vec::new()),
        };

        let msg = latest_price_message(&source, "BTC", today).await;
        assert_eq!(msg, "The latest price for BTC is $69420.46 USD.");

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests[0].0, "BTC-USD");
        assert_eq!(requests[0].1, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(requests[0].2, today);
    }

    #[tokio::test]
    async fn test_latest_price_message_no_data() {
        let source = RecordingSource { bars: Vec::new(), requests: Mutex::new(Vec::new()) };
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(
            latest_price_message(&source, "ETH", today).await,
            "No price data available for ETH in the selected date range."
        );
    }
}
