//! Keyword router for single-line crypto questions
//!
//! Classification is a fixed precedence of keyword rules over the lower-cased
//! query. It is stateless: the same text always yields the same intent.

use crate::chart::{DEFAULT_CHART_DAYS, DEFAULT_CHART_TICKER, GraphRenderer, graph_reply};
use crate::error::{NewsError, Result};
use crate::price::{latest_price_message, resolve_coin};
use crate::sentiment::SentimentScorer;
use crate::source::DataSource;
use crate::summarizer::{Summarizer, format_summaries};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use newsagent_core::{Agent, ChatLog};
use std::sync::Arc;
use tracing::debug;

/// Reply when a price question names no known coin
pub const CLARIFY_COIN: &str = "Please specify a valid cryptocurrency ticker or name.";

/// Reply for anything the router does not understand
pub const UNRECOGNIZED_REPLY: &str = "I'm sorry, I can't help with that request. Please ask about cryptocurrency prices, news, sentiment, summarization, graph visualization, or the current date.";

/// Headlines listed for a news question
const NEWS_LIMIT: usize = 5;

/// What a query is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Latest price of a coin, by ticker
    PriceQuery(String),
    /// Latest headlines
    NewsQuery,
    /// Overall tone of current news
    SentimentQuery,
    /// Short summaries of current news
    SummaryQuery,
    /// Price chart with news overlay
    GraphQuery { ticker: String, days: u32 },
    /// Today's date
    DateQuery,
    /// Anything else
    Unrecognized,
}

/// Keywords for intent classification, matched as substrings
mod keywords {
    pub const SENTIMENT: &[&str] = &["sentiment", "tone", "positive", "negative", "emotion", "feeling"];
    pub const PRICE: &[&str] = &["price", "cost", "value"];
    pub const NEWS: &[&str] = &["news"];
    pub const SUMMARY: &[&str] = &["summarize", "summary"];
    pub const GRAPH: &[&str] = &["graph", "chart"];
    pub const DATE: &[&str] = &["day", "date"];
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Classify a query
///
/// A price question without a recognizable coin fails with
/// `UnparseableQuery`.
pub fn classify(query: &str) -> Result<Intent> {
    let text = query.to_lowercase();

    let intent = if mentions(&text, keywords::SENTIMENT) {
        Intent::SentimentQuery
    } else if mentions(&text, keywords::PRICE) {
        let symbol = resolve_coin(&text).ok_or_else(|| {
            NewsError::UnparseableQuery(format!("no known coin in '{}'", query.trim()))
        })?;
        Intent::PriceQuery(symbol.to_string())
    } else if mentions(&text, keywords::NEWS) {
        Intent::NewsQuery
    } else if mentions(&text, keywords::SUMMARY) {
        Intent::SummaryQuery
    } else if mentions(&text, keywords::GRAPH) {
        Intent::GraphQuery {
            ticker: DEFAULT_CHART_TICKER.to_string(),
            days: DEFAULT_CHART_DAYS,
        }
    } else if mentions(&text, keywords::DATE) {
        Intent::DateQuery
    } else {
        Intent::Unrecognized
    };

    debug!("Classified '{}' as {:?}", query.trim(), intent);
    Ok(intent)
}

/// Answers routed queries using the capability each intent maps to
pub struct QueryRouter {
    source: Arc<dyn DataSource>,
    scorer: Arc<dyn SentimentScorer>,
    summarizer: Arc<dyn Summarizer>,
    renderer: Arc<dyn GraphRenderer>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl QueryRouter {
    pub fn new(
        source: Arc<dyn DataSource>,
        scorer: Arc<dyn SentimentScorer>,
        summarizer: Arc<dyn Summarizer>,
        renderer: Arc<dyn GraphRenderer>,
    ) -> Self {
        Self {
            source,
            scorer,
            summarizer,
            renderer,
            today: local_today,
        }
    }

    /// Replace the clock used for dates and price windows
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Classify and answer; never fails
    pub async fn respond(&self, query: &str) -> String {
        match classify(query) {
            Ok(intent) => self.answer(intent).await,
            Err(e) => {
                debug!("{e}");
                CLARIFY_COIN.to_string()
            }
        }
    }

    /// Produce the reply for an already classified intent
    pub async fn answer(&self, intent: Intent) -> String {
        match intent {
            Intent::PriceQuery(symbol) => {
                latest_price_message(self.source.as_ref(), &symbol, (self.today)()).await
            }
            Intent::NewsQuery => self.news().await,
            Intent::SentimentQuery => self.sentiment().await,
            Intent::SummaryQuery => {
                let articles = self.source.fetch_news().await;
                format_summaries(&self.summarizer.summarize(&articles).await)
            }
            Intent::GraphQuery { ticker, days } => self.graph(&ticker, days).await,
            Intent::DateQuery => format!("Today's date is {}.", (self.today)().format("%B %d, %Y")),
            Intent::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
        }
    }

    async fn news(&self) -> String {
        let articles = self.source.fetch_news().await;
        if articles.is_empty() {
            return "No recent cryptocurrency news available.".to_string();
        }

        let lines: Vec<String> = articles
            .iter()
            .take(NEWS_LIMIT)
            .map(|a| format!("- {} ({})", a.title, a.url))
            .collect();
        format!("Here are the latest crypto news articles:\n{}", lines.join("\n"))
    }

    async fn sentiment(&self) -> String {
        let articles = self.source.fetch_news().await;
        match self.scorer.score_articles(&articles) {
            Some(result) => format!("Sentiment Analysis Result:\n{}", result.format()),
            None => "No news available to analyze sentiment.".to_string(),
        }
    }

    async fn graph(&self, ticker: &str, days: u32) -> String {
        graph_reply(
            self.source.as_ref(),
            ticker,
            days,
            (self.today)(),
            self.renderer.as_ref(),
        )
        .await
    }
}

#[async_trait]
impl Agent for QueryRouter {
    async fn process(&self, input: &str, session: &mut ChatLog) -> newsagent_core::Result<String> {
        session.push_user(input);
        let reply = self.respond(input).await;
        session.push_assistant(reply.clone());
        Ok(reply)
    }

    fn name(&self) -> &str {
        "query-router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartOverlay;
    use crate::models::{Article, PriceBar, RegulatoryDocument};
    use crate::sentiment::LexiconScorer;
    use crate::summarizer::ExtractiveSummarizer;
    use newsagent_core::ChatRole;
    use std::sync::Mutex;

    #[test]
    fn test_classify_examples() {
        assert_eq!(
            classify("What's the price of bitcoin?").unwrap(),
            Intent::PriceQuery("BTC".to_string())
        );
        assert_eq!(
            classify("Tell me the sentiment of recent news").unwrap(),
            Intent::SentimentQuery
        );
        assert_eq!(
            classify("graph BTC").unwrap(),
            Intent::GraphQuery {
                ticker: "BTC-USD".to_string(),
                days: 365
            }
        );
        assert_eq!(classify("asdf qwer").unwrap(), Intent::Unrecognized);
    }

    #[test]
    fn test_classify_precedence() {
        // sentiment beats price
        assert_eq!(classify("Is the price tone positive?").unwrap(), Intent::SentimentQuery);
        // price beats news
        assert_eq!(
            classify("ETH price news").unwrap(),
            Intent::PriceQuery("ETH".to_string())
        );
        assert_eq!(classify("Summarize the news").unwrap(), Intent::NewsQuery);
        assert_eq!(classify("Give me a summary").unwrap(), Intent::SummaryQuery);
        assert_eq!(classify("Show a chart").unwrap(), Intent::GraphQuery {
            ticker: "BTC-USD".to_string(),
            days: 365
        });
        assert_eq!(classify("What day is it?").unwrap(), Intent::DateQuery);
        assert_eq!(classify("").unwrap(), Intent::Unrecognized);
    }

    #[test]
    fn test_classify_price_without_coin() {
        assert!(matches!(
            classify("What's the price of dogecoin?"),
            Err(NewsError::UnparseableQuery(_))
        ));
        assert_eq!(
            classify("cost of CARDANO!").unwrap(),
            Intent::PriceQuery("ADA".to_string())
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        for q in ["price of ripple", "news", "what is the date", "hello"] {
            assert_eq!(classify(q).unwrap(), classify(q).unwrap());
        }
    }

    struct StubSource {
        articles: Vec<Article>,
        bars: Vec<PriceBar>,
    }

    #[async_trait]
    impl DataSource for StubSource {
        async fn fetch_news(&self) -> Vec<Article> {
            self.articles.clone()
        }

        async fn fetch_prices(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Vec<PriceBar> {
            self.bars.clone()
        }

        async fn fetch_regulatory_news(&self, _: &str, _: u32) -> Vec<RegulatoryDocument> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Mutex<Vec<ChartOverlay>>,
    }

    impl GraphRenderer for RecordingRenderer {
        fn render(&self, overlay: &ChartOverlay) -> Result<()> {
            self.rendered.lock().unwrap().push(overlay.clone());
            Ok(())
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn build_router(articles: Vec<Article>, bars: Vec<PriceBar>) -> (QueryRouter, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::default());
        let router = QueryRouter::new(
            Arc::new(StubSource { articles, bars }),
            Arc::new(LexiconScorer::new()),
            Arc::new(ExtractiveSummarizer),
            renderer.clone(),
        )
        .with_clock(fixed_today);
        (router, renderer)
    }

    fn sample_articles() -> Vec<Article> {
        (1..=6)
            .map(|i| {
                Article::new(
                    Some(format!("Headline {i}")),
                    Some("Bitcoin rally looks strong. More later.".to_string()),
                    Some(format!("https://n.io/{i}")),
                    Some("2026-10-15T09:00:00Z".to_string()),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_respond_news_and_empty_news() {
        let (router, _) = build_router(sample_articles(), Vec::new());
        let reply = router.respond("latest news please").await;
        assert!(reply.starts_with("Here are the latest crypto news articles:\n- Headline 1 (https://n.io/1)"));
        assert_eq!(reply.lines().count(), 6);

        let (router, _) = build_router(Vec::new(), Vec::new());
        assert_eq!(router.respond("news").await, "No recent cryptocurrency news available.");
        assert_eq!(
            router.respond("sentiment").await,
            "No news available to analyze sentiment."
        );
        assert_eq!(router.respond("summary").await, "No articles available to summarize.");
    }

    #[tokio::test]
    async fn test_respond_sentiment() {
        let (router, _) = build_router(sample_articles(), Vec::new());
        let reply = router.respond("How is the market feeling?").await;
        assert!(reply.starts_with("Sentiment Analysis Result:\nOverall Sentiment: Positive"));
        assert!(reply.ends_with("Analyzed 6 article(s)"));
    }

    #[tokio::test]
    async fn test_respond_price_and_clarification() {
        let bars = vec![PriceBar { timestamp: fixed_today(), close: 2500.0 }];
        let (router, _) = build_router(Vec::new(), bars);
        assert_eq!(
            router.respond("what is the value of ethereum").await,
            "The latest price for ETH is $2500.00 USD."
        );
        assert_eq!(router.respond("price of dogecoin").await, CLARIFY_COIN);
    }

    #[tokio::test]
    async fn test_respond_graph() {
        let bars = vec![
            PriceBar { timestamp: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), close: 1.0 },
            PriceBar { timestamp: fixed_today(), close: 2.0 },
        ];
        let (router, renderer) = build_router(sample_articles(), bars);
        assert_eq!(
            router.respond("show me a graph").await,
            "Displaying the graph for Bitcoin (BTC-USD) over the past year."
        );
        let rendered = renderer.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].events.len(), 6);

        let (router, renderer) = build_router(Vec::new(), Vec::new());
        assert_eq!(router.respond("chart").await, "No price data available to display.");
        assert!(renderer.rendered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_date_and_fallback() {
        let (router, _) = build_router(Vec::new(), Vec::new());
        assert_eq!(router.respond("what's the date").await, "Today's date is October 16, 2026.");
        assert_eq!(router.respond("asdf qwer").await, UNRECOGNIZED_REPLY);
    }

    #[tokio::test]
    async fn test_agent_records_session() {
        let (router, _) = build_router(Vec::new(), Vec::new());
        let mut session = ChatLog::new();
        let reply = router.process("asdf", &mut session).await.unwrap();

        assert_eq!(reply, UNRECOGNIZED_REPLY);
        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].role, ChatRole::User);
        assert_eq!(session.turns()[1].content, UNRECOGNIZED_REPLY);
    }
}
