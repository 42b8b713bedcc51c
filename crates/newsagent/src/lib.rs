//! Crypto news aggregation and query agents
//!
//! This crate fetches cryptocurrency news, prices and regulatory documents,
//! scores news sentiment, overlays news on price history and answers
//! free-text questions. It includes:
//!
//! - Data sources for NewsAPI, Financial Datasets and Regulations.gov
//! - Lexicon sentiment scoring with batch confidence
//! - Nearest-date alignment of news onto price series
//! - A keyword [`QueryRouter`] for single-purpose questions
//! - A [`MultiAgentOrchestrator`] choosing among retrieval, web search,
//!   price and sentiment tools
//! - An hourly collection job with summaries
//!
//! # Example
//!
//! ```rust,no_run
//! use newsagent::{LiveDataSource, NewsAgentConfig, QueryRouter};
//! use newsagent::chart::TextChartRenderer;
//! use newsagent::sentiment::LexiconScorer;
//! use newsagent::summarizer::ExtractiveSummarizer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = NewsAgentConfig::from_env()?;
//!     let source = Arc::new(LiveDataSource::from_config(&config)?);
//!
//!     let router = QueryRouter::new(
//!         source,
//!         Arc::new(LexiconScorer::new()),
//!         Arc::new(ExtractiveSummarizer),
//!         Arc::new(TextChartRenderer::default()),
//!     );
//!     println!("{}", router.respond("What's the price of bitcoin?").await);
//!     Ok(())
//! }
//! ```

pub mod aligner;
pub mod api;
pub mod cache;
pub mod chart;
pub mod collector;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod price;
pub mod retrieval;
pub mod router;
pub mod sentiment;
pub mod source;
pub mod summarizer;
pub mod tools;

// Re-export main types for convenience
pub use aligner::{AlignedEvent, EventAligner};
pub use config::NewsAgentConfig;
pub use error::{NewsError, Result};
pub use models::{Article, ArticleSummary, PriceBar, RegulatoryDocument};
pub use orchestrator::{LlmToolSelector, MultiAgentOrchestrator, RuleTableSelector, ToolSelector};
pub use router::{Intent, QueryRouter};
pub use sentiment::{SentimentResult, SentimentScorer};
pub use source::{DataSource, LiveDataSource};
