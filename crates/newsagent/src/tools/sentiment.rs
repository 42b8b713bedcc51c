//! Tool scoring the sentiment of freshly fetched news

use crate::sentiment::SentimentScorer;
use crate::source::DataSource;
use crate::tools::names;
use async_trait::async_trait;
use newsagent_core::Result as AgentResult;
use newsagent_tools::Tool;
use std::sync::Arc;

/// Aggregate sentiment over the latest articles
pub struct SentimentTool {
    source: Arc<dyn DataSource>,
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentTool {
    pub fn new(source: Arc<dyn DataSource>, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { source, scorer }
    }
}

#[async_trait]
impl Tool for SentimentTool {
    async fn invoke(&self, _query: &str) -> AgentResult<String> {
        let articles = self.source.fetch_news().await;
        Ok(match self.scorer.score_articles(&articles) {
            Some(result) => format!("Sentiment Analysis Result:\n{}", result.format()),
            None => "No news available to analyze sentiment.".to_string(),
        })
    }

    fn name(&self) -> &str {
        names::SENTIMENT
    }

    fn description(&self) -> &str {
        "Use this tool to analyze the overall sentiment of the latest crypto news articles."
    }
}
