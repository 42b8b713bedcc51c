//! Two-sentence article summaries

use crate::llm::ChatModel;
use crate::models::{Article, ArticleSummary};
use async_trait::async_trait;
use tracing::{info, warn};

/// Articles summarized per batch
pub const SUMMARY_BATCH: usize = 5;

/// Placeholder when a single summary could not be produced
pub const NO_SUMMARY: &str = "No summary available";

/// Summarizes the leading articles of a batch
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summaries of at most the first [`SUMMARY_BATCH`] articles, in order
    async fn summarize(&self, articles: &[Article]) -> Vec<ArticleSummary>;
}

fn summary_of(article: &Article, summary: String) -> ArticleSummary {
    ArticleSummary {
        title: article.title.clone(),
        summary,
        url: article.url.clone(),
    }
}

/// Summarizer asking the chat model for each article
pub struct LlmSummarizer {
    model: ChatModel,
}

impl LlmSummarizer {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }

    fn prompt(article: &Article) -> String {
        format!(
            "Summarize the following news article in two sentences:\n\nTitle: {}\nContent: {}",
            article.title, article.content
        )
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, articles: &[Article]) -> Vec<ArticleSummary> {
        let mut summaries = Vec::new();
        for article in articles.iter().take(SUMMARY_BATCH) {
            let summary = match self.model.ask(None, &Self::prompt(article)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Summary of '{}' failed: {e}", article.title);
                    NO_SUMMARY.to_string()
                }
            };
            summaries.push(summary_of(article, summary));
        }
        info!("Summarized {} articles", summaries.len());
        summaries
    }
}

/// Summarizer keeping the first two sentences of each article
///
/// Used when no LLM is configured.
#[derive(Debug, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    /// First two sentences of `text`
    pub fn lead(text: &str) -> Option<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for (i, c) in text.char_indices() {
            if matches!(c, '.' | '!' | '?') {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
                if sentences.len() == 2 {
                    break;
                }
            }
        }
        if sentences.len() < 2 {
            let rest = text[start..].trim();
            if !rest.is_empty() {
                sentences.push(rest);
            }
        }

        let lead = sentences.join(" ");
        if lead.is_empty() { None } else { Some(lead) }
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, articles: &[Article]) -> Vec<ArticleSummary> {
        articles
            .iter()
            .take(SUMMARY_BATCH)
            .map(|article| {
                let summary = Self::lead(&article.content).unwrap_or_else(|| NO_SUMMARY.to_string());
                summary_of(article, summary)
            })
            .collect()
    }
}

/// Reply for a summary request
pub fn format_summaries(summaries: &[ArticleSummary]) -> String {
    if summaries.is_empty() {
        return "No articles available to summarize.".to_string();
    }

    let lines: Vec<String> = summaries
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.summary))
        .collect();
    format!("Here are the summaries of the latest articles:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use std::sync::Arc;

    fn articles(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| {
                Article::new(
                    Some(format!("Title {i}")),
                    Some(format!("First {i}. Second {i}! Third {i}.")),
                    Some(format!("https://n.io/{i}")),
                    None,
                )
            })
            .collect()
    }

    #[test]
    fn test_lead() {
        assert_eq!(
            ExtractiveSummarizer::lead("One. Two? Three.").as_deref(),
            Some("One. Two?")
        );
        assert_eq!(ExtractiveSummarizer::lead("No terminator").as_deref(), Some("No terminator"));
        assert_eq!(ExtractiveSummarizer::lead("Only. then more").as_deref(), Some("Only. then more"));
        assert_eq!(ExtractiveSummarizer::lead("   "), None);
    }

    #[tokio::test]
    async fn test_extractive_limits_batch() {
        let summaries = ExtractiveSummarizer.summarize(&articles(7)).await;
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].summary, "First 0. Second 0!");
        assert_eq!(summaries[4].url, "https://n.io/4");

        let empty = vec![Article::new(Some("t".into()), None, None, None)];
        assert_eq!(ExtractiveSummarizer.summarize(&empty).await[0].summary, NO_SUMMARY);
    }

    #[tokio::test]
    async fn test_llm_summarizer_prompt() {
        let provider = Arc::new(ScriptedProvider::replying("Two sentences."));
        let summarizer = LlmSummarizer::new(ChatModel::new(provider.clone(), "m"));

        let summaries = summarizer.summarize(&articles(1)).await;
        assert_eq!(summaries[0].summary, "Two sentences.");
        assert_eq!(
            provider.last_prompt().unwrap(),
            "Summarize the following news article in two sentences:\n\nTitle: Title 0\nContent: First 0. Second 0! Third 0."
        );
    }

    #[tokio::test]
    async fn test_llm_failure_yields_placeholder() {
        let summarizer = LlmSummarizer::new(ChatModel::new(Arc::new(ScriptedProvider::failing()), "m"));
        let summaries = summarizer.summarize(&articles(2)).await;
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.summary == NO_SUMMARY));
    }

    #[test]
    fn test_format_summaries() {
        assert_eq!(format_summaries(&[]), "No articles available to summarize.");
        let s = ArticleSummary {
            title: "A".into(),
            summary: "B".into(),
            url: "#".into(),
        };
        assert_eq!(
            format_summaries(&[s]),
            "Here are the summaries of the latest articles:\n- A: B"
        );
    }
}
