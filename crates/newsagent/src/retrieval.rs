//! Question answering over the locally stored articles
//!
//! Articles are rendered to plain documents, cut into overlapping chunks and
//! ranked against the question by shared terms. The best chunks become the
//! context of an LLM prompt.

use crate::cache::ArticleStore;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::models::Article;
use std::collections::HashSet;
use tracing::{debug, info};

/// Characters per chunk
pub const CHUNK_SIZE: usize = 500;

/// Characters shared by consecutive chunks
pub const CHUNK_OVERLAP: usize = 50;

/// Chunks handed to the model
pub const TOP_K: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "what", "which", "who", "how", "why", "when", "with",
    "about", "from", "that", "this", "there", "their", "have", "has", "any", "you", "your",
    "tell", "give", "does", "did", "can", "its", "into", "over", "than", "then", "them",
];

const QA_SYSTEM: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Render an article as a retrievable document
pub fn render_document(article: &Article) -> String {
    format!(
        "Title: {}\nContent: {}\nURL: {}",
        article.title, article.content, article.url
    )
}

/// Split `text` into windows of `size` characters overlapping by `overlap`
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let size = size.max(1);
    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

fn terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// The `k` chunks sharing the most terms with `query`, best first
///
/// Equal scores keep document order.
pub fn top_chunks<'a>(chunks: &'a [String], query: &str, k: usize) -> Vec<&'a str> {
    let query_terms = terms(query);
    let mut scored: Vec<(usize, &str)> = chunks
        .iter()
        .map(|chunk| {
            let chunk_terms = terms(chunk);
            (query_terms.intersection(&chunk_terms).count(), chunk.as_str())
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
}

/// Answers questions from the articles file
pub struct LocalNewsAnswerer {
    store: ArticleStore,
    model: Option<ChatModel>,
}

impl LocalNewsAnswerer {
    /// Without a model, answers are the retrieved passages themselves
    pub fn new(store: ArticleStore, model: Option<ChatModel>) -> Self {
        Self { store, model }
    }

    /// Answer `question`
    ///
    /// Fails only when the articles file is unreadable or the model errors.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let articles = self.store.load().await?;

        if articles.is_empty() {
            info!("No stored articles; answering without retrieval");
            return match &self.model {
                Some(model) => model.ask(None, question).await,
                None => Ok("No locally stored news articles are available.".to_string()),
            };
        }

        let chunks: Vec<String> = articles
            .iter()
            .flat_map(|a| chunk_text(&render_document(a), CHUNK_SIZE, CHUNK_OVERLAP))
            .collect();
        let context = top_chunks(&chunks, question, TOP_K);
        debug!(
            "Retrieved {} of {} chunks from {} articles",
            context.len(),
            chunks.len(),
            articles.len()
        );

        match &self.model {
            Some(model) => {
                let prompt = format!(
                    "{}\n\nQuestion: {question}\nHelpful Answer:",
                    context.join("\n\n")
                );
                model.ask(Some(QA_SYSTEM), &prompt).await
            }
            None => Ok(format!("Relevant local news:\n\n{}", context.join("\n---\n"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_chunk_text() {
        assert!(chunk_text("", 10, 2).is_empty());
        assert_eq!(chunk_text("abcdef", 10, 2), vec!["abcdef"]);
        assert_eq!(chunk_text("abcdefghij", 4, 1), vec!["abcd", "defg", "ghij"]);

        let long = "x".repeat(1200);
        let chunks = chunk_text(&long, CHUNK_SIZE, CHUNK_OVERLAP);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= CHUNK_SIZE));
    }

    #[test]
    fn test_top_chunks() {
        let chunks = vec![
            "Solana network outage".to_string(),
            "Bitcoin ETF approval lifts bitcoin price".to_string(),
            "Ethereum upgrade ships".to_string(),
        ];
        let top = top_chunks(&chunks, "What about the bitcoin ETF?", 2);
        assert_eq!(top[0], "Bitcoin ETF approval lifts bitcoin price");
        assert_eq!(top.len(), 2);
        assert_eq!(top[1], "Solana network outage");
    }

    #[test]
    fn test_render_document() {
        let a = Article::new(Some("T".into()), Some("C".into()), Some("U".into()), None);
        assert_eq!(render_document(&a), "Title: T\nContent: C\nURL: U");
    }

    async fn store_with(dir: &TempDir, articles: &[Article]) -> ArticleStore {
        let store = ArticleStore::new(dir.path().join("articles.json"));
        store.save(articles).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_answer_with_model_uses_context() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            &[Article::new(
                Some("Bitcoin ETF approved".into()),
                Some("Regulators approved a spot bitcoin ETF.".into()),
                Some("https://n.io/etf".into()),
                None,
            )],
        )
        .await;
        let provider = Arc::new(ScriptedProvider::replying("An ETF was approved."));
        let answerer = LocalNewsAnswerer::new(store, Some(ChatModel::new(provider.clone(), "m")));

        let answer = answerer.answer("Was a bitcoin ETF approved?").await.unwrap();
        assert_eq!(answer, "An ETF was approved.");
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("Title: Bitcoin ETF approved"));
        assert!(prompt.ends_with("Question: Was a bitcoin ETF approved?\nHelpful Answer:"));
    }

    #[tokio::test]
    async fn test_answer_without_model_returns_passages() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            &[Article::new(Some("Litecoin halving".into()), Some("Soon.".into()), None, None)],
        )
        .await;
        let answerer = LocalNewsAnswerer::new(store, None);

        let answer = answerer.answer("litecoin").await.unwrap();
        assert!(answer.starts_with("Relevant local news:\n\nTitle: Litecoin halving"));
    }

    #[tokio::test]
    async fn test_answer_without_articles() {
        let dir = TempDir::new().unwrap();
        let store = ArticleStore::new(dir.path().join("missing.json"));

        let answerer = LocalNewsAnswerer::new(store.clone(), None);
        assert_eq!(
            answerer.answer("anything").await.unwrap(),
            "No locally stored news articles are available."
        );

        let provider = Arc::new(ScriptedProvider::replying("General answer."));
        let answerer = LocalNewsAnswerer::new(store, Some(ChatModel::new(provider.clone(), "m")));
        assert_eq!(answerer.answer("What is DeFi?").await.unwrap(), "General answer.");
        assert_eq!(provider.last_prompt().unwrap(), "What is DeFi?");
    }

    #[tokio::test]
    async fn test_model_failure_is_error() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[Article::new(Some("x".into()), None, None, None)]).await;
        let answerer =
            LocalNewsAnswerer::new(store, Some(ChatModel::new(Arc::new(ScriptedProvider::failing()), "m")));
        assert!(answerer.answer("x").await.is_err());
    }
}
