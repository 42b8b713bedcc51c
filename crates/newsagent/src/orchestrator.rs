//! Multi-agent orchestrator choosing among capability tools
//!
//! A [`ToolSelector`] turns the raw query into an ordered list of candidate
//! tool names. Candidates are tried in order: unregistered tools are skipped
//! and a failing tool hands over to the next one. The orchestrator itself
//! never fails; when nothing answers it replies with a fixed message.

use crate::api::SerpApiClient;
use crate::cache::ArticleStore;
use crate::config::{NewsAgentConfig, env_keys};
use crate::error::Result;
use crate::llm::ChatModel;
use crate::retrieval::LocalNewsAnswerer;
use crate::sentiment::LexiconScorer;
use crate::source::DataSource;
use crate::tools::{LocalNewsTool, PriceTool, SentimentTool, WebSearchTool, names};
use async_trait::async_trait;
use newsagent_core::{Agent, ChatLog};
use newsagent_tools::{Tool, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reply when no candidate tool produced an answer
pub const UNAVAILABLE_REPLY: &str =
    "I'm sorry, I couldn't find an answer to that right now. Please try again later.";

/// Picks candidate tools for a query, best first
#[async_trait]
pub trait ToolSelector: Send + Sync {
    /// Ordered candidate tool names; may include tools that are not registered
    async fn select(&self, query: &str, registry: &ToolRegistry) -> Vec<String>;

    /// Selector name, for logs
    fn name(&self) -> &str;
}

/// Keywords for tool selection, matched as substrings of the lower-cased query
mod keywords {
    pub const SENTIMENT: &[&str] = &["sentiment", "tone", "positive", "negative", "emotion", "feeling"];
    pub const PRICE: &[&str] = &["price", "cost", "value"];
    pub const REALTIME: &[&str] = &[
        "latest",
        "today",
        "current",
        "real-time",
        "realtime",
        "live",
        "trend",
        "search",
        "web",
    ];
    pub const LOCAL_NEWS: &[&str] = &["news", "summarize", "summary"];
}

/// Deterministic keyword table
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTableSelector;

impl RuleTableSelector {
    /// Candidate tools for `query`
    pub fn candidates(query: &str) -> Vec<&'static str> {
        let text = query.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if mentions(keywords::SENTIMENT) {
            vec![names::SENTIMENT]
        } else if mentions(keywords::PRICE) {
            vec![names::PRICE]
        } else if mentions(keywords::REALTIME) {
            vec![names::WEB_SEARCH, names::LOCAL_NEWS]
        } else if mentions(keywords::LOCAL_NEWS) {
            vec![names::LOCAL_NEWS]
        } else {
            vec![names::LOCAL_NEWS, names::WEB_SEARCH]
        }
    }
}

#[async_trait]
impl ToolSelector for RuleTableSelector {
    async fn select(&self, query: &str, _registry: &ToolRegistry) -> Vec<String> {
        Self::candidates(query).into_iter().map(str::to_string).collect()
    }

    fn name(&self) -> &str {
        "rule-table"
    }
}

const SELECTOR_SYSTEM: &str = "You route questions about cryptocurrency to tools. \
Reply with the exact name of the single best tool and nothing else.";

/// Lets the model pick a tool from the registry descriptions
///
/// The model's pick goes first, followed by the rule-table candidates. An
/// unusable reply or a model error falls back to the rule table alone.
pub struct LlmToolSelector {
    model: ChatModel,
}

impl LlmToolSelector {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }

    /// Registered tool named in `reply`, if any
    fn parse_choice<'a>(reply: &str, registry: &'a ToolRegistry) -> Option<&'a str> {
        let reply = reply.to_lowercase();
        registry
            .names()
            .into_iter()
            .find(|name| reply.contains(&name.to_lowercase()))
    }
}

#[async_trait]
impl ToolSelector for LlmToolSelector {
    async fn select(&self, query: &str, registry: &ToolRegistry) -> Vec<String> {
        let fallback = RuleTableSelector::candidates(query);
        let prompt = format!("Tools:\n{}\n\nQuestion: {query}\nTool:", registry.describe());

        let choice = match self.model.ask(Some(SELECTOR_SYSTEM), &prompt).await {
            Ok(reply) => Self::parse_choice(&reply, registry).map(str::to_string),
            Err(e) => {
                warn!("LLM tool selection failed, using rule table: {e}");
                None
            }
        };

        match choice {
            Some(choice) => {
                debug!("LLM picked '{choice}'");
                let mut candidates = vec![choice];
                for name in fallback {
                    if !candidates.iter().any(|c| c == name) {
                        candidates.push(name.to_string());
                    }
                }
                candidates
            }
            None => fallback.into_iter().map(str::to_string).collect(),
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Register the tools whose prerequisites are met
///
/// Local retrieval, price and sentiment are always present; web search only
/// with a SerpAPI key.
pub fn build_registry(
    config: &NewsAgentConfig,
    source: Arc<dyn DataSource>,
    model: Option<ChatModel>,
) -> Result<ToolRegistry> {
    let answerer = LocalNewsAnswerer::new(ArticleStore::new(&config.articles_path), model);

    let web_search = NewsAgentConfig::gated(
        &config.serpapi_api_key,
        env_keys::SERPAPI_API_KEY,
        "Web search",
        |key| SerpApiClient::new(key, config.request_timeout),
    )?
    .map(|client| Arc::new(WebSearchTool::new(client)) as Arc<dyn Tool>);

    Ok(ToolRegistry::builder()
        .tool(Arc::new(LocalNewsTool::new(answerer)))
        .tool(Arc::new(PriceTool::new(Arc::clone(&source))))
        .tool(Arc::new(SentimentTool::new(source, Arc::new(LexiconScorer::new()))))
        .tool_if_available(web_search)
        .build())
}

/// Answers free-text questions through the registered tools
pub struct MultiAgentOrchestrator {
    registry: ToolRegistry,
    selector: Arc<dyn ToolSelector>,
}

impl MultiAgentOrchestrator {
    pub fn new(registry: ToolRegistry, selector: Arc<dyn ToolSelector>) -> Self {
        Self { registry, selector }
    }

    /// Orchestrator over the configured tools
    ///
    /// With `llm_selection` and a model available, tools are picked by the
    /// model; otherwise by the rule table.
    pub fn from_config(
        config: &NewsAgentConfig,
        source: Arc<dyn DataSource>,
        model: Option<ChatModel>,
        llm_selection: bool,
    ) -> Result<Self> {
        let selector: Arc<dyn ToolSelector> = match (&model, llm_selection) {
            (Some(model), true) => Arc::new(LlmToolSelector::new(model.clone())),
            (None, true) => {
                warn!("LLM tool selection requested without an LLM; using the rule table");
                Arc::new(RuleTableSelector)
            }
            _ => Arc::new(RuleTableSelector),
        };

        let registry = build_registry(config, source, model)?;
        info!(
            "Orchestrator ready with tools [{}] and {} selection",
            registry.names().join(", "),
            selector.name()
        );
        Ok(Self::new(registry, selector))
    }

    /// Registered tools
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer `query`; never fails
    pub async fn ask(&self, query: &str) -> String {
        let candidates = self.selector.select(query, &self.registry).await;
        debug!("Candidates for '{}': {:?}", query.trim(), candidates);

        for name in &candidates {
            let Some(tool) = self.registry.get(name) else {
                debug!("Tool '{name}' is not registered, skipping");
                continue;
            };

            match tool.invoke(query).await {
                Ok(answer) if !answer.trim().is_empty() => {
                    info!("Answered by '{name}'");
                    return answer;
                }
                Ok(_) => warn!("Tool '{name}' returned an empty answer"),
                Err(e) => warn!("Tool '{name}' failed: {e}"),
            }
        }

        UNAVAILABLE_REPLY.to_string()
    }
}

#[async_trait]
impl Agent for MultiAgentOrchestrator {
    async fn process(&self, input: &str, session: &mut ChatLog) -> newsagent_core::Result<String> {
        session.push_user(input);
        let reply = self.ask(input).await;
        session.push_assistant(reply.clone());
        Ok(reply)
    }

    fn name(&self) -> &str {
        "multi-agent"
    }
}
