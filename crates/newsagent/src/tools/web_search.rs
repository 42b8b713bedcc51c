//! Tool searching the web in real time

use crate::api::SerpApiClient;
use crate::tools::names;
use async_trait::async_trait;
use newsagent_core::Result as AgentResult;
use newsagent_tools::Tool;

/// Live web search through SerpAPI
pub struct WebSearchTool {
    client: SerpApiClient,
}

impl WebSearchTool {
    pub fn new(client: SerpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn invoke(&self, query: &str) -> AgentResult<String> {
        let results = self.client.search(query).await?;
        if results.is_empty() {
            return Ok(format!("No web results found for \"{}\".", query.trim()));
        }
        Ok(results.render())
    }

    fn name(&self) -> &str {
        names::WEB_SEARCH
    }

    fn description(&self) -> &str {
        "Use this tool to search the web in real time for the latest crypto news and trends."
    }
}
