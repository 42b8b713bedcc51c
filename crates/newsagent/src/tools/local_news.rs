//! Tool answering from the locally stored articles

use crate::retrieval::LocalNewsAnswerer;
use crate::tools::names;
use async_trait::async_trait;
use newsagent_core::Result as AgentResult;
use newsagent_tools::Tool;

/// Retrieval over the articles file
pub struct LocalNewsTool {
    answerer: LocalNewsAnswerer,
}

impl LocalNewsTool {
    pub fn new(answerer: LocalNewsAnswerer) -> Self {
        Self { answerer }
    }
}

#[async_trait]
impl Tool for LocalNewsTool {
    async fn invoke(&self, query: &str) -> AgentResult<String> {
        Ok(self.answerer.answer(query).await?)
    }

    fn name(&self) -> &str {
        names::LOCAL_NEWS
    }

    fn description(&self) -> &str {
        "Use this tool to answer questions based on locally stored crypto news \
         from your articles.json and associated sentiment analysis."
    }
}
