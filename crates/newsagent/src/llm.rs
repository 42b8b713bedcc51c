//! Thin wrapper pairing an LLM provider with a model name

use crate::config::{NewsAgentConfig, env_keys};
use crate::error::{NewsError, Result};
use newsagent_llm::providers::{OpenAIConfig, OpenAIProvider};
use newsagent_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use std::sync::Arc;
use tracing::{debug, warn};

/// A provider bound to one model
#[derive(Clone)]
pub struct ChatModel {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// OpenAI-compatible model from the configuration, `None` without a key
    pub fn from_config(config: &NewsAgentConfig) -> Option<Self> {
        let provider = NewsAgentConfig::gated(
            &config.openai_api_key,
            env_keys::OPENAI_API_KEY,
            "LLM support",
            |key| {
                let mut openai =
                    OpenAIConfig::new(key).with_timeout(config.request_timeout.as_secs().max(1));
                if let Some(base) = &config.openai_api_base {
                    openai = openai.with_api_base(base);
                }
                Ok(OpenAIProvider::with_config(openai)?)
            },
        );

        match provider {
            Ok(provider) => {
                provider.map(|provider| Self::new(Arc::new(provider), &config.openai_model))
            }
            Err(e) => {
                warn!("Could not create OpenAI provider: {e}");
                None
            }
        }
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the reply text
    pub async fn ask(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let mut builder = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .temperature(0.0);
        if let Some(system) = system {
            builder = builder.system(system);
        }

        let response = self.provider.complete(builder.build()).await?;
        debug!(
            "{} replied using {} tokens",
            self.provider.name(),
            response.usage.total()
        );

        response
            .message
            .text()
            .map(str::to_string)
            .ok_or_else(|| NewsError::Llm(LLMError::UnexpectedResponse("empty reply".to_string())))
    }
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish()
    }
}
