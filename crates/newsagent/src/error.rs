//! Error types for news, price and routing operations

use thiserror::Error;

/// Errors raised inside the news agent
///
/// None of these reach the interactive surface: every user-facing path turns
/// them into a plain message.
#[derive(Debug, Error)]
pub enum NewsError {
    /// A third-party fetch failed
    #[error("{provider} unavailable: {reason}")]
    UpstreamUnavailable { provider: String, reason: String },

    /// A required parameter could not be extracted from the query
    #[error("Unparseable query: {0}")]
    UnparseableQuery(String),

    /// A credential required by a capability is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// No price points to align events against
    #[error("No reference dates to align against")]
    EmptyReference,

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM call failed
    #[error("LLM error: {0}")]
    Llm(#[from] newsagent_llm::LLMError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl NewsError {
    /// Shorthand for an upstream failure
    pub fn upstream(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for news agent operations
pub type Result<T> = std::result::Result<T, NewsError>;

/// Convert NewsError to newsagent_core::Error
impl From<NewsError> for newsagent_core::Error {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::ConfigurationMissing(msg) => newsagent_core::Error::ConfigurationMissing(msg),
            other => newsagent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

/// Convert newsagent_core::Error to NewsError
impl From<newsagent_core::Error> for NewsError {
    fn from(err: newsagent_core::Error) -> Self {
        NewsError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NewsError::upstream("NewsAPI", "HTTP 500");
        assert_eq!(err.to_string(), "NewsAPI unavailable: HTTP 500");

        let err = NewsError::UnparseableQuery("no ticker".to_string());
        assert_eq!(err.to_string(), "Unparseable query: no ticker");

        assert_eq!(
            NewsError::EmptyReference.to_string(),
            "No reference dates to align against"
        );
    }

    #[test]
    fn test_error_conversion() {
        let core: newsagent_core::Error =
            NewsError::ConfigurationMissing("SERPAPI_API_KEY".to_string()).into();
        assert!(matches!(core, newsagent_core::Error::ConfigurationMissing(_)));

        let core: newsagent_core::Error = NewsError::upstream("SerpAPI", "timeout").into();
        match core {
            newsagent_core::Error::ProcessingFailed(msg) => assert!(msg.contains("SerpAPI")),
            _ => panic!("Expected ProcessingFailed variant"),
        }
    }
}
