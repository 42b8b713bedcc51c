//! Capability tools composed by the multi-agent orchestrator

pub mod local_news;
pub mod price;
pub mod sentiment;
pub mod web_search;

pub use local_news::LocalNewsTool;
pub use price::PriceTool;
pub use sentiment::SentimentTool;
pub use web_search::WebSearchTool;

/// Registered tool names
pub mod names {
    pub const LOCAL_NEWS: &str = "Local News Retrieval";
    pub const PRICE: &str = "Crypto Price Fetcher";
    pub const SENTIMENT: &str = "Crypto Sentiment Analysis";
    pub const WEB_SEARCH: &str = "Real-Time Web Search";
}
