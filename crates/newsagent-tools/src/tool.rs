//! Tool trait definition

use async_trait::async_trait;
use newsagent_core::Result;

/// Trait for tools that an orchestrator can invoke
///
/// Each tool is registered under a unique name together with a description of
/// what it can answer. The description is what a selector (rule table or LLM)
/// reads when deciding which tool fits a query.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Answer `query` using this tool's capability
    ///
    /// The query is passed through unmodified. Errors are reported to the
    /// orchestrator, which decides whether another tool should be consulted.
    async fn invoke(&self, query: &str) -> Result<String>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's capability description
    fn description(&self) -> &str;
}
