//! Core Agent trait definition

use crate::{ChatLog, Result};
use async_trait::async_trait;

/// Core trait that all chat-facing agents implement
///
/// Agents answer one query at a time. The session log is owned by the calling
/// surface and handed in by reference so the agent can record the exchange;
/// agents never read earlier turns when deciding how to answer.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer a single query
    ///
    /// Implementations append the user turn and their reply to `session`.
    async fn process(&self, input: &str, session: &mut ChatLog) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
