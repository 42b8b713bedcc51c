//! Tool fetching the latest price of a coin named in the query

use crate::price::{extract_ticker, latest_price_message};
use crate::router::CLARIFY_COIN;
use crate::source::DataSource;
use crate::tools::names;
use async_trait::async_trait;
use chrono::Local;
use newsagent_core::Result as AgentResult;
use newsagent_tools::Tool;
use std::sync::Arc;
use tracing::debug;

/// Latest-price lookup
pub struct PriceTool {
    source: Arc<dyn DataSource>,
}

impl PriceTool {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for PriceTool {
    async fn invoke(&self, query: &str) -> AgentResult<String> {
        let Some(ticker) = extract_ticker(query) else {
            debug!("No ticker in '{query}'");
            return Ok(CLARIFY_COIN.to_string());
        };

        let today = Local::now().date_naive();
        Ok(latest_price_message(self.source.as_ref(), &ticker, today).await)
    }

    fn name(&self) -> &str {
        names::PRICE
    }

    fn description(&self) -> &str {
        "Use this tool to get the latest USD price of a cryptocurrency. \
         The input should contain a ticker such as BTC or a coin name such as bitcoin."
    }
}
