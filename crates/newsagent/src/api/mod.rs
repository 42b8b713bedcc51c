//! API clients for the upstream news, price, regulatory and search providers

pub mod financial_datasets;
pub mod newsapi;
pub mod regulations;
pub mod serpapi;

pub use financial_datasets::FinancialDatasetsClient;
pub use newsapi::NewsApiClient;
pub use regulations::RegulationsGovClient;
pub use serpapi::{SearchResults, SerpApiClient};

use crate::error::{NewsError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// Build an HTTP client with the configured timeout
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Turn a non-2xx response into `UpstreamUnavailable`
pub(crate) async fn ensure_success(provider: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(NewsError::upstream(provider, format!("HTTP {status}: {body}")))
}
