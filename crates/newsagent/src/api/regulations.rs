//! Regulations.gov client for government documents on crypto
//!
//! Endpoint: https://api.regulations.gov/v4/documents

use crate::api::{ensure_success, http_client};
use crate::error::Result;
use crate::models::{NO_TITLE, RegulatoryDocument};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "Regulations.gov";
const DOCUMENTS_URL: &str = "https://api.regulations.gov/v4/documents";
const DOCUMENT_PAGE_URL: &str = "https://www.regulations.gov/document";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttributes {
    title: Option<String>,
    document_type: Option<String>,
    posted_date: Option<String>,
    docket_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: RawAttributes,
}

#[derive(Debug, Clone, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    data: Vec<RawDocument>,
}

/// Regulations.gov API client
pub struct RegulationsGovClient {
    client: Client,
    api_key: String,
}

impl RegulationsGovClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
        })
    }

    /// Search documents matching `query`, at most `page_size` of them
    #[instrument(skip(self))]
    pub async fn search_documents(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<Vec<RegulatoryDocument>> {
        let page_size = page_size.to_string();
        let params = [
            ("api_key", self.api_key.as_str()),
            ("filter[searchTerm]", query),
            ("page[size]", page_size.as_str()),
        ];

        let response = self
            .client
            .get(DOCUMENTS_URL)
            .query(&params)
            .send()
            .await?;

        let body: DocumentsResponse = ensure_success(PROVIDER, response).await?.json().await?;
        let documents = parse_documents(body);
        debug!("{PROVIDER} returned {} documents", documents.len());
        Ok(documents)
    }
}

fn parse_documents(body: DocumentsResponse) -> Vec<RegulatoryDocument> {
    body.data
        .into_iter()
        .map(|doc| {
            let attrs = doc.attributes;
            RegulatoryDocument {
                title: attrs.title.unwrap_or_else(|| NO_TITLE.to_string()),
                document_type: attrs.document_type.unwrap_or_else(|| UNKNOWN.to_string()),
                posted_date: attrs.posted_date.unwrap_or_else(|| UNKNOWN.to_string()),
                docket_id: attrs.docket_id.unwrap_or_else(|| UNKNOWN.to_string()),
                url: format!("{DOCUMENT_PAGE_URL}/{}", doc.id),
            }
        })
        .collect()
}

/// Numbered listing of documents under a "Top Five Government Articles" heading
pub fn format_top_documents(documents: &[RegulatoryDocument]) -> String {
    if documents.is_empty() {
        return "No articles found.".to_string();
    }

    let mut out = String::from("Top Five Government Articles:\n");
    for (i, doc) in documents.iter().take(5).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, doc.title));
        out.push_str(&format!("   Type: {}\n", doc.document_type));
        out.push_str(&format!("   Posted Date: {}\n", doc.posted_date));
        out.push_str(&format!("   Docket ID: {}\n", doc.docket_id));
        out.push_str(&format!("   URL: {}\n\n", doc.url));
    }
    out
}
