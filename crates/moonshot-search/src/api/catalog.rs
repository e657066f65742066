//! Catalog search endpoint client

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// One catalog entry returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    /// Ticker/code, unique per catalog entry
    pub stock_id: String,
    /// Display name
    pub stock_name: String,
    /// Nation/country classifier
    pub nation_type: String,
    /// Market classifier (e.g. KOSPI, NASDAQ)
    pub market: String,
}

/// Wire envelope: `{ "data": { "stockList": [...] } }`
#[derive(Debug, Deserialize)]
struct Envelope {
    data: StockListPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockListPayload {
    stock_list: Vec<StockItem>,
}

/// Source of paginated catalog search results.
///
/// The session controller only depends on this trait, so tests can drive it
/// with a scripted double instead of a live service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of results for `query`.
    ///
    /// Returns the items in service order, at most `page_size` of them. A
    /// page shorter than `page_size` means there are no further pages.
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<StockItem>>;
}

/// HTTP client for the catalog search endpoint
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl CatalogClient {
    /// Create a client from the session configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<StockItem>> {
        let url = format!("{}/service/stock", self.base_url);
        // The service matches the query against both the code and the name.
        let response = self
            .client
            .get(&url)
            .query(&[
                ("stockId", query),
                ("stockName", query),
                ("page", &page.to_string()),
                ("size", &self.page_size.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        Ok(envelope.data.stock_list)
    }
}
