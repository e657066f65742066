//! Configuration for the search session

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the search session and its HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the stock service
    pub base_url: String,

    /// Number of items requested per page
    pub page_size: usize,

    /// Quiet interval before a typed query is fetched
    pub debounce: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            page_size: 100,
            debounce: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchConfig {
    /// Create a new configuration builder
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SearchError::Config(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for SearchConfig
#[derive(Debug, Default)]
pub struct SearchConfigBuilder {
    base_url: Option<String>,
    page_size: Option<usize>,
    debounce: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl SearchConfigBuilder {
    /// Set the service base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the debounce quiet interval
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = Some(interval);
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            debounce: self.debounce.unwrap_or(defaults.debounce),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        }
    }
}
