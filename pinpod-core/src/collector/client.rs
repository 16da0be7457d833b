//! HTTP client for the analytics collection endpoint

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::CollectorConfig;
use crate::error::{Error, Result};

/// HTTP client for the collection endpoint
#[derive(Debug)]
pub struct CollectorClient {
    http_client: reqwest::Client,
    endpoint_url: String,
}

impl CollectorClient {
    /// Create a new collector client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        config.validate()?;

        let endpoint_url = config
            .endpoint_url()
            .ok_or_else(|| Error::Config("collector.base_url is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint_url,
        })
    }

    /// Post one serialized event body
    ///
    /// Only transport failures are errors; any HTTP status is returned as-is
    /// because the endpoint's response is never acted upon.
    pub async fn post(&self, body: Vec<u8>) -> Result<StatusCode> {
        let response = self
            .http_client
            .post(&self.endpoint_url)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Collector(format!("HTTP request failed: {}", e)))?;

        Ok(response.status())
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}
