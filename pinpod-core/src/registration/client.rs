//! HTTP client for the registration backend
//!
//! Talks to a PostgREST endpoint (as exposed by Supabase) using the
//! project's anon key.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::BackendConfig;
use crate::error::{Error, Result};

use super::{AnalyticsRow, EarlyAccessForm, Feedback, FeedbackRow, UserRecord};

/// HTTP client for the registration backend
#[derive(Debug)]
pub struct BackendClient {
    config: BackendConfig,
    http_client: reqwest::Client,
    rest_url: String,
}

impl BackendClient {
    /// Create a new backend client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;

        let rest_url = config
            .url
            .as_deref()
            .ok_or_else(|| Error::Config("backend.url is required".to_string()))?
            .trim_end_matches('/')
            .to_string()
            + "/rest/v1";

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(anon_key) = &config.anon_key {
            headers.insert(
                "apikey",
                HeaderValue::from_str(anon_key)
                    .map_err(|e| Error::Config(format!("invalid anon_key: {}", e)))?,
            );
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", anon_key))
                    .map_err(|e| Error::Config(format!("invalid anon_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            rest_url,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, urlencoding::encode(table))
    }

    /// Insert rows and return them as stored
    async fn insert<T, R>(&self, table: &str, rows: &[T]) -> Result<Vec<R>>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("HTTP request failed: {}", e)))?;

        read_rows(response).await
    }

    /// Read all rows, newest first by `order_column`
    async fn select<R: DeserializeOwned>(&self, table: &str, order_column: &str) -> Result<Vec<R>> {
        let order = format!("{}.desc", order_column);
        let response = self
            .http_client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", order.as_str())])
            .send()
            .await
            .map_err(|e| Error::Backend(format!("HTTP request failed: {}", e)))?;

        read_rows(response).await
    }

    /// Store an early-access registration with status `pending`
    pub async fn register_user(&self, form: &EarlyAccessForm) -> Result<Vec<UserRecord>> {
        let record = UserRecord::pending(form);
        let rows = self.insert(&self.config.users_table, &[record]).await?;
        tracing::info!(email = %form.email, "Registered early-access user");
        Ok(rows)
    }

    /// Store a server-side analytics row
    pub async fn track_event(&self, row: &AnalyticsRow) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .insert(&self.config.analytics_table, std::slice::from_ref(row))
            .await?;
        Ok(())
    }

    /// Store a feedback submission
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<Vec<FeedbackRow>> {
        let row = FeedbackRow::from_feedback(feedback);
        self.insert(&self.config.feedback_table, &[row]).await
    }

    /// All registered users, newest first
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.select(&self.config.users_table, "created_at").await
    }

    /// All analytics rows, newest first
    pub async fn list_analytics(&self) -> Result<Vec<AnalyticsRow>> {
        self.select(&self.config.analytics_table, "timestamp").await
    }
}

async fn read_rows<R: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<R>> {
    let status = response.status();

    if status.is_success() {
        let text = response
            .text()
            .await
            .map_err(|e| Error::Backend(format!("failed to read response: {}", e)))?;
        // `Prefer: return=minimal` servers answer with an empty body
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown".to_string());
        Err(Error::Backend(format!(
            "API error ({}): {}",
            status, error_text
        )))
    }
}
