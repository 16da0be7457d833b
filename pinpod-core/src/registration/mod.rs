//! Early-access registration
//!
//! The landing page's registration form writes to a remote backend. This
//! path is independent of the event tracker: the tracker reports
//! `form_submit` without waiting for, or knowing, the outcome here.
//!
//! ## Flow
//!
//! 1. Validate the form (all fields, email shape, phone shape)
//! 2. Insert a `pending` user record
//! 3. On success, insert a `user_registration` analytics row; a failure
//!    there is logged and does not affect the registration result

mod client;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use client::BackendClient;

use crate::error::Result;
use crate::types::PageInfo;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-()]{10,}$").unwrap());

/// Why an early-access form was rejected before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill in all required fields")]
    MissingFields,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("invalid phone number format")]
    InvalidPhone,
}

/// Values entered in the early-access form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyAccessForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
}

impl EarlyAccessForm {
    /// Check the form the same way the page does before submitting
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if [&self.name, &self.email, &self.phone, &self.interest]
            .iter()
            .any(|v| v.is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !PHONE_RE.is_match(&self.phone) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}

/// Row in the users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub interest: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

impl UserRecord {
    /// New registration awaiting review
    pub fn pending(form: &EarlyAccessForm) -> Self {
        Self {
            email: form.email.clone(),
            name: form.name.clone(),
            phone: form.phone.clone(),
            interest: form.interest.clone(),
            created_at: Utc::now(),
            status: "pending".to_string(),
        }
    }
}

/// Row in the analytics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRow {
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub user_agent: String,
    pub page_url: String,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsRow {
    pub fn new(
        event_type: impl Into<String>,
        event_data: serde_json::Value,
        page_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            event_data,
            user_agent: user_agent.into(),
            page_url: page_url.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Feedback entered by a visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub message: String,
    pub rating: u8,
}

/// Row in the feedback table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRow {
    pub name: String,
    pub email: String,
    pub message: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn from_feedback(feedback: &Feedback) -> Self {
        Self {
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            message: feedback.message.clone(),
            rating: feedback.rating,
            created_at: Utc::now(),
        }
    }
}

/// Validate and store an early-access registration
///
/// Returns the stored user records. The follow-up `user_registration`
/// analytics row is best-effort.
pub async fn submit_early_access(
    client: &BackendClient,
    form: &EarlyAccessForm,
    page: &PageInfo,
) -> Result<Vec<UserRecord>> {
    form.validate()?;

    let rows = client.register_user(form).await?;

    let row = AnalyticsRow::new(
        "user_registration",
        serde_json::json!({ "interest": form.interest }),
        page.url.as_str(),
        page.user_agent.as_str(),
    );
    if let Err(e) = client.track_event(&row).await {
        tracing::warn!(error = %e, "Failed to record registration analytics");
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::error::Error;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn valid_form() -> EarlyAccessForm {
        EarlyAccessForm {
            name: "Sari".to_string(),
            email: "sari@example.com".to_string(),
            phone: "+62 (812) 3456-7890".to_string(),
            interest: "creator".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert_eq!(valid_form().validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields() {
        for blank in 0..4 {
            let mut form = valid_form();
            match blank {
                0 => form.name.clear(),
                1 => form.email.clear(),
                2 => form.phone.clear(),
                _ => form.interest.clear(),
            }
            assert_eq!(form.validate(), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn test_invalid_email() {
        for email in ["sari", "sari@example", "sari @example.com", "@example.com"] {
            let form = EarlyAccessForm {
                email: email.to_string(),
                ..valid_form()
            };
            assert_eq!(form.validate(), Err(ValidationError::InvalidEmail), "{email}");
        }
    }

    #[test]
    fn test_invalid_phone() {
        for phone in ["0812345", "phone-number-here", "++6281234567890"] {
            let form = EarlyAccessForm {
                phone: phone.to_string(),
                ..valid_form()
            };
            assert_eq!(form.validate(), Err(ValidationError::InvalidPhone), "{phone}");
        }
    }

    #[test]
    fn test_pending_record_copies_form() {
        let record = UserRecord::pending(&valid_form());
        assert_eq!(record.email, "sari@example.com");
        assert_eq!(record.status, "pending");
    }

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(BackendConfig {
            enabled: true,
            url: Some(server.uri()),
            anon_key: Some("anon".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_form_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let form = EarlyAccessForm {
            email: "nope".to_string(),
            ..valid_form()
        };
        let err = submit_early_access(&client_for(&server), &form, &PageInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn test_submit_succeeds_when_analytics_insert_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
                UserRecord::pending(&valid_form())
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/analytics"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let page = PageInfo::new("https://pinpod.example.com/").with_user_agent("test");
        let rows = submit_early_access(&client_for(&server), &valid_form(), &page)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interest, "creator");
    }

    #[tokio::test]
    async fn test_submit_skips_analytics_when_registration_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/analytics"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let result =
            submit_early_access(&client_for(&server), &valid_form(), &PageInfo::default()).await;
        assert!(matches!(result, Err(Error::Backend(_))));
    }
}
