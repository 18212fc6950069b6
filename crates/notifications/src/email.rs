//! Email trigger: POSTs a notification payload to an internal endpoint.
//!
//! The endpoint is an opaque collaborator (the original system called a
//! hosted email function the same way). Failures are reported to the caller
//! and logged, never treated as fatal.

use serde_json::json;
use thiserror::Error;

use crate::Notification;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email trigger request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email endpoint rejected the request with status {0}")]
    Rejected(u16),
}

/// Client for the internal email-notification endpoint.
#[derive(Debug, Clone)]
pub struct EmailTrigger {
    client: reqwest::Client,
    endpoint: String,
}

impl EmailTrigger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fire one email for a notification. One round trip, no retries.
    pub async fn send(&self, notification: &Notification, recipient: &str) -> Result<(), EmailError> {
        let payload = json!({
            "to": recipient,
            "subject": notification.title(),
            "body": notification.body(),
            "kind": notification.kind().as_str(),
            "notification_id": notification.id().to_string(),
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "email trigger rejected"
            );
            return Err(EmailError::Rejected(status.as_u16()));
        }

        tracing::info!(notification_id = %notification.id(), "email trigger accepted");
        Ok(())
    }
}
