//! The external message-sending capability.
//!
//! The provider's wire protocol is deliberately a black box: the worker
//! hands over a destination phone and a rendered body and gets back
//! success or failure. [`HttpSender`] is the production implementation,
//! posting to the configured messaging gateway.

use std::time::Duration;

use async_trait::async_trait;

/// Default per-request timeout for a single delivery attempt.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Message gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Something that can deliver one rendered message to one phone number.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SendError>;
}

// ---------------------------------------------------------------------------
// HttpSender
// ---------------------------------------------------------------------------

/// Delivers messages via the external HTTP messaging gateway.
pub struct HttpSender {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSender {
    /// Create a sender with a pre-configured HTTP client.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Build a sender from `MESSAGE_GATEWAY_URL` / `MESSAGE_GATEWAY_TOKEN`.
    ///
    /// Returns `None` when no gateway is configured, letting deployments run
    /// without an outbound provider (jobs then queue until one exists).
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("MESSAGE_GATEWAY_URL").ok()?;
        let token = std::env::var("MESSAGE_GATEWAY_TOKEN").unwrap_or_default();
        Some(Self::new(base_url, token, DEFAULT_REQUEST_TIMEOUT))
    }
}

#[async_trait]
impl NotificationSender for HttpSender {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SendError> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let payload = serde_json::json!({
            "to": phone,
            "body": body,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _sender = HttpSender::new("https://gateway.example", "token", DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn send_error_display_http_status() {
        let err = SendError::HttpStatus(502);
        assert_eq!(err.to_string(), "Message gateway returned HTTP 502");
    }
}
