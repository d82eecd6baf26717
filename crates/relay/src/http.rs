//! HTTP relay implementation
//!
//! Posts operator messages to the messaging engine's dashboard endpoint
//! using a reqwest client with a per-call timeout.

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{RelayConfig, RelayError, RelayReceipt, RelayService};

const SEND_PATH: &str = "/api/send_message_from_dashboard";

/// Request body understood by the messaging engine
#[derive(Debug, Serialize)]
struct DeliverRequest<'a> {
    phone_number: &'a str,
    message: &'a str,
}

/// Engine error body, when it bothers to send one
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP relay service backed by the external messaging engine
pub struct HttpRelayService {
    client: Client,
    base_url: String,
}

impl HttpRelayService {
    /// Create a new HTTP relay service
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RelayService for HttpRelayService {
    async fn deliver(&self, handle: &str, content: &str) -> Result<RelayReceipt, RelayError> {
        let url = format!("{}{}", self.base_url, SEND_PATH);
        let body = DeliverRequest {
            phone_number: handle,
            message: content,
        };

        tracing::debug!(handle = %handle, url = %url, "Handing message to relay");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::Timeout
                } else {
                    RelayError::Request(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            // Try to parse as an engine error payload
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(RelayError::Response(format!(
                    "Relay returned {}: {}",
                    status, error_response.error
                )));
            }

            return Err(RelayError::Response(format!(
                "Relay returned {}: {}",
                status, error_body
            )));
        }

        Ok(RelayReceipt {
            provider: "http".to_string(),
            delivered_at: Utc::now(),
        })
    }

    fn provider(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(base_url: &str) -> RelayConfig {
        RelayConfig {
            provider: "http".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let service = HttpRelayService::new(config("http://localhost:5000/")).unwrap();
        assert_eq!(service.base_url, "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_request_error() {
        // Nothing listens on this port; the connect error must surface as a
        // relay failure, not a panic or a hang.
        let service = HttpRelayService::new(config("http://127.0.0.1:1")).unwrap();
        let result = service.deliver("+1555", "hi").await;
        assert!(matches!(
            result,
            Err(RelayError::Request(_)) | Err(RelayError::Timeout)
        ));
    }
}
