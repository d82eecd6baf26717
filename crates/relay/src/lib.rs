//! Chatdesk Relay Service
//!
//! The relay is the external messaging engine that actually delivers an
//! operator-authored message to the end user. Chatdesk treats it as an
//! opaque collaborator: a call either succeeds or fails, and every call is
//! bounded by a timeout. Durability of the message itself is owned by the
//! conversations domain, never by this crate.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod http;
pub mod mock;

pub use http::HttpRelayService;
pub use mock::MockRelayService;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Relay configuration error: {0}")]
    Configuration(String),

    #[error("Relay request failed: {0}")]
    Request(String),

    #[error("Relay rejected the message: {0}")]
    Response(String),

    #[error("Relay call timed out")]
    Timeout,
}

/// Receipt returned for a successful hand-off to the relay
#[derive(Debug, Clone)]
pub struct RelayReceipt {
    pub provider: String,
    pub delivered_at: DateTime<Utc>,
}

/// Relay service configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Relay provider (http, mock)
    pub provider: String,
    /// Base URL of the messaging engine
    pub base_url: String,
    /// Upper bound on a single delivery attempt
    pub timeout: Duration,
}

/// Abstraction over the external messaging engine
#[async_trait::async_trait]
pub trait RelayService: Send + Sync {
    /// Attempt to deliver `content` to the contact identified by `handle`.
    ///
    /// Implementations must not block past their configured timeout; a
    /// timed-out call is a delivery failure, never left pending.
    async fn deliver(&self, handle: &str, content: &str) -> Result<RelayReceipt, RelayError>;

    /// Provider identifier, for logging
    fn provider(&self) -> &str;
}

/// Factory for creating relay service instances
pub struct RelayServiceFactory;

impl RelayServiceFactory {
    /// Create a relay service based on the configured provider
    pub fn create(config: RelayConfig) -> Result<Box<dyn RelayService>, RelayError> {
        match config.provider.as_str() {
            "http" => Ok(Box::new(HttpRelayService::new(config)?)),
            "mock" => Ok(Box::new(MockRelayService::new())),
            other => Err(RelayError::Configuration(format!(
                "Unknown relay provider: {}",
                other
            ))),
        }
    }
}
