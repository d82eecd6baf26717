//! Mock relay implementation
//!
//! Captures deliveries in memory for tests and can be scripted to fail,
//! which is how the recorded-but-not-delivered path is exercised without a
//! real messaging engine.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{RelayError, RelayReceipt, RelayService};

/// A delivery captured by the mock relay
#[derive(Debug, Clone)]
pub struct CapturedDelivery {
    pub handle: String,
    pub content: String,
    pub delivered_at: DateTime<Utc>,
}

/// Mock relay service for testing
#[derive(Debug, Clone, Default)]
pub struct MockRelayService {
    deliveries: Arc<Mutex<Vec<CapturedDelivery>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockRelayService {
    /// Create a new mock relay that accepts every delivery
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delivery fail with the given reason
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    /// Make subsequent deliveries succeed again
    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// All deliveries captured so far
    pub fn deliveries(&self) -> Vec<CapturedDelivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Number of deliveries captured so far
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RelayService for MockRelayService {
    async fn deliver(&self, handle: &str, content: &str) -> Result<RelayReceipt, RelayError> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(RelayError::Response(reason));
        }

        let delivered_at = Utc::now();
        self.deliveries.lock().unwrap().push(CapturedDelivery {
            handle: handle.to_string(),
            content: content.to_string(),
            delivered_at,
        });

        Ok(RelayReceipt {
            provider: "mock".to_string(),
            delivered_at,
        })
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
