//! Chatdesk application composition root
//!
//! Wires the conversations domain router to a database pool and a relay
//! service built from configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::SqlitePool;

use chatdesk_common::Config;
use chatdesk_conversations::{ConversationService, ConversationsRepositories, ConversationsState};
use chatdesk_relay::{RelayConfig, RelayServiceFactory};

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: SqlitePool) -> Result<Router, anyhow::Error> {
    let repos = ConversationsRepositories::new(pool);

    let relay_config = RelayConfig {
        provider: config.relay_provider.clone(),
        base_url: config.relay_url.clone(),
        timeout: Duration::from_secs(config.relay_timeout_secs),
    };
    let relay = RelayServiceFactory::create(relay_config)
        .map_err(|e| anyhow::anyhow!("Failed to create relay service: {}", e))?;

    let state = ConversationsState {
        service: ConversationService::new(repos, Arc::from(relay)),
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Chatdesk API v0.1.0" }),
        )
        .merge(chatdesk_conversations::routes().with_state(state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
