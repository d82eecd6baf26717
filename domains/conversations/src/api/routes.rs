//! Route definitions for the Conversations domain API
//!
//! Each route maps to exactly one service operation; handlers carry no
//! business logic of their own.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{conversations, messages};
use super::middleware::ConversationsState;

/// Conversation listing and intervention routes
fn conversation_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/api/conversations", get(conversations::list_conversations))
        .route(
            "/api/conversations/{handle}/intervene",
            post(conversations::set_intervention),
        )
        .route(
            "/api/conversations/{handle}/intervention",
            get(conversations::get_intervention),
        )
}

/// Message routes
fn message_routes() -> Router<ConversationsState> {
    Router::new()
        .route(
            "/api/conversations/{handle}/messages",
            get(messages::list_messages),
        )
        .route("/api/messages/send", post(messages::send_message))
        .route("/api/messages/ingest", post(messages::ingest_message))
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
}
