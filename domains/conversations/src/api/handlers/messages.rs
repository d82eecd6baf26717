//! Message API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use chatdesk_common::{Error, Result};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageKind, MessageSender};
use crate::service::SendOutcome;

/// Request for sending an operator message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Contact handle (e.g. phone number)
    #[validate(length(min = 1, max = 64))]
    pub handle: String,

    /// Message content
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
}

/// Request for recording an inbound agent/client message
#[derive(Debug, Deserialize, Validate)]
pub struct IngestMessageRequest {
    #[validate(length(min = 1, max = 64))]
    pub handle: String,

    pub display_name: Option<String>,

    pub sender: MessageSender,

    #[serde(default)]
    pub kind: MessageKind,

    #[validate(length(min = 1, max = 8192))]
    pub content: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub contact_id: i64,
    pub sender: MessageSender,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            contact_id: m.contact_id,
            sender: m.sender,
            kind: m.kind,
            content: m.content,
            timestamp: m.timestamp,
        }
    }
}

/// Response for an operator send: the recorded message plus whether the
/// relay actually took it
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub outcome: &'static str,
    pub message: MessageResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Send an operator message to a contact
pub async fn send_message(
    State(state): State<ConversationsState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    req.validate()
        .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

    match state.service.send(&req.handle, &req.content).await? {
        SendOutcome::Delivered(message) => Ok((
            StatusCode::CREATED,
            Json(SendMessageResponse {
                outcome: "delivered",
                message: message.into(),
                reason: None,
            }),
        )),
        SendOutcome::RecordedButNotDelivered { message, reason } => Ok((
            StatusCode::CREATED,
            Json(SendMessageResponse {
                outcome: "recorded_not_delivered",
                message: message.into(),
                reason: Some(reason),
            }),
        )),
        SendOutcome::Rejected(reason) => Err(Error::Validation(reason)),
    }
}

/// Record an inbound agent/client message (webhook collaborator)
pub async fn ingest_message(
    State(state): State<ConversationsState>,
    Json(req): Json<IngestMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    req.validate()
        .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

    let message = state
        .service
        .ingest(
            &req.handle,
            req.display_name.as_deref(),
            req.sender,
            req.kind,
            &req.content,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// List the message history for a handle, oldest first
pub async fn list_messages(
    State(state): State<ConversationsState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<MessageResponse>>> {
    let messages = state.service.history(&handle).await?;
    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
