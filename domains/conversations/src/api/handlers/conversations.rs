//! Conversation listing and intervention API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatdesk_common::Result;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::ConversationOverview;

/// One row of the dashboard conversation list
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub contact_id: i64,
    pub handle: String,
    pub display_name: Option<String>,
    pub intervening: bool,
    pub last_updated: DateTime<Utc>,
    pub last_message: Option<String>,
}

impl From<ConversationOverview> for ConversationResponse {
    fn from(row: ConversationOverview) -> Self {
        Self {
            contact_id: row.contact_id,
            handle: row.handle,
            display_name: row.display_name,
            intervening: row.intervening,
            last_updated: row.last_updated,
            last_message: row.last_message,
        }
    }
}

/// Request for toggling human intervention
#[derive(Debug, Deserialize)]
pub struct SetInterventionRequest {
    pub intervening: bool,
}

/// Intervention state response DTO
#[derive(Debug, Serialize)]
pub struct InterventionResponse {
    pub handle: String,
    pub intervening: bool,
    pub last_updated: DateTime<Utc>,
}

/// Intervention flag as polled by the automated agent
#[derive(Debug, Serialize)]
pub struct InterventionStatusResponse {
    pub handle: String,
    pub intervening: bool,
}

/// List all conversations, most recently active first
pub async fn list_conversations(
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<ConversationResponse>>> {
    let rows = state.service.conversations().await?;
    let responses: Vec<ConversationResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Toggle human intervention for a conversation
pub async fn set_intervention(
    State(state): State<ConversationsState>,
    Path(handle): Path<String>,
    Json(req): Json<SetInterventionRequest>,
) -> Result<Json<InterventionResponse>> {
    let summary = state.service.set_intervening(&handle, req.intervening).await?;

    Ok(Json(InterventionResponse {
        handle,
        intervening: summary.intervening,
        last_updated: summary.last_updated,
    }))
}

/// Read the intervention flag (polled by the automated agent)
pub async fn get_intervention(
    State(state): State<ConversationsState>,
    Path(handle): Path<String>,
) -> Result<Json<InterventionStatusResponse>> {
    let intervening = state.service.intervention_status(&handle).await?;

    Ok(Json(InterventionStatusResponse { handle, intervening }))
}
