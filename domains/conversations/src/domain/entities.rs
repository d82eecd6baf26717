//! Domain entities for the Conversations domain
//!
//! A Contact is a uniquely identified conversational peer (phone handle).
//! Messages are immutable facts in an append-only per-contact log. The
//! ConversationSummary is the denormalized one-row-per-contact projection
//! the dashboard lists conversations from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatdesk_common::{Error, Result};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    /// The automated agent
    Agent,
    /// The end user on the other side of the relay
    Client,
    /// A human operator writing from the dashboard
    Human,
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSender::Agent => write!(f, "agent"),
            MessageSender::Client => write!(f, "client"),
            MessageSender::Human => write!(f, "human"),
        }
    }
}

/// Payload kind of a message
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Audio,
    Document,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Image => write!(f, "image"),
            MessageKind::Audio => write!(f, "audio"),
            MessageKind::Document => write!(f, "document"),
        }
    }
}

/// Maximum handle length (phone numbers and platform handles)
const MAX_HANDLE_LENGTH: usize = 64;

/// Maximum display name length
const MAX_DISPLAY_NAME_LENGTH: usize = 120;

/// Maximum message content length
const MAX_CONTENT_LENGTH: usize = 8192;

/// Contact entity: a uniquely identified conversational peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub handle: String,
    pub display_name: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl Contact {
    /// Validate a handle before it reaches the registry
    pub fn validate_handle(handle: &str) -> Result<()> {
        if handle.trim().is_empty() {
            return Err(Error::Validation("Handle is required".to_string()));
        }
        if handle.len() > MAX_HANDLE_LENGTH {
            return Err(Error::Validation(format!(
                "Handle must be at most {} characters",
                MAX_HANDLE_LENGTH
            )));
        }
        Ok(())
    }

    /// Validate an optional display name
    pub fn validate_display_name(display_name: &str) -> Result<()> {
        if display_name.len() > MAX_DISPLAY_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Display name must be at most {} characters",
                MAX_DISPLAY_NAME_LENGTH
            )));
        }
        Ok(())
    }
}

/// Message entity: an immutable fact in the per-contact log
///
/// Messages for a contact are totally ordered by `(timestamp, id)`; the id
/// is assigned monotonically and breaks timestamp ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub contact_id: i64,
    pub sender: MessageSender,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Validate message content before it is appended
    pub fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        if content.len() > MAX_CONTENT_LENGTH {
            return Err(Error::Validation(format!(
                "Message content must be at most {} characters",
                MAX_CONTENT_LENGTH
            )));
        }
        Ok(())
    }
}

/// Denormalized per-contact conversation projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub contact_id: i64,
    pub intervening: bool,
    pub last_updated: DateTime<Utc>,
}

/// One row of the dashboard listing: contact identity, intervention state,
/// and the content of the most recent message
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ConversationOverview {
    pub contact_id: i64,
    pub handle: String,
    pub display_name: Option<String>,
    pub intervening: bool,
    pub last_updated: DateTime<Utc>,
    pub last_message: Option<String>,
}
