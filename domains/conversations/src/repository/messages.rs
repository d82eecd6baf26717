//! Message log repository
//!
//! Append-only: messages are never updated or deleted. Every append
//! advances the conversation summary before the caller observes success,
//! so the listing can never show a conversation as older than a message
//! that is already visible in its history.

use chrono::Utc;
use sqlx::SqlitePool;

use chatdesk_common::{Error, Result};

use crate::domain::entities::{Message, MessageKind, MessageSender};
use crate::repository::summaries::SummaryRepository;

#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
    summaries: SummaryRepository,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool, summaries: SummaryRepository) -> Self {
        Self { pool, summaries }
    }

    /// Append a message for a contact, assigning its id and timestamp.
    ///
    /// Fails with `NotFound` if the contact does not exist. The summary
    /// advance is part of the append operation, not a separate step the
    /// caller has to remember.
    pub async fn append(
        &self,
        contact_id: i64,
        sender: MessageSender,
        kind: MessageKind,
        content: &str,
    ) -> Result<Message> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM contacts WHERE id = ?1")
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(Error::NotFound(format!("Contact {} not found", contact_id)));
        }

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (contact_id, sender, kind, content, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, contact_id, sender, kind, content, timestamp
            "#,
        )
        .bind(contact_id)
        .bind(sender)
        .bind(kind)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        self.summaries
            .advance_last_updated(contact_id, message.timestamp)
            .await?;

        Ok(message)
    }

    /// List all messages for a contact, oldest first.
    ///
    /// Ordered by `(timestamp, id)`; id breaks timestamp ties. Unknown
    /// contacts yield an empty list, not an error.
    pub async fn list(&self, contact_id: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, contact_id, sender, kind, content, timestamp
            FROM messages
            WHERE contact_id = ?1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// The most recent message for a contact, by the same ordering
    pub async fn latest(&self, contact_id: i64) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, contact_id, sender, kind, content, timestamp
            FROM messages
            WHERE contact_id = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }
}
