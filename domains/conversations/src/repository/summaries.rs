//! Conversation summary repository
//!
//! One denormalized row per contact. Two writers touch it: the message
//! log's post-append hook (via `advance_last_updated`) and the
//! intervention toggle (via `set_intervening`). Each writer updates only
//! its own fields, never the whole row, so neither can lose the other's
//! concurrent write.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use chatdesk_common::Result;

use crate::domain::entities::{ConversationOverview, ConversationSummary};

#[derive(Clone)]
pub struct SummaryRepository {
    pool: SqlitePool,
}

impl SummaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Move `last_updated` forward to `ts`, creating the row with
    /// `intervening = false` if it does not exist yet.
    ///
    /// Monotonic: a `ts` at or before the stored `last_updated` is a no-op,
    /// so out-of-order completions of concurrent appends converge on the
    /// true latest message. Never writes `intervening`.
    pub async fn advance_last_updated(&self, contact_id: i64, ts: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (contact_id, intervening, last_updated)
            VALUES (?1, 0, ?2)
            ON CONFLICT(contact_id) DO UPDATE
            SET last_updated = excluded.last_updated
            WHERE excluded.last_updated > conversations.last_updated
            "#,
        )
        .bind(contact_id)
        .bind(ts)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Recompute `last_updated` from the most recent message in the log.
    ///
    /// Creates the summary lazily for contacts that have no row yet;
    /// idempotent when no new message has arrived.
    pub async fn refresh(&self, contact_id: i64) -> Result<()> {
        let latest: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT timestamp FROM messages
            WHERE contact_id = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        let ts = latest.unwrap_or_else(Utc::now);
        self.advance_last_updated(contact_id, ts).await
    }

    /// Set the intervention flag, creating the summary lazily if absent.
    ///
    /// The single write path for `intervening`; bumps `last_updated` and
    /// touches nothing else.
    pub async fn set_intervening(
        &self,
        contact_id: i64,
        desired: bool,
        at: DateTime<Utc>,
    ) -> Result<ConversationSummary> {
        sqlx::query(
            r#"
            INSERT INTO conversations (contact_id, intervening, last_updated)
            VALUES (?1, 0, ?2)
            ON CONFLICT(contact_id) DO NOTHING
            "#,
        )
        .bind(contact_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        let summary = sqlx::query_as::<_, ConversationSummary>(
            r#"
            UPDATE conversations
            SET intervening = ?2, last_updated = ?3
            WHERE contact_id = ?1
            RETURNING contact_id, intervening, last_updated
            "#,
        )
        .bind(contact_id)
        .bind(desired)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Get the summary for a contact
    pub async fn get(&self, contact_id: i64) -> Result<Option<ConversationSummary>> {
        let summary = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT contact_id, intervening, last_updated
            FROM conversations
            WHERE contact_id = ?1
            "#,
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// The dashboard listing: one row per contact with a summary row,
    /// most recently active first, carrying the latest message content.
    ///
    /// Computed as a live join over the message log, so the content can
    /// never be stale relative to a committed message.
    pub async fn list_all(&self) -> Result<Vec<ConversationOverview>> {
        let rows = sqlx::query_as::<_, ConversationOverview>(
            r#"
            SELECT
                c.id AS contact_id,
                c.handle,
                c.display_name,
                conv.intervening,
                conv.last_updated,
                (
                    SELECT m.content FROM messages m
                    WHERE m.contact_id = c.id
                    ORDER BY m.timestamp DESC, m.id DESC
                    LIMIT 1
                ) AS last_message
            FROM contacts c
            JOIN conversations conv ON conv.contact_id = c.id
            ORDER BY conv.last_updated DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
