//! Contact registry repository
//!
//! Pure identity management: upsert on first contact, lookup by handle.
//! `last_seen` is owned by the ingestion path, not by `ensure`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use chatdesk_common::Result;

use crate::domain::entities::Contact;

#[derive(Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent upsert keyed on the unique handle.
    ///
    /// Insert-or-ignore followed by a read, so concurrent first contact
    /// with the same handle creates at most one row and every caller
    /// observes the winner's row. A later call with a different
    /// `display_name` does not overwrite the stored one (first write wins).
    pub async fn ensure(&self, handle: &str, display_name: Option<&str>) -> Result<Contact> {
        sqlx::query(
            r#"
            INSERT INTO contacts (handle, display_name, last_seen)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(handle) DO NOTHING
            "#,
        )
        .bind(handle)
        .bind(display_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, handle, display_name, last_seen
            FROM contacts
            WHERE handle = ?1
            "#,
        )
        .bind(handle)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Find a contact by its handle
    pub async fn find_by_handle(&self, handle: &str) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, handle, display_name, last_seen
            FROM contacts
            WHERE handle = ?1
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Record observed activity for a contact (ingestion path only)
    pub async fn touch_last_seen(&self, contact_id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE contacts SET last_seen = ?2 WHERE id = ?1")
            .bind(contact_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdesk_common::Database;

    async fn repo() -> ContactRepository {
        let db = Database::in_memory().await.unwrap();
        ContactRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_ensure_creates_contact() {
        let contacts = repo().await;

        let contact = contacts.ensure("+15551234567", Some("Ann")).await.unwrap();
        assert_eq!(contact.handle, "+15551234567");
        assert_eq!(contact.display_name.as_deref(), Some("Ann"));
        assert!(contact.id > 0);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let contacts = repo().await;

        let first = contacts.ensure("+1555", Some("Ann")).await.unwrap();
        let second = contacts.ensure("+1555", Some("Ann")).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_ensure_first_display_name_wins() {
        let contacts = repo().await;

        let first = contacts.ensure("+1555", Some("Ann")).await.unwrap();
        let second = contacts.ensure("+1555", Some("Annie")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.display_name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn test_ensure_race_yields_single_row() {
        let contacts = repo().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let contacts = contacts.clone();
            handles.push(tokio::spawn(async move {
                contacts.ensure("+1555", None).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1, "all racers must observe the same contact");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&contacts.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_find_by_handle_missing() {
        let contacts = repo().await;
        assert!(contacts.find_by_handle("+0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_does_not_touch_last_seen() {
        let contacts = repo().await;

        let created = contacts.ensure("+1555", None).await.unwrap();
        let again = contacts.ensure("+1555", None).await.unwrap();
        assert_eq!(created.last_seen, again.last_seen);
    }

    #[tokio::test]
    async fn test_touch_last_seen_advances() {
        let contacts = repo().await;

        let created = contacts.ensure("+1555", None).await.unwrap();
        let later = created.last_seen + chrono::Duration::seconds(30);
        contacts.touch_last_seen(created.id, later).await.unwrap();

        let found = contacts.find_by_handle("+1555").await.unwrap().unwrap();
        assert_eq!(found.last_seen, later);
    }
}
