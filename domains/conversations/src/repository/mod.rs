//! Repository implementations for the Conversations domain

pub mod contacts;
pub mod messages;
pub mod summaries;

use sqlx::SqlitePool;

pub use contacts::ContactRepository;
pub use messages::MessageRepository;
pub use summaries::SummaryRepository;

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pool: SqlitePool,
    pub contacts: ContactRepository,
    pub messages: MessageRepository,
    pub summaries: SummaryRepository,
}

impl ConversationsRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        let summaries = SummaryRepository::new(pool.clone());
        Self {
            contacts: ContactRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone(), summaries.clone()),
            summaries,
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
