//! Conversation service: the operations behind the dashboard API
//!
//! Orchestrates the contact registry, message log, conversation summary,
//! and the external relay. The relay coordination contract lives in
//! [`ConversationService::send`]: the operator's message is made durable
//! locally BEFORE the relay is invoked, and a relay failure is reported as
//! a distinct outcome instead of rolling the record back or pretending the
//! message was delivered.

use std::sync::Arc;

use chrono::Utc;

use chatdesk_common::{Error, Result};
use chatdesk_relay::RelayService;

use crate::domain::entities::{
    Contact, ConversationOverview, ConversationSummary, Message, MessageKind, MessageSender,
};
use crate::domain::state::InterventionState;
use crate::repository::ConversationsRepositories;

/// Outcome of sending an operator message.
///
/// `Delivered` and `RecordedButNotDelivered` both mean the message is
/// durable in the log; only the relay hand-off differs. Callers must never
/// treat the two as interchangeable.
#[derive(Debug)]
pub enum SendOutcome {
    /// Recorded locally and accepted by the relay
    Delivered(Message),
    /// Recorded locally, but the relay refused or was unreachable
    RecordedButNotDelivered { message: Message, reason: String },
    /// Invalid input; nothing was written
    Rejected(String),
}

#[derive(Clone)]
pub struct ConversationService {
    repos: ConversationsRepositories,
    relay: Arc<dyn RelayService>,
}

impl ConversationService {
    pub fn new(repos: ConversationsRepositories, relay: Arc<dyn RelayService>) -> Self {
        Self { repos, relay }
    }

    /// Send an operator-authored message to a contact.
    ///
    /// Order matters:
    /// 1. validate (reject before any write),
    /// 2. ensure the contact (an unseen handle creates one),
    /// 3. append to the log: the transcript is the source of truth,
    /// 4. hand off to the relay; failure downgrades the outcome to
    ///    `RecordedButNotDelivered` and never retracts the message.
    pub async fn send(&self, handle: &str, content: &str) -> Result<SendOutcome> {
        if let Err(e) = Contact::validate_handle(handle) {
            return Ok(SendOutcome::Rejected(e.to_string()));
        }
        if let Err(e) = Message::validate_content(content) {
            return Ok(SendOutcome::Rejected(e.to_string()));
        }

        let contact = self.repos.contacts.ensure(handle, None).await?;

        let message = self
            .repos
            .messages
            .append(contact.id, MessageSender::Human, MessageKind::Text, content)
            .await?;

        match self.relay.deliver(handle, content).await {
            Ok(receipt) => {
                self.repos.summaries.refresh(contact.id).await?;
                tracing::info!(
                    handle = %handle,
                    message_id = message.id,
                    provider = %receipt.provider,
                    "Operator message delivered"
                );
                Ok(SendOutcome::Delivered(message))
            }
            Err(err) => {
                tracing::warn!(
                    handle = %handle,
                    message_id = message.id,
                    error = %err,
                    "Operator message recorded but not delivered"
                );
                Ok(SendOutcome::RecordedButNotDelivered {
                    message,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Record an inbound agent/client message observed by the webhook.
    ///
    /// Human messages are created exclusively through [`send`]; the
    /// ingestion path rejects them.
    pub async fn ingest(
        &self,
        handle: &str,
        display_name: Option<&str>,
        sender: MessageSender,
        kind: MessageKind,
        content: &str,
    ) -> Result<Message> {
        Contact::validate_handle(handle)?;
        Message::validate_content(content)?;
        if let Some(name) = display_name {
            Contact::validate_display_name(name)?;
        }
        if sender == MessageSender::Human {
            return Err(Error::Validation(
                "Human messages are recorded through send, not ingestion".to_string(),
            ));
        }

        let contact = self.repos.contacts.ensure(handle, display_name).await?;
        self.repos
            .contacts
            .touch_last_seen(contact.id, Utc::now())
            .await?;

        self.repos
            .messages
            .append(contact.id, sender, kind, content)
            .await
    }

    /// Toggle human intervention for a conversation.
    ///
    /// Idempotent and total; fails with `NotFound` for a handle that has
    /// never been seen. A toggle implies prior history, so nothing is
    /// auto-created from it.
    pub async fn set_intervening(
        &self,
        handle: &str,
        desired: bool,
    ) -> Result<ConversationSummary> {
        let contact = self
            .repos
            .contacts
            .find_by_handle(handle)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Unknown contact: {}", handle)))?;

        let current = self
            .repos
            .summaries
            .get(contact.id)
            .await?
            .map(|s| s.intervening)
            .unwrap_or(false);

        let (next, changed) = InterventionState::from_flag(current).apply(desired);

        let summary = self
            .repos
            .summaries
            .set_intervening(contact.id, desired, Utc::now())
            .await?;

        if changed {
            tracing::info!(handle = %handle, state = %next, "Conversation ownership changed");
        }

        Ok(summary)
    }

    /// Whether a human currently owns the conversation.
    ///
    /// The automated agent polls this to decide whether to suppress its
    /// replies. Unknown handles and missing summary rows read as `false`.
    pub async fn intervention_status(&self, handle: &str) -> Result<bool> {
        let Some(contact) = self.repos.contacts.find_by_handle(handle).await? else {
            return Ok(false);
        };

        Ok(self
            .repos
            .summaries
            .get(contact.id)
            .await?
            .map(|s| s.intervening)
            .unwrap_or(false))
    }

    /// The dashboard listing, most recently active conversation first
    pub async fn conversations(&self) -> Result<Vec<ConversationOverview>> {
        self.repos.summaries.list_all().await
    }

    /// Full message history for a handle, oldest first.
    ///
    /// Unknown handles yield an empty history, not an error.
    pub async fn history(&self, handle: &str) -> Result<Vec<Message>> {
        match self.repos.contacts.find_by_handle(handle).await? {
            Some(contact) => self.repos.messages.list(contact.id).await,
            None => Ok(Vec::new()),
        }
    }
}
