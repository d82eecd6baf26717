//! Conversations domain: contacts, message log, intervention, relay coordination

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Contact, ConversationOverview, ConversationSummary, Message, MessageKind, MessageSender,
};
pub use domain::state::InterventionState;

// Re-export repository types
pub use repository::{
    ContactRepository, ConversationsRepositories, MessageRepository, SummaryRepository,
};

// Re-export service types
pub use service::{ConversationService, SendOutcome};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
