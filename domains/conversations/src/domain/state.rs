//! State machine for conversation ownership
//!
//! Two states per conversation: the automated agent owns it
//! (`BotControlled`, the initial state) or a human operator does
//! (`HumanControlled`). The only transition is the explicit intervention
//! toggle, which is total and idempotent: requesting the current state is a
//! successful no-op, and either state can reach the other.

use serde::{Deserialize, Serialize};

/// Conversation ownership states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterventionState {
    #[default]
    BotControlled,
    HumanControlled,
}

impl InterventionState {
    /// Reconstruct the state from the persisted `intervening` flag
    pub fn from_flag(intervening: bool) -> Self {
        if intervening {
            Self::HumanControlled
        } else {
            Self::BotControlled
        }
    }

    /// The persisted `intervening` flag for this state
    pub fn intervening(&self) -> bool {
        matches!(self, Self::HumanControlled)
    }

    /// Apply an intervention toggle.
    ///
    /// Total over both states and both desired values; returns the next
    /// state and whether ownership actually changed.
    pub fn apply(self, desired: bool) -> (Self, bool) {
        let next = Self::from_flag(desired);
        (next, next != self)
    }
}

impl std::fmt::Display for InterventionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BotControlled => write!(f, "bot_controlled"),
            Self::HumanControlled => write!(f, "human_controlled"),
        }
    }
}
