//! Per-caller dialogue state

use serde::{Deserialize, Serialize};

/// Slot the assistant is waiting on for a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingIntent {
    #[default]
    None,
    AwaitOrderId,
    AwaitReturnId,
    AwaitVendorId,
}

impl PendingIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::AwaitOrderId => "AWAIT_ORDER_ID",
            Self::AwaitReturnId => "AWAIT_RETURN_ID",
            Self::AwaitVendorId => "AWAIT_VENDOR_ID",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Slot states only ever move through `None`: a prompt opens a slot,
    /// the next turn closes it.
    pub fn can_transition_to(&self, target: PendingIntent) -> bool {
        match self {
            Self::None => true,
            _ => target.is_none(),
        }
    }
}

impl std::fmt::Display for PendingIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dialogue state for one caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pending: PendingIntent,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> PendingIntent {
        self.pending
    }

    pub fn set_pending(&mut self, intent: PendingIntent) {
        if !self.pending.can_transition_to(intent) {
            tracing::warn!(
                from = %self.pending,
                to = %intent,
                "Overwriting an open slot"
            );
        }
        self.pending = intent;
    }

    pub fn clear_pending(&mut self) {
        self.pending = PendingIntent::None;
    }

    /// Consume the open slot, leaving the state at `None`
    pub fn take_pending(&mut self) -> PendingIntent {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_none() {
        assert_eq!(ConversationState::new().pending(), PendingIntent::None);
    }

    #[test]
    fn test_take_pending_resets() {
        let mut state = ConversationState::new();
        state.set_pending(PendingIntent::AwaitReturnId);
        assert_eq!(state.take_pending(), PendingIntent::AwaitReturnId);
        assert_eq!(state.pending(), PendingIntent::None);
        assert_eq!(state.take_pending(), PendingIntent::None);
    }

    #[test]
    fn test_transitions() {
        assert!(PendingIntent::None.can_transition_to(PendingIntent::AwaitOrderId));
        assert!(PendingIntent::AwaitOrderId.can_transition_to(PendingIntent::None));
        assert!(!PendingIntent::AwaitOrderId.can_transition_to(PendingIntent::AwaitVendorId));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&PendingIntent::AwaitVendorId).unwrap(),
            "\"AWAIT_VENDOR_ID\""
        );
        assert_eq!(PendingIntent::AwaitOrderId.to_string(), "AWAIT_ORDER_ID");
    }
}
