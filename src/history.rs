//! Append-only conversation state.

use crate::types::message::Turn;

/// Ordered log of conversation turns. Mutated only by the orchestration
/// loop; the session driver reads it through `snapshot`/`len`. Not shared
/// across threads — one history per session, constructor-injected into the
/// agent rather than ambient.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read-only copy of the full log, in chronological order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_clear_is_total() {
        let mut history = ConversationHistory::new();
        history.append(Turn::user("hey"));
        history.append(Turn::assistant("hey yourself"));
        assert_eq!(history.len(), 2);

        let snapshot = history.snapshot();
        assert_eq!(snapshot[0], Turn::user("hey"));
        assert_eq!(snapshot[1], Turn::assistant("hey yourself"));

        history.clear();
        assert!(history.is_empty());
    }
}
