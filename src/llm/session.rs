//! Conversation history for one chat session.
//!
//! A [`ChatSession`] is created when a user enters chat mode, grows by one
//! user and one assistant turn per exchange, and is cleared on `/exit`.
//! Sessions are never shared between users.

use super::chat::{ChatMessage, Role};

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<ChatMessage>,
    max_turns: Option<usize>,
}

impl ChatSession {
    /// `max_turns` bounds the history; the oldest turns are dropped first.
    pub fn new(max_turns: Option<usize>) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    /// Undo a user turn whose completion failed.  Does nothing when the last
    /// turn is not a user turn.
    pub fn rollback_user(&mut self) {
        if self.turns.last().map(|m| m.role) == Some(Role::User) {
            self.turns.pop();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn push(&mut self, message: ChatMessage) {
        self.turns.push(message);
        if let Some(max) = self.max_turns {
            if self.turns.len() > max {
                let excess = self.turns.len() - max;
                self.turns.drain(..excess);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_are_kept_in_order() {
        let mut session = ChatSession::new(None);
        session.push_user("вопрос");
        session.push_assistant("ответ");

        assert_eq!(
            session.messages(),
            &[ChatMessage::user("вопрос"), ChatMessage::assistant("ответ")]
        );
    }

    #[test]
    fn unbounded_session_keeps_everything() {
        let mut session = ChatSession::new(None);
        for i in 0..50 {
            session.push_user(format!("q{i}"));
            session.push_assistant(format!("a{i}"));
        }
        assert_eq!(session.len(), 100);
    }

    #[test]
    fn bounded_session_drops_oldest() {
        let mut session = ChatSession::new(Some(3));
        session.push_user("q1");
        session.push_assistant("a1");
        session.push_user("q2");
        session.push_assistant("a2");

        assert_eq!(session.len(), 3);
        assert_eq!(session.messages()[0], ChatMessage::assistant("a1"));
        assert_eq!(session.messages()[2], ChatMessage::assistant("a2"));
    }

    #[test]
    fn rollback_removes_only_trailing_user_turn() {
        let mut session = ChatSession::new(None);
        session.push_user("q1");
        session.push_assistant("a1");
        session.rollback_user();
        assert_eq!(session.len(), 2);

        session.push_user("q2");
        session.rollback_user();
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1], ChatMessage::assistant("a1"));
    }

    #[test]
    fn clear_empties_history() {
        let mut session = ChatSession::new(None);
        session.push_user("q");
        session.clear();
        assert!(session.is_empty());
    }
}
