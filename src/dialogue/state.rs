//! Per-session dialogue state.

use crate::llm::ChatSession;

/// Which backend a session's messages go to.
///
/// ```text
/// Menu ──/wiki──▶ Wiki
///      ──/gpt───▶ Chat
/// Wiki / Chat ──/exit──▶ Menu
/// Wiki ◀──/wiki, /gpt──▶ Chat
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No conversation active; plain messages are ignored.
    #[default]
    Menu,

    /// Messages are encyclopedia queries; voice is accepted.
    Wiki,

    /// Messages go to the chat backend with the session's history.
    Chat,
}

impl Mode {
    /// Returns `true` while a conversation is active.
    ///
    /// ```
    /// use wiki_voice_bot::dialogue::Mode;
    ///
    /// assert!(!Mode::Menu.in_conversation());
    /// assert!(Mode::Wiki.in_conversation());
    /// assert!(Mode::Chat.in_conversation());
    /// ```
    pub fn in_conversation(&self) -> bool {
        !matches!(self, Mode::Menu)
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Menu => "menu",
            Mode::Wiki => "wiki",
            Mode::Chat => "chat",
        }
    }
}

/// Everything the router remembers about one user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: Mode,
    pub chat: ChatSession,
}

impl Session {
    pub fn new(max_history_turns: Option<usize>) -> Self {
        Self {
            mode: Mode::Menu,
            chat: ChatSession::new(max_history_turns),
        }
    }

    /// Leave any conversation and forget the chat history.
    pub fn reset(&mut self) {
        self.mode = Mode::Menu;
        self.chat.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_in_menu() {
        let session = Session::new(None);
        assert_eq!(session.mode, Mode::Menu);
        assert!(session.chat.is_empty());
    }

    #[test]
    fn reset_returns_to_menu_and_clears_history() {
        let mut session = Session::new(None);
        session.mode = Mode::Chat;
        session.chat.push_user("q");
        session.chat.push_assistant("a");

        session.reset();

        assert_eq!(session.mode, Mode::Menu);
        assert!(session.chat.is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(Mode::Menu.label(), "menu");
        assert_eq!(Mode::Wiki.label(), "wiki");
        assert_eq!(Mode::Chat.label(), "chat");
    }
}
