//! Dialogue router — dispatches one user message per call.
//!
//! [`DialogueRouter`] keeps a [`Session`] per session id behind an async
//! mutex.  The lock is never held across an upstream call, so sessions
//! progress independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::llm::ChatBackend;
use crate::pipeline::{LookupPipeline, PipelineError};
use crate::stt::{SpeechToText, VoiceFrontDoor};

use super::state::{Mode, Session};

/// Identifies one conversation (a messenger chat id, or 0 for the console).
pub type SessionId = i64;

// ---------------------------------------------------------------------------
// User-facing messages
// ---------------------------------------------------------------------------

const MENU_GREETING: &str =
    "Привет! Выберете бота с помощью команд.\n/wiki - Wikipedia QA\n/gpt ChatGpt";

const CHAT_GREETING: &str =
    "Привет! Я ChatGPT 3.5turbo задай свой вопрос. Чтобы завершить диалог, отправьте /exit";

const ERROR_NOTICE: &str = "Не удалось обработать запрос. Попробуйте ещё раз позже.";

fn wiki_greeting(max_voice_secs: u32) -> String {
    format!(
        "Привет! Я Wikipedia QA бот. Введите свой вопрос или ключевое слово, \
         и я предоставлю краткое содержание из Википедии. Вы также можете отправить \
         голосовое сообщение с вашим запросом(не более {max_voice_secs} секунд)."
    )
}

fn voice_too_long(max_voice_secs: u32) -> String {
    format!(
        "Ваше сообщение дольше {max_voice_secs} секунд. \
         Отправьте сообщение короче {max_voice_secs} секунд."
    )
}

// ---------------------------------------------------------------------------
// Incoming
// ---------------------------------------------------------------------------

/// One user message as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// `/name`, stored without the slash or any `@bot` suffix.
    Command(String),
    Text(String),
    Voice { audio: Vec<u8>, duration_secs: u32 },
}

impl Incoming {
    /// Classify a line of user text.
    ///
    /// ```
    /// use wiki_voice_bot::dialogue::Incoming;
    ///
    /// assert_eq!(Incoming::from_text("/wiki"), Incoming::Command("wiki".into()));
    /// assert_eq!(Incoming::from_text("/gpt@my_bot"), Incoming::Command("gpt".into()));
    /// assert_eq!(Incoming::from_text("Москва"), Incoming::Text("Москва".into()));
    /// ```
    pub fn from_text(text: &str) -> Self {
        match text.strip_prefix('/') {
            Some(rest) => {
                let word = rest.split_whitespace().next().unwrap_or("");
                let name = word.split('@').next().unwrap_or("");
                Incoming::Command(name.to_string())
            }
            None => Incoming::Text(text.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// DialogueRouter
// ---------------------------------------------------------------------------

pub struct DialogueRouter {
    pipeline: Arc<LookupPipeline>,
    voice: VoiceFrontDoor,
    chat: Arc<dyn ChatBackend>,
    sessions: Mutex<HashMap<SessionId, Session>>,
    max_voice_secs: u32,
    max_history_turns: Option<usize>,
}

impl DialogueRouter {
    pub fn new(
        pipeline: Arc<LookupPipeline>,
        stt: Arc<dyn SpeechToText>,
        chat: Arc<dyn ChatBackend>,
        config: &AppConfig,
    ) -> Self {
        Self {
            voice: VoiceFrontDoor::new(stt, Arc::clone(&pipeline)),
            pipeline,
            chat,
            sessions: Mutex::new(HashMap::new()),
            max_voice_secs: config.stt.max_voice_secs,
            max_history_turns: config.llm.max_history_turns,
        }
    }

    /// Current mode of `session`; unknown sessions are in the menu.
    pub async fn mode(&self, session: SessionId) -> Mode {
        self.sessions
            .lock()
            .await
            .get(&session)
            .map(|s| s.mode)
            .unwrap_or_default()
    }

    /// Number of chat turns remembered for `session`.
    pub async fn history_len(&self, session: SessionId) -> usize {
        self.sessions
            .lock()
            .await
            .get(&session)
            .map(|s| s.chat.len())
            .unwrap_or(0)
    }

    /// Handle one message.  Returns the reply to send, or `None` when the
    /// message is not meant for any active conversation.
    pub async fn handle(&self, session: SessionId, incoming: Incoming) -> Option<String> {
        match incoming {
            Incoming::Command(name) => self.handle_command(session, &name).await,
            Incoming::Text(text) => match self.mode(session).await {
                Mode::Wiki => Some(self.wiki_text(&text).await),
                Mode::Chat => self.chat_text(session, text).await,
                Mode::Menu => None,
            },
            Incoming::Voice {
                audio,
                duration_secs,
            } => match self.mode(session).await {
                Mode::Wiki => Some(self.wiki_voice(&audio, duration_secs).await),
                Mode::Chat | Mode::Menu => None,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Only `/wiki` and `/gpt` create a session entry; `/exit` drops it, so
    /// a session in the menu holds no state at all.
    async fn handle_command(&self, session: SessionId, name: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;

        let (reply, mode) = match name {
            "start" => (MENU_GREETING.to_string(), None),
            "wiki" => (wiki_greeting(self.max_voice_secs), Some(Mode::Wiki)),
            "gpt" => (CHAT_GREETING.to_string(), Some(Mode::Chat)),
            "exit" => {
                sessions.remove(&session)?;
                (MENU_GREETING.to_string(), None)
            }
            _ => return None,
        };

        if let Some(mode) = mode {
            sessions
                .entry(session)
                .or_insert_with(|| Session::new(self.max_history_turns))
                .mode = mode;
        }

        log::debug!("dialogue: session {session} /{name}");
        Some(reply)
    }

    // -----------------------------------------------------------------------
    // Wiki mode
    // -----------------------------------------------------------------------

    async fn wiki_text(&self, text: &str) -> String {
        match self.pipeline.answer(text).await {
            Ok(answer) => answer,
            Err(e) => failure_notice(&e),
        }
    }

    async fn wiki_voice(&self, audio: &[u8], duration_secs: u32) -> String {
        if duration_secs >= self.max_voice_secs {
            log::info!("dialogue: rejected {duration_secs}s voice message");
            return voice_too_long(self.max_voice_secs);
        }
        match self.voice.answer(audio).await {
            Ok(answer) => answer.into_text(),
            Err(e) => failure_notice(&e),
        }
    }

    // -----------------------------------------------------------------------
    // Chat mode
    // -----------------------------------------------------------------------

    /// `None` when the session left chat mode before the text was handled.
    async fn chat_text(&self, session: SessionId, text: String) -> Option<String> {
        let history = {
            let mut sessions = self.sessions.lock().await;
            let state = sessions.get_mut(&session)?;
            state.chat.push_user(text);
            state.chat.messages().to_vec()
        };

        let result = self.chat.complete(&history).await;

        let mut sessions = self.sessions.lock().await;
        // An /exit that raced this completion already dropped the session;
        // the stale reply is still delivered but not kept.
        let state = sessions.get_mut(&session);

        match result {
            Ok(reply) => {
                if let Some(state) = state {
                    state.chat.push_assistant(reply.clone());
                }
                Some(reply)
            }
            Err(e) => {
                log::error!("dialogue: chat completion failed: {e}");
                if let Some(state) = state {
                    state.chat.rollback_user();
                }
                Some(ERROR_NOTICE.to_string())
            }
        }
    }
}

fn failure_notice(e: &PipelineError) -> String {
    log::error!("dialogue: lookup failed: {e}");
    ERROR_NOTICE.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
