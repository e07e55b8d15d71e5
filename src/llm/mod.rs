//! Chat backend for free-form conversation mode.
//!
//! This module provides:
//! * [`ChatBackend`] — async trait implemented by all completion backends.
//! * [`ApiChat`] — OpenAI-compatible REST API backend.
//! * [`ChatSession`] — the turns of one conversation, owned per session.
//! * [`ChatMessage`] / [`Role`] — wire-format chat turns.
//! * [`LlmError`] — error variants for chat completion.

pub mod chat;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::{ApiChat, ChatBackend, ChatMessage, LlmError, Role};
pub use session::ChatSession;
