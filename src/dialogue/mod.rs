//! Transport-agnostic dialogue layer.
//!
//! A messenger adapter (or the console REPL in `main.rs`) turns each user
//! message into an [`Incoming`] and hands it to [`DialogueRouter::handle`]
//! together with a session id; the returned text, if any, is sent back.
//!
//! ```text
//! /start ─▶ menu
//! /wiki  ─▶ Mode::Wiki ── text  ─▶ LookupPipeline
//!                      └─ voice ─▶ duration check ─▶ VoiceFrontDoor
//! /gpt   ─▶ Mode::Chat ── text  ─▶ ChatBackend (per-session history)
//! /exit  ─▶ Mode::Menu, history cleared
//! ```

pub mod router;
pub mod state;

pub use router::{DialogueRouter, Incoming, SessionId};
pub use state::{Mode, Session};
