//! Wikipedia question-answering and chat bot.
//!
//! The crate is organised around the [`pipeline::LookupPipeline`], which
//! answers a free-text query from a cache, the encyclopedia and a spelling
//! service.  [`stt::VoiceFrontDoor`] feeds it recognised speech and
//! [`dialogue::DialogueRouter`] decides, per conversation, whether a message
//! goes to the lookup pipeline or to the chat backend.

pub mod cache;
pub mod config;
pub mod dialogue;
pub mod llm;
pub mod pipeline;
pub mod speller;
pub mod stt;
pub mod wiki;

#[cfg(test)]
mod testing;
