//! Speech-to-text for voice queries.
//!
//! ```text
//! audio bytes ──▶ SpeechToText::recognize ──▶ text ──▶ LookupPipeline::lookup
//!                 (SpeechKitRecognizer)                (VoiceFrontDoor)
//! ```
//!
//! Clip duration is checked by the dialogue layer before anything here runs.

pub mod engine;
pub mod speechkit;
pub mod voice;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{SpeechToText, SttError};
pub use speechkit::SpeechKitRecognizer;
pub use voice::VoiceFrontDoor;
