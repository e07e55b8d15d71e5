//! Core speech-to-text trait and its error type.
//!
//! [`SpeechToText`] is object-safe and `Send + Sync` so it can be held
//! behind an `Arc<dyn SpeechToText>`.

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// Neither an API key nor an IAM token is configured.
    #[error("speech recognition credentials are not configured")]
    MissingCredentials,

    /// HTTP transport or connection error.
    #[error("speech recognition request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech recognition timed out")]
    Timeout,

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse speech recognition response: {0}")]
    Parse(String),

    /// The service rejected the clip.
    #[error("speech recognition error {code}: {message}")]
    Recognition { code: String, message: String },

    /// Nothing intelligible was recognised.
    #[error("speech recognition returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for SttError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SttError::Timeout
        } else {
            SttError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechToText trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech recognisers.
///
/// # Contract
///
/// - `audio` is one encoded clip (OGG/Opus as sent by messengers).
/// - Clips are expected to be shorter than the service's short-audio limit;
///   callers enforce that before recognition.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognise `audio` and return the transcript.
    async fn recognize(&self, audio: &[u8]) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn SpeechToText> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechToText>) {}
};
