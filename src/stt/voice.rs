//! Voice front door: recognise a clip, then look the text up.

use std::sync::Arc;

use crate::pipeline::runner::bounded;
use crate::pipeline::{Answer, LookupPipeline, PipelineError, Stage};
use crate::stt::engine::{SpeechToText, SttError};

/// Feeds recognised speech into a [`LookupPipeline`].
///
/// Clips must already be known to be shorter than the configured limit;
/// the dialogue layer rejects longer ones before calling in here.
pub struct VoiceFrontDoor {
    stt: Arc<dyn SpeechToText>,
    pipeline: Arc<LookupPipeline>,
}

impl VoiceFrontDoor {
    pub fn new(stt: Arc<dyn SpeechToText>, pipeline: Arc<LookupPipeline>) -> Self {
        Self { stt, pipeline }
    }

    /// Recognise `audio`.  The transcript is passed on exactly as recognised;
    /// a blank one is an error, never a query.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, PipelineError> {
        let text = bounded(
            Stage::Transcribe,
            self.pipeline.step_timeout(),
            self.stt.recognize(audio),
        )
        .await?;

        if text.trim().is_empty() {
            return Err(SttError::EmptyResponse.into());
        }
        log::info!("voice: recognised {text:?}");
        Ok(text)
    }

    /// Recognise `audio` and answer the transcript.
    pub async fn answer(&self, audio: &[u8]) -> Result<Answer, PipelineError> {
        let query = self.transcribe(audio).await?;
        self.pipeline.lookup(&query).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
