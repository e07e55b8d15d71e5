//! Yandex SpeechKit short-audio recogniser.
//!
//! `POST {base_url}?lang=ru-RU[&folderId=…]` with the raw OGG/Opus clip as
//! the body.  The service answers `{"result": "…"}` on success and
//! `{"error_code": "…", "error_message": "…"}` on failure.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SttConfig;
use crate::stt::engine::{SpeechToText, SttError};

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

fn transcript_from_response(response: RecognizeResponse) -> Result<String, SttError> {
    if let Some(code) = response.error_code {
        return Err(SttError::Recognition {
            code,
            message: response.error_message.unwrap_or_default(),
        });
    }

    let text = response.result.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(SttError::EmptyResponse);
    }
    Ok(text)
}

/// [`SpeechToText`] backed by SpeechKit.
pub struct SpeechKitRecognizer {
    client: reqwest::Client,
    config: SttConfig,
}

impl SpeechKitRecognizer {
    /// Build a recogniser from application config.
    pub fn from_config(config: &SttConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// `Authorization` header value: `Api-Key …` wins over `Bearer …`.
    fn authorization(&self) -> Result<String, SttError> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };

        if let Some(key) = non_empty(&self.config.api_key) {
            return Ok(format!("Api-Key {key}"));
        }
        if let Some(token) = non_empty(&self.config.iam_token) {
            return Ok(format!("Bearer {token}"));
        }
        Err(SttError::MissingCredentials)
    }
}

#[async_trait]
impl SpeechToText for SpeechKitRecognizer {
    async fn recognize(&self, audio: &[u8]) -> Result<String, SttError> {
        let auth = self.authorization()?;

        let mut query = vec![("lang", self.config.lang.clone())];
        if let Some(folder) = self.config.folder_id.as_ref().filter(|f| !f.is_empty()) {
            query.push(("folderId", folder.clone()));
        }

        let response = self
            .client
            .post(&self.config.base_url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .query(&query)
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SttError::Parse(format!("HTTP {status}: {e}")))?;

        let text = transcript_from_response(body)?;
        log::debug!("stt: recognised {} chars", text.chars().count());
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
