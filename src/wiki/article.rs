//! The `Article` record and the `Encyclopedia` capability.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching an article.
#[derive(Debug, Clone, Error)]
pub enum WikiError {
    /// HTTP transport or connection error.
    #[error("encyclopedia request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("encyclopedia request timed out")]
    Timeout,

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse encyclopedia response: {0}")]
    Parse(String),

    /// The API answered with an error object.
    #[error("encyclopedia API error {code}: {info}")]
    Api { code: String, info: String },
}

impl From<reqwest::Error> for WikiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WikiError::Timeout
        } else {
            WikiError::Request(e.to_string())
        }
    }
}

/// One encyclopedia page as seen by the lookup pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub exists: bool,
    /// Plain-text introduction; empty for missing pages.
    pub summary: String,
    /// Canonical page URL; may be empty for missing pages.
    pub fullurl: String,
}

impl Article {
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Async interface to an encyclopedia.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn Encyclopedia>`.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Fetch the page titled `title` from the `lang` edition.  A missing page
    /// is `Ok` with `exists == false`, never an error.
    async fn page(&self, title: &str, lang: &str) -> Result<Article, WikiError>;
}
