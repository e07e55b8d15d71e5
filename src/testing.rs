//! Test doubles for every external service, shared by the unit tests of the
//! pipeline, the voice front door and the dialogue router.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheConnection, CacheConnector, CacheError};
use crate::llm::{ChatBackend, ChatMessage, LlmError};
use crate::speller::{SpellChecker, SpellError, WordCheck};
use crate::stt::{SpeechToText, SttError};
use crate::wiki::{Article, Encyclopedia, WikiError};

// ---------------------------------------------------------------------------
// FakeEncyclopedia
// ---------------------------------------------------------------------------

/// Serves articles from a map keyed by title; unknown titles are missing.
#[derive(Default)]
pub struct FakeEncyclopedia {
    articles: HashMap<String, Article>,
    requests: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
    fail: bool,
}

impl FakeEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with `WikiError::Request`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_article(mut self, title: &str, summary: &str, url: &str) -> Self {
        self.articles.insert(
            title.to_string(),
            Article {
                exists: true,
                summary: summary.to_string(),
                fullurl: url.to_string(),
            },
        );
        self
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// `(title, lang)` of every request, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_titles(&self) -> Vec<String> {
        self.requests().into_iter().map(|(title, _)| title).collect()
    }
}

#[async_trait]
impl Encyclopedia for FakeEncyclopedia {
    async fn page(&self, title: &str, lang: &str) -> Result<Article, WikiError> {
        self.requests
            .lock()
            .unwrap()
            .push((title.to_string(), lang.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(WikiError::Request("connection refused".into()));
        }
        Ok(self.articles.get(title).cloned().unwrap_or_else(Article::missing))
    }
}

// ---------------------------------------------------------------------------
// FakeSpeller
// ---------------------------------------------------------------------------

/// Words are correct unless registered as misspelled; phrases come back
/// unchanged unless a rewrite is registered.
#[derive(Default)]
pub struct FakeSpeller {
    words: HashMap<String, WordCheck>,
    phrases: HashMap<String, String>,
    fail: bool,
    word_calls: AtomicUsize,
    phrase_calls: AtomicUsize,
}

impl FakeSpeller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `SpellError::Request`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_correct_word(mut self, word: &str) -> Self {
        self.words.insert(
            word.to_string(),
            WordCheck {
                correct: true,
                suggestions: Vec::new(),
            },
        );
        self
    }

    pub fn with_misspelled_word(mut self, word: &str, suggestions: &[&str]) -> Self {
        self.words.insert(
            word.to_string(),
            WordCheck {
                correct: false,
                suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_phrase(mut self, phrase: &str, rewrite: &str) -> Self {
        self.phrases.insert(phrase.to_string(), rewrite.to_string());
        self
    }

    pub fn word_calls(&self) -> usize {
        self.word_calls.load(Ordering::SeqCst)
    }

    pub fn phrase_calls(&self) -> usize {
        self.phrase_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpellChecker for FakeSpeller {
    async fn spelled(&self, text: &str) -> Result<String, SpellError> {
        self.phrase_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SpellError::Request("connection refused".into()));
        }
        Ok(self
            .phrases
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }

    async fn check_word(&self, word: &str) -> Result<WordCheck, SpellError> {
        self.word_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SpellError::Request("connection refused".into()));
        }
        Ok(self.words.get(word).cloned().unwrap_or(WordCheck {
            correct: true,
            suggestions: Vec::new(),
        }))
    }
}

// ---------------------------------------------------------------------------
// FailingCache
// ---------------------------------------------------------------------------

/// A cache whose backend is unreachable.
pub struct FailingCache;

#[async_trait]
impl CacheConnector for FailingCache {
    async fn connect(&self) -> Result<Box<dyn CacheConnection>, CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
}

// ---------------------------------------------------------------------------
// FakeStt
// ---------------------------------------------------------------------------

/// Returns a pre-configured transcript and counts how often it was asked.
pub struct FakeStt {
    response: Result<String, SttError>,
    calls: AtomicUsize,
}

impl FakeStt {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToText for FakeStt {
    async fn recognize(&self, _audio: &[u8]) -> Result<String, SttError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeChat
// ---------------------------------------------------------------------------

/// Replies `"echo: {last user message}"` and records every history it saw.
#[derive(Default)]
pub struct FakeChat {
    histories: Mutex<Vec<Vec<ChatMessage>>>,
    fail: bool,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every completion fails with `LlmError::Timeout`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, LlmError> {
        self.histories.lock().unwrap().push(history.to_vec());
        if self.fail {
            return Err(LlmError::Timeout);
        }
        let last = history.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(format!("echo: {last}"))
    }
}
