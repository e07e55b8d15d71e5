//! Core `SpellChecker` trait and the query-level `SpellCorrector`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SpellError
// ---------------------------------------------------------------------------

/// Errors that can occur while calling the spell checker.
#[derive(Debug, Clone, Error)]
pub enum SpellError {
    /// HTTP transport or connection error.
    #[error("speller request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speller request timed out")]
    Timeout,

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse speller response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SpellError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpellError::Timeout
        } else {
            SpellError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpellChecker trait
// ---------------------------------------------------------------------------

/// Dictionary verdict for a single word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCheck {
    /// The word is spelled correctly.
    pub correct: bool,
    /// Replacement candidates, best first.  Empty when `correct`.
    pub suggestions: Vec<String>,
}

/// Async interface to a spell-checking service.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn SpellChecker>`.
#[async_trait]
pub trait SpellChecker: Send + Sync {
    /// Rewrite `text` with every misspelled word replaced by its best
    /// suggestion.  Returns `text` unchanged when nothing needs fixing.
    async fn spelled(&self, text: &str) -> Result<String, SpellError>;

    /// Check one word against the dictionary.
    async fn check_word(&self, word: &str) -> Result<WordCheck, SpellError>;
}

// ---------------------------------------------------------------------------
// SpellCorrector
// ---------------------------------------------------------------------------

/// Outcome of [`SpellCorrector::suggest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// The query passed the dictionary check as-is.  Never `true` for
    /// multi-word queries.
    pub is_valid: bool,
    /// Text to retry the lookup with.
    pub suggestion: String,
}

/// Picks a replacement for a query whose article was not found.
#[derive(Clone)]
pub struct SpellCorrector {
    checker: Arc<dyn SpellChecker>,
}

impl SpellCorrector {
    pub fn new(checker: Arc<dyn SpellChecker>) -> Self {
        Self { checker }
    }

    /// Decide whether `query` is valid or suggest a rewrite.
    ///
    /// * Multi-word (contains whitespace): always `is_valid = false`, the
    ///   suggestion is the checker's rewrite of the whole phrase (possibly
    ///   identical to `query`).
    /// * Single word, spelled correctly: `(true, query)`.
    /// * Single word, misspelled: `(false, first suggestion)`, or `query`
    ///   unchanged when the checker has no suggestion.
    pub async fn suggest(&self, query: &str) -> Result<Correction, SpellError> {
        if query.contains(char::is_whitespace) {
            let corrected = self.checker.spelled(query).await?;
            log::debug!("speller: phrase {query:?} -> {corrected:?}");
            return Ok(Correction {
                is_valid: false,
                suggestion: corrected,
            });
        }

        let check = self.checker.check_word(query).await?;
        if check.correct {
            return Ok(Correction {
                is_valid: true,
                suggestion: query.to_string(),
            });
        }

        let suggestion = check
            .suggestions
            .into_iter()
            .next()
            .unwrap_or_else(|| query.to_string());
        log::debug!("speller: word {query:?} -> {suggestion:?}");
        Ok(Correction {
            is_valid: false,
            suggestion,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSpeller;

    fn corrector(speller: FakeSpeller) -> (SpellCorrector, Arc<FakeSpeller>) {
        let speller = Arc::new(speller);
        (SpellCorrector::new(speller.clone()), speller)
    }

    #[tokio::test]
    async fn correct_word_is_valid_and_unchanged() {
        let (c, _) = corrector(FakeSpeller::new().with_correct_word("Python"));
        let result = c.suggest("Python").await.unwrap();
        assert_eq!(
            result,
            Correction {
                is_valid: true,
                suggestion: "Python".into()
            }
        );
    }

    #[tokio::test]
    async fn misspelled_word_takes_first_suggestion() {
        let (c, _) = corrector(
            FakeSpeller::new().with_misspelled_word("Pythn", &["Python", "Pythia"]),
        );
        let result = c.suggest("Pythn").await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.suggestion, "Python");
    }

    #[tokio::test]
    async fn misspelled_word_without_suggestions_keeps_query() {
        let (c, _) = corrector(FakeSpeller::new().with_misspelled_word("Ыъь", &[]));
        let result = c.suggest("Ыъь").await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.suggestion, "Ыъь");
    }

    #[tokio::test]
    async fn phrase_is_never_valid_even_when_unchanged() {
        let (c, speller) = corrector(FakeSpeller::new());
        let result = c.suggest("теория относительности").await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.suggestion, "теория относительности");
        assert_eq!(speller.phrase_calls(), 1);
        assert_eq!(speller.word_calls(), 0);
    }

    #[tokio::test]
    async fn phrase_uses_rewritten_text() {
        let (c, _) = corrector(
            FakeSpeller::new().with_phrase("теория атносительности", "теория относительности"),
        );
        let result = c.suggest("теория атносительности").await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.suggestion, "теория относительности");
    }

    #[tokio::test]
    async fn checker_failure_propagates() {
        let (c, _) = corrector(FakeSpeller::failing());
        let err = c.suggest("Pythn").await.unwrap_err();
        assert!(matches!(err, SpellError::Request(_)));
    }
}
