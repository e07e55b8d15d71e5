//! Excerpt extraction.
//!
//! All lengths and offsets count characters, not bytes: Cyrillic summaries
//! are never cut inside a code point.

use thiserror::Error;

/// Default excerpt threshold in characters.
pub const DEFAULT_MIN_LENGTH: usize = 1000;

/// Errors from [`SummaryExtractor::truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The text is at least `min_length` characters long but has no `.`
    /// at or after that offset.
    #[error("no sentence boundary at or after character {min_length}")]
    NoSentenceBoundary { min_length: usize },
}

/// Cuts article summaries down to a bounded excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryExtractor {
    min_length: usize,
}

impl Default for SummaryExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl SummaryExtractor {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Texts shorter than `min_length` characters come back unchanged;
    /// longer ones end at the first `.` found at or after character
    /// `min_length`, inclusive.
    ///
    /// ```
    /// use wiki_voice_bot::wiki::SummaryExtractor;
    ///
    /// let extractor = SummaryExtractor::new(5);
    /// assert_eq!(extractor.truncate("Abc.").unwrap(), "Abc.");
    /// assert_eq!(extractor.truncate("One. Two. Three.").unwrap(), "One. Two.");
    /// assert!(extractor.truncate("No terminator here").is_err());
    /// ```
    pub fn truncate<'a>(&self, text: &'a str) -> Result<&'a str, ExtractError> {
        let not_found = ExtractError::NoSentenceBoundary {
            min_length: self.min_length,
        };

        let start = match text.char_indices().nth(self.min_length) {
            Some((byte_idx, _)) => byte_idx,
            None if text.chars().count() < self.min_length => return Ok(text),
            None => return Err(not_found),
        };

        match text[start..].find('.') {
            Some(offset) => Ok(&text[..start + offset + 1]),
            None => Err(not_found),
        }
    }

    /// Infallible variant of [`truncate`](Self::truncate): when there is no
    /// sentence boundary the first `min_length + 1` characters are returned.
    pub fn excerpt<'a>(&self, text: &'a str) -> &'a str {
        match self.truncate(text) {
            Ok(excerpt) => excerpt,
            Err(e) => {
                log::debug!("summary: {e}; cutting at a fixed length");
                match text.char_indices().nth(self.min_length + 1) {
                    Some((byte_idx, _)) => &text[..byte_idx],
                    None => text,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
