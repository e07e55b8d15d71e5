//! Yandex Speller client.
//!
//! Calls `GET {base_url}/checkText?text=…&lang=…`, which answers with a JSON
//! array of misspellings:
//!
//! ```text
//! [{"code":1,"pos":0,"row":0,"col":0,"len":5,"word":"Pythn","s":["Python"]}]
//! ```
//!
//! An empty array means the text is spelled correctly.

use std::ops::Range;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SpellerConfig;
use crate::speller::corrector::{SpellChecker, SpellError, WordCheck};

/// One misspelled word reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Misspelling {
    /// Error kind: 1 unknown word, 2 repeated word, 3 capitalisation,
    /// 4 too many errors.
    pub code: u8,
    pub pos: usize,
    pub row: usize,
    pub col: usize,
    pub len: usize,
    /// The word as it appears in the checked text.
    pub word: String,
    /// Suggested replacements, best first.
    #[serde(rename = "s", default)]
    pub suggestions: Vec<String>,
}

/// Byte range of `len` characters starting at character `pos`.
fn char_span(text: &str, pos: usize, len: usize) -> Option<Range<usize>> {
    let mut bounds = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()));
    let start = bounds.nth(pos)?;
    let end = match len {
        0 => start,
        _ => bounds.nth(len - 1)?,
    };
    Some(start..end)
}

/// Replace every reported word that has a suggestion with its first
/// suggestion, at the reported position only.
///
/// `pos`/`len` count characters.  Fixes are applied right to left so earlier
/// offsets stay valid; a span that does not hold `word`, or overlaps a fix
/// already applied, is skipped.
pub fn apply_fixes(text: &str, misspellings: &[Misspelling]) -> String {
    let mut fixes: Vec<(Range<usize>, &str)> = misspellings
        .iter()
        .filter_map(|m| {
            let best = m.suggestions.first()?;
            let span = char_span(text, m.pos, m.len)?;
            (!m.word.is_empty() && text[span.clone()] == m.word).then(|| (span, best.as_str()))
        })
        .collect();
    fixes.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut fixed = text.to_string();
    let mut limit = text.len();
    for (span, best) in fixes {
        if span.end > limit {
            log::debug!("speller: skipping overlapping fix at byte {}", span.start);
            continue;
        }
        limit = span.start;
        fixed.replace_range(span, best);
    }
    fixed
}

/// [`SpellChecker`] backed by the Yandex Speller JSON API.
pub struct YandexSpeller {
    client: reqwest::Client,
    config: SpellerConfig,
}

impl YandexSpeller {
    /// Build a speller from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &SpellerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Raw `checkText` call.
    pub async fn check_text(&self, text: &str) -> Result<Vec<Misspelling>, SpellError> {
        let url = format!("{}/checkText", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("text", text), ("lang", self.config.lang.as_str())])
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<Vec<Misspelling>>()
            .await
            .map_err(|e| SpellError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SpellChecker for YandexSpeller {
    async fn spelled(&self, text: &str) -> Result<String, SpellError> {
        let misspellings = self.check_text(text).await?;
        Ok(apply_fixes(text, &misspellings))
    }

    async fn check_word(&self, word: &str) -> Result<WordCheck, SpellError> {
        let misspellings = self.check_text(word).await?;
        Ok(WordCheck {
            correct: misspellings.is_empty(),
            suggestions: misspellings
                .into_iter()
                .flat_map(|m| m.suggestions)
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
