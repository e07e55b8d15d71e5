//! Typed lookup outcomes and the user-facing message templates.

/// Result of one lookup, tagged with the branch that produced it.
///
/// ```text
/// cache hit ───────────────────────────────▶ Cached
/// article exists ──────────────────────────▶ Direct
/// article missing ─▶ correction has article ▶ DidYouMean
///                 └▶ otherwise ────────────▶ NotFound   (never cached)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Served from the cache without touching any other service.
    Cached(String),
    /// Excerpt of the requested article plus its URL.
    Direct(String),
    /// The query was misspelled; excerpt of the corrected article.
    DidYouMean { suggestion: String, text: String },
    /// Nothing was found.
    NotFound(String),
}

impl Answer {
    /// The text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            Answer::Cached(text)
            | Answer::Direct(text)
            | Answer::DidYouMean { text, .. }
            | Answer::NotFound(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Cached(text)
            | Answer::Direct(text)
            | Answer::DidYouMean { text, .. }
            | Answer::NotFound(text) => text,
        }
    }

    /// Whether this answer should be written to the cache.  Negative
    /// answers are not, so a later retry can pick up new articles or
    /// better corrections.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Answer::Direct(_) | Answer::DidYouMean { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Answer::NotFound(_))
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn not_found_message(query: &str) -> String {
    format!("Статья '{query}' не найдена в Википедии.")
}

pub fn did_you_mean_message(query: &str, suggestion: &str, excerpt: &str, url: &str) -> String {
    format!(
        "Статья '{query}' не найдена в Википедии. Возможно, вы имели в виду: '{suggestion}'.\n\
         Вот статья по запросу '{suggestion}':\n{excerpt}\n{url}"
    )
}

pub fn direct_message(excerpt: &str, url: &str) -> String {
    format!("{excerpt}\n{url}")
}
