//! Lookup pipeline — turns a query into a cached encyclopedia answer.
//!
//! [`LookupPipeline`] owns no state of its own; every call acquires a cache
//! handle, runs the steps below strictly in order and releases the handle
//! before returning.
//!
//! # Pipeline flow
//!
//! ```text
//! connect cache ─▶ get "wiki:{query}" ──hit──▶ Answer::Cached
//!                      │ miss
//!                      ▼
//!                 page(query) ──exists──▶ excerpt + url ─────────────┐
//!                      │ missing                                    │
//!                      ▼                                            │
//!                 suggest(query) ──valid──▶ Answer::NotFound        │
//!                      │ rewrite                                    │
//!                      ▼                                            │
//!                 page(suggestion) ──empty──▶ Answer::NotFound      │
//!                      │                                            │
//!                      └──▶ did-you-mean excerpt + url ─────────────┤
//!                                                                   ▼
//!                                              setex key 86400 ─▶ close
//! ```
//!
//! Every step is bounded by `pipeline.step_timeout_secs`; the HTTP clients
//! carry their own, usually shorter, timeouts on top.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{CacheConnection, CacheConnector, CacheError};
use crate::config::AppConfig;
use crate::speller::{SpellChecker, SpellCorrector, SpellError};
use crate::stt::SttError;
use crate::wiki::{Article, Encyclopedia, SummaryExtractor, WikiError};

use super::answer::{did_you_mean_message, direct_message, not_found_message, Answer};

/// Prefix of every answer key in the cache.
pub const CACHE_KEY_PREFIX: &str = "wiki:";

/// Ends the language tag in keys for non-default languages.
const LANG_SEPARATOR: char = '\0';

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// The suspension points of a lookup, named in timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CacheConnect,
    CacheGet,
    CacheSet,
    CacheClose,
    ArticleFetch,
    SpellCheck,
    Transcribe,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CacheConnect => "cache connect",
            Stage::CacheGet => "cache read",
            Stage::CacheSet => "cache write",
            Stage::CacheClose => "cache close",
            Stage::ArticleFetch => "article fetch",
            Stage::SpellCheck => "spell check",
            Stage::Transcribe => "speech recognition",
        };
        f.write_str(name)
    }
}

/// An upstream service failed or did not answer in time.  Fatal for the
/// current turn; the dialogue layer turns it into a generic notice.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Wiki(#[from] WikiError),

    #[error(transparent)]
    Speller(#[from] SpellError),

    #[error(transparent)]
    Stt(#[from] SttError),

    #[error("{0} did not finish within {1:?}")]
    Timeout(Stage, Duration),
}

/// Await `fut`, giving up after `limit`.
pub(crate) async fn bounded<T, E, F>(
    stage: Stage,
    limit: Duration,
    fut: F,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, E>>,
    PipelineError: From<E>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(PipelineError::from),
        Err(_) => {
            log::warn!("pipeline: {stage} timed out after {limit:?}");
            Err(PipelineError::Timeout(stage, limit))
        }
    }
}

// ---------------------------------------------------------------------------
// LookupPipeline
// ---------------------------------------------------------------------------

/// Cached "answer for query" over an encyclopedia with a spelling fallback.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use wiki_voice_bot::cache::MemoryCache;
/// use wiki_voice_bot::config::AppConfig;
/// use wiki_voice_bot::pipeline::LookupPipeline;
/// use wiki_voice_bot::speller::YandexSpeller;
/// use wiki_voice_bot::wiki::MediaWikiClient;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let pipeline = LookupPipeline::new(
///     Arc::new(MemoryCache::new()),
///     Arc::new(MediaWikiClient::from_config(&config.wiki)),
///     Arc::new(YandexSpeller::from_config(&config.speller)),
///     &config,
/// );
/// let text = pipeline.answer("Python").await.unwrap();
/// println!("{text}");
/// # }
/// ```
pub struct LookupPipeline {
    cache: Arc<dyn CacheConnector>,
    encyclopedia: Arc<dyn Encyclopedia>,
    corrector: SpellCorrector,
    extractor: SummaryExtractor,
    default_lang: String,
    ttl_secs: u64,
    step_timeout: Duration,
}

impl LookupPipeline {
    pub fn new(
        cache: Arc<dyn CacheConnector>,
        encyclopedia: Arc<dyn Encyclopedia>,
        speller: Arc<dyn SpellChecker>,
        config: &AppConfig,
    ) -> Self {
        Self {
            cache,
            encyclopedia,
            corrector: SpellCorrector::new(speller),
            extractor: SummaryExtractor::new(config.wiki.excerpt_min_length),
            default_lang: config.wiki.language.clone(),
            ttl_secs: config.cache.ttl_secs,
            step_timeout: Duration::from_secs(config.pipeline.step_timeout_secs),
        }
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn step_timeout(&self) -> Duration {
        self.step_timeout
    }

    /// Cache key for `query` in `lang`.
    ///
    /// The default language keeps the plain `wiki:{query}` form.  Other
    /// editions are namespaced as `wiki:{lang}\0{query}`; NUL is not a legal
    /// title character, so no default-language query can produce that key.
    pub fn cache_key(&self, query: &str, lang: &str) -> String {
        if lang == self.default_lang {
            format!("{CACHE_KEY_PREFIX}{query}")
        } else {
            format!("{CACHE_KEY_PREFIX}{lang}{LANG_SEPARATOR}{query}")
        }
    }

    /// Answer text for `query` in the default language.
    pub async fn answer(&self, query: &str) -> Result<String, PipelineError> {
        self.lookup(query).await.map(Answer::into_text)
    }

    /// Answer text for `query` in `lang`.
    pub async fn answer_in(&self, query: &str, lang: &str) -> Result<String, PipelineError> {
        self.lookup_in(query, lang).await.map(Answer::into_text)
    }

    /// Like [`answer`](Self::answer) but keeps the branch that produced the
    /// text.
    pub async fn lookup(&self, query: &str) -> Result<Answer, PipelineError> {
        self.lookup_in(query, &self.default_lang).await
    }

    pub async fn lookup_in(&self, query: &str, lang: &str) -> Result<Answer, PipelineError> {
        let mut conn = bounded(Stage::CacheConnect, self.step_timeout, self.cache.connect()).await?;

        let result = self.lookup_with(conn.as_mut(), query, lang).await;

        // The handle is released on every path; a failed release does not
        // discard an answer that is already computed.
        if let Err(e) = bounded(Stage::CacheClose, self.step_timeout, conn.close()).await {
            log::warn!("pipeline: failed to release cache handle: {e}");
        }

        result
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    async fn lookup_with(
        &self,
        conn: &mut dyn CacheConnection,
        query: &str,
        lang: &str,
    ) -> Result<Answer, PipelineError> {
        let key = self.cache_key(query, lang);

        if let Some(bytes) = bounded(Stage::CacheGet, self.step_timeout, conn.get(&key)).await? {
            match String::from_utf8(bytes) {
                Ok(text) => {
                    log::debug!("pipeline: cache hit for {key:?}");
                    return Ok(Answer::Cached(text));
                }
                Err(e) => {
                    log::warn!("pipeline: cached value for {key:?} is not UTF-8 ({e}), refetching");
                }
            }
        }

        let answer = self.resolve(query, lang).await?;

        if answer.is_cacheable() {
            bounded(
                Stage::CacheSet,
                self.step_timeout,
                conn.setex(&key, self.ttl_secs, answer.text()),
            )
            .await?;
            log::debug!("pipeline: cached {key:?} for {}s", self.ttl_secs);
        }

        Ok(answer)
    }

    async fn resolve(&self, query: &str, lang: &str) -> Result<Answer, PipelineError> {
        let article = self.fetch(query, lang).await?;
        if article.exists {
            let excerpt = self.extractor.excerpt(&article.summary);
            return Ok(Answer::Direct(direct_message(excerpt, &article.fullurl)));
        }

        log::debug!("pipeline: no article for {query:?}, asking the speller");
        let correction =
            bounded(Stage::SpellCheck, self.step_timeout, self.corrector.suggest(query)).await?;

        if correction.is_valid {
            log::info!("pipeline: {query:?} not found and spelled correctly");
            return Ok(Answer::NotFound(not_found_message(query)));
        }

        let corrected = self.fetch(&correction.suggestion, lang).await?;
        if corrected.summary.is_empty() {
            log::info!(
                "pipeline: neither {query:?} nor {:?} has an article",
                correction.suggestion
            );
            return Ok(Answer::NotFound(not_found_message(query)));
        }

        let excerpt = self.extractor.excerpt(&corrected.summary);
        let text = did_you_mean_message(query, &correction.suggestion, excerpt, &corrected.fullurl);
        Ok(Answer::DidYouMean {
            suggestion: correction.suggestion,
            text,
        })
    }

    async fn fetch(&self, title: &str, lang: &str) -> Result<Article, PipelineError> {
        bounded(
            Stage::ArticleFetch,
            self.step_timeout,
            self.encyclopedia.page(title, lang),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
