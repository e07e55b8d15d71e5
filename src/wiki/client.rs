//! MediaWiki Action API client.
//!
//! One `GET` per page:
//!
//! ```text
//! {api_url}?action=query&format=json&formatversion=2&redirects=1
//!          &prop=extracts|info&exintro=1&explaintext=1&inprop=url&titles={title}
//! ```
//!
//! `{lang}` in `api_url` is substituted with the requested edition, so the
//! default `https://{lang}.wikipedia.org/w/api.php` covers every language.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::WikiConfig;
use crate::wiki::article::{Article, Encyclopedia, WikiError};

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageBody>,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    fullurl: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

fn article_from_response(response: QueryResponse) -> Result<Article, WikiError> {
    if let Some(err) = response.error {
        return Err(WikiError::Api {
            code: err.code,
            info: err.info,
        });
    }

    let page = match response.query.and_then(|q| q.pages.into_iter().next()) {
        Some(page) => page,
        None => return Ok(Article::missing()),
    };

    if page.missing || page.invalid {
        return Ok(Article {
            exists: false,
            summary: String::new(),
            fullurl: page.fullurl,
        });
    }

    Ok(Article {
        exists: true,
        summary: page.extract.trim().to_string(),
        fullurl: page.fullurl,
    })
}

// ---------------------------------------------------------------------------
// MediaWikiClient
// ---------------------------------------------------------------------------

/// [`Encyclopedia`] backed by the MediaWiki Action API.
pub struct MediaWikiClient {
    client: reqwest::Client,
    config: WikiConfig,
}

impl MediaWikiClient {
    /// Build a client from application config.
    ///
    /// The HTTP client carries the per-request timeout and the `User-Agent`
    /// from `config`.
    pub fn from_config(config: &WikiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self, lang: &str) -> String {
        self.config.api_url.replace("{lang}", lang)
    }
}

#[async_trait]
impl Encyclopedia for MediaWikiClient {
    async fn page(&self, title: &str, lang: &str) -> Result<Article, WikiError> {
        let url = self.endpoint(lang);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("redirects", "1"),
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| WikiError::Parse(e.to_string()))?;

        let article = article_from_response(body)?;
        log::debug!(
            "wiki: {lang}:{title:?} exists={} summary_chars={}",
            article.exists,
            article.summary.chars().count()
        );
        Ok(article)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
