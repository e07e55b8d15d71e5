//! Encyclopedia access and excerpt extraction.
//!
//! * [`Encyclopedia`] — async trait: `page(title, lang) -> Article`.
//! * [`MediaWikiClient`] — MediaWiki Action API implementation.
//! * [`SummaryExtractor`] — cuts a summary at a sentence boundary.
//! * [`WikiError`] / [`ExtractError`] — error variants.

pub mod article;
pub mod client;
pub mod summary;

pub use article::{Article, Encyclopedia, WikiError};
pub use client::MediaWikiClient;
pub use summary::{ExtractError, SummaryExtractor, DEFAULT_MIN_LENGTH};
