//! Encyclopedia answer pipeline.
//!
//! * [`LookupPipeline`] — cache → article → spelling fallback → excerpt →
//!   cache, one call per user query.
//! * [`Answer`] — which branch produced the text.
//! * [`PipelineError`] / [`Stage`] — upstream failures and timeouts.

pub mod answer;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use answer::{did_you_mean_message, direct_message, not_found_message, Answer};
pub use runner::{LookupPipeline, PipelineError, Stage, CACHE_KEY_PREFIX};
