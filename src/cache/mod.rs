//! Expiring key-value cache for finished answers.
//!
//! * [`CacheConnector`] — opens a fresh [`CacheConnection`] per logical
//!   operation (the pipeline connects once per `answer` call).
//! * [`CacheConnection`] — `get` / `setex` / `close` on string keys.
//! * [`MemoryCache`] — in-process backend with per-key TTL.
//! * [`CacheError`] — connection and command failures.

pub mod memory;
pub mod store;

pub use memory::MemoryCache;
pub use store::{CacheConnection, CacheConnector, CacheError};
