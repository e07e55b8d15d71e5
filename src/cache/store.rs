//! Cache traits shared by every backend.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the cache backend.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backend could not be reached.
    #[error("cache connection failed: {0}")]
    Connection(String),

    /// A command was issued on a handle after [`CacheConnection::close`].
    #[error("cache handle already closed")]
    Closed,

    /// The backend rejected a command.
    #[error("cache command failed: {0}")]
    Command(String),
}

/// Opens cache handles.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn CacheConnector>`.
#[async_trait]
pub trait CacheConnector: Send + Sync {
    /// Acquire a handle for one logical operation.
    async fn connect(&self) -> Result<Box<dyn CacheConnection>, CacheError>;
}

/// One acquired cache handle.
///
/// # Contract
///
/// - `get` returns `Ok(None)` for missing *and* expired keys; a miss is never
///   an error.
/// - `setex` overwrites any existing value and restarts its lifetime.
/// - After `close` every call fails with [`CacheError::Closed`].
#[async_trait]
pub trait CacheConnection: Send {
    async fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn setex(&mut self, key: &str, ttl_secs: u64, value: &str) -> Result<(), CacheError>;

    async fn close(&mut self) -> Result<(), CacheError>;
}

// Compile-time assertion: the traits must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn CacheConnector>, _: Box<dyn CacheConnection>) {}
};
