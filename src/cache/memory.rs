//! In-process [`CacheConnector`] backed by a shared map.
//!
//! Expired entries are evicted when read, swept on every `setex` and in
//! bulk by [`MemoryCache::purge_expired`].  Lifetimes are measured with
//! `tokio::time::Instant`, so paused-clock tests can advance past a TTL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::store::{CacheConnection, CacheConnector, CacheError};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

type SharedEntries = Arc<Mutex<HashMap<String, Entry>>>;

/// Shared in-memory store.  Cheap to clone; every clone sees the same
/// entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: SharedEntries,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired with `connect` and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Remaining lifetime of `key`, or `None` when absent or expired.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at - now)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            log::debug!("cache: purged {removed} expired entries");
        }
        removed
    }
}

#[async_trait]
impl CacheConnector for MemoryCache {
    async fn connect(&self) -> Result<Box<dyn CacheConnection>, CacheError> {
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            entries: Arc::clone(&self.entries),
            open_handles: Arc::clone(&self.open_handles),
            closed: false,
        }))
    }
}

/// Handle returned by [`MemoryCache::connect`].
struct MemoryConnection {
    entries: SharedEntries,
    open_handles: Arc<AtomicUsize>,
    closed: bool,
}

impl MemoryConnection {
    fn ensure_open(&self) -> Result<(), CacheError> {
        if self.closed {
            Err(CacheError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheConnection for MemoryConnection {
    async fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.ensure_open()?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn setex(&mut self, key: &str, ttl_secs: u64, value: &str) -> Result<(), CacheError> {
        self.ensure_open()?;
        if ttl_secs == 0 {
            return Err(CacheError::Command(format!(
                "invalid expire time for key {key:?}"
            )));
        }
        let now = Instant::now();
        let entry = Entry {
            value: value.as_bytes().to_vec(),
            expires_at: now + Duration::from_secs(ttl_secs),
        };
        let mut entries = self.entries.lock().await;
        // Sweep on insert so keys that are never read again do not pile up.
        entries.retain(|_, e| e.is_live(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CacheError> {
        self.ensure_open()?;
        self.closed = true;
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_is_none_not_error() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        assert_eq!(conn.get("wiki:nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn setex_then_get_returns_bytes() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        conn.setex("wiki:Москва", 60, "столица").await.unwrap();
        let value = conn.get("wiki:Москва").await.unwrap().unwrap();
        assert_eq!(String::from_utf8(value).unwrap(), "столица");
    }

    #[tokio::test]
    async fn setex_overwrites_and_restarts_ttl() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        conn.setex("k", 10, "old").await.unwrap();
        conn.setex("k", 100, "new").await.unwrap();

        assert_eq!(conn.get("k").await.unwrap().unwrap(), b"new");
        let ttl = cache.ttl("k").await.unwrap();
        assert!(ttl > Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        conn.setex("k", 5, "v").await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(conn.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(conn.get("k").await.unwrap().is_none());
        assert!(cache.ttl("k").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn purge_expired_removes_only_dead_entries() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        conn.setex("short", 1, "a").await.unwrap();
        conn.setex("long", 100, "b").await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.ttl("long").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn setex_sweeps_expired_entries_that_are_never_read() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        for i in 0..1000 {
            conn.setex(&format!("wiki:q{i}"), 1, "v").await.unwrap();
        }

        tokio::time::advance(Duration::from_secs(10)).await;
        conn.setex("wiki:fresh", 60, "v").await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_is_rejected() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        let err = conn.setex("k", 0, "v").await.unwrap_err();
        assert!(matches!(err, CacheError::Command(_)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn closed_handle_rejects_commands() {
        let cache = MemoryCache::new();
        let mut conn = cache.connect().await.unwrap();
        assert_eq!(cache.open_handles(), 1);

        conn.close().await.unwrap();
        assert_eq!(cache.open_handles(), 0);

        assert!(matches!(conn.get("k").await, Err(CacheError::Closed)));
        assert!(matches!(conn.setex("k", 1, "v").await, Err(CacheError::Closed)));
        assert!(matches!(conn.close().await, Err(CacheError::Closed)));
        assert_eq!(cache.open_handles(), 0);
    }

    #[tokio::test]
    async fn handles_share_entries() {
        let cache = MemoryCache::new();
        let mut writer = cache.connect().await.unwrap();
        writer.setex("shared", 60, "v").await.unwrap();
        writer.close().await.unwrap();

        let mut reader = cache.clone().connect().await.unwrap();
        assert_eq!(reader.get("shared").await.unwrap().unwrap(), b"v");
    }
}
