//! In-memory page cache with LRU eviction
//!
//! Holds at most `max_entries` rendered pages; the least recently used page
//! is evicted when a new one is stored. Expired entries are removed when
//! read and handed back once, so the caller can tell a stale page from a miss.

use async_trait::async_trait;
use folio_domain::usecases::{CacheEntry, RenderedPage};
use folio_domain::{CacheError, Clock, PageCache, SystemClock};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default number of pages kept in memory
pub const DEFAULT_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Bounded in-memory page cache keyed by route
pub struct InMemoryPageCache {
    pages: RwLock<LruCache<String, CacheEntry<RenderedPage>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPageCache {
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Cache judging expiry against the given clock
    pub fn with_clock(max_entries: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            pages: RwLock::new(LruCache::new(max_entries)),
            clock,
        }
    }

    /// Number of cached pages
    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryPageCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<RenderedPage>>, CacheError> {
        let now = self.clock.now();
        let mut pages = self.pages.write().await;

        let Some(entry) = pages.get(key) else {
            return Ok(None);
        };
        if entry.is_fresh(now) {
            return Ok(Some(entry.clone()));
        }

        tracing::debug!(key = %key, "Dropping expired page");
        Ok(pages.pop(key))
    }

    async fn put(&self, key: &str, entry: CacheEntry<RenderedPage>) -> Result<(), CacheError> {
        let mut pages = self.pages.write().await;
        if let Some((evicted, _)) = pages.push(key.to_string(), entry) {
            if evicted != key {
                tracing::debug!(key = %evicted, "Evicted least recently used page");
            }
        }
        Ok(())
    }
}
