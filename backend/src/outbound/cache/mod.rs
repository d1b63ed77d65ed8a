//! In-process response cache adapter.
//!
//! Backs the [`ResponseCache`] port with a concurrent hash map. Entries are
//! unbounded and live until invalidated by a write; the cache policy in the
//! domain keeps the working set small (one entry per requested page plus one
//! per fetched user detail).

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::domain::ports::{CacheKey, ResponseCache, ResponseCacheError};

/// Concurrent in-memory [`ResponseCache`] implementation.
///
/// Suitable for single-process deployments and tests. Multi-instance
/// deployments need a shared backend behind the same port instead.
#[derive(Debug, Default)]
pub struct InMemoryResponseCache {
    entries: DashMap<String, Value>,
}

impl InMemoryResponseCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for test assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache currently holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, ResponseCacheError> {
        Ok(self.entries.get(key.as_str()).map(|entry| entry.clone()))
    }

    async fn put(&self, key: &CacheKey, payload: &Value) -> Result<(), ResponseCacheError> {
        self.entries.insert(key.as_str().to_owned(), payload.clone());
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), ResponseCacheError> {
        self.entries.remove(key.as_str());
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), ResponseCacheError> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    async fn clear(&self) -> Result<(), ResponseCacheError> {
        self.entries.clear();
        Ok(())
    }
}
