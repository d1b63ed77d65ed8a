//! Port interface for the response cache in front of user reads.
use async_trait::async_trait;
use serde_json::Value;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum ResponseCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "response cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "response cache serialisation failed: {message}",
    }
}

/// Key-value store holding serialised response payloads.
///
/// Callers treat every failure as a miss and fall open to the store; the
/// [`UserDirectoryService`](crate::domain::directory::UserDirectoryService)
/// logs the failure so degraded caching is visible in operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Read a cached payload for the given key.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, ResponseCacheError>;

    /// Store a payload under the supplied key, replacing any prior entry.
    async fn put(&self, key: &CacheKey, payload: &Value) -> Result<(), ResponseCacheError>;

    /// Remove the entry under the supplied key, if present.
    async fn remove(&self, key: &CacheKey) -> Result<(), ResponseCacheError>;

    /// Remove every entry whose key starts with the supplied prefix.
    async fn remove_prefix(&self, prefix: &str) -> Result<(), ResponseCacheError>;

    /// Remove every entry in the cache, unconditionally.
    async fn clear(&self) -> Result<(), ResponseCacheError>;
}
