// # Memory Policy Cache
//
// In-memory implementation of PolicyCache.
//
// ## Purpose
//
// Keeps catalog entries for the lifetime of the process. Every new process
// starts cold and fetches each TLD it touches once.
//
// ## When to Use
//
// - Testing environments
// - One-shot runs where a cache directory is not wanted

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::catalog::TldInfo;
use crate::traits::policy_cache::{CachedTld, PolicyCache};

/// In-memory policy cache
///
/// Entries live in a HashMap behind a RwLock. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyCache {
    inner: Arc<RwLock<HashMap<String, CachedTld>>>,
}

impl MemoryPolicyCache {
    /// Create a new empty memory cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry with an explicit stored-at time
    pub async fn insert(&self, tld: &str, entry: CachedTld) {
        self.inner.write().await.insert(tld.to_string(), entry);
    }

    /// Get the number of cached TLDs
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl PolicyCache for MemoryPolicyCache {
    async fn get(&self, tld: &str) -> Result<Option<CachedTld>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(tld).cloned())
    }

    async fn put(&self, tld: &str, info: &TldInfo) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(tld.to_string(), CachedTld::fresh(info.clone()));
        Ok(())
    }

    async fn invalidate(&self, tld: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(tld);
        Ok(())
    }
}
