// # Policy Cache Trait
//
// Defines the interface for storing TLD catalog entries between runs.
//
// ## Purpose
//
// Catalog entries change on the order of months. Caching them keeps a
// reconciliation run down to the registrar calls it actually needs.
// Expiry is decided by `TldPolicySource` from the entry's stored-at time;
// the cache itself only stores, returns and forgets.
//
// ## Implementations
//
// - `MemoryPolicyCache`: process lifetime only
// - `FilePolicyCache`: one JSON file per TLD, file mtime is the stored-at time

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::traits::catalog::TldInfo;

/// A cached catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedTld {
    /// The catalog entry
    pub info: TldInfo,
    /// When the entry was stored
    pub stored_at: DateTime<Utc>,
}

impl CachedTld {
    /// Wrap an entry stored now
    pub fn fresh(info: TldInfo) -> Self {
        Self {
            info,
            stored_at: Utc::now(),
        }
    }

    /// Age in whole days at `now`
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.stored_at).num_days()
    }

    /// Stale once the whole-day age exceeds `max_age_days`
    pub fn is_stale(&self, now: DateTime<Utc>, max_age_days: i64) -> bool {
        self.age_days(now) > max_age_days
    }
}

/// Trait for policy cache implementations
///
/// # Errors
///
/// A corrupt entry is an error, not a miss: the caller must be able to
/// tell "nothing cached" from "cache unreadable".
#[async_trait]
pub trait PolicyCache: Send + Sync {
    /// Get the cached entry for a TLD
    ///
    /// - `Ok(Some(entry))`: an entry exists (possibly stale)
    /// - `Ok(None)`: nothing cached
    /// - `Err(Error)`: storage error or corrupt entry
    async fn get(&self, tld: &str) -> Result<Option<CachedTld>, crate::Error>;

    /// Store (or replace) the entry for a TLD
    async fn put(&self, tld: &str, info: &TldInfo) -> Result<(), crate::Error>;

    /// Forget the entry for a TLD (no error if absent)
    async fn invalidate(&self, tld: &str) -> Result<(), crate::Error>;
}
