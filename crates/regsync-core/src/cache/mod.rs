// # Policy Cache Implementations
//
// This module provides implementations of the PolicyCache trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FilePolicyCache;
pub use memory::MemoryPolicyCache;

use crate::config::{PolicyCacheConfig, PolicyCacheStore};
use crate::traits::PolicyCache;

/// Build the cache a configuration asks for
pub fn from_config(config: &PolicyCacheConfig) -> Box<dyn PolicyCache> {
    match &config.store {
        PolicyCacheStore::File { dir } => Box::new(FilePolicyCache::new(dir)),
        PolicyCacheStore::Memory => Box::new(MemoryPolicyCache::new()),
    }
}
