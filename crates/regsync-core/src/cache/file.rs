// # File Policy Cache
//
// File-based implementation of PolicyCache.
//
// ## Layout
//
// One JSON document per TLD: `<dir>/<tld>.json`, holding the catalog entry
// as returned by the catalog. The file modification time is the stored-at
// time, so refreshing an entry is just rewriting its file.
//
// ## Writes
//
// - Atomic: written to `<tld>.tmp`, then renamed over `<tld>.json`
// - The cache directory is created on first write
//
// ## Corruption
//
// An unparsable file is reported as a cache error. It is NOT treated as a
// miss: callers fail closed on policy lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::catalog::TldInfo;
use crate::traits::policy_cache::{CachedTld, PolicyCache};

/// File-based policy cache
///
/// # Example
///
/// ```rust,no_run
/// use regsync_core::cache::FilePolicyCache;
/// use regsync_core::traits::{PolicyCache, TldInfo};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FilePolicyCache::new("/var/cache/regsync");
///
///     cache.put("com", &TldInfo::default()).await?;
///     let entry = cache.get("com").await?;
///     assert!(entry.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FilePolicyCache {
    dir: PathBuf,
}

impl FilePolicyCache {
    /// Create a cache rooted at `dir` (created lazily)
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for a TLD
    fn entry_path(&self, tld: &str) -> Result<PathBuf, Error> {
        if tld.is_empty() || !tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::cache(format!("Invalid TLD for cache key: '{}'", tld)));
        }
        Ok(self.dir.join(format!("{}.json", tld.to_ascii_lowercase())))
    }

    async fn ensure_dir(&self) -> Result<(), Error> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to create cache directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyCache for FilePolicyCache {
    async fn get(&self, tld: &str) -> Result<Option<CachedTld>, Error> {
        let path = self.entry_path(tld)?;
        if !path.exists() {
            tracing::debug!("No cached catalog entry: {}", path.display());
            return Ok(None);
        }

        let modified = fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .map_err(|e| {
                Error::cache(format!("Failed to stat cache file {}: {}", path.display(), e))
            })?;

        let content = fs::read_to_string(&path).await.map_err(|e| {
            Error::cache(format!("Failed to read cache file {}: {}", path.display(), e))
        })?;

        let info: TldInfo = serde_json::from_str(&content).map_err(|e| {
            Error::cache(format!(
                "Failed to parse cache file {}: {}. Delete it to refetch.",
                path.display(),
                e
            ))
        })?;

        Ok(Some(CachedTld {
            info,
            stored_at: DateTime::<Utc>::from(modified),
        }))
    }

    async fn put(&self, tld: &str, info: &TldInfo) -> Result<(), Error> {
        let path = self.entry_path(tld)?;
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(info)
            .map_err(|e| Error::cache(format!("Failed to serialize catalog entry: {}", e)))?;

        let temp_path = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::cache(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::cache(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!("Catalog entry cached: {}", path.display());
        Ok(())
    }

    async fn invalidate(&self, tld: &str) -> Result<(), Error> {
        let path = self.entry_path(tld)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::cache(format!(
                "Failed to remove cache file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
