//! On-disk cache of registry metadata.
//!
//! One JSON file per package name under a cache directory, each holding
//! the registry response plus a `fetchedAt` epoch-millisecond stamp. The
//! cache is strictly best-effort: every read failure (missing file,
//! corrupt JSON, missing stamp) is a miss, and a write failure only costs
//! the next run a cache hit. Neither is ever surfaced as a run error.
//!
//! # Cache keys
//!
//! Package names may contain path separators (`@babel/core`), so the file
//! name is the sanitized name (separators replaced with `_`) followed by a
//! sha256 of the raw name. The hash prevents collisions between distinct
//! names that sanitize identically (`@babel/core` vs `@babel_core`); the
//! sanitized prefix keeps the directory human-browsable.
//!
//! # Freshness
//!
//! Entries stamped longer ago than the TTL (default 24 hours, see
//! [`crate::constants::CACHE_TTL`]) read as absent, which makes the caller
//! refetch and overwrite them.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::LockageError;
use crate::registry::PackageMetadata;

/// TTL-based on-disk store of per-package registry responses.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    dir: PathBuf,
    ttl: Duration,
    reads_enabled: bool,
}

impl MetadataCache {
    /// Create a cache rooted at `dir`.
    ///
    /// `reads_enabled: false` (the `--no-cache` flag) disables reads only;
    /// writes still happen so the next run starts warm.
    #[must_use]
    pub fn new(dir: PathBuf, ttl: Duration, reads_enabled: bool) -> Self {
        Self {
            dir,
            ttl,
            reads_enabled,
        }
    }

    /// Default per-user cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`LockageError::Config`] when the platform reports no cache
    /// directory at all.
    pub fn default_dir() -> Result<PathBuf, LockageError> {
        dirs::cache_dir()
            .map(|base| base.join("lockage").join("registry"))
            .ok_or_else(|| LockageError::Config {
                message: "could not determine a cache directory for this platform".to_string(),
            })
    }

    /// File path backing the entry for `name`.
    #[must_use]
    pub fn entry_path(&self, name: &str) -> PathBuf {
        let sanitized = name.replace(['/', '\\'], "_");
        let digest = hex::encode(Sha256::digest(name.as_bytes()));
        self.dir.join(format!("{sanitized}_{digest}.json"))
    }

    /// Look up fresh metadata for `name`.
    ///
    /// Returns `None` when reads are disabled, the entry is missing or
    /// undecodable, it carries no fetch stamp, or the stamp is older than
    /// the TTL. Never fails.
    pub async fn read(&self, name: &str) -> Option<PackageMetadata> {
        if !self.reads_enabled {
            return None;
        }

        let path = self.entry_path(name);
        let metadata = match read_entry(&path, name).await {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!("cache miss for '{name}': {err}");
                return None;
            }
        };

        let fetched_at = metadata.fetched_at?;
        let age_ms = Utc::now().timestamp_millis().saturating_sub(fetched_at);
        if i128::from(age_ms) >= self.ttl.as_millis() as i128 {
            debug!("cache entry for '{name}' is stale ({age_ms}ms old)");
            return None;
        }

        debug!("cache hit for '{name}'");
        Some(metadata)
    }

    /// Persist metadata for `name`, stamped with the current time.
    ///
    /// Creates the cache directory on demand and overwrites any existing
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`LockageError::CacheWrite`] on I/O or serialization
    /// failure. Callers log and drop this; it never fails a run.
    pub async fn write(&self, name: &str, metadata: &PackageMetadata) -> Result<(), LockageError> {
        let write_error = |reason: String| LockageError::CacheWrite {
            name: name.to_string(),
            reason,
        };

        let mut stamped = metadata.clone();
        stamped.fetched_at = Some(Utc::now().timestamp_millis());

        let body = serde_json::to_vec(&stamped).map_err(|err| write_error(err.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| write_error(format!("creating {}: {err}", self.dir.display())))?;

        let path = self.entry_path(name);
        tokio::fs::write(&path, body)
            .await
            .map_err(|err| write_error(format!("writing {}: {err}", path.display())))?;

        debug!("cached registry metadata for '{name}' at {}", path.display());
        Ok(())
    }
}

async fn read_entry(path: &Path, name: &str) -> Result<PackageMetadata, LockageError> {
    let read_error = |reason: String| LockageError::CacheRead {
        name: name.to_string(),
        reason,
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| read_error(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| read_error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_metadata() -> PackageMetadata {
        serde_json::from_value(serde_json::json!({
            "name": "left-pad",
            "time": { "1.3.0": "2018-04-10T21:07:54.172Z" }
        }))
        .unwrap()
    }

    fn cache_in(temp: &TempDir) -> MetadataCache {
        MetadataCache::new(temp.path().to_path_buf(), Duration::from_secs(24 * 60 * 60), true)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);

        cache.write("left-pad", &sample_metadata()).await.unwrap();
        let metadata = cache.read("left-pad").await.expect("fresh entry");
        assert_eq!(metadata.name.as_deref(), Some("left-pad"));
        assert!(metadata.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        assert!(cache_in(&temp).read("absent").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);
        std::fs::write(cache.entry_path("bad"), b"{ not json").unwrap();
        assert!(cache.read("bad").await.is_none());
    }

    #[tokio::test]
    async fn test_unstamped_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);
        std::fs::write(cache.entry_path("unstamped"), br#"{"name":"unstamped"}"#).unwrap();
        assert!(cache.read("unstamped").await.is_none());
    }

    #[tokio::test]
    async fn test_stale_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);

        // Stamped 25 hours ago, one hour past the 24h TTL.
        let mut old = sample_metadata();
        old.fetched_at = Some(Utc::now().timestamp_millis() - 25 * 60 * 60 * 1000);
        std::fs::write(
            cache.entry_path("left-pad"),
            serde_json::to_vec(&old).unwrap(),
        )
        .unwrap();

        assert!(cache.read("left-pad").await.is_none());
    }

    #[tokio::test]
    async fn test_hour_old_entry_is_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);

        let mut recent = sample_metadata();
        recent.fetched_at = Some(Utc::now().timestamp_millis() - 60 * 60 * 1000);
        std::fs::write(
            cache.entry_path("left-pad"),
            serde_json::to_vec(&recent).unwrap(),
        )
        .unwrap();

        assert!(cache.read("left-pad").await.is_some());
    }

    #[tokio::test]
    async fn test_disabled_reads_ignore_fresh_entries() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);
        cache.write("left-pad", &sample_metadata()).await.unwrap();

        let no_read = MetadataCache::new(
            temp.path().to_path_buf(),
            Duration::from_secs(24 * 60 * 60),
            false,
        );
        assert!(no_read.read("left-pad").await.is_none());

        // Writes still work with reads disabled.
        no_read.write("other", &sample_metadata()).await.unwrap();
        assert!(cache.read("other").await.is_some());
    }

    #[test]
    fn test_sanitized_names_do_not_collide() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);

        // Same sanitized prefix, different hashes.
        let scoped = cache.entry_path("@babel/core");
        let flat = cache.entry_path("@babel_core");
        assert_ne!(scoped, flat);

        let file_name = scoped.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("@babel_core_"));
        assert!(file_name.ends_with(".json"));
        assert!(!file_name.contains('/'));
    }
}
