//! Shared helpers for integration tests.
//!
//! Each test gets an isolated working directory with its own cache
//! directory, and the registry endpoint is pointed at an unroutable local
//! address so no test can reach the real network: fetches fail fast and
//! enrichment has to come from seeded cache entries.

use assert_cmd::Command;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

use lockage::cache::MetadataCache;

/// Unroutable registry endpoint; connections are refused immediately.
pub const OFFLINE_REGISTRY: &str = "http://127.0.0.1:1";

/// Lockfile with two entry keys collapsing to one install of `a` plus one
/// install of `b`: 2 distinct versions across 2 dependencies.
pub const BASIC_LOCKFILE: &str = r#"# This file is generated by running "yarn install" inside your project.

__metadata:
  version: 8
  cacheKey: 10c0

"a@npm:^1.0.0":
  version: 1.0.0
  resolution: "a@npm:1.0.0"
  languageName: node
  linkType: hard

"a@npm:1.0.0":
  version: 1.0.0
  resolution: "a@npm:1.0.0"
  languageName: node
  linkType: hard

"b@npm:^2.0.0":
  version: 2.0.0
  resolution: "b@npm:2.0.0"
  languageName: node
  linkType: hard
"#;

pub struct TestEnvironment {
    temp: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.temp.path()
    }

    fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    /// Write lockfile content as `yarn.lock` in the test directory.
    pub fn write_lockfile(&self, content: &str) {
        std::fs::write(self.temp.path().join("yarn.lock"), content).expect("write lockfile");
    }

    /// Seed a fresh cache entry for `name` with the given version ->
    /// publish-time pairs, bypassing the network entirely.
    pub fn seed_cache(&self, name: &str, times: &[(&str, &str)]) {
        let cache = MetadataCache::new(self.cache_dir(), Duration::from_secs(24 * 60 * 60), true);
        let path = cache.entry_path(name);
        std::fs::create_dir_all(path.parent().unwrap()).expect("create cache dir");

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_millis();
        let time_entries: Vec<String> = times
            .iter()
            .map(|(version, ts)| format!("\"{version}\": \"{ts}\""))
            .collect();
        let body = format!(
            "{{\"name\": \"{name}\", \"time\": {{{}}}, \"fetchedAt\": {now_ms}}}",
            time_entries.join(", ")
        );
        std::fs::write(path, body).expect("write cache entry");
    }

    /// A `lockage` command running in the test directory, hermetically
    /// configured via environment overrides.
    pub fn lockage_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("lockage").expect("binary exists");
        cmd.current_dir(self.temp.path())
            .env("LOCKAGE_REGISTRY", OFFLINE_REGISTRY)
            .env("LOCKAGE_CACHE_DIR", self.cache_dir())
            .env_remove("RUST_LOG");
        cmd
    }
}
