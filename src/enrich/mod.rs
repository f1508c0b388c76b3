//! Metadata enrichment orchestration.
//!
//! For every indexed [`Dependency`] that has at least one npm-registry
//! version, the enricher obtains package metadata (fresh cache entry, or
//! registry fetch followed by a background cache write) and attaches an
//! [`Enrichment`] to each version whose concrete version string appears in
//! the registry's `time` map.
//!
//! Enrichment is best-effort per package: any failure to obtain metadata
//! leaves that package's versions untouched and the run continues. No
//! error crosses this module's boundary.
//!
//! # Scheduling
//!
//! Two modes, chosen by the caller:
//!
//! - **Sequential** - used when a per-package listing is printed, so
//!   package output interleaves deterministically with the work.
//! - **Concurrent** - used for the aggregate-only report; all packages'
//!   enrichment tasks run via `buffer_unordered`, unbounded by default and
//!   optionally capped with `--max-parallel`.
//!
//! Cache writes are spawned as background tasks whose handles are retained
//! and joined failure-tolerantly by [`Enricher::finish`] before the
//! process exits; a failed write for one package never affects the others
//! or the run.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::MetadataCache;
use crate::deps::{Dependency, Enrichment};
use crate::registry::{PackageMetadata, RegistryClient};

/// Orchestrates cache lookups, registry fetches, and age attachment.
pub struct Enricher {
    cache: Arc<MetadataCache>,
    registry: Arc<RegistryClient>,
    pending_writes: Vec<JoinHandle<()>>,
}

impl Enricher {
    /// Create an enricher over the given cache and registry client.
    #[must_use]
    pub fn new(cache: MetadataCache, registry: RegistryClient) -> Self {
        Self {
            cache: Arc::new(cache),
            registry: Arc::new(registry),
            pending_writes: Vec::new(),
        }
    }

    /// Enrich a single dependency in place.
    ///
    /// The building block for sequential processing: callers that print
    /// per-package output as they go enrich one package at a time so the
    /// output stays in lockfile order.
    pub async fn enrich_one(&mut self, dependency: &mut Dependency) {
        let handle = enrich_dependency(&self.cache, &self.registry, dependency).await;
        self.pending_writes.extend(handle);
    }

    /// Enrich every dependency concurrently, in place.
    ///
    /// All packages' enrichment tasks run at once, capped at
    /// `max_parallel` when given. Used for the aggregate-only report,
    /// where no per-package output has to interleave in order.
    ///
    /// A cap below 1 is raised to 1; `buffer_unordered(0)` would never
    /// poll its futures and the stream would pend forever.
    pub async fn enrich_all(
        &mut self,
        dependencies: &mut [Dependency],
        max_parallel: Option<usize>,
    ) {
        let limit = max_parallel.unwrap_or(dependencies.len()).max(1);
        let cache = &self.cache;
        let registry = &self.registry;
        let handles: Vec<Option<JoinHandle<()>>> = stream::iter(dependencies.iter_mut())
            .map(|dependency| enrich_dependency(cache, registry, dependency))
            .buffer_unordered(limit)
            .collect()
            .await;
        self.pending_writes.extend(handles.into_iter().flatten());
    }

    /// Await all pending background cache writes.
    ///
    /// Must run before process exit so no write is abandoned mid-flight.
    /// Individual failures (already logged inside the tasks) and panics
    /// are tolerated; this never fails the run.
    pub async fn finish(self) {
        let pending = self.pending_writes.len();
        if pending > 0 {
            debug!("waiting for {pending} pending cache writes");
        }
        for joined in join_all(self.pending_writes).await {
            if let Err(err) = joined {
                debug!("cache write task did not complete: {err}");
            }
        }
    }
}

/// Enrich one dependency, returning the handle of a spawned cache write
/// when a fresh fetch happened.
async fn enrich_dependency(
    cache: &Arc<MetadataCache>,
    registry: &Arc<RegistryClient>,
    dependency: &mut Dependency,
) -> Option<JoinHandle<()>> {
    // Alternate-source packages have no registry entry; skip without
    // touching cache or network.
    if !dependency.has_npm_version() {
        debug!("skipping '{}': no npm-registry version", dependency.name);
        return None;
    }

    let mut write_handle = None;
    let metadata = match cache.read(&dependency.name).await {
        Some(metadata) => Some(metadata),
        None => match registry.fetch(&dependency.name).await {
            Ok(metadata) => {
                write_handle = Some(spawn_cache_write(
                    Arc::clone(cache),
                    dependency.name.clone(),
                    metadata.clone(),
                ));
                Some(metadata)
            }
            Err(err) => {
                debug!("leaving '{}' unenriched: {err}", dependency.name);
                None
            }
        },
    };

    if let Some(metadata) = metadata {
        apply_metadata(dependency, &metadata);
    }
    write_handle
}

fn spawn_cache_write(
    cache: Arc<MetadataCache>,
    name: String,
    metadata: PackageMetadata,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = cache.write(&name, &metadata).await {
            debug!("{err}");
        }
    })
}

/// Attach publish timestamps and relative ages to every version the
/// registry's `time` map knows about.
///
/// Versions without a `time` entry (pre-releases, yanked versions) and
/// unparsable timestamps are left unenriched. An absent `time` map means
/// no version gets a timestamp; it is not an error.
fn apply_metadata(dependency: &mut Dependency, metadata: &PackageMetadata) {
    for version in &mut dependency.versions {
        let Some(timestamp) = metadata.publish_time(&version.version) else {
            continue;
        };
        match DateTime::parse_from_rfc3339(timestamp) {
            Ok(parsed) => {
                let release_timestamp = parsed.with_timezone(&Utc);
                version.enrichment = Some(Enrichment {
                    release_timestamp,
                    relative_age: relative_age(release_timestamp, Utc::now()),
                });
            }
            Err(err) => {
                debug!(
                    "unparsable publish time '{timestamp}' for {}@{}: {err}",
                    version.name, version.version
                );
            }
        }
    }
}

/// Render a publish date relative to `now`, e.g. `3 years ago`.
#[must_use]
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let (value, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 30 {
        (days, "day")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}
