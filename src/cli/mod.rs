//! Command-line interface for lockage.
//!
//! A single command: read a lockfile, index its dependencies, enrich them
//! with registry publish dates, and print either the aggregate summary or
//! (with `--verbose`) a per-package version table first.
//!
//! # Usage
//!
//! ```bash
//! # Aggregate summary for ./yarn.lock
//! lockage
//!
//! # Explicit lockfile path, per-package tables
//! lockage --verbose path/to/yarn.lock
//!
//! # Skip cache reads, surface the 10 oldest versions
//! lockage --no-cache --max-old-versions 10
//! ```
//!
//! # Configuration
//!
//! The registry endpoint and cache directory can be overridden per
//! invocation (`--registry`, `--cache-dir`) or via the `LOCKAGE_REGISTRY`
//! and `LOCKAGE_CACHE_DIR` environment variables, which also keeps
//! integration tests hermetic.

use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cache::MetadataCache;
use crate::constants::{CACHE_TTL, DEFAULT_LOCKFILE, DEFAULT_MAX_OLD_VERSIONS, DEFAULT_REGISTRY_URL};
use crate::enrich::Enricher;
use crate::registry::RegistryClient;
use crate::{deps, lockfile, report};

/// Report version spread and publish-date staleness of yarn.lock dependencies.
#[derive(Debug, Parser)]
#[command(
    name = "lockage",
    about = "Report version spread and publish-date staleness of yarn.lock dependencies",
    version
)]
pub struct Cli {
    /// Path to the lockfile. Defaults to `yarn.lock` in the current
    /// directory.
    #[arg(value_name = "LOCKFILE")]
    lockfile: Option<PathBuf>,

    /// Print a full per-package version table instead of only the
    /// aggregate summary.
    ///
    /// Also enables debug logging. In this mode packages are enriched
    /// sequentially so table output stays in lockfile order.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output; the report itself still prints.
    #[arg(short, long)]
    quiet: bool,

    /// Skip cache reads and always fetch from the registry.
    ///
    /// Writes still happen, so the cache is warm for the next run.
    #[arg(long)]
    no_cache: bool,

    /// How many of the globally oldest versions to surface. Zero disables
    /// the oldest-versions section.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_OLD_VERSIONS)]
    max_old_versions: usize,

    /// Cap on concurrent registry fetches. Unbounded by default in
    /// aggregate mode; ignored in verbose mode, which is sequential.
    /// Must be at least 1.
    #[arg(long, value_name = "N")]
    max_parallel: Option<NonZeroUsize>,

    /// Registry endpoint queried for package metadata.
    #[arg(long, value_name = "URL", env = "LOCKAGE_REGISTRY", default_value = DEFAULT_REGISTRY_URL)]
    registry: String,

    /// Directory for cached registry responses. Defaults to the per-user
    /// cache directory.
    #[arg(long, value_name = "DIR", env = "LOCKAGE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

impl Cli {
    /// Log filter matching the requested verbosity, or `None` for `--quiet`.
    #[must_use]
    pub fn log_filter(&self) -> Option<&'static str> {
        if self.quiet {
            None
        } else if self.verbose {
            Some("lockage=debug")
        } else {
            Some("lockage=warn")
        }
    }

    /// Run the full pipeline: load, index, enrich, report.
    ///
    /// # Errors
    ///
    /// Fails only on the fatal lockfile categories (unreadable file,
    /// undecodable syntax, malformed resolution). Registry and cache
    /// problems degrade to missing age data.
    pub async fn execute(self) -> Result<()> {
        let lockfile_path = self
            .lockfile
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCKFILE));

        let entries = lockfile::load(&lockfile_path)?;
        let mut dependencies = deps::index_entries(entries)?;
        info!(
            "indexed {} dependencies from {}",
            dependencies.len(),
            lockfile_path.display()
        );

        let cache_dir = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => MetadataCache::default_dir()?,
        };
        debug!("using cache directory {}", cache_dir.display());
        let cache = MetadataCache::new(cache_dir, CACHE_TTL, !self.no_cache);
        let registry =
            RegistryClient::new(&self.registry).context("failed to set up registry client")?;

        // Verbose mode enriches one package at a time and prints its table
        // immediately, so output stays in lockfile order; aggregate mode
        // fans out across all packages at once.
        let mut enricher = Enricher::new(cache, registry);
        if self.verbose {
            for dependency in &mut dependencies {
                enricher.enrich_one(dependency).await;
                report::print_dependency(dependency);
            }
        } else {
            enricher
                .enrich_all(&mut dependencies, self.max_parallel.map(NonZeroUsize::get))
                .await;
        }

        let summary = report::build_report(&dependencies, self.max_old_versions);
        report::print_summary(&summary);

        // All pending cache writes must settle before exit.
        enricher.finish().await;
        Ok(())
    }
}
