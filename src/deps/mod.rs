//! Deduplicated dependency index and its data model.
//!
//! The indexer consumes the ordered lockfile entries and produces one
//! [`Dependency`] per unique package name, each holding the concrete
//! installed versions of that package. Entries are deduplicated by their
//! exact `resolution` string - not by name+version - because identical
//! resolutions collapse to a single concrete install even when several
//! entry keys (requested ranges) point at them.
//!
//! Ordering is significant and preserved end to end: dependencies appear
//! in first-seen order from the lockfile, and versions within a dependency
//! likewise.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::LockageError;
use crate::lockfile::LockEntry;
use crate::lockfile::resolution::{Protocol, parse_resolution};

/// Publish-date information attached to a version by the enrichment stage.
///
/// Presence of this substructure is the explicit "was enriched" signal;
/// versions the registry knows nothing about simply never receive one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    /// When this exact version was published to the registry.
    pub release_timestamp: DateTime<Utc>,
    /// Human-relative rendering of the publish date, e.g. `3 years ago`.
    pub relative_age: String,
}

/// One concrete installed version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyVersion {
    /// Package name, including any `@scope/` prefix.
    pub name: String,
    /// Concrete installed version string.
    pub version: String,
    /// Full resolution string from the lockfile (the dedup key).
    pub resolution: String,
    /// Source protocol; `None` means an alternate source with no registry
    /// entry, which enrichment skips.
    pub protocol: Option<Protocol>,
    /// Publish-date data, attached by enrichment when available.
    pub enrichment: Option<Enrichment>,
}

/// One unique package name with all its installed versions.
///
/// Invariant: no two versions share an identical `resolution` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package name.
    pub name: String,
    /// Installed versions, in first-seen lockfile order.
    pub versions: Vec<DependencyVersion>,
}

impl Dependency {
    /// Whether any version of this package resolves to the default npm
    /// registry. Packages where this is false have no registry entry to
    /// consult and are skipped by enrichment entirely.
    #[must_use]
    pub fn has_npm_version(&self) -> bool {
        self.versions.iter().any(|v| v.protocol == Some(Protocol::Npm))
    }
}

/// Build the deduplicated name -> versions index from lockfile entries.
///
/// # Errors
///
/// Returns [`LockageError::MalformedResolution`] when any entry's
/// resolution string cannot be split into name and spec. This aborts the
/// run: a malformed resolution means the lockfile is corrupt, and a
/// silently dropped entry would make the reported totals wrong.
pub fn index_entries(
    entries: Vec<(String, LockEntry)>,
) -> Result<Vec<Dependency>, LockageError> {
    let mut seen_resolutions = HashSet::new();
    let mut dependencies: Vec<Dependency> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (_, entry) in entries {
        if !seen_resolutions.insert(entry.resolution.clone()) {
            continue;
        }

        let parsed = parse_resolution(&entry.resolution)?;
        let version = DependencyVersion {
            name: parsed.name.clone(),
            version: entry.version,
            resolution: entry.resolution,
            protocol: parsed.protocol,
            enrichment: None,
        };

        match positions.get(&parsed.name) {
            Some(&index) => dependencies[index].versions.push(version),
            None => {
                positions.insert(parsed.name.clone(), dependencies.len());
                dependencies.push(Dependency {
                    name: parsed.name,
                    versions: vec![version],
                });
            }
        }
    }

    debug!(
        "indexed {} packages, {} distinct versions",
        dependencies.len(),
        dependencies.iter().map(|d| d.versions.len()).sum::<usize>()
    );
    Ok(dependencies)
}
