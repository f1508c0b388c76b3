//! Yarn lockfile decoding.
//!
//! Yarn berry (v2+) lockfiles are YAML documents mapping an entry key (the
//! requested `name@range`, possibly several joined with `, `) to a record
//! that includes the resolved `resolution` string and concrete `version`.
//! This module reads that document into an ordered sequence of
//! [`LockEntry`] values, skipping reserved header keys such as
//! `__metadata`.
//!
//! Document order is preserved: downstream indexing relies on first-seen
//! order of entries to keep report output deterministic.
//!
//! # Errors
//!
//! A missing or unreadable file yields [`LockageError::LockfileRead`]; an
//! undecodable document or entry yields [`LockageError::LockfileParse`].
//! Both abort the whole run - partial inventories are never reported.

pub mod resolution;


use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::constants::RESERVED_KEY_PREFIX;
use crate::core::LockageError;

/// One dependency record from the lockfile.
///
/// Only the fields the pipeline consumes are decoded; the rest of the
/// entry (checksum, language name, link type, ...) is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    /// Resolved `<name>@<spec>` string, the deduplication key.
    pub resolution: String,
    /// Concrete installed version, e.g. `1.3.0`.
    pub version: String,
}

/// Read and decode a lockfile from disk.
///
/// Returns `(entry key, entry)` pairs in document order, with reserved
/// header keys already skipped.
///
/// # Errors
///
/// - [`LockageError::LockfileRead`] if the file cannot be read
/// - [`LockageError::LockfileParse`] if the YAML or an entry is invalid
pub fn load(path: &Path) -> Result<Vec<(String, LockEntry)>, LockageError> {
    let text = std::fs::read_to_string(path).map_err(|source| LockageError::LockfileRead {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text, &path.display().to_string())
}

/// Decode lockfile text into ordered `(entry key, entry)` pairs.
///
/// Split out from [`load`] so tests can feed lockfile text directly.
pub fn parse(text: &str, path: &str) -> Result<Vec<(String, LockEntry)>, LockageError> {
    let document: serde_yaml::Mapping =
        serde_yaml::from_str(text).map_err(|err| LockageError::LockfileParse {
            path: path.to_string(),
            reason: err.to_string(),
        })?;

    let mut entries = Vec::with_capacity(document.len());
    for (key, value) in document {
        let key = key.as_str().ok_or_else(|| LockageError::LockfileParse {
            path: path.to_string(),
            reason: "entry key is not a string".to_string(),
        })?;

        if key.starts_with(RESERVED_KEY_PREFIX) {
            debug!("skipping reserved lockfile key '{key}'");
            continue;
        }

        let entry: LockEntry =
            serde_yaml::from_value(value).map_err(|err| LockageError::LockfileParse {
                path: path.to_string(),
                reason: format!("entry '{key}': {err}"),
            })?;
        entries.push((key.to_string(), entry));
    }

    debug!("decoded {} lockfile entries from {path}", entries.len());
    Ok(entries)
}
