//! npm registry HTTP client.
//!
//! One `GET {registry}/{name}` per package, decoded into
//! [`PackageMetadata`]. Fetch failures are reported as
//! [`LockageError::RegistryFetch`]; callers treat that as "metadata
//! unavailable" and leave the package unenriched rather than failing the
//! run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::constants::{REGISTRY_TIMEOUT, USER_AGENT};
use crate::core::LockageError;

/// Registry response for one package, plus the cache envelope stamp.
///
/// Beyond the fields the pipeline consumes (`name` for not-found
/// detection, `time` for publish dates), the full response body is carried
/// in `rest` so cache files remain faithful copies of what the registry
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Package identity as reported by the registry. Absent in error
    /// bodies (e.g. not-found responses), which is how those are detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version string -> ISO-8601 publish timestamp. May be absent
    /// entirely; that means no version has a known publish date, not an
    /// error. Also contains the registry's `created`/`modified` keys,
    /// which never match a concrete version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<HashMap<String, String>>,

    /// Epoch-millisecond fetch stamp, set by the cache on write and used
    /// for TTL evaluation on read. Never present in a live registry
    /// response.
    #[serde(rename = "fetchedAt", default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<i64>,

    /// Remainder of the registry response, preserved verbatim.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl PackageMetadata {
    /// Publish timestamp string for a concrete version, if the registry
    /// knows one.
    #[must_use]
    pub fn publish_time(&self, version: &str) -> Option<&str> {
        self.time.as_ref()?.get(version).map(String::as_str)
    }
}

/// HTTP client for the package registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client for the given registry endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LockageError::Config`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, LockageError> {
        let client = reqwest::Client::builder()
            .timeout(REGISTRY_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| LockageError::Config {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch metadata for one package.
    ///
    /// # Errors
    ///
    /// Returns [`LockageError::RegistryFetch`] on network failure, a
    /// non-2xx status, an undecodable body, or a body without a package
    /// identity (the registry's not-found shape).
    pub async fn fetch(&self, name: &str) -> Result<PackageMetadata, LockageError> {
        // Scoped names contain a slash that must not read as a path
        // segment separator in the registry URL.
        let url = format!("{}/{}", self.base_url, name.replace('/', "%2F"));
        debug!("fetching registry metadata from {url}");

        let fetch_error = |reason: String| LockageError::RegistryFetch {
            name: name.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        let metadata: PackageMetadata = response
            .json()
            .await
            .map_err(|err| fetch_error(format!("undecodable response body: {err}")))?;

        if metadata.name.is_none() {
            return Err(fetch_error("response has no package identity".to_string()));
        }

        Ok(metadata)
    }
}
