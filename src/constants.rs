//! Global constants used throughout the lockage codebase.
//!
//! Timeouts, default endpoints, and policy values shared across modules
//! live here so the numbers stay discoverable in one place.

use std::time::Duration;

/// Default lockfile name, resolved relative to the working directory when no
/// explicit path is given on the command line.
pub const DEFAULT_LOCKFILE: &str = "yarn.lock";

/// Lockfile keys with this prefix (e.g. `__metadata`) are format headers,
/// not dependencies, and are skipped during decoding.
pub const RESERVED_KEY_PREFIX: &str = "__";

/// Default registry endpoint queried for package metadata.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Freshness window for on-disk registry metadata (24 hours).
///
/// Cache entries stamped longer ago than this are treated as stale and
/// refetched on the next run.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Timeout for a single registry request (30 seconds).
///
/// Prevents a hung connection from stalling the whole report; a timed-out
/// fetch degrades to missing age data for that package.
pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of oldest versions surfaced in the staleness section.
pub const DEFAULT_MAX_OLD_VERSIONS: usize = 5;

/// User agent sent with registry requests.
pub const USER_AGENT: &str = concat!("lockage/", env!("CARGO_PKG_VERSION"));
