//! lockage - yarn.lock dependency age reporting
//!
//! Inventories the third-party dependency graph of a project by reading its
//! `yarn.lock`, resolving each declared dependency to the set of concrete
//! installed versions, enriching every version with publish-date metadata
//! from the npm registry, and reporting version spread and staleness (the
//! globally oldest dependency versions).
//!
//! # Pipeline
//!
//! Data flows strictly one direction:
//!
//! ```text
//! yarn.lock text -> indexed dependency map -> registry enrichment -> report
//! ```
//!
//! - [`lockfile`] - lockfile decoding and resolution-string parsing
//! - [`deps`] - deduplicated name -> versions index and its data model
//! - [`cache`] - TTL-based on-disk store of registry responses
//! - [`registry`] - npm registry HTTP client
//! - [`enrich`] - cache/fetch orchestration and publish-age computation
//! - [`report`] - aggregation, oldest-K selection, and table output
//! - [`cli`] - command-line surface
//! - [`core`] - error types shared across the pipeline
//!
//! # Error policy
//!
//! Only lockfile problems (missing file, undecodable syntax, malformed
//! resolution strings) abort a run. Registry and cache failures degrade
//! gracefully: the affected package keeps its versions without age data and
//! the report still prints.
//!
//! # Example
//!
//! ```bash
//! # Aggregate summary for ./yarn.lock
//! lockage
//!
//! # Full per-package version tables
//! lockage --verbose
//!
//! # Ten oldest versions, ignoring the local metadata cache
//! lockage --no-cache --max-old-versions 10
//! ```

pub mod cache;
pub mod cli;
pub mod constants;
pub mod core;
pub mod deps;
pub mod enrich;
pub mod lockfile;
pub mod registry;
pub mod report;
