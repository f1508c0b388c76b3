//! Aggregation and table output.
//!
//! Flattens the enriched dependency index into totals plus the K oldest
//! versions by publish date, and renders the human-readable tables. The
//! report structure is the only thing the presentation functions consume,
//! so the selection logic stays independently testable.

use colored::Colorize;

use crate::deps::{Dependency, DependencyVersion};

/// One row of the oldest-versions section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldestVersion {
    /// Package name.
    pub name: String,
    /// Concrete installed version.
    pub version: String,
    /// Human-relative publish age.
    pub relative_age: String,
}

/// Aggregate totals and the oldest-K selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of distinct installed versions across all packages.
    pub total_versions: usize,
    /// Number of unique package names.
    pub total_dependencies: usize,
    /// The oldest versions by publish date, ascending. Empty when
    /// `max_old_versions` is zero or no version carries a timestamp.
    pub oldest: Vec<OldestVersion>,
}

/// Build the aggregate report from the enriched index.
///
/// The oldest-K selection considers only versions with a release
/// timestamp, sorts ascending by timestamp, and breaks ties by original
/// flattened encounter order (stable sort). `max_old_versions == 0`
/// disables the section.
#[must_use]
pub fn build_report(dependencies: &[Dependency], max_old_versions: usize) -> Report {
    let total_versions = dependencies.iter().map(|d| d.versions.len()).sum();
    let total_dependencies = dependencies.len();

    let mut dated: Vec<&DependencyVersion> = dependencies
        .iter()
        .flat_map(|d| &d.versions)
        .filter(|v| v.enrichment.is_some())
        .collect();
    // Stable sort keeps flattened encounter order for equal timestamps.
    dated.sort_by_key(|v| v.enrichment.as_ref().map(|e| e.release_timestamp));

    let oldest = dated
        .into_iter()
        .take(max_old_versions)
        .map(|v| OldestVersion {
            name: v.name.clone(),
            version: v.version.clone(),
            relative_age: v
                .enrichment
                .as_ref()
                .map(|e| e.relative_age.clone())
                .unwrap_or_default(),
        })
        .collect();

    Report {
        total_versions,
        total_dependencies,
        oldest,
    }
}

/// Print the per-package version table used in verbose mode.
///
/// Columns are `Version`, `Age`, and `Resolution`, sized to their content.
/// Resolutions that begin with the package's own `name@` prefix are shown
/// without it; the name is already in the title.
pub fn print_dependency(dependency: &Dependency) {
    let mut title = dependency.name.green().bold().to_string();
    if dependency.versions.len() > 1 {
        title.push_str(&format!(" ({} versions)", dependency.versions.len()));
    }
    println!("{title}");

    let rows: Vec<(String, String, String)> = dependency
        .versions
        .iter()
        .map(|v| {
            (
                v.version.clone(),
                v.enrichment
                    .as_ref()
                    .map(|e| e.relative_age.clone())
                    .unwrap_or_default(),
                trimmed_resolution(v),
            )
        })
        .collect();

    let version_width = column_width("Version", rows.iter().map(|r| r.0.as_str()));
    let age_width = column_width("Age", rows.iter().map(|r| r.1.as_str()));

    println!(
        "  {:>version_width$}  {:>age_width$}  {}",
        "Version".bold(),
        "Age".bold(),
        "Resolution".bold()
    );
    for (version, age, resolution) in &rows {
        println!("  {version:>version_width$}  {age:>age_width$}  {resolution}");
    }
    println!();
}

/// Print the aggregate summary and, when non-empty, the oldest-versions
/// section.
pub fn print_summary(report: &Report) {
    println!(
        "{} {} across {} dependencies",
        "Total:".bold(),
        format!("{} versions", report.total_versions).cyan(),
        report.total_dependencies.to_string().cyan()
    );

    if report.oldest.is_empty() {
        return;
    }

    println!("\n{}", "Oldest versions:".bold());
    let name_width = column_width("", report.oldest.iter().map(|o| o.name.as_str()));
    let version_width = column_width("", report.oldest.iter().map(|o| o.version.as_str()));
    for old in &report.oldest {
        println!(
            "  {:<name_width$}  {:>version_width$}  {}",
            old.name.yellow(),
            old.version,
            old.relative_age.dimmed()
        );
    }
}

/// Strip the leading `<name>@` from a resolution for display.
fn trimmed_resolution(version: &DependencyVersion) -> String {
    let prefix_len = version.name.len() + 1;
    if version.resolution.starts_with(&format!("{}@", version.name)) {
        version.resolution[prefix_len..].to_string()
    } else {
        version.resolution.clone()
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).chain(std::iter::once(header.len())).max().unwrap_or(0)
}
