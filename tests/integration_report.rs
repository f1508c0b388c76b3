use predicates::prelude::*;

mod fixtures;
use fixtures::{BASIC_LOCKFILE, TestEnvironment};

/// A missing lockfile is fatal: nonzero exit, no report on stdout.
#[test]
fn test_missing_lockfile_fails() {
    let env = TestEnvironment::new();

    env.lockage_command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read lockfile"))
        .stdout(predicate::str::contains("Total:").not());
}

/// Undecodable lockfile syntax aborts with a diagnostic.
#[test]
fn test_invalid_lockfile_fails() {
    let env = TestEnvironment::new();
    env.write_lockfile("this: [is: not, valid yaml");

    env.lockage_command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid lockfile syntax"));
}

/// A resolution without a name/version separator is fatal, not skipped.
#[test]
fn test_malformed_resolution_fails() {
    let env = TestEnvironment::new();
    env.write_lockfile(
        r#"
"broken@npm:^1.0.0":
  version: 1.0.0
  resolution: "no-separator-here"
"#,
    );

    env.lockage_command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed resolution"));
}

/// Registry failures are non-fatal: with an unreachable registry and an
/// empty cache the report still prints deduplicated totals and exits 0.
#[test]
fn test_registry_failure_degrades_to_totals_only() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);

    env.lockage_command()
        .assert()
        .success()
        .stdout(predicate::str::contains("2 versions"))
        .stdout(predicate::str::contains("across 2 dependencies"))
        .stdout(predicate::str::contains("Oldest versions:").not());
}

/// Seeded cache entries enrich without any network and surface the oldest
/// versions section, oldest first.
#[test]
fn test_oldest_versions_from_cache() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);
    env.seed_cache("a", &[("1.0.0", "2015-06-01T00:00:00.000Z")]);
    env.seed_cache("b", &[("2.0.0", "2021-06-01T00:00:00.000Z")]);

    let assert = env.lockage_command().assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Oldest versions:"), "stdout: {stdout}");
    assert!(stdout.contains("years ago"), "stdout: {stdout}");

    // `a` (2015) must be listed before `b` (2021).
    let section = &stdout[stdout.find("Oldest versions:").unwrap()..];
    let a_index = section.find("1.0.0").expect("a listed");
    let b_index = section.find("2.0.0").expect("b listed");
    assert!(a_index < b_index, "oldest-first ordering, section: {section}");
}

/// One failing package does not prevent another from enriching.
#[test]
fn test_partial_enrichment() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);
    // Only `a` is cached; `b`'s fetch fails against the offline registry.
    env.seed_cache("a", &[("1.0.0", "2015-06-01T00:00:00.000Z")]);

    let assert = env.lockage_command().assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let section = &stdout[stdout.find("Oldest versions:").expect("section present")..];
    assert!(section.contains("1.0.0"), "a enriched, section: {section}");
    assert!(!section.contains("2.0.0"), "b unenriched, section: {section}");
}

/// `--max-old-versions 0` disables the staleness section even when
/// timestamps are available.
#[test]
fn test_zero_max_old_versions_disables_section() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);
    env.seed_cache("a", &[("1.0.0", "2015-06-01T00:00:00.000Z")]);

    env.lockage_command()
        .arg("--max-old-versions")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 versions"))
        .stdout(predicate::str::contains("Oldest versions:").not());
}

/// Verbose mode prints a per-package table with trimmed resolutions.
#[test]
fn test_verbose_per_package_tables() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);
    env.seed_cache("a", &[("1.0.0", "2015-06-01T00:00:00.000Z")]);

    env.lockage_command()
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains("Resolution"))
        .stdout(predicate::str::contains("npm:1.0.0"))
        .stdout(predicate::str::contains("npm:2.0.0"))
        .stdout(predicate::str::contains("years ago"));
}

/// An explicit lockfile path argument is honored.
#[test]
fn test_explicit_lockfile_path() {
    let env = TestEnvironment::new();
    std::fs::write(env.path().join("other.lock"), BASIC_LOCKFILE).unwrap();

    env.lockage_command()
        .arg("other.lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 versions"));
}

/// `--no-cache` skips reads but still produces the (degraded) report.
#[test]
fn test_no_cache_ignores_seeded_entries() {
    let env = TestEnvironment::new();
    env.write_lockfile(BASIC_LOCKFILE);
    env.seed_cache("a", &[("1.0.0", "2015-06-01T00:00:00.000Z")]);

    env.lockage_command()
        .arg("--no-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 versions"))
        .stdout(predicate::str::contains("Oldest versions:").not());
}
