//! End-to-end tests for the `check` command.
//!
//! These tests invoke the actual CLI binary and validate manifest checking
//! from a user's perspective.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_help() {
    let mut cmd = cargo_bin_cmd!("component-catalog");

    cmd.arg("check")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validate a manifest and report dependency problems",
        ));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_valid_manifest() {
    let fixture = TestFixture::new().with_manifest(manifests::CATALOG);

    fixture
        .command()
        .arg("--color=never")
        .arg("check")
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Manifest is valid"))
        .stdout(predicate::str::contains("Categories: 3"))
        .stdout(predicate::str::contains("Components: 5 (1 required)"))
        .stdout(predicate::str::contains("Total size: 2.7GB"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_cycle_fails_with_hint() {
    let fixture = TestFixture::new().with_manifest(manifests::CYCLE);

    fixture
        .command()
        .arg("check")
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cycle detected"))
        .stderr(predicate::str::contains("a -> b -> a"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_malformed_hash_fails() {
    let fixture = TestFixture::new().with_manifest(manifests::BAD_HASH);

    fixture
        .command()
        .arg("check")
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load manifest"))
        .stderr(predicate::str::contains("hash"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_missing_manifest() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("check")
        .arg("-m")
        .arg("absent.xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest file not found"));
}
