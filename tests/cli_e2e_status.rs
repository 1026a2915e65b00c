//! End-to-end tests for the `status` command.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_lists_installed_and_outdated() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::CATALOG)
        .with_marker("required/required-base.txt", "1a2b3c4d 150000000")
        .with_marker("runtimes/runtimes-flash.txt", "00000000 24000000");

    fixture
        .command()
        .arg("--color=never")
        .arg("status")
        .arg("-m")
        .arg(fixture.manifest_path())
        .arg("--source")
        .arg(fixture.install_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[INSTALL] Installation at"))
        .stdout(predicate::str::contains("Installed (2):"))
        .stdout(predicate::str::contains("Outdated (1):"))
        .stdout(predicate::str::contains("Flash Player [runtimes-flash] 25.0MB"))
        .stdout(predicate::str::contains("Installed size: 174.0MB"))
        .stdout(predicate::str::contains("Update download: 25.0MB"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_orphans() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::CATALOG)
        .with_marker("required/required-base.txt", "1a2b3c4d 150000000")
        .with_marker("games/games-retired.txt", "00000000 1");

    fixture
        .command()
        .arg("status")
        .arg("-m")
        .arg(fixture.manifest_path())
        .arg("--source")
        .arg(fixture.install_path())
        .arg("--orphans")
        .assert()
        .success()
        .stdout(predicate::str::contains("Orphaned markers (1):"))
        .stdout(predicate::str::contains("games-retired.txt"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_source_from_settings() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::CATALOG)
        .with_marker("required/required-base.txt", "1a2b3c4d 150000000")
        .with_settings("source: install\n");

    fixture
        .command()
        .arg("status")
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All installed components are up to date."));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_without_source_has_hint() {
    let fixture = TestFixture::new().with_manifest(manifests::CATALOG);

    fixture
        .command()
        .arg("status")
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No installation directory given"))
        .stderr(predicate::str::contains("hint: Use --source"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_empty_directory_is_not_an_installation() {
    let fixture = TestFixture::new().with_manifest(manifests::CATALOG);

    fixture
        .command()
        .arg("status")
        .arg("-m")
        .arg(fixture.manifest_path())
        .arg("--source")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a recognized installation"));
}
