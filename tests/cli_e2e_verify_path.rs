//! End-to-end tests for the `verify-path` command.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_destination_accepted() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("--color=never")
        .arg("verify-path")
        .arg("--destination")
        .arg("/home/user/apps")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[OK] Destination accepted, installing into /home/user/apps/Flashpoint",
        ));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_destination_program_files_rejected() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .env("ProgramFiles", "/opt/Program Files")
        .arg("verify-path")
        .arg("--destination")
        .arg("/opt/Program Files/Games")
        .assert()
        .failure()
        .stderr(predicate::str::contains("the Program Files directory"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_destination_product_name_from_settings() {
    let fixture = TestFixture::new().with_settings("product_name: Catalog\n");

    fixture
        .command()
        .arg("verify-path")
        .arg("--destination")
        .arg("/home/user/apps")
        .assert()
        .success()
        .stdout(predicate::str::contains("/home/user/apps/Catalog"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_source() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::CATALOG)
        .with_marker("games/games-extras.txt", "feedface 800000");

    fixture
        .command()
        .arg("--color=never")
        .arg("verify-path")
        .arg("--source")
        .arg(fixture.install_path())
        .arg("-m")
        .arg(fixture.manifest_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Installation found at"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_source_requires_manifest() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("verify-path")
        .arg("--source")
        .arg(fixture.path())
        .assert()
        .code(2);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_verify_requires_a_target() {
    let fixture = TestFixture::new();

    fixture.command().arg("verify-path").assert().code(2);
}
