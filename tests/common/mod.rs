//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_manifest(manifests::CATALOG);
//! fixture.command().arg("check").arg("-m").arg(fixture.manifest_path());
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest documents for testing.
#[allow(dead_code)]
pub mod manifests {
    /// A small catalog: a required core, two optional categories, and a
    /// dependency chain `games-flash -> runtimes-flash -> required-base`.
    pub const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<list url="https://downloads.example.com/components">
  <category id="required" title="Core" description="Always installed">
    <component id="base" title="Launcher" description="Launcher and database"
               hash="1a2b3c4d" size="150000000"/>
  </category>
  <category id="runtimes" title="Runtimes" description="Plugin runtimes">
    <component id="flash" title="Flash Player" description="Flash projector"
               hash="0badf00d" size="25000000" depends="required-base"/>
    <component id="shockwave" title="Shockwave" description="Director runtime"
               hash="cafebabe" size="40000000" depends="required-base"/>
  </category>
  <category id="games" title="Games" description="Game packs">
    <component id="flash" title="Flash Games" description="Flash game pack"
               hash="deadbeef" size="2500000000" depends="runtimes-flash"/>
    <component id="extras" title="Extras" description="Soundtracks"
               hash="feedface" size="800000" checked="true"/>
  </category>
</list>
"#;

    /// A catalog whose dependencies form a cycle.
    pub const CYCLE: &str = r#"
<list url="https://downloads.example.com/components">
  <component id="a" title="A" description="d" hash="0000000a" size="1" depends="b"/>
  <component id="b" title="B" description="d" hash="0000000b" size="1" depends="a"/>
</list>
"#;

    /// A catalog with a malformed hash.
    pub const BAD_HASH: &str = r#"
<list url="https://downloads.example.com/components">
  <component id="a" title="Broken" description="d" hash="xyz" size="1"/>
</list>
"#;
}

/// A temporary directory holding a manifest, an installation and settings.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `components.xml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("components.xml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Write `.component-catalog.yaml` with the given content.
    pub fn with_settings(self, content: &str) -> Self {
        self.temp_dir
            .child(".component-catalog.yaml")
            .write_str(content)
            .expect("Failed to write settings");
        self
    }

    /// Write a marker file under `install/Components/`.
    pub fn with_marker(self, relative: &str, line: &str) -> Self {
        self.temp_dir
            .child("install/Components")
            .child(relative)
            .write_str(&format!("{}\n", line))
            .expect("Failed to write marker");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("components.xml")
    }

    /// Root of the fake installation written by [`TestFixture::with_marker`].
    pub fn install_path(&self) -> PathBuf {
        self.temp_dir.path().join("install")
    }

    pub fn read_manifest(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).expect("Failed to read manifest")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("component-catalog");
        cmd.current_dir(self.path())
            .env_remove("COMPONENT_CATALOG_CONFIG")
            .env_remove("COMPONENT_CATALOG_SOURCE")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
