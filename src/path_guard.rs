//! Destination and source directory checks.
//!
//! An installation must not land in a directory the OS or a sync client
//! manages (Program Files, the temp directory, OneDrive). A source directory
//! is only accepted when it actually holds an installation of this catalog.

use std::path::{Component as PathComponent, Path, PathBuf};

use log::info;

use crate::config::Settings;
use crate::defaults::CLOUD_SYNC_DIR;
use crate::error::{Error, PathRejection, Result};
use crate::install_state::InstallStateTracker;
use crate::manifest::Catalog;

/// Program Files locations, 64-bit first. Unset variables are skipped.
const PROGRAM_FILES_VARS: [&str; 3] = ["ProgramW6432", "ProgramFiles", "ProgramFiles(x86)"];

/// Refuses destinations under protected prefixes.
#[derive(Debug, Clone)]
pub struct PathGuard {
    product_name: String,
    protected: Vec<(PathBuf, PathRejection)>,
}

impl PathGuard {
    /// A guard with no protected prefixes.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            protected: Vec::new(),
        }
    }

    /// A guard protecting this machine's Program Files, temp and cloud-sync
    /// directories plus the `protected_paths` from `settings`.
    pub fn from_environment(settings: &Settings) -> Self {
        let mut guard = Self::new(settings.product_name.clone());

        for var in PROGRAM_FILES_VARS {
            if let Some(dir) = std::env::var_os(var).filter(|v| !v.is_empty()) {
                guard = guard.protect(dir, PathRejection::ProgramFiles);
            }
        }
        guard = guard.protect(std::env::temp_dir(), PathRejection::Temporary);
        if let Some(home) = dirs::home_dir() {
            guard = guard.protect(home.join(CLOUD_SYNC_DIR), PathRejection::CloudSync);
        }
        for path in &settings.protected_paths {
            guard = guard.protect(path, PathRejection::Protected);
        }
        guard
    }

    /// Add a protected prefix.
    pub fn protect(mut self, path: impl AsRef<Path>, reason: PathRejection) -> Self {
        self.protected.push((normalize(path.as_ref()), reason));
        self
    }

    /// Accept `path` unless it lies under a protected prefix. Returns the
    /// normalized path with the product folder appended.
    pub fn validate_destination(&self, path: &Path) -> Result<PathBuf> {
        let normalized = normalize(path);
        if let Some((_, reason)) = self
            .protected
            .iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
        {
            info!("Refusing destination {}: {}", normalized.display(), reason);
            return Err(Error::PathRejected {
                path: path.to_path_buf(),
                reason: *reason,
            });
        }
        Ok(normalized.join(&self.product_name))
    }
}

/// Accept `path` when at least one component of `catalog` has a marker file
/// under it. Returns the tracker for that installation.
pub fn validate_source(
    path: &Path,
    catalog: &Catalog,
    settings: &Settings,
) -> Result<InstallStateTracker> {
    let tracker = InstallStateTracker::new(normalize(path), settings);
    if tracker.is_installation(catalog) {
        Ok(tracker)
    } else {
        info!("No installation found under {}", path.display());
        Err(Error::PathRejected {
            path: path.to_path_buf(),
            reason: PathRejection::NotAnInstallation,
        })
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding segment. The filesystem is not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                match normalized.components().next_back() {
                    Some(PathComponent::Normal(_)) => {
                        normalized.pop();
                    }
                    Some(PathComponent::RootDir) | Some(PathComponent::Prefix(_)) => {}
                    _ => normalized.push(".."),
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest;
    use tempfile::TempDir;

    fn guard() -> PathGuard {
        PathGuard::new("Flashpoint")
            .protect("/opt/Program Files", PathRejection::ProgramFiles)
            .protect("/opt/Program Files (x86)", PathRejection::ProgramFiles)
            .protect("/var/tmp", PathRejection::Temporary)
            .protect("/home/user/OneDrive", PathRejection::CloudSync)
    }

    fn reason(result: Result<PathBuf>) -> PathRejection {
        match result {
            Err(Error::PathRejected { reason, .. }) => reason,
            other => panic!("Expected PathRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_and_appends_product_folder() {
        let accepted = guard()
            .validate_destination(Path::new("/home/user/apps"))
            .unwrap();
        assert_eq!(accepted, PathBuf::from("/home/user/apps/Flashpoint"));
    }

    #[test]
    fn test_rejects_program_files() {
        let guard = guard();
        assert_eq!(
            reason(guard.validate_destination(Path::new("/opt/Program Files/Games"))),
            PathRejection::ProgramFiles
        );
        assert_eq!(
            reason(guard.validate_destination(Path::new("/opt/Program Files (x86)"))),
            PathRejection::ProgramFiles
        );
    }

    #[test]
    fn test_rejects_temp_and_cloud() {
        let guard = guard();
        assert_eq!(
            reason(guard.validate_destination(Path::new("/var/tmp/x"))),
            PathRejection::Temporary
        );
        assert_eq!(
            reason(guard.validate_destination(Path::new("/home/user/OneDrive/Games"))),
            PathRejection::CloudSync
        );
    }

    #[test]
    fn test_dot_segments_cannot_escape_into_protected() {
        let guard = guard();
        assert_eq!(
            reason(guard.validate_destination(Path::new("/home/user/apps/../OneDrive/./x"))),
            PathRejection::CloudSync
        );
    }

    #[test]
    fn test_prefix_is_component_wise() {
        // "/var/tmpfiles" is not under "/var/tmp"
        let accepted = guard()
            .validate_destination(Path::new("/var/tmpfiles"))
            .unwrap();
        assert_eq!(accepted, PathBuf::from("/var/tmpfiles/Flashpoint"));
    }

    #[test]
    fn test_from_environment_protects_temp_dir() {
        let guard = PathGuard::from_environment(&Settings::default());
        let inside_temp = std::env::temp_dir().join("catalog-test");
        assert_eq!(
            reason(guard.validate_destination(&inside_temp)),
            PathRejection::Temporary
        );
    }

    #[test]
    fn test_from_environment_protects_settings_paths() {
        let settings = Settings {
            protected_paths: vec![PathBuf::from("/srv/shared")],
            ..Settings::default()
        };
        let guard = PathGuard::from_environment(&settings);
        assert_eq!(
            reason(guard.validate_destination(Path::new("/srv/shared/games"))),
            PathRejection::Protected
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/b/..")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("a/b/")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_validate_source() {
        let xml = r#"
<list url="https://example.com/">
  <category id="X" title="X" description="d">
    <component id="Z" title="Zed" description="d" hash="deadbeef" size="10"/>
  </category>
</list>"#;
        let catalog = manifest::parse(xml, &Settings::default()).unwrap();
        let temp_dir = TempDir::new().unwrap();

        let result = validate_source(temp_dir.path(), &catalog, &Settings::default());
        assert!(matches!(
            result,
            Err(Error::PathRejected {
                reason: PathRejection::NotAnInstallation,
                ..
            })
        ));

        let marker = temp_dir.path().join("Components").join("X").join("X-Z.txt");
        std::fs::create_dir_all(marker.parent().unwrap()).unwrap();
        std::fs::write(&marker, "deadbeef 10\n").unwrap();

        let tracker = validate_source(temp_dir.path(), &catalog, &Settings::default()).unwrap();
        assert_eq!(tracker.source_root(), temp_dir.path());
    }
}
