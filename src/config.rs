//! # Settings File
//!
//! This module defines the optional `.component-catalog.yaml` settings file and
//! the logic for parsing it. Every field has a default, so an absent file and
//! an empty file are equivalent.
//!
//! ```yaml
//! product_name: Flashpoint
//! required_root: required
//! id_separator: "-"
//! archive_extension: zip
//! markers_dir: Components
//! source: /home/user/games/Flashpoint
//! protected_paths:
//!   - /srv/shared
//! ```
//!
//! Unknown keys are rejected so that a typo does not silently fall back to a
//! default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Catalog settings shared by the parser, the install tracker and the path
/// guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Folder name appended to an accepted destination directory.
    pub product_name: String,
    /// Local id of the reserved root category whose subtree is required.
    pub required_root: String,
    /// Separator used to join ancestor ids.
    pub id_separator: String,
    /// Archive extension for components without an explicit `url`.
    pub archive_extension: String,
    /// Directory under the source root that holds marker files.
    pub markers_dir: String,
    /// Default source root when none is given on the command line.
    pub source: Option<PathBuf>,
    /// Additional destination prefixes to refuse.
    pub protected_paths: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            product_name: defaults::PRODUCT_NAME.to_string(),
            required_root: defaults::REQUIRED_ROOT.to_string(),
            id_separator: defaults::ID_SEPARATOR.to_string(),
            archive_extension: defaults::ARCHIVE_EXTENSION.to_string(),
            markers_dir: defaults::MARKERS_DIR.to_string(),
            source: None,
            protected_paths: Vec::new(),
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        if self.id_separator.is_empty() {
            return Err(Error::ConfigParse {
                message: "id_separator must not be empty".to_string(),
                hint: Some(format!(
                    "Remove the key to use the default '{}'",
                    defaults::ID_SEPARATOR
                )),
            });
        }
        if self.product_name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "product_name must not be empty".to_string(),
                hint: None,
            });
        }
        if self.markers_dir.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "markers_dir must not be empty".to_string(),
                hint: None,
            });
        }
        Ok(self)
    }
}

/// Parse settings from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    if yaml_content.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some(
                "Valid keys are product_name, required_root, id_separator, \
                 archive_extension, markers_dir, source, protected_paths"
                    .to_string(),
            ),
        })?;

    settings.validate()
}

/// Parse settings from a file on disk.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load settings from `path` when it exists, otherwise return the defaults.
///
/// `explicit` marks a path the user asked for; a missing explicit file is an
/// error rather than a silent fallback.
pub fn load(path: &Path, explicit: bool) -> Result<Settings> {
    if path.exists() {
        log::debug!("Loading settings from {}", path.display());
        from_file(path)
    } else if explicit {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("settings file not found: {}", path.display()),
        )))
    } else {
        Ok(Settings::default())
    }
}
