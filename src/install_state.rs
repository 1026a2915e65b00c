//! # Install State
//!
//! Whether a component is installed is decided by one thing only: the
//! presence of its marker file at
//! `<source>/<markers_dir>/<component path>/<component id>.txt`.
//! The installer step that extracts archives writes these files; this module
//! only reads them.
//!
//! The first line of a marker records `<hash> <size> <dependency ids...>`,
//! describing the artifact that was actually installed. The resolver prefers
//! those dependencies over the manifest's, and the size accountant prefers the
//! recorded size, because the installed artifact may have drifted from the
//! current catalog.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::defaults::MARKER_EXTENSION;
use crate::error::{Error, Result};
use crate::manifest::{Catalog, Component};
use crate::walker;

/// The first line of a marker file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marker {
    /// Hash of the archive that was installed.
    pub hash: String,
    /// Installed size in bytes, when the field parses.
    pub size: Option<u64>,
    /// Dependencies the installed artifact was built with.
    pub depends: Vec<String>,
}

impl Marker {
    /// Parse the first line of a marker file. Missing fields are left empty.
    pub fn parse(line: &str) -> Self {
        let mut fields = line.split_whitespace();
        let hash = fields.next().unwrap_or_default().to_string();
        let size = fields.next().and_then(|s| s.parse::<u64>().ok());
        let depends = fields.map(str::to_string).collect();
        Self {
            hash,
            size,
            depends,
        }
    }

    /// Whether the recorded hash no longer matches the manifest's.
    pub fn is_outdated(&self, component: &Component) -> bool {
        !self.hash.is_empty() && !self.hash.eq_ignore_ascii_case(&component.hash)
    }
}

/// Source of truth for "is this component installed".
pub trait InstallLookup {
    fn is_installed(&self, component: &Component) -> bool;

    /// The component's marker, or `None` when it is not installed.
    fn marker(&self, component: &Component) -> Result<Option<Marker>>;
}

/// Lookup for a fresh installation: nothing is installed yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotInstalled;

impl InstallLookup for NotInstalled {
    fn is_installed(&self, _component: &Component) -> bool {
        false
    }

    fn marker(&self, _component: &Component) -> Result<Option<Marker>> {
        Ok(None)
    }
}

/// Reads marker files under an installation directory.
#[derive(Debug, Clone)]
pub struct InstallStateTracker {
    source_root: PathBuf,
    markers_dir: String,
}

impl InstallStateTracker {
    pub fn new(source_root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            source_root: source_root.into(),
            markers_dir: settings.markers_dir.clone(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory holding every marker file.
    pub fn markers_root(&self) -> PathBuf {
        self.source_root.join(&self.markers_dir)
    }

    pub fn marker_path(&self, component: &Component) -> PathBuf {
        self.markers_root()
            .join(&component.path)
            .join(format!("{}.{}", component.info.id, MARKER_EXTENSION))
    }

    /// Refresh the `installed` flag of every component from disk.
    ///
    /// With `overwrite_selection`, the `checked` flag is also set to the
    /// installed state, which is what a manage view starts from. Required
    /// components stay checked so a missing one is fetched again. Returns the
    /// ids of the installed components in document order.
    pub fn sync(&self, catalog: &mut Catalog, overwrite_selection: bool) -> Vec<String> {
        let mut installed = Vec::new();
        walker::walk_components_mut(&mut catalog.nodes, |component| {
            component.installed = self.is_installed(component);
            if component.installed {
                installed.push(component.info.id.clone());
            }
            if overwrite_selection {
                component.checked = component.installed || component.info.required;
            }
        });
        debug!(
            "Found {} installed components under {}",
            installed.len(),
            self.source_root.display()
        );
        installed
    }

    /// True when at least one catalog component has a marker here.
    pub fn is_installation(&self, catalog: &Catalog) -> bool {
        catalog.components().any(|c| self.is_installed(c))
    }

    /// Marker files under the markers directory that belong to no component,
    /// relative to the markers directory and sorted.
    pub fn orphan_markers(&self, catalog: &Catalog) -> Result<Vec<PathBuf>> {
        let root = self.markers_root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let expected: HashSet<PathBuf> = catalog
            .components()
            .map(|c| self.marker_path(c))
            .collect();

        let mut orphans = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            let is_marker = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == MARKER_EXTENSION);
            if is_marker && !expected.contains(path) {
                if let Ok(relative) = path.strip_prefix(&root) {
                    orphans.push(relative.to_path_buf());
                }
            }
        }
        orphans.sort();
        Ok(orphans)
    }
}

impl InstallLookup for InstallStateTracker {
    fn is_installed(&self, component: &Component) -> bool {
        self.marker_path(component).is_file()
    }

    fn marker(&self, component: &Component) -> Result<Option<Marker>> {
        let path = self.marker_path(component);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::Marker {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let first_line = content.lines().next().unwrap_or_default();
        let marker = Marker::parse(first_line);
        if marker.size.is_none() {
            warn!(
                "Marker {} has no readable size, using the manifest size",
                path.display()
            );
        }
        Ok(Some(marker))
    }
}
