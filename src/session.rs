//! # Session
//!
//! A [`Session`] is the single value a front end holds while a user works with
//! the catalog: the parsed tree, the settings, the chosen destination and
//! source directories, the installed set from the last sync and the derived
//! size totals. Every core operation takes the session explicitly; there is no
//! process-wide state.
//!
//! ## Modes
//!
//! - **Install**: a fresh download. Marker files are never consulted.
//! - **Manage**: add or remove components of an existing installation.
//! - **Update**: like Manage, and installed components whose marker hash no
//!   longer matches the manifest are re-fetched.
//!
//! ## Selection Flow
//!
//! [`Session::select`] is the transactional entry point for a selection
//! change: the flags are set, dependencies resolved, then either committed or
//! rolled back. A blocked removal always rolls back. Forced additions are
//! shown to `confirm`, which decides whether they are committed.
//!
//! The session is not shared across threads; `&mut self` on every mutating
//! call is the exclusive lock around tree mutation.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::config::Settings;
use crate::error::Result;
use crate::install_state::{InstallLookup, InstallStateTracker, NotInstalled};
use crate::manifest::{self, Catalog, Component};
use crate::path_guard::{self, PathGuard};
use crate::resolver::{self, Resolution};
use crate::sizes::SizeTotals;

/// What the user is doing with the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Install,
    Manage,
    Update,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Install => "install",
            Mode::Manage => "manage",
            Mode::Update => "update",
        };
        f.write_str(name)
    }
}

/// How a [`Session::select`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The change and any forced additions were committed.
    Applied(Resolution),
    /// Installed dependencies would have been removed; nothing changed.
    Blocked(Resolution),
    /// `confirm` declined the forced additions; nothing changed.
    Cancelled(Resolution),
}

impl Selection {
    pub fn resolution(&self) -> &Resolution {
        match self {
            Selection::Applied(r) | Selection::Blocked(r) | Selection::Cancelled(r) => r,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Selection::Applied(_))
    }
}

/// One component in a [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub hash: String,
    pub size: u64,
    pub path: PathBuf,
}

impl From<&Component> for PlanEntry {
    fn from(component: &Component) -> Self {
        Self {
            id: component.info.id.clone(),
            title: component.info.title.clone(),
            url: component.url.clone(),
            hash: component.hash.clone(),
            size: component.size,
            path: component.path.clone(),
        }
    }
}

/// Work implied by the current selection, handed to the download and
/// extraction collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub mode: Mode,
    /// Checked and not installed.
    pub download: Vec<PlanEntry>,
    /// Installed and unchecked.
    pub remove: Vec<PlanEntry>,
    /// Installed, checked and outdated (Update mode only).
    pub update: Vec<PlanEntry>,
    pub totals: SizeTotals,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.download.is_empty() && self.remove.is_empty() && self.update.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    catalog: Catalog,
    mode: Mode,
    destination: Option<PathBuf>,
    source: Option<InstallStateTracker>,
    installed: Vec<String>,
    sizes: SizeTotals,
}

impl Session {
    /// Start an Install-mode session over a parsed catalog.
    pub fn new(catalog: Catalog, settings: Settings) -> Result<Self> {
        let mut session = Self {
            settings,
            catalog,
            mode: Mode::Install,
            destination: None,
            source: None,
            installed: Vec::new(),
            sizes: SizeTotals::default(),
        };
        session.recompute_sizes()?;
        Ok(session)
    }

    /// Parse `xml` and start a session over it.
    pub fn load(xml: &str, settings: Settings) -> Result<Self> {
        let catalog = manifest::parse(xml, &settings)?;
        Self::new(catalog, settings)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sizes(&self) -> SizeTotals {
        self.sizes
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_ref().map(InstallStateTracker::source_root)
    }

    /// Ids of the components found installed at the last sync.
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    pub fn tracker(&self) -> Option<&InstallStateTracker> {
        self.source.as_ref()
    }

    fn lookup(&self) -> &dyn InstallLookup {
        match (&self.source, self.mode) {
            (Some(tracker), Mode::Manage | Mode::Update) => tracker as &dyn InstallLookup,
            _ => &NotInstalled as &dyn InstallLookup,
        }
    }

    /// Validate and store the install destination.
    pub fn set_destination(&mut self, guard: &PathGuard, path: &Path) -> Result<&Path> {
        let destination = guard.validate_destination(path)?;
        debug!("Destination set to {}", destination.display());
        Ok(self.destination.insert(destination).as_path())
    }

    /// Validate `path` as an installation and switch to `mode` over it.
    ///
    /// The selection is overwritten with the installed state, as when a
    /// manage view is opened.
    pub fn open_installation(&mut self, path: &Path, mode: Mode) -> Result<()> {
        let tracker = path_guard::validate_source(path, &self.catalog, &self.settings)?;
        info!("Opened installation at {}", tracker.source_root().display());
        self.source = Some(tracker);
        self.mode = if mode == Mode::Install { Mode::Manage } else { mode };
        self.sync(true)
    }

    /// Refresh installed flags from disk, then recompute sizes.
    ///
    /// Without an open installation every component is marked not installed.
    pub fn sync(&mut self, overwrite_selection: bool) -> Result<()> {
        self.installed = match &self.source {
            Some(tracker) if self.mode != Mode::Install => {
                tracker.sync(&mut self.catalog, overwrite_selection)
            }
            _ => {
                crate::walker::walk_components_mut(&mut self.catalog.nodes, |c| {
                    c.installed = false;
                    if overwrite_selection {
                        c.checked = c.info.required;
                    }
                });
                Vec::new()
            }
        };
        self.recompute_sizes()
    }

    pub fn recompute_sizes(&mut self) -> Result<()> {
        self.sizes = SizeTotals::compute(
            &self.catalog,
            self.lookup(),
            self.mode == Mode::Update,
        )?;
        Ok(())
    }

    /// Resolve the current selection without changing it.
    pub fn resolve(&self) -> Result<Resolution> {
        resolver::resolve(&self.catalog, self.lookup())
    }

    /// Check or uncheck `ids`, then resolve dependencies.
    ///
    /// Blocked resolutions and declined additions restore the previous
    /// selection. `confirm` is only called when there are forced additions.
    pub fn select<S, F>(&mut self, ids: &[S], checked: bool, confirm: F) -> Result<Selection>
    where
        S: AsRef<str>,
        F: FnOnce(&Resolution) -> bool,
    {
        let snapshot = self.catalog.checked_ids();

        for id in ids {
            if let Err(e) = self.catalog.set_checked(id.as_ref(), checked) {
                self.catalog.restore_selection(&snapshot);
                return Err(e);
            }
        }

        let resolution = match self.resolve() {
            Ok(resolution) => resolution,
            Err(e) => {
                self.catalog.restore_selection(&snapshot);
                return Err(e);
            }
        };

        let outcome = if resolution.is_blocked() {
            info!(
                "Selection blocked by installed dependencies: {}",
                resolution.blocked_titles().join(", ")
            );
            self.catalog.restore_selection(&snapshot);
            Selection::Blocked(resolution)
        } else if resolution.added.is_empty() || confirm(&resolution) {
            resolver::commit(&mut self.catalog, &resolution);
            Selection::Applied(resolution)
        } else {
            self.catalog.restore_selection(&snapshot);
            Selection::Cancelled(resolution)
        };

        self.recompute_sizes()?;
        Ok(outcome)
    }

    /// Work implied by the current selection.
    pub fn plan(&self) -> Result<Plan> {
        let lookup = self.lookup();
        let mut plan = Plan {
            mode: self.mode,
            totals: self.sizes,
            ..Plan::default()
        };

        for component in self.catalog.components() {
            match (component.checked, component.installed) {
                (true, false) => plan.download.push(component.into()),
                (false, true) => plan.remove.push(component.into()),
                (true, true) if self.mode == Mode::Update => {
                    let outdated = lookup
                        .marker(component)?
                        .is_some_and(|marker| marker.is_outdated(component));
                    if outdated {
                        plan.update.push(component.into());
                    }
                }
                _ => {}
            }
        }
        Ok(plan)
    }
}
