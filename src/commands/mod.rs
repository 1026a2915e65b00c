//! # CLI Command Implementations
//!
//! One subcommand of the `component-catalog` tool per file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct with the command-specific options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`], and calls into the `component_catalog` library.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use component_catalog::config::Settings;
use component_catalog::manifest;
use component_catalog::output::OutputConfig;
use component_catalog::session::{Mode, Session};
use component_catalog::suggestions;

pub mod check;
pub mod completions;
pub mod plan;
pub mod status;
pub mod tree;
pub mod verify_path;

/// State shared by every command: settings and terminal policy.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub output: OutputConfig,
}

/// The manifest to operate on.
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Path to the component list XML.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,
}

/// An existing installation directory.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Installation directory holding the component markers.
    ///
    /// Falls back to the `source` key of the settings file.
    #[arg(short, long, value_name = "DIR", env = "COMPONENT_CATALOG_SOURCE")]
    pub source: Option<PathBuf>,
}

impl SourceArgs {
    pub fn resolve(&self, settings: &Settings) -> Option<PathBuf> {
        self.source.clone().or_else(|| settings.source.clone())
    }
}

/// Parse the manifest at `path`, with a hint when the file is missing.
pub fn load_session(path: &Path, ctx: &Context) -> Result<Session> {
    if !path.exists() {
        return Err(suggestions::manifest_not_found(path));
    }
    let catalog = manifest::from_file(path, &ctx.settings).map_err(|e| {
        anyhow::anyhow!("Failed to load manifest from {}: {}", path.display(), e)
    })?;
    Ok(Session::new(catalog, ctx.settings.clone())?)
}

/// Load the manifest and, when a source directory is known, open it in `mode`.
pub fn open_session(
    manifest: &ManifestArgs,
    source: &SourceArgs,
    mode: Mode,
    ctx: &Context,
) -> Result<Session> {
    let mut session = load_session(&manifest.manifest, ctx)?;
    if let Some(dir) = source.resolve(&ctx.settings) {
        session.open_installation(&dir, mode)?;
    }
    Ok(session)
}
