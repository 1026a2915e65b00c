//! # Verify Path Command Implementation
//!
//! This module implements the `verify-path` subcommand, which runs the same
//! directory checks the installer runs before it writes anything.
//!
//! - `--destination DIR`: refused under Program Files, the temporary directory,
//!   a OneDrive folder or any `protected_paths` entry. On success the folder
//!   the product would be installed into is printed.
//! - `--source DIR -m FILE`: accepted only when a marker of at least one
//!   component of the manifest exists under the directory.

use anyhow::Result;
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use component_catalog::output::emoji;
use component_catalog::path_guard::{validate_source, PathGuard};

use super::{load_session, Context};

/// Check a destination or source directory
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["destination", "source"])
))]
pub struct VerifyPathArgs {
    /// Directory a fresh installation would be placed in.
    #[arg(long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Directory of an existing installation.
    #[arg(long, value_name = "DIR", requires = "manifest")]
    pub source: Option<PathBuf>,

    /// Path to the component list XML (needed with --source).
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

/// Execute the `verify-path` command.
pub fn execute(args: VerifyPathArgs, ctx: &Context) -> Result<()> {
    if let Some(destination) = &args.destination {
        let guard = PathGuard::from_environment(&ctx.settings);
        let target = guard.validate_destination(destination)?;
        println!(
            "{} Destination accepted, installing into {}",
            emoji(&ctx.output, "✅", "[OK]"),
            target.display()
        );
        return Ok(());
    }

    if let (Some(source), Some(manifest)) = (&args.source, &args.manifest) {
        let session = load_session(manifest, ctx)?;
        let tracker = validate_source(source, session.catalog(), &ctx.settings)?;
        println!(
            "{} Installation found at {}",
            emoji(&ctx.output, "✅", "[OK]"),
            tracker.source_root().display()
        );
        return Ok(());
    }

    anyhow::bail!("Use --destination DIR, or --source DIR together with --manifest FILE")
}
