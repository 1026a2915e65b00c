//! # Status Command Implementation
//!
//! This module implements the `status` subcommand, which inspects an existing
//! installation: which components are installed, which of those no longer
//! match the manifest hash, and how much space the installation takes.
//!
//! With `--orphans`, marker files that belong to no component of the current
//! manifest are listed as well. These are left behind when a component is
//! dropped from the catalog.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use component_catalog::output::emoji;
use component_catalog::session::{Mode, Session};
use component_catalog::sizes::format_bytes;
use component_catalog::suggestions;

use super::{load_session, Context, ManifestArgs, SourceArgs};

/// Show the state of an existing installation
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Also list marker files that match no component.
    #[arg(long)]
    pub orphans: bool,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, ctx: &Context) -> Result<()> {
    let source = args
        .source
        .resolve(&ctx.settings)
        .ok_or_else(suggestions::source_required)?;

    let mut session = load_session(&args.manifest.manifest, ctx)?;
    session.open_installation(&source, Mode::Update)?;

    println!(
        "{} Installation at {}",
        emoji(&ctx.output, "📦", "[INSTALL]"),
        source.display()
    );
    print_installed(&session);

    let plan = session.plan()?;
    if plan.update.is_empty() {
        println!("All installed components are up to date.");
    } else {
        println!("Outdated ({}):", plan.update.len());
        for entry in &plan.update {
            println!("   {} [{}] {}", entry.title, entry.id, format_bytes(entry.size));
        }
    }

    if args.orphans {
        let orphans = session
            .tracker()
            .map(|tracker| tracker.orphan_markers(session.catalog()))
            .transpose()?
            .unwrap_or_default();
        if orphans.is_empty() {
            println!("No orphaned markers.");
        } else {
            println!("Orphaned markers ({}):", orphans.len());
            for path in &orphans {
                println!("   {}", path.display());
            }
        }
    }

    let sizes = session.sizes();
    println!();
    println!("Installed size: {}", format_bytes(sizes.downloaded));
    if sizes.to_download > 0 {
        println!("Update download: {}", format_bytes(sizes.to_download));
    }
    Ok(())
}

fn print_installed(session: &Session) {
    let installed = session.installed();
    println!("Installed ({}):", installed.len());
    for id in installed {
        if let Some(component) = session.catalog().component(id) {
            println!("   {} [{}]", component.info.title, component.info.id);
        }
    }
}
