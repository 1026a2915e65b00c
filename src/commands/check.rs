//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, which validates a manifest
//! the same way the installer loads it and then looks for dependency problems
//! the parser alone cannot see.
//!
//! ## Functionality
//!
//! - **Manifest Validation**: a malformed document, a missing attribute, a bad
//!   hash or size, or a duplicate id fails the command.
//! - **Dangling Dependencies**: `depends` ids naming no component are reported
//!   as warnings; the resolver ignores them.
//! - **Dependency Cycles**: a cycle fails the command. Selecting any member of
//!   a cycle would force every member to be installed.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use component_catalog::error::Error;
use component_catalog::manifest::{Catalog, Node};
use component_catalog::output::emoji;
use component_catalog::sizes::{format_bytes, total_size};
use component_catalog::suggestions;
use component_catalog::walker;

use super::{load_session, Context, ManifestArgs};

/// Validate a manifest and report dependency problems
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

/// Counts reported by `check`.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    categories: usize,
    components: usize,
    required: usize,
    total_size: u64,
}

fn summarize(catalog: &Catalog) -> Summary {
    let mut summary = Summary::default();
    walker::walk(&catalog.nodes, |node| match node {
        Node::Category(_) => summary.categories += 1,
        Node::Component(component) => {
            summary.components += 1;
            if component.info.required {
                summary.required += 1;
            }
        }
    });
    summary.total_size = total_size(catalog, |_| true);
    summary
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, ctx: &Context) -> Result<()> {
    let path = &args.manifest.manifest;
    println!("Loading manifest from: {}", path.display());

    let session = load_session(path, ctx)?;
    let catalog = session.catalog();
    let summary = summarize(catalog);

    println!("{} Manifest is valid", emoji(&ctx.output, "✅", "[OK]"));
    println!("   Categories: {}", summary.categories);
    println!(
        "   Components: {} ({} required)",
        summary.components, summary.required
    );
    println!("   Total size: {}", format_bytes(summary.total_size));

    let dangling = catalog.dangling_dependencies();
    for (component, dependency) in &dangling {
        eprintln!(
            "{} {} depends on unknown component {}",
            emoji(&ctx.output, "⚠️ ", "[WARN]"),
            component,
            dependency
        );
    }

    catalog.check_cycles().map_err(|e| match e {
        Error::CycleDetected { cycle } => suggestions::cycle_detected(&cycle),
        other => other.into(),
    })?;

    if dangling.is_empty() {
        println!("   Dependencies: all resolvable, no cycles");
    }
    Ok(())
}
