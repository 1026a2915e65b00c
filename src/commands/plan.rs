//! # Plan Command Implementation
//!
//! This module implements the `plan` subcommand, which applies selection
//! changes through a session and prints the work that results: components to
//! download, to remove, and (in update mode) to re-fetch.
//!
//! ## Functionality
//!
//! - **Selection Changes**: `--add` and `--remove` take component or category
//!   ids; categories cascade to every component below them.
//! - **Dependency Confirmation**: components pulled in as dependencies are
//!   listed and confirmed interactively, or accepted with `--yes`.
//! - **Blocked Removals**: removing a component something installed still
//!   depends on fails the command and leaves the selection unchanged.
//! - **Machine Output**: `--json` prints the plan as JSON for the download
//!   and extraction tools.
//!
//! Nothing is downloaded or deleted; the plan is only printed.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use component_catalog::output::{emoji, OutputConfig};
use component_catalog::resolver::Resolution;
use component_catalog::session::{Mode, Plan, PlanEntry, Selection, Session};
use component_catalog::sizes::{format_bytes, format_delta};

use super::{open_session, Context, ManifestArgs, SourceArgs};

/// Change the selection and print the resulting plan
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Component or category ids to select.
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub add: Vec<String>,

    /// Component or category ids to deselect.
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub remove: Vec<String>,

    /// Re-fetch installed components whose hash changed in the manifest.
    #[arg(long)]
    pub update: bool,

    /// Accept dependency additions without prompting.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `plan` command.
pub fn execute(args: PlanArgs, ctx: &Context) -> Result<()> {
    let mode = if args.update { Mode::Update } else { Mode::Manage };
    let mut session = open_session(&args.manifest, &args.source, mode, ctx)?;
    let before = session.sizes().modified;

    let interactive = !args.yes && !args.json;
    if !args.add.is_empty() {
        let outcome = session.select(&args.add, true, |resolution| {
            confirm_additions(resolution, interactive, &ctx.output)
        })?;
        report(&outcome, &ctx.output, args.json)?;
    }
    if !args.remove.is_empty() {
        let outcome = session.select(&args.remove, false, |resolution| {
            confirm_additions(resolution, interactive, &ctx.output)
        })?;
        report(&outcome, &ctx.output, args.json)?;
    }

    let plan = session.plan()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&session, &plan, before);
    }
    Ok(())
}

/// Ask whether dependencies may be added. Non-interactive runs accept them;
/// a prompt that cannot be shown declines them.
fn confirm_additions(resolution: &Resolution, interactive: bool, output: &OutputConfig) -> bool {
    if !interactive {
        return true;
    }

    println!(
        "{} The following components are required and will also be installed:",
        emoji(output, "🔗", "[DEPS]")
    );
    for forced in &resolution.added {
        println!("   {}", forced.describe());
    }

    let theme = ColorfulTheme::default();
    match Confirm::with_theme(&theme)
        .with_prompt("Continue?")
        .default(true)
        .interact()
    {
        Ok(accepted) => accepted,
        Err(e) => {
            log::warn!("Could not prompt for confirmation: {}", e);
            false
        }
    }
}

/// Print how a selection change ended; a blocked change is an error.
fn report(outcome: &Selection, output: &OutputConfig, quiet: bool) -> Result<()> {
    match outcome {
        Selection::Applied(resolution) => {
            if !quiet && !resolution.added.is_empty() {
                println!(
                    "{} Added dependencies: {}",
                    emoji(output, "➕", "[+]"),
                    resolution.added_titles().join(", ")
                );
            }
            Ok(())
        }
        Selection::Cancelled(_) => {
            if !quiet {
                println!("Selection unchanged.");
            }
            Ok(())
        }
        Selection::Blocked(resolution) => {
            resolution.clone().into_result()?;
            Ok(())
        }
    }
}

fn print_plan(session: &Session, plan: &Plan, before: u64) {
    println!("Mode: {}", plan.mode);

    if plan.is_empty() {
        println!("Nothing to do.");
    }
    print_section("Download", &plan.download);
    print_section("Remove", &plan.remove);
    print_section("Update", &plan.update);

    let sizes = session.sizes();
    println!();
    println!("Installed: {}", format_bytes(sizes.downloaded));
    println!("To download: {}", format_bytes(sizes.to_download));
    println!(
        "After changes: {} ({})",
        format_bytes(sizes.modified),
        format_delta(before, sizes.modified)
    );
}

fn print_section(heading: &str, entries: &[PlanEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{} ({}):", heading, entries.len());
    for entry in entries {
        println!("   {} [{}] {}", entry.title, entry.id, format_bytes(entry.size));
    }
}
