//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use component_catalog::config;
use component_catalog::defaults::DEFAULT_CONFIG_FILENAME;
use component_catalog::output::OutputConfig;
use component_catalog::suggestions;

use crate::commands::{self, Context};

/// Component Catalog - Browse, select and plan installer components
#[derive(Parser, Debug)]
#[command(name = "component-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Path to the settings file.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "COMPONENT_CATALOG_CONFIG"
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display the component tree with selection and install state
    Tree(commands::tree::TreeArgs),

    /// Validate a manifest and report dependency problems
    Check(commands::check::CheckArgs),

    /// Show installed, outdated and orphaned components of an installation
    Status(commands::status::StatusArgs),

    /// Change the selection and print the resulting download plan
    Plan(commands::plan::PlanArgs),

    /// Check whether a directory is an acceptable destination or source
    VerifyPath(commands::verify_path::VerifyPathArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        // Completions need neither settings nor a terminal policy
        if let Commands::Completions(args) = self.command {
            return commands::completions::execute(args);
        }

        let ctx = Context {
            settings: load_settings(self.config)?,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Tree(args) => commands::tree::execute(args, &ctx),
            Commands::Check(args) => commands::check::execute(args, &ctx),
            Commands::Status(args) => commands::status::execute(args, &ctx),
            Commands::Plan(args) => commands::plan::execute(args, &ctx),
            Commands::VerifyPath(args) => commands::verify_path::execute(args, &ctx),
            Commands::Completions(_) => Ok(()),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn load_settings(explicit: Option<PathBuf>) -> Result<config::Settings> {
    let (path, explicit) = match explicit {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };
    if explicit && !path.exists() {
        return Err(suggestions::config_not_found(&path));
    }
    config::load(&path, explicit).map_err(|e| {
        anyhow::anyhow!("Failed to load settings from {}: {}", path.display(), e)
    })
}
