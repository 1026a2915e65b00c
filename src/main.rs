//! # Component Catalog CLI
//!
//! This is the binary entry point for the `component-catalog` command-line
//! tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Translating top-level errors into user-facing output.
//!
//! The catalog logic lives in the `component_catalog` library crate; the
//! binary is a thin presentation layer over it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
